use super::scan::is_denied;
use super::*;
use crate::config::LibrarySettings;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

fn names(files: &[CandidateFile]) -> Vec<&str> {
    files.iter().map(|f| f.file_name.as_str()).collect()
}

#[test]
fn is_denied_matches_image_extensions_case_insensitive() {
    let deny = LibrarySettings::default().deny_extensions;
    assert!(is_denied(Path::new("/tmp/cover.jpg"), &deny));
    assert!(is_denied(Path::new("/tmp/cover.JPEG"), &deny));
    assert!(is_denied(Path::new("/tmp/cover.Png"), &deny));
    assert!(is_denied(Path::new("/tmp/anim.gif"), &deny));
    assert!(!is_denied(Path::new("/tmp/a.mp3"), &deny));
    assert!(!is_denied(Path::new("/tmp/a"), &deny));
}

#[test]
fn is_denied_checks_extension_not_substring() {
    let deny = LibrarySettings::default().deny_extensions;
    assert!(!is_denied(Path::new("/tmp/jpg.mp3"), &deny));
    assert!(!is_denied(Path::new("/tmp/my.png.flac"), &deny));
    assert!(!is_denied(Path::new("/tmp/png"), &deny));
}

#[test]
fn scan_walks_recursively_filters_images_and_sorts_by_name() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("Disc 2");
    fs::create_dir_all(&sub).unwrap();

    fs::write(dir.path().join("b.mp3"), b"x").unwrap();
    fs::write(dir.path().join("Cover.JPG"), b"x").unwrap();
    fs::write(dir.path().join("notes.txt"), b"x").unwrap();
    fs::write(sub.join("A.flac"), b"x").unwrap();
    fs::write(sub.join("folder.png"), b"x").unwrap();
    fs::write(sub.join("c.ogg"), b"x").unwrap();

    let files = scan(dir.path(), &LibrarySettings::default()).unwrap();
    assert_eq!(names(&files), vec!["A.flac", "b.mp3", "c.ogg", "notes.txt"]);
    assert!(files.iter().all(|f| f.path.is_absolute()));
    assert_eq!(files[0].path, sub.join("A.flac"));
}

/// `root/album/song.mp3` plus `root/link -> root/album`.
#[cfg(unix)]
fn dir_with_linked_album() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    let album = dir.path().join("album");
    fs::create_dir_all(&album).unwrap();
    fs::write(album.join("song.mp3"), b"x").unwrap();
    std::os::unix::fs::symlink(&album, dir.path().join("link")).unwrap();
    dir
}

#[cfg(unix)]
#[test]
fn scan_does_not_descend_into_linked_directories_by_default() {
    let dir = dir_with_linked_album();
    let files = scan(dir.path(), &LibrarySettings::default()).unwrap();
    assert_eq!(names(&files), vec!["song.mp3"]);
    assert_eq!(files[0].path, dir.path().join("album").join("song.mp3"));
}

#[cfg(unix)]
#[test]
fn following_links_still_lists_each_file_once() {
    let dir = dir_with_linked_album();
    let settings = LibrarySettings {
        follow_links: true,
        ..LibrarySettings::default()
    };
    let files = scan(dir.path(), &settings).unwrap();
    assert_eq!(names(&files), vec!["song.mp3"]);
}

#[test]
fn scan_of_empty_directory_is_empty() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("only.gif"), b"x").unwrap();
    let files = scan(dir.path(), &LibrarySettings::default()).unwrap();
    assert!(files.is_empty());
}

#[test]
fn scan_rejects_missing_directory() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(scan(&missing, &LibrarySettings::default()).is_err());
}

#[test]
fn default_query_prefers_title_and_artist() {
    let file = CandidateFile::new("/music/b.mp3");
    let meta = LocalMetadata {
        title: Some("Song B".into()),
        artist: Some("Artist X".into()),
        duration: None,
    };
    assert_eq!(default_query(&meta, &file), "Song B Artist X");
}

#[test]
fn default_query_uses_whichever_tag_is_present() {
    let file = CandidateFile::new("/music/b.mp3");
    let only_title = LocalMetadata {
        title: Some("Song B".into()),
        ..LocalMetadata::default()
    };
    let only_artist = LocalMetadata {
        artist: Some("Artist X".into()),
        ..LocalMetadata::default()
    };
    assert_eq!(default_query(&only_title, &file), "Song B");
    assert_eq!(default_query(&only_artist, &file), "Artist X");
}

#[test]
fn default_query_falls_back_to_stem() {
    let file = CandidateFile::new("/music/01 - Intro.live.mp3");
    assert_eq!(default_query(&LocalMetadata::default(), &file), "01 - Intro.live");

    let blank = LocalMetadata {
        title: Some("   ".into()),
        artist: Some(String::new()),
        duration: None,
    };
    let a = CandidateFile::new("/music/a.mp3");
    assert_eq!(default_query(&blank, &a), "a");
}

#[test]
fn tag_reader_degrades_to_unknown_for_unreadable_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.mp3");
    fs::write(&path, b"definitely not audio").unwrap();

    let meta = TagReader.read(&path);
    assert_eq!(meta.title, None);
    assert_eq!(meta.artist, None);

    let missing = TagReader.read(&dir.path().join("missing.mp3"));
    assert_eq!(missing, LocalMetadata::default());
}

#[test]
fn durations_format_as_minutes_and_padded_seconds() {
    assert_eq!(format_duration(Duration::from_secs(0)), "0:00");
    assert_eq!(format_duration(Duration::from_millis(65_900)), "1:05");
    assert_eq!(format_duration(Duration::from_secs(3_600)), "60:00");

    let meta = LocalMetadata {
        duration: Some(Duration::from_secs(185)),
        ..LocalMetadata::default()
    };
    assert_eq!(meta.duration_string().as_deref(), Some("3:05"));
}
