use std::collections::HashSet;
use std::io;
use std::path::{self, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::CandidateFile;

/// True when the extension of `path` (and only the extension) is on the deny-list.
pub fn is_denied(path: &Path, deny_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            deny_extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| !e.is_empty() && e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Recursively enumerate reviewable files under `dir`, sorted by
/// case-insensitive file name.
///
/// Fails only when `dir` itself is not a directory; unreadable entries further
/// down the tree are logged and skipped.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> io::Result<Vec<CandidateFile>> {
    let root = path::absolute(dir)?;
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a directory: {}", root.display()),
        ));
    }

    let mut files: Vec<CandidateFile> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    for entry in WalkDir::new(&root).follow_links(settings.follow_links) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_dir() || !path.is_file() {
            continue;
        }
        if is_denied(path, &settings.deny_extensions) {
            debug!(path = %path.display(), "denied by extension");
            continue;
        }
        if settings.follow_links {
            let real = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            if !seen.insert(real) {
                debug!(path = %path.display(), "already listed through another link");
                continue;
            }
        }
        files.push(CandidateFile::new(path));
    }

    files.sort_by(|a, b| {
        a.file_name
            .to_lowercase()
            .cmp(&b.file_name.to_lowercase())
            .then_with(|| a.path.cmp(&b.path))
    });
    debug!(root = %root.display(), count = files.len(), "scan finished");
    Ok(files)
}
