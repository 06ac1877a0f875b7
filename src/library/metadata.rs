use std::path::Path;
use std::time::Duration;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::Accessor;
use tracing::warn;

use super::model::{CandidateFile, LocalMetadata};

/// Reads title/artist/duration from a local file.
///
/// Implementations never fail: anything unreadable is reported as unknown.
pub trait MetadataReader {
    fn read(&self, path: &Path) -> LocalMetadata;
}

/// `MetadataReader` backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagReader;

impl MetadataReader for TagReader {
    fn read(&self, path: &Path) -> LocalMetadata {
        let tagged = match lofty::read_from_path(path) {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read metadata");
                return LocalMetadata::default();
            }
        };

        let mut meta = LocalMetadata {
            duration: Some(tagged.properties().duration()),
            ..LocalMetadata::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            meta.title = non_blank(tag.title().as_deref());
            meta.artist = non_blank(tag.artist().as_deref());
        }
        meta
    }
}

fn non_blank(v: Option<&str>) -> Option<String> {
    v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// The search query suggested for `file`.
///
/// `"{title} {artist}"` when both tags are present, whichever one is present
/// otherwise, and the file name without extension when neither is.
pub fn default_query(meta: &LocalMetadata, file: &CandidateFile) -> String {
    let title = non_blank(meta.title.as_deref());
    let artist = non_blank(meta.artist.as_deref());
    match (title, artist) {
        (Some(t), Some(a)) => format!("{t} {a}"),
        (Some(t), None) => t,
        (None, Some(a)) => a,
        (None, None) => file.stem(),
    }
}

/// Format a `Duration` as `M:SS`, truncating partial seconds.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
