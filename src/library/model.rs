use std::path::{Path, PathBuf};
use std::time::Duration;

use super::metadata::format_duration;

/// A file discovered under the selected directory that is not on the deny-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, file_name }
    }

    /// File name without its extension.
    pub fn stem(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_name.clone())
    }
}

/// Tags read from a file when it becomes the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<Duration>,
}

impl LocalMetadata {
    /// Duration as `M:SS`, if known.
    pub fn duration_string(&self) -> Option<String> {
        self.duration.map(format_duration)
    }
}
