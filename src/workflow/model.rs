//! Workflow state types rendered by the UI.

use crate::catalog::{PlaylistId, RemoteTrack};
use crate::library::{CandidateFile, LocalMetadata};

/// Where the workflow currently is.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Waiting for a directory and a playlist name.
    SelectingDirectory,
    /// Reviewing the file at the session cursor.
    Presenting(FileReview),
    /// Every file has been resolved.
    Finished(Summary),
}

/// Everything shown while one file is under review.
#[derive(Debug, Clone)]
pub struct FileReview {
    pub file: CandidateFile,
    pub metadata: LocalMetadata,
    /// 0-based position in the session and the session length.
    pub position: usize,
    pub total: usize,
    /// Editable search text, prefilled from the tags.
    pub query: String,
    /// Editable direct track reference.
    pub reference: String,
    /// Results of the last search, best first.
    pub results: Vec<RemoteTrack>,
    pub selected: usize,
    /// The query the current `results` belong to; `None` when nothing was searched.
    pub searched: Option<String>,
}

impl FileReview {
    pub fn selected_track(&self) -> Option<&RemoteTrack> {
        self.results.get(self.selected)
    }
}

/// Text inputs of the review screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Query,
    Reference,
}

/// End-of-session report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub added: usize,
    pub skipped: Vec<String>,
    pub playlist_name: String,
    pub playlist_id: Option<PlaylistId>,
}

impl Summary {
    /// Plain-text listing of the skipped files.
    pub fn report(&self) -> String {
        let mut out = format!(
            "All {} files processed: {} added to \"{}\", {} skipped.\n",
            self.total,
            self.added,
            self.playlist_name,
            self.skipped.len()
        );
        if self.skipped.is_empty() {
            out.push_str("No skipped songs.");
        } else {
            out.push_str("Skipped songs:");
            for name in &self.skipped {
                out.push_str("\n  ");
                out.push_str(name);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message box for the user; the UI shows it until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl ToString) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            body: body.to_string(),
        }
    }
}
