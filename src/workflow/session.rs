use crate::catalog::PlaylistId;
use crate::library::CandidateFile;

/// In-memory state of one directory's walk-through.
///
/// The cursor only moves forward, one file per skip or add, and the playlist
/// id is set at most once.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    files: Vec<CandidateFile>,
    cursor: usize,
    skipped: Vec<String>,
    added: usize,
    playlist_name: String,
    playlist_id: Option<PlaylistId>,
}

impl ReviewSession {
    pub fn new(files: Vec<CandidateFile>, playlist_name: impl Into<String>) -> Self {
        Self {
            files,
            cursor: 0,
            skipped: Vec::new(),
            added: 0,
            playlist_name: playlist_name.into(),
            playlist_id: None,
        }
    }

    pub fn files(&self) -> &[CandidateFile] {
        &self.files
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&CandidateFile> {
        self.files.get(self.cursor)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.files.len()
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn added(&self) -> usize {
        self.added
    }

    pub fn playlist_name(&self) -> &str {
        &self.playlist_name
    }

    pub fn playlist_id(&self) -> Option<&PlaylistId> {
        self.playlist_id.as_ref()
    }

    pub(super) fn set_playlist_id(&mut self, id: PlaylistId) {
        if self.playlist_id.is_none() {
            self.playlist_id = Some(id);
        }
    }

    pub(super) fn record_skip(&mut self) {
        if let Some(file) = self.files.get(self.cursor) {
            self.skipped.push(file.file_name.clone());
        }
    }

    pub(super) fn record_add(&mut self) {
        self.added += 1;
    }

    pub(super) fn advance(&mut self) {
        if !self.is_finished() {
            self.cursor += 1;
        }
    }
}
