use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::catalog::{Catalog, CatalogError, PlaylistId, RemoteTrack};
use crate::config::LibrarySettings;
use crate::desktop;
use crate::library::{self, MetadataReader, default_query};
use crate::preview::{NowPlaying, PlaybackError, PreviewPlayer};

use super::model::{FileReview, InputField, Notice, Stage, Summary};
use super::session::ReviewSession;

/// The review state machine.
///
/// Catalog, playback and desktop failures never escape: they become a
/// `Notice` and leave the workflow where it was.
pub struct ReviewWorkflow {
    catalog: Box<dyn Catalog>,
    metadata: Box<dyn MetadataReader>,
    player: Box<dyn PreviewPlayer>,
    library: LibrarySettings,
    search_limit: usize,
    stage: Stage,
    session: Option<ReviewSession>,
    notice: Option<Notice>,
}

impl ReviewWorkflow {
    pub fn new(
        catalog: Box<dyn Catalog>,
        metadata: Box<dyn MetadataReader>,
        player: Box<dyn PreviewPlayer>,
        library: LibrarySettings,
        search_limit: usize,
    ) -> Self {
        Self {
            catalog,
            metadata,
            player,
            library,
            search_limit,
            stage: Stage::SelectingDirectory,
            session: None,
            notice: None,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&ReviewSession> {
        self.session.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Show a notice raised outside the workflow (e.g. at startup).
    pub fn post_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn summary(&self) -> Option<&Summary> {
        match &self.stage {
            Stage::Finished(s) => Some(s),
            _ => None,
        }
    }

    pub fn now_playing(&self) -> Option<NowPlaying> {
        self.player.now_playing()
    }

    fn review(&self) -> Option<&FileReview> {
        match &self.stage {
            Stage::Presenting(r) => Some(r),
            _ => None,
        }
    }

    fn review_mut(&mut self) -> Option<&mut FileReview> {
        match &mut self.stage {
            Stage::Presenting(r) => Some(r),
            _ => None,
        }
    }

    /// Editable text of the review screen, if a file is under review.
    pub fn input_mut(&mut self, field: InputField) -> Option<&mut String> {
        self.review_mut().map(|r| match field {
            InputField::Query => &mut r.query,
            InputField::Reference => &mut r.reference,
        })
    }

    /// Begin a new session over `dir`.
    ///
    /// A blank playlist name falls back to the directory's own name. The
    /// playlist itself is only created on the first add.
    pub fn start(&mut self, dir: &Path, playlist_name: &str) {
        self.player.stop();

        let files = match library::scan(dir, &self.library) {
            Ok(files) => files,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot enumerate directory");
                self.notice = Some(Notice::error("Cannot open directory", e));
                return;
            }
        };

        let name = match playlist_name.trim() {
            "" => dir
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "setlist".to_string()),
            name => name.to_string(),
        };

        info!(dir = %dir.display(), files = files.len(), playlist = %name, "session started");
        self.session = Some(ReviewSession::new(files, name));
        self.present_current();
    }

    /// Back to directory selection; the next `start` opens a fresh session.
    pub fn restart(&mut self) {
        self.player.stop();
        self.session = None;
        self.stage = Stage::SelectingDirectory;
    }

    /// Stop any playback; called before the program exits.
    pub fn shutdown(&mut self) {
        self.player.stop();
    }

    fn present_current(&mut self) {
        let Some(session) = self.session.as_ref() else {
            self.stage = Stage::SelectingDirectory;
            return;
        };

        let Some(file) = session.current().cloned() else {
            let summary = Summary {
                total: session.files().len(),
                added: session.added(),
                skipped: session.skipped().to_vec(),
                playlist_name: session.playlist_name().to_string(),
                playlist_id: session.playlist_id().cloned(),
            };
            info!(added = summary.added, skipped = summary.skipped.len(), "session finished");
            self.stage = Stage::Finished(summary);
            return;
        };

        let metadata = self.metadata.read(&file.path);
        let query = default_query(&metadata, &file);
        debug!(file = %file.file_name, %query, "presenting file");

        self.stage = Stage::Presenting(FileReview {
            position: session.cursor(),
            total: session.files().len(),
            file,
            metadata,
            query,
            reference: String::new(),
            results: Vec::new(),
            selected: 0,
            searched: None,
        });
        self.search();
    }

    /// Run the current query. An empty query is a valid "nothing to show" state.
    pub fn search(&mut self) {
        if matches!(self.player.now_playing(), Some(NowPlaying::Preview { .. })) {
            self.player.stop();
        }

        let limit = self.search_limit;
        let Some(review) = self.review_mut() else {
            return;
        };
        review.results.clear();
        review.selected = 0;
        review.searched = None;

        let query = review.query.trim().to_string();
        if query.is_empty() {
            return;
        }

        match self.catalog.search(&query, limit) {
            Ok(tracks) => {
                if let Some(review) = self.review_mut() {
                    review.results = tracks;
                    review.searched = Some(query);
                }
            }
            Err(e) => {
                error!(%query, error = %e, "search failed");
                self.notice = Some(Notice::error("Search failed", e));
            }
        }
    }

    pub fn select_next(&mut self) {
        if let Some(r) = self.review_mut() {
            if !r.results.is_empty() {
                r.selected = (r.selected + 1) % r.results.len();
            }
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(r) = self.review_mut() {
            if !r.results.is_empty() {
                r.selected = r.selected.checked_sub(1).unwrap_or(r.results.len() - 1);
            }
        }
    }

    /// Append the selected search result and move to the next file.
    pub fn add_selected(&mut self) {
        let Some(review) = self.review() else {
            return;
        };
        let Some(track) = review.selected_track().cloned() else {
            self.notice = Some(Notice::error(
                "Nothing selected",
                "There is no search result to add.",
            ));
            return;
        };

        match self.commit(&track) {
            Ok(()) => self.advance(),
            Err(e) => {
                error!(track = %track.uri, error = %e, "add failed");
                self.notice = Some(Notice::error("Unable to add track", e));
            }
        }
    }

    /// Resolve the typed reference and, if it is a track, append it and move on.
    pub fn add_by_reference(&mut self) {
        let Some(review) = self.review() else {
            return;
        };
        let reference = review.reference.trim().to_string();
        if reference.is_empty() {
            self.notice = Some(Notice::error(
                "No URL",
                "Please enter a Spotify track URL or URI.",
            ));
            return;
        }

        let track = match self.catalog.lookup(&reference) {
            Ok(track) => track,
            Err(e @ (CatalogError::NotATrack(_) | CatalogError::InvalidReference(_))) => {
                warn!(%reference, error = %e, "reference is not a track");
                self.notice = Some(Notice::error(
                    "Invalid Track",
                    format!("The provided URL does not correspond to a valid Spotify track.\n{e}"),
                ));
                return;
            }
            Err(e) => {
                warn!(%reference, error = %e, "lookup failed");
                self.notice = Some(Notice::error(
                    "Invalid URL",
                    format!("Error trying to fetch track:\n{e}"),
                ));
                return;
            }
        };

        match self.commit(&track) {
            Ok(()) => {
                self.notice = Some(Notice::info(
                    "Success",
                    format!("Added track by URL:\n{}", track.name),
                ));
                self.advance();
            }
            Err(e) => {
                error!(track = %track.uri, error = %e, "add by reference failed");
                self.notice = Some(Notice::error("Unable to add track", e));
            }
        }
    }

    /// Leave the current file out of the playlist and move on.
    pub fn skip(&mut self) {
        if self.review().is_none() {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.record_skip();
            debug!(cursor = session.cursor(), "file skipped");
        }
        self.advance();
    }

    /// The session playlist, created on first use.
    fn ensure_playlist(&mut self) -> Result<PlaylistId, CatalogError> {
        let Some(session) = self.session.as_mut() else {
            return Err(CatalogError::Unavailable("no active session".to_string()));
        };
        if let Some(id) = session.playlist_id() {
            return Ok(id.clone());
        }
        let id = self.catalog.create_playlist(session.playlist_name())?;
        session.set_playlist_id(id.clone());
        Ok(id)
    }

    fn commit(&mut self, track: &RemoteTrack) -> Result<(), CatalogError> {
        let playlist = self.ensure_playlist()?;
        self.catalog.append_item(&playlist, &track.uri)?;
        if let Some(session) = self.session.as_mut() {
            session.record_add();
        }
        info!(track_id = %track.id, name = %track.name, "track added");
        Ok(())
    }

    fn advance(&mut self) {
        self.player.stop();
        if let Some(session) = self.session.as_mut() {
            session.advance();
        }
        self.present_current();
    }

    pub fn play_local(&mut self) {
        let Some(path) = self.review().map(|r| r.file.path.clone()) else {
            return;
        };
        if let Err(e) = self.player.play_local(&path) {
            self.notice = Some(Notice::error("Playback Error", format!("Unable to play file:\n{e}")));
        }
    }

    /// Preview the selected result, if the catalog offers a clip for it.
    pub fn play_preview(&mut self) {
        let Some(review) = self.review() else {
            return;
        };
        let Some(track) = review.selected_track() else {
            return;
        };
        let Some(url) = track.preview_url.clone() else {
            self.player.stop();
            self.notice = Some(Notice::info(
                "Preview Unavailable",
                PlaybackError::NoPreview.to_string(),
            ));
            return;
        };
        if let Err(e) = self.player.play_remote(&url) {
            error!(%url, error = %e, "preview failed");
            self.notice = Some(Notice::error("Unable to play preview", e));
        }
    }

    pub fn stop_playback(&mut self) {
        self.player.stop();
    }

    /// Called once per event-loop turn.
    pub fn tick(&mut self) {
        self.player.poll();
    }

    pub fn reveal_current(&mut self) {
        let Some(path) = self.review().map(|r| r.file.path.clone()) else {
            return;
        };
        if let Err(e) = desktop::reveal(&path) {
            self.notice = Some(Notice::error("Unable to open in file explorer", e));
        }
    }

    pub fn open_selected_link(&mut self) {
        let Some(url) = self
            .review()
            .and_then(|r| r.selected_track())
            .map(|t| t.external_url.clone())
        else {
            return;
        };
        if let Err(e) = desktop::open_link(&url) {
            self.notice = Some(Notice::error("Unable to open link", e));
        }
    }
}
