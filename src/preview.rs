//! Audio for the review screen: the user's own file, or a short preview clip
//! of a catalog track.
//!
//! Exactly one stream is active at a time. Starting any playback stops what
//! was playing, and a downloaded preview lives in a `PreviewFile` that is
//! removed from disk as soon as it stops being the active stream.

mod output;
mod player;
mod temp;

use std::path::{Path, PathBuf};

pub use output::{AudioOutput, RodioOutput, SilentOutput};
pub use player::Player;

/// The stream most recently started and not yet stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NowPlaying {
    Local(PathBuf),
    Preview { url: String },
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("No audio output device: {0}")]
    NoDevice(String),

    #[error("File does not exist: {}", .0.display())]
    Missing(PathBuf),

    #[error("Unable to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to decode audio: {0}")]
    Decode(String),

    #[error("No preview available for this track")]
    NoPreview,

    #[error("Unable to download preview: {0}")]
    Download(String),

    #[error("Unable to store preview: {0}")]
    Store(#[from] std::io::Error),
}

/// The playback capability the review workflow depends on.
pub trait PreviewPlayer {
    fn play_local(&mut self, path: &Path) -> Result<(), PlaybackError>;

    /// Fetch the clip behind `url` into a scoped temporary file and play it.
    fn play_remote(&mut self, url: &str) -> Result<(), PlaybackError>;

    /// Idempotent; safe with nothing playing.
    fn stop(&mut self);

    fn now_playing(&self) -> Option<NowPlaying>;

    /// Release the active stream once its audio has run out.
    fn poll(&mut self);
}
