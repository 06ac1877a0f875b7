use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use super::output::AudioOutput;
use super::temp::PreviewFile;
use super::{NowPlaying, PlaybackError, PreviewPlayer};

enum Stream {
    Local(PathBuf),
    Preview { url: String, file: PreviewFile },
}

/// Single-stream player for local files and downloaded preview clips.
pub struct Player {
    output: Box<dyn AudioOutput>,
    http: Client,
    download_timeout: Duration,
    current: Option<Stream>,
}

impl Player {
    pub fn new(output: Box<dyn AudioOutput>, http: Client, download_timeout: Duration) -> Self {
        Self {
            output,
            http,
            download_timeout,
            current: None,
        }
    }

    fn download(&self, url: &str) -> Result<PreviewFile, PlaybackError> {
        debug!(url, "downloading preview");
        let response = self
            .http
            .get(url)
            .timeout(self.download_timeout)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| PlaybackError::Download(e.to_string()))?;
        let bytes = response
            .bytes()
            .map_err(|e| PlaybackError::Download(e.to_string()))?;
        Ok(PreviewFile::from_bytes(&bytes)?)
    }

    /// Play an already-downloaded clip. On failure the clip is dropped, which
    /// deletes it.
    pub fn play_preview_file(&mut self, url: &str, file: PreviewFile) -> Result<(), PlaybackError> {
        self.stop();
        self.output.start(file.path())?;
        info!(url, path = %file.path().display(), "preview started");
        self.current = Some(Stream::Preview {
            url: url.to_string(),
            file,
        });
        Ok(())
    }
}

impl PreviewPlayer for Player {
    fn play_local(&mut self, path: &Path) -> Result<(), PlaybackError> {
        self.stop();
        if !path.exists() {
            return Err(PlaybackError::Missing(path.to_path_buf()));
        }
        self.output.start(path)?;
        info!(path = %path.display(), "local playback started");
        self.current = Some(Stream::Local(path.to_path_buf()));
        Ok(())
    }

    fn play_remote(&mut self, url: &str) -> Result<(), PlaybackError> {
        self.stop();
        if url.trim().is_empty() {
            return Err(PlaybackError::NoPreview);
        }
        let file = self.download(url)?;
        self.play_preview_file(url, file)
    }

    fn stop(&mut self) {
        self.output.stop();
        match self.current.take() {
            Some(Stream::Preview { file, .. }) => {
                let path = file.path().to_path_buf();
                if let Err(e) = file.close() {
                    warn!(path = %path.display(), error = %e, "failed to remove preview file");
                }
            }
            Some(Stream::Local(_)) | None => {}
        }
    }

    fn now_playing(&self) -> Option<NowPlaying> {
        match &self.current {
            Some(Stream::Local(path)) => Some(NowPlaying::Local(path.clone())),
            Some(Stream::Preview { url, .. }) => Some(NowPlaying::Preview { url: url.clone() }),
            None => None,
        }
    }

    fn poll(&mut self) {
        if self.current.is_some() && !self.output.is_playing() {
            debug!("stream finished");
            self.stop();
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}
