use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::PlaybackError;

/// Something that can play one audio file at a time.
pub trait AudioOutput {
    /// Start playing `path`, replacing anything already playing.
    fn start(&mut self, path: &Path) -> Result<(), PlaybackError>;

    fn stop(&mut self);

    /// True while audio is still coming out.
    fn is_playing(&self) -> bool;
}

/// `AudioOutput` on the default device via `rodio`.
pub struct RodioOutput {
    stream: OutputStream,
    sink: Option<Sink>,
}

impl RodioOutput {
    pub fn open_default() -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::NoDevice(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        Ok(Self { stream, sink: None })
    }
}

impl AudioOutput for RodioOutput {
    fn start(&mut self, path: &Path) -> Result<(), PlaybackError> {
        self.stop();

        let file = File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode(e.to_string()))?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.play();
        debug!(path = %path.display(), "playback started");
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn is_playing(&self) -> bool {
        self.sink.as_ref().map(|s| !s.empty()).unwrap_or(false)
    }
}

/// Used when no audio device could be opened: every start fails with the
/// original reason, stopping is a no-op.
#[derive(Debug, Clone)]
pub struct SilentOutput {
    reason: String,
}

impl SilentOutput {
    pub fn new(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(%reason, "audio output unavailable");
        Self { reason }
    }
}

impl AudioOutput for SilentOutput {
    fn start(&mut self, _path: &Path) -> Result<(), PlaybackError> {
        Err(PlaybackError::NoDevice(self.reason.clone()))
    }

    fn stop(&mut self) {}

    fn is_playing(&self) -> bool {
        false
    }
}
