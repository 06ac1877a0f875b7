use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// A downloaded preview clip on disk.
///
/// The file is deleted when this value is dropped or closed, so whichever
/// path ends a preview (stop, replacement, failed decode) releases it.
#[derive(Debug)]
pub struct PreviewFile {
    file: NamedTempFile,
}

impl PreviewFile {
    pub fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("setlist-preview-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file now, reporting failures instead of swallowing them.
    pub fn close(self) -> io::Result<()> {
        self.file.close()
    }
}
