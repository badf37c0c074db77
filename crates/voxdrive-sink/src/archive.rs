use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use voxdrive_core::{AudioBlock, SinkError};

/// Raw PCM dump of everything the loop consumes, byte for byte.
///
/// Write failures never reach the caller: the first one is logged and the
/// archive goes quiet for the rest of the session.
pub struct AudioArchive {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    bytes_written: u64,
}

impl AudioArchive {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| {
            SinkError::InitializationFailed(format!(
                "cannot create archive {}: {e}",
                path.display()
            ))
        })?;
        tracing::info!(path = %path.display(), "archiving raw audio");
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            bytes_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn write_block(&mut self, block: &AudioBlock) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        match writer.write_all(block.as_bytes()) {
            Ok(()) => self.bytes_written += block.len() as u64,
            Err(e) => self.disable(e),
        }
    }

    /// Flushes buffered audio. Called once at shutdown.
    pub fn finish(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = writer.flush() {
                self.disable(e);
                return;
            }
            tracing::debug!(bytes = self.bytes_written, "audio archive closed");
        }
        self.writer = None;
    }

    fn disable(&mut self, error: std::io::Error) {
        tracing::error!(
            path = %self.path.display(),
            "audio archive write failed, archiving disabled: {error}"
        );
        self.writer = None;
    }
}

impl Drop for AudioArchive {
    fn drop(&mut self) {
        self.finish();
    }
}
