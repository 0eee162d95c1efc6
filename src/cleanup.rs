//! Removal of partially written output files.
//!
//! A [`PendingOutput`] owns an output file from creation until [`commit`]:
//! dropping it earlier (an error, an unwinding panic) deletes the file. An
//! [`InterruptHook`] covers the case where the process is told to terminate
//! and destructors never run.
//!
//! [`commit`]: PendingOutput::commit

use crate::{Error, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Shared record of the file currently awaiting commit.
#[derive(Clone, Debug, Default)]
pub struct InterruptHook {
    pending: Arc<Mutex<Option<PathBuf>>>,
}

impl InterruptHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deletes the pending output file, if any.
    ///
    /// Meant to be called from a termination signal handler right before the
    /// process exits.
    pub fn cleanup(&self) {
        let path = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(path) = path {
            remove_quietly(&path);
        }
    }

    /// Path of the file currently awaiting commit.
    pub fn pending(&self) -> Option<PathBuf> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn register(&self, path: &Path) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(path.to_path_buf());
    }

    fn release(&self) -> Option<PathBuf> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

fn remove_quietly(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove partial output"),
    }
}

/// An output file that is deleted unless committed.
pub struct PendingOutput {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    hook: InterruptHook,
}

impl PendingOutput {
    /// Creates (truncating) the file at `path` and registers it with `hook`.
    pub fn create(path: impl AsRef<Path>, hook: &InterruptHook) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        hook.register(&path);
        let file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                hook.release();
                return Err(Error::io(&format!("{}: {}", path.display(), e)));
            }
        };
        Ok(PendingOutput {
            path,
            writer: Some(BufWriter::new(file)),
            hook: hook.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes the file and keeps it.
    ///
    /// If flushing fails the file is removed as if the output had been
    /// dropped uncommitted.
    pub fn commit(mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        // Only a fully flushed file is disarmed.
        self.writer = None;
        self.hook.release();
        Ok(())
    }
}

impl Write for PendingOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "output already committed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for PendingOutput {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            // Close the handle before unlinking; the buffered tail is discarded.
            let (file, _) = writer.into_parts();
            drop(file);
            self.hook.release();
            remove_quietly(&self.path);
        }
    }
}
