//! # File / Device Transport
//!
//! Writes raw ESC/POS bytes to a path. Pointing it at a printer device node
//! (`/dev/usb/lp0`, `/dev/rfcomm0`) prints; pointing it at a regular file
//! captures the job for later inspection.
//!
//! ## Chunked Writes
//!
//! Large buffers are written in chunks with an optional pause between them
//! so slow devices are not flooded. The default chunk size is 4096 bytes.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::Printer;
use crate::error::{ReciboError, Result};

/// Default chunk size for writes (bytes)
pub const CHUNK_SIZE: usize = 4096;

/// # File Transport
///
/// The file is opened (and truncated) on [`connect`](Printer::connect), or
/// lazily on the first [`send`](Printer::send).
///
/// ```no_run
/// use recibo::transport::{FileTransport, Printer};
/// use recibo::protocol::commands;
///
/// let mut printer = FileTransport::new("/dev/usb/lp0");
/// printer.send(&commands::init())?;
/// # Ok::<(), recibo::ReciboError>(())
/// ```
#[derive(Debug)]
pub struct FileTransport {
    path: PathBuf,
    file: Option<File>,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl FileTransport {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: None,
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::ZERO,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the chunk size for large writes. Zero is treated as one byte.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the pause between chunks. Default is none.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }

    fn open(&mut self) -> Result<&mut File> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)
                .map_err(|e| {
                    ReciboError::Transport(format!("Failed to open {}: {}", self.path.display(), e))
                })?;
            debug!(path = %self.path.display(), "opened output");
            self.file = Some(file);
        }
        self.file
            .as_mut()
            .ok_or_else(|| ReciboError::Transport("output is not open".into()))
    }
}

impl Printer for FileTransport {
    fn connect(&mut self) -> Result<()> {
        self.open().map(|_| ())
    }

    fn send(&mut self, data: &[u8]) -> Result<()> {
        let chunk_size = self.chunk_size;
        let delay = self.chunk_delay;
        let file = self.open()?;

        let chunks = data.len().div_ceil(chunk_size);
        for (i, chunk) in data.chunks(chunk_size).enumerate() {
            file.write_all(chunk)
                .map_err(|e| ReciboError::Transport(format!("Write failed: {}", e)))?;
            if !delay.is_zero() && i + 1 < chunks {
                thread::sleep(delay);
            }
        }
        file.flush()
            .map_err(|e| ReciboError::Transport(format!("Flush failed: {}", e)))?;

        debug!(bytes = data.len(), chunks, "sent");
        Ok(())
    }

    fn read_status(&mut self, _n: u8) -> Result<Vec<u8>> {
        Err(ReciboError::Unsupported(format!(
            "{} is write-only; status cannot be read",
            self.path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_writes_all_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.bin");
        let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();

        let mut transport = FileTransport::new(&path);
        transport.set_chunk_size(1000);
        transport.connect().unwrap();
        transport.send(&data).unwrap();
        transport.send(b"tail").unwrap();
        drop(transport);

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written.len(), 10_004);
        assert_eq!(&written[..10_000], &data[..]);
        assert_eq!(&written[10_000..], b"tail");
    }

    #[test]
    fn test_send_connects_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lazy.bin");
        let mut transport = FileTransport::new(&path);
        transport.send(&[0x1B, 0x40]).unwrap();
        drop(transport);
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_status_unsupported() {
        let mut transport = FileTransport::new("/tmp/unused");
        let err = transport.read_status(1).unwrap_err();
        assert!(matches!(err, ReciboError::Unsupported(_)));
    }

    #[test]
    fn test_open_failure_is_transport_error() {
        let mut transport = FileTransport::new("/nonexistent-dir/printer");
        let err = transport.connect().unwrap_err();
        assert!(matches!(err, ReciboError::Transport(_)));
    }
}
