//! Persistent count of completed exports.
//!
//! The count lives behind the [`ExportCounter`] trait so the exporter never
//! touches a hard-wired path. [`FileCounter`] keeps it in a text file holding a
//! single integer; [`MemoryCounter`] keeps it in an atomic for tests and
//! embedding.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use log::debug;

/// Errors that can occur while reading or updating a counter
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    /// I/O error on the counter file
    #[error("Counter file {path}: {source}")]
    Io {
        /// Counter file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The counter file does not hold an integer
    #[error("Counter file {path} does not contain a number: '{content}'")]
    Corrupt {
        /// Counter file path
        path: PathBuf,
        /// Offending content, trimmed
        content: String,
    },

    /// Another thread panicked while holding the counter lock
    #[error("Counter lock poisoned")]
    Poisoned,
}

/// A monotonically increasing export counter
pub trait ExportCounter: Send + Sync {
    /// Add one and return the new value
    fn increment(&self) -> Result<u64, CounterError>;

    /// Current value
    fn current(&self) -> Result<u64, CounterError>;
}

/// Counter stored as a decimal integer in a text file
#[derive(Debug)]
pub struct FileCounter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCounter {
    /// Open a counter file, creating it with `0` when missing
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CounterError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!("Creating counter file {}", path.display());
            write_value(&path, 0)?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportCounter for FileCounter {
    fn increment(&self) -> Result<u64, CounterError> {
        let _guard = self.lock.lock().map_err(|_| CounterError::Poisoned)?;
        let next = read_value(&self.path)? + 1;
        write_value(&self.path, next)?;
        Ok(next)
    }

    fn current(&self) -> Result<u64, CounterError> {
        let _guard = self.lock.lock().map_err(|_| CounterError::Poisoned)?;
        read_value(&self.path)
    }
}

fn read_value(path: &Path) -> Result<u64, CounterError> {
    let content = fs::read_to_string(path).map_err(|source| CounterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let trimmed = content.trim();
    // an empty file counts as zero
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse().map_err(|_| CounterError::Corrupt {
        path: path.to_path_buf(),
        content: trimmed.to_string(),
    })
}

fn write_value(path: &Path, value: u64) -> Result<(), CounterError> {
    fs::write(path, value.to_string()).map_err(|source| CounterError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// In-memory counter
#[derive(Debug, Default)]
pub struct MemoryCounter {
    value: AtomicU64,
}

impl MemoryCounter {
    /// Counter starting at `value`
    pub fn starting_at(value: u64) -> Self {
        Self {
            value: AtomicU64::new(value),
        }
    }
}

impl ExportCounter for MemoryCounter {
    fn increment(&self) -> Result<u64, CounterError> {
        Ok(self.value.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn current(&self) -> Result<u64, CounterError> {
        Ok(self.value.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_counter_created_at_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counter.txt");
        let counter = FileCounter::open(&path).unwrap();
        assert_eq!(counter.current().unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "0");
    }

    #[test]
    fn test_file_counter_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counter.txt");
        {
            let counter = FileCounter::open(&path).unwrap();
            assert_eq!(counter.increment().unwrap(), 1);
            assert_eq!(counter.increment().unwrap(), 2);
        }
        let reopened = FileCounter::open(&path).unwrap();
        assert_eq!(reopened.current().unwrap(), 2);
        assert_eq!(reopened.increment().unwrap(), 3);
    }

    #[test]
    fn test_file_counter_keeps_existing_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counter.txt");
        fs::write(&path, "41\n").unwrap();
        let counter = FileCounter::open(&path).unwrap();
        assert_eq!(counter.increment().unwrap(), 42);
    }

    #[test]
    fn test_file_counter_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("counter.txt");
        fs::write(&path, "many").unwrap();
        let counter = FileCounter::open(&path).unwrap();
        assert!(matches!(
            counter.increment(),
            Err(CounterError::Corrupt { ref content, .. }) if content == "many"
        ));
    }

    #[test]
    fn test_memory_counter() {
        let counter = MemoryCounter::default();
        assert_eq!(counter.current().unwrap(), 0);
        assert_eq!(counter.increment().unwrap(), 1);
        assert_eq!(MemoryCounter::starting_at(9).increment().unwrap(), 10);
    }
}
