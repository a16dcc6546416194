//! File-backed visitor counter
//!
//! The count lives in a text file holding a single integer. Increments are
//! serialized within a process by a mutex and written through a temporary
//! file in the same directory that is persisted over the original, so
//! readers never see a partial write and a failed write leaves no debris.
//! The I/O is blocking; async callers should go through `spawn_blocking`. Separate processes sharing the file are last-writer-wins: two
//! concurrent increments may both read N and both write N + 1.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Default counter file name
pub const DEFAULT_COUNTER_FILE: &str = "visitor_count.txt";

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("Failed to access counter file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Counter file {path} does not hold a count: {contents:?}")]
    Corrupt { path: PathBuf, contents: String },

    #[error("Counter lock poisoned")]
    Poisoned,
}

/// Visitor counter stored in a single file
#[derive(Debug)]
pub struct VisitorCounter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl VisitorCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current count; a missing file counts as zero
    pub fn load(&self) -> Result<u64, CounterError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(CounterError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        contents.trim().parse().map_err(|_| CounterError::Corrupt {
            path: self.path.clone(),
            contents,
        })
    }

    /// Add one visit and return the new count
    pub fn increment(&self) -> Result<u64, CounterError> {
        let _guard = self.lock.lock().map_err(|_| CounterError::Poisoned)?;

        let count = self.load()? + 1;
        self.store(count)?;
        debug!("Visitor count at {} is now {}", self.path.display(), count);
        Ok(count)
    }

    fn store(&self, count: u64) -> Result<(), CounterError> {
        let io_err = |source: io::Error| CounterError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Dropping the temp file on any error path removes it
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(count.to_string().as_bytes()).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl Default for VisitorCounter {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTER_FILE)
    }
}
