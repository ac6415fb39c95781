use std::{fs, io, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persistence collaborator holding the best score across sessions.
pub trait BestScoreStore {
    /// Reads the stored best score. A store that holds nothing yields zero.
    fn load(&mut self) -> Result<u32, StoreError>;

    /// Records a new best score.
    fn save(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Errors raised by persistence stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read.
    #[error("failed to read best score file {}", path.display())]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The backing file could not be written.
    #[error("failed to write best score file {}", path.display())]
    Write {
        /// File that failed to save.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The backing file does not contain a best-score record.
    #[error("best score file {} is malformed", path.display())]
    Malformed {
        /// File holding the malformed record.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: toml::de::Error,
    },
    /// The record could not be encoded.
    #[error("failed to encode best score record")]
    Encode(#[from] toml::ser::Error),
    /// The store cannot be reached at all.
    #[error("best score store is unavailable")]
    Unavailable,
}

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreRecord {
    best_score: u32,
}

/// Store keeping the best score as a small TOML document on disk.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store backed by the file at `path`. The file need not exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BestScoreStore for FileStore {
    fn load(&mut self) -> Result<u32, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let record: BestScoreRecord =
            toml::from_str(&contents).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        Ok(record.best_score)
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        let contents = toml::to_string(&BestScoreRecord { best_score: score })?;
        fs::write(&self.path, contents).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory store for sessions that should not touch the disk.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    value: Option<u32>,
}

impl MemoryStore {
    /// Creates a store already holding `value`.
    #[must_use]
    pub const fn with_value(value: u32) -> Self {
        Self { value: Some(value) }
    }

    /// Value currently held, if any was ever saved.
    #[must_use]
    pub const fn value(&self) -> Option<u32> {
        self.value
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u32, StoreError> {
        Ok(self.value.unwrap_or(0))
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        self.value = Some(score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "long-snake-{name}-{}-{:?}.toml",
            std::process::id(),
            std::thread::current().id()
        ))
    }

    #[test]
    fn missing_file_reads_as_zero() {
        let mut store = FileStore::new(scratch_path("missing"));
        assert_eq!(store.load().expect("missing file is not an error"), 0);
    }

    #[test]
    fn file_store_keeps_saved_value() {
        let path = scratch_path("saved");
        let mut store = FileStore::new(&path);

        store.save(17).expect("save succeeds");
        let reloaded = FileStore::new(&path).load().expect("load succeeds");
        fs::remove_file(&path).expect("cleanup");

        assert_eq!(reloaded, 17);
    }

    #[test]
    fn malformed_file_is_reported() {
        let path = scratch_path("malformed");
        fs::write(&path, "best_score = \"lots\"").expect("write fixture");

        let error = FileStore::new(&path).load().expect_err("malformed record");
        fs::remove_file(&path).expect("cleanup");

        assert!(matches!(error, StoreError::Malformed { .. }));
    }
}
