//! File-backed pattern store.
//!
//! Persists transfer patterns as a single JSON document mapping origin
//! station codes to sorted sets of pattern hashes. Each batch rewrites the
//! file through a temporary sibling and an atomic rename, so a crashed
//! precompute run leaves either the old file or the new one, never a torn
//! write.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::domain::Crs;
use crate::pattern::TransferPattern;

use super::{PatternStore, SourceError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    /// origin code -> journey destination code -> pattern hashes.
    patterns: HashMap<String, HashMap<String, BTreeSet<String>>>,
}

/// Pattern store persisted to one JSON file.
#[derive(Debug)]
pub struct JsonPatternStore {
    path: PathBuf,
    state: Mutex<StoreFile>,
}

impl JsonPatternStore {
    /// Open the store at `path`, loading any existing file. A missing file
    /// is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| SourceError::InvalidData(format!("pattern file {path:?}: {e}")))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreFile::default(),
            Err(e) => {
                return Err(SourceError::Storage(format!(
                    "reading pattern file {path:?}: {e}"
                )));
            }
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, state: &StoreFile) -> Result<(), SourceError> {
        let serialized = serde_json::to_vec_pretty(state)
            .map_err(|e| SourceError::Storage(format!("serialising pattern file: {e}")))?;
        let tmp = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp)
            .map_err(|e| SourceError::Storage(format!("creating {tmp:?}: {e}")))?;
        file.write_all(&serialized)
            .map_err(|e| SourceError::Storage(format!("writing {tmp:?}: {e}")))?;
        file.sync_all()
            .map_err(|e| SourceError::Storage(format!("syncing {tmp:?}: {e}")))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| SourceError::Storage(format!("renaming into {:?}: {e}", self.path)))?;
        Ok(())
    }
}

impl PatternStore for JsonPatternStore {
    fn patterns(&self, origin: Crs, destination: Crs) -> Result<Vec<TransferPattern>, SourceError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| SourceError::Storage("pattern store lock poisoned".to_string()))?;
        let Some(hashes) = guard
            .patterns
            .get(origin.as_str())
            .and_then(|dests| dests.get(destination.as_str()))
        else {
            return Ok(Vec::new());
        };

        let mut patterns = Vec::new();
        for hash in hashes {
            let pattern = TransferPattern::parse(hash)
                .map_err(|e| SourceError::InvalidData(format!("stored pattern {hash:?}: {e}")))?;
            patterns.push(pattern);
        }
        Ok(patterns)
    }

    fn persist_batch(
        &self,
        origin: Crs,
        patterns: &[(Crs, TransferPattern)],
    ) -> Result<(), SourceError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| SourceError::Storage("pattern store lock poisoned".to_string()))?;
        let mut by_destination: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (destination, pattern) in patterns {
            by_destination
                .entry(destination.as_str().to_string())
                .or_default()
                .insert(pattern.path_hash());
        }
        guard.patterns.insert(origin.as_str().to_string(), by_destination);
        self.write_file(&guard)
    }
}
