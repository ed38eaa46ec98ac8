//! Solved-problem markers
//!
//! A single JSON file holding a sequence of solved problem ids. Reading it
//! never fails the caller: a missing file, unreadable file or malformed
//! contents all yield an empty set and a log line.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Set of solved problem ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolvedSet {
    ids: BTreeSet<u32>,
}

impl SolvedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Read markers from `path`, treating any failure as "nothing solved"
    pub fn load(path: &Path) -> Self {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no solved markers at {}", path.display());
                return Self::default();
            }
            Err(e) => {
                tracing::warn!("failed to read solved markers {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_slice::<Vec<u32>>(&bytes) {
            Ok(ids) => {
                tracing::debug!("loaded {} solved markers", ids.len());
                Self::from_ids(ids)
            }
            Err(e) => {
                tracing::warn!("ignoring malformed solved markers {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write markers to `path` as a JSON array
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_vec(&self.ids)?;
        std::fs::write(path, json)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    /// Mark or unmark a problem; returns the new solved state
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }
}
