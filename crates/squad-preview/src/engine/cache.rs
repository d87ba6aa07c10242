// Per-round memo of Best XI results.
//
// Owned by a preview session and cleared whenever a new snapshot is loaded.
// Entries are keyed by the round's index in the preview window. A cached
// `None` records that no legal eleven exists, so it is not recomputed either.

use std::collections::HashMap;

use tracing::debug;

use crate::engine::projection::LineupResult;

#[derive(Debug, Default)]
pub struct BestXiCache {
    entries: HashMap<usize, Option<LineupResult>>,
}

impl BestXiCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached result for `round_index`, computing it on a miss.
    pub fn get_or_compute<F>(&mut self, round_index: usize, compute: F) -> Option<&LineupResult>
    where
        F: FnOnce() -> Option<LineupResult>,
    {
        self.entries
            .entry(round_index)
            .or_insert_with(|| {
                debug!(round_index, "best XI cache miss");
                compute()
            })
            .as_ref()
    }

    pub fn contains(&self, round_index: usize) -> bool {
        self.entries.contains_key(&round_index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
