//! In-process result cache, one live entry per task kind

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::task::TaskKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub kind: TaskKind,
    pub timestamp: DateTime<Utc>,
    pub result: String,
}

#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<TaskKind, CacheEntry>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `kind`.
    ///
    /// The stored timestamp never goes backwards for a kind, even if the wall
    /// clock does.
    pub fn store(&mut self, kind: TaskKind, result: String) -> &CacheEntry {
        self.store_at(kind, result, Utc::now())
    }

    fn store_at(&mut self, kind: TaskKind, result: String, now: DateTime<Utc>) -> &CacheEntry {
        let timestamp = match self.entries.get(&kind) {
            Some(previous) if previous.timestamp > now => previous.timestamp,
            _ => now,
        };

        self.entries.insert(
            kind,
            CacheEntry {
                kind,
                timestamp,
                result,
            },
        );
        &self.entries[&kind]
    }

    pub fn get(&self, kind: TaskKind) -> Option<&CacheEntry> {
        self.entries.get(&kind)
    }
}
