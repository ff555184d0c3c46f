use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use super::AppId;

/// Last-activation time per application.
/// Rebuilt from live observation only; an app activated before the daemon
/// started has no entry and sorts last.
#[derive(Debug, Default)]
pub struct RecencyTracker {
    entries: HashMap<AppId, SystemTime>,
}

impl RecencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an activation happening now
    pub fn record(&mut self, id: &AppId) {
        self.record_at(id, SystemTime::now());
    }

    pub fn record_at(&mut self, id: &AppId, at: SystemTime) {
        tracing::debug!("Recorded activation of {}", id);
        self.entries.insert(id.clone(), at);
    }

    pub fn remove(&mut self, id: &AppId) -> Option<SystemTime> {
        self.entries.remove(id)
    }

    pub fn last_activated(&self, id: &AppId) -> Option<SystemTime> {
        self.entries.get(id).copied()
    }

    /// Seconds since the Unix epoch, for reporting over IPC
    pub fn last_activated_secs(&self, id: &AppId) -> Option<u64> {
        self.last_activated(id)
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
