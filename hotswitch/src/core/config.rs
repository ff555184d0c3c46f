use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use hotswitch_ipc::ModifierKey;

use super::AppId;

/// Configured modifier key, shared between the main thread and the event tap.
/// Writes from IPC take effect on the next tap event.
#[derive(Debug, Clone, Default)]
pub struct ModifierSetting(Arc<AtomicU8>);

impl ModifierSetting {
    pub fn new(key: ModifierKey) -> Self {
        Self(Arc::new(AtomicU8::new(encode(key))))
    }

    pub fn get(&self) -> ModifierKey {
        decode(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, key: ModifierKey) {
        self.0.store(encode(key), Ordering::Release);
    }
}

fn encode(key: ModifierKey) -> u8 {
    match key {
        ModifierKey::Option => 0,
        ModifierKey::Command => 1,
    }
}

fn decode(raw: u8) -> ModifierKey {
    match raw {
        1 => ModifierKey::Command,
        _ => ModifierKey::Option,
    }
}

/// User-curated apps that always lead the candidate list, in order.
/// Never contains duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinnedList {
    ids: Vec<AppId>,
}

impl PinnedList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ids, keeping the first occurrence of each
    pub fn from_ids<I: IntoIterator<Item = AppId>>(ids: I) -> Self {
        let mut list = Self::new();
        list.replace(ids);
        list
    }

    pub fn contains(&self, id: &AppId) -> bool {
        self.ids.contains(id)
    }

    pub fn position(&self, id: &AppId) -> Option<usize> {
        self.ids.iter().position(|p| p == id)
    }

    /// Append `id` if absent. Returns false when already pinned.
    pub fn pin(&mut self, id: AppId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Returns false when `id` was not pinned.
    pub fn unpin(&mut self, id: &AppId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|p| p != id);
        self.ids.len() != before
    }

    /// Pin or unpin; returns whether `id` is pinned afterwards.
    pub fn toggle(&mut self, id: AppId) -> bool {
        if self.unpin(&id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Move a pinned id to `index` (clamped to the end).
    pub fn move_to(&mut self, id: &AppId, index: usize) -> Result<(), String> {
        let from = self
            .position(id)
            .ok_or_else(|| format!("{} is not pinned", id))?;
        let item = self.ids.remove(from);
        let to = index.min(self.ids.len());
        self.ids.insert(to, item);
        Ok(())
    }

    pub fn replace<I: IntoIterator<Item = AppId>>(&mut self, ids: I) {
        self.ids.clear();
        for id in ids {
            self.pin(id);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppId> {
        self.ids.iter()
    }

    pub fn as_slice(&self) -> &[AppId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Runtime configuration, changed through IPC and read on every use.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub modifier: ModifierSetting,
    pub pinned: PinnedList,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }
}
