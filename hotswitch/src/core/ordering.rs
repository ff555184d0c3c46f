use std::collections::HashSet;
use std::ops::Index;

use super::{AppId, ApplicationHandle, PinnedList, RecencyTracker};

/// Ordered candidates of one switch session. Never mutated once computed.
/// The first `pinned_len` entries are the pinned prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    handles: Vec<ApplicationHandle>,
    pinned_len: usize,
}

impl CandidateList {
    pub fn get(&self, index: usize) -> Option<&ApplicationHandle> {
        self.handles.get(index)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ApplicationHandle> {
        self.handles.iter()
    }

    pub fn ids(&self) -> Vec<&AppId> {
        self.handles.iter().map(|h| &h.id).collect()
    }

    pub fn pinned_len(&self) -> usize {
        self.pinned_len
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        index < self.pinned_len
    }
}

impl Index<usize> for CandidateList {
    type Output = ApplicationHandle;

    fn index(&self, index: usize) -> &Self::Output {
        &self.handles[index]
    }
}

impl From<Vec<ApplicationHandle>> for CandidateList {
    fn from(handles: Vec<ApplicationHandle>) -> Self {
        Self {
            handles,
            pinned_len: 0,
        }
    }
}

/// Order running apps for a switch session.
///
/// Pinned apps that are running come first, in pinned order. The rest
/// follow by last activation, most recent first; apps never seen active sort
/// last. Equal timestamps keep the registry's enumeration order.
/// Pinned ids that are not running are skipped.
pub fn compute_order(
    running: &[ApplicationHandle],
    pinned: &PinnedList,
    recency: &RecencyTracker,
) -> CandidateList {
    // Identity is unique among running apps; keep the first on a collision.
    let mut seen = HashSet::new();
    let running: Vec<&ApplicationHandle> = running
        .iter()
        .filter(|h| seen.insert(&h.id))
        .collect();

    let mut ordered: Vec<ApplicationHandle> = pinned
        .iter()
        .filter_map(|id| running.iter().find(|h| &h.id == id))
        .map(|h| (*h).clone())
        .collect();

    let mut rest: Vec<&ApplicationHandle> = running
        .iter()
        .copied()
        .filter(|h| !pinned.contains(&h.id))
        .collect();
    // Stable sort, None < Some so never-activated apps end up last.
    rest.sort_by(|a, b| {
        recency
            .last_activated(&b.id)
            .cmp(&recency.last_activated(&a.id))
    });

    let pinned_len = ordered.len();
    ordered.extend(rest.into_iter().cloned());
    CandidateList {
        handles: ordered,
        pinned_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn app(id: &str) -> ApplicationHandle {
        ApplicationHandle::new(id, id.to_uppercase(), id.len() as i32)
    }

    fn ids(list: &CandidateList) -> Vec<&str> {
        list.iter().map(|h| h.id.as_str()).collect()
    }

    fn at(secs: u64) -> std::time::SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_pinned_then_recency() {
        let running = vec![app("d"), app("c"), app("b"), app("a")];
        let pinned = PinnedList::from_ids(["a".into(), "b".into()]);
        let mut recency = RecencyTracker::new();
        recency.record_at(&"c".into(), at(200));
        recency.record_at(&"d".into(), at(100));

        let order = compute_order(&running, &pinned, &recency);
        assert_eq!(ids(&order), vec!["a", "b", "c", "d"]);
        assert_eq!(order.pinned_len(), 2);
        assert!(order.is_pinned(1));
        assert!(!order.is_pinned(2));
    }

    #[test]
    fn test_pinned_prefix_ignores_recency() {
        let running = vec![app("a"), app("b"), app("c")];
        let pinned = PinnedList::from_ids(["c".into(), "a".into()]);
        let mut recency = RecencyTracker::new();
        recency.record_at(&"b".into(), at(900));
        recency.record_at(&"a".into(), at(10));
        recency.record_at(&"c".into(), at(5));

        let order = compute_order(&running, &pinned, &recency);
        assert_eq!(ids(&order), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_empty_running() {
        let pinned = PinnedList::from_ids(["a".into()]);
        let order = compute_order(&[], &pinned, &RecencyTracker::new());
        assert!(order.is_empty());
    }

    #[test]
    fn test_stale_pinned_is_skipped() {
        let running = vec![app("b")];
        let pinned = PinnedList::from_ids(["gone".into(), "b".into()]);
        let order = compute_order(&running, &pinned, &RecencyTracker::new());
        assert_eq!(ids(&order), vec!["b"]);
        assert_eq!(order.pinned_len(), 1);
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        let running = vec![app("x"), app("y"), app("z"), app("w")];
        let mut recency = RecencyTracker::new();
        recency.record_at(&"z".into(), at(50));
        recency.record_at(&"w".into(), at(50));

        let order = compute_order(&running, &PinnedList::new(), &recency);
        assert_eq!(ids(&order), vec!["z", "w", "x", "y"]);
    }

    #[test]
    fn test_deterministic() {
        let running = vec![app("a"), app("b"), app("c"), app("d"), app("e")];
        let pinned = PinnedList::from_ids(["d".into()]);
        let mut recency = RecencyTracker::new();
        recency.record_at(&"b".into(), at(3));
        recency.record_at(&"e".into(), at(3));

        let first = compute_order(&running, &pinned, &recency);
        let second = compute_order(&running, &pinned, &recency);
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_identity_kept_once() {
        let running = vec![app("a"), app("a"), app("b")];
        let order = compute_order(&running, &PinnedList::new(), &RecencyTracker::new());
        assert_eq!(ids(&order), vec!["a", "b"]);
    }
}
