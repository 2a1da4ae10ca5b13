//! Aggregate store for per-source state.
//!
//! The store starts with every source pending and accepts exactly one
//! terminal write per source. After each applied write it publishes a full
//! snapshot to observers over a watch channel, so partial completion (two
//! sources settled, three pending) is an ordinary observable state.

use crate::models::{SourceId, SourceState, SourceStatus};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::debug;

/// Snapshot of all sources at one point in time.
pub type AggregateState = BTreeMap<SourceId, SourceState>;

/// Shared store holding the union of all normalized records.
#[derive(Debug)]
pub struct AggregateStore {
    inner: Mutex<AggregateState>,
    publisher: watch::Sender<AggregateState>,
}

impl AggregateStore {
    /// Create a store with all sources pending.
    pub fn new() -> Self {
        let initial: AggregateState = SourceId::ALL
            .into_iter()
            .map(|id| (id, SourceState::Pending))
            .collect();

        let (publisher, _) = watch::channel(initial.clone());

        Self {
            inner: Mutex::new(initial),
            publisher,
        }
    }

    /// Subscribe to snapshots. The receiver's current value is always a
    /// complete mapping; a new value arrives after every applied update.
    pub fn subscribe(&self) -> watch::Receiver<AggregateState> {
        self.publisher.subscribe()
    }

    /// Apply a terminal state for a source.
    ///
    /// Only the first terminal write per source is applied; a pending write,
    /// a duplicate, or a write for an already-settled source is a no-op and
    /// returns false. A publish with no live observers is also a no-op
    /// rather than an error.
    pub fn update(&self, id: SourceId, state: SourceState) -> bool {
        if !state.is_terminal() {
            return false;
        }

        let snapshot = {
            let mut inner = self.inner.lock().expect("store lock poisoned");

            match inner.get(&id) {
                Some(SourceState::Pending) => {}
                _ => {
                    debug!(source = %id, "dropping update for settled source");
                    return false;
                }
            }

            inner.insert(id, state);
            inner.clone()
        };

        // send_replace never fails; observers that are gone simply never see
        // the snapshot.
        let _ = self.publisher.send_replace(snapshot);
        true
    }

    /// A copy of the current mapping.
    pub fn snapshot(&self) -> AggregateState {
        self.inner.lock().expect("store lock poisoned").clone()
    }

    /// Whether every source has reached a terminal status.
    pub fn is_settled(&self) -> bool {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .values()
            .all(SourceState::is_terminal)
    }

    /// Count of sources currently in the given status.
    pub fn count_with_status(&self, status: SourceStatus) -> usize {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .values()
            .filter(|state| state.status() == status)
            .count()
    }
}

impl Default for AggregateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback_stat;
    use crate::models::{LeetcodeStats, NormalizedStat};

    fn resolved_leetcode(solved: u64) -> SourceState {
        SourceState::Resolved(NormalizedStat::Leetcode(LeetcodeStats { solved }))
    }

    #[test]
    fn test_starts_all_pending() {
        let store = AggregateStore::new();
        let snapshot = store.snapshot();

        assert_eq!(snapshot.len(), SourceId::ALL.len());
        assert!(snapshot.values().all(|s| !s.is_terminal()));
        assert!(!store.is_settled());
    }

    #[test]
    fn test_first_terminal_write_wins() {
        let store = AggregateStore::new();

        assert!(store.update(SourceId::Leetcode, resolved_leetcode(732)));
        assert!(!store.update(SourceId::Leetcode, resolved_leetcode(9000)));

        let snapshot = store.snapshot();
        assert_eq!(snapshot[&SourceId::Leetcode], resolved_leetcode(732));
    }

    #[test]
    fn test_fallback_does_not_overwrite_resolved() {
        let store = AggregateStore::new();

        assert!(store.update(SourceId::Leetcode, resolved_leetcode(732)));
        assert!(!store.update(
            SourceId::Leetcode,
            SourceState::Fallback(fallback_stat(SourceId::Leetcode))
        ));

        assert_eq!(
            store.snapshot()[&SourceId::Leetcode].status(),
            SourceStatus::Resolved
        );
    }

    #[test]
    fn test_pending_write_is_rejected() {
        let store = AggregateStore::new();
        assert!(!store.update(SourceId::Leetcode, SourceState::Pending));
    }

    #[test]
    fn test_update_is_isolated_per_source() {
        let store = AggregateStore::new();

        store.update(
            SourceId::Codechef,
            SourceState::Fallback(fallback_stat(SourceId::Codechef)),
        );

        let snapshot = store.snapshot();
        assert_eq!(snapshot[&SourceId::Codechef].status(), SourceStatus::Fallback);
        for id in [
            SourceId::GithubProfile,
            SourceId::GithubContributions,
            SourceId::Leetcode,
            SourceId::Codeforces,
        ] {
            assert_eq!(snapshot[&id].status(), SourceStatus::Pending);
        }
    }

    #[test]
    fn test_settles_after_all_sources() {
        let store = AggregateStore::new();

        for id in SourceId::ALL {
            store.update(id, SourceState::Fallback(fallback_stat(id)));
        }

        assert!(store.is_settled());
        assert_eq!(store.count_with_status(SourceStatus::Fallback), 5);
        assert_eq!(store.count_with_status(SourceStatus::Pending), 0);
    }

    #[tokio::test]
    async fn test_observers_see_incremental_snapshots() {
        let store = AggregateStore::new();
        let mut observer = store.subscribe();

        store.update(SourceId::Leetcode, resolved_leetcode(1));

        observer.changed().await.unwrap();
        let snapshot = observer.borrow().clone();
        assert_eq!(snapshot[&SourceId::Leetcode], resolved_leetcode(1));
        assert_eq!(snapshot[&SourceId::Codechef].status(), SourceStatus::Pending);
    }

    #[test]
    fn test_update_without_observers_is_noop() {
        let store = AggregateStore::new();
        drop(store.subscribe());

        // Still applies to the store itself; only the publish has no one
        // listening.
        assert!(store.update(SourceId::Leetcode, resolved_leetcode(5)));
        assert_eq!(
            store.snapshot()[&SourceId::Leetcode].status(),
            SourceStatus::Resolved
        );
    }
}
