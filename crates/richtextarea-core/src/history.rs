//! History Manager: debounced, bounded undo snapshots.
//!
//! The history is a list of [`Snapshot`]s with the newest at index `0` and a
//! `time_index` cursor pointing at the entry the document currently shows.
//! Recording is debounced: a snapshot commits only when enough time passed
//! since the previous recording attempt, so a typing burst collapses into
//! one entry. Committing while undone discards the abandoned future; the
//! list never exceeds its entry limit, forced commits included.
//!
//! Time is an explicit [`Instant`] argument, which keeps the debounce
//! deterministic under test.
//!
//! # Example
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use richtextarea_core::history::{History, Snapshot};
//!
//! let mut history = History::new();
//! let t0 = Instant::now();
//! history.record(Snapshot::new("a", (1, 1)), t0, false);
//! history.record(Snapshot::new("ab", (2, 2)), t0 + Duration::from_secs(2), false);
//! assert_eq!(history.undo().unwrap().content, "a");
//! ```

use std::time::{Duration, Instant};

/// Gap required between recordings before a snapshot commits.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Snapshots kept before the oldest is evicted.
pub const DEFAULT_MAX_ENTRIES: usize = 128;

/// One point in time: serialized document content plus the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Serialized markup of the document.
    pub content: String,
    /// Selection endpoints at the time of the snapshot.
    pub selection: (usize, usize),
}

impl Snapshot {
    /// Convenience constructor.
    pub fn new(content: impl Into<String>, selection: (usize, usize)) -> Self {
        Self {
            content: content.into(),
            selection,
        }
    }
}

/// Debounced, bounded snapshot history with an undo cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    time_index: usize,
    debounce: Duration,
    max_entries: usize,
    last_record: Option<Instant>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// A history with the default debounce and entry limit.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_DEBOUNCE, DEFAULT_MAX_ENTRIES)
    }

    /// A history with custom limits. `max_entries` is at least one.
    pub fn with_limits(debounce: Duration, max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            time_index: 0,
            debounce,
            max_entries: max_entries.max(1),
            last_record: None,
        }
    }

    /// Drop every snapshot and reset the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.time_index = 0;
        self.last_record = None;
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no snapshot is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an undo step is available.
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.time_index + 1 < self.entries.len()
    }

    /// Whether a redo step is available.
    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.time_index > 0
    }

    /// Record a snapshot at `now`.
    ///
    /// Every call restarts the debounce clock, so a burst of recordings
    /// commits at most its first snapshot. The first recording and forced
    /// recordings always commit. Returns whether the snapshot was committed.
    pub fn record(&mut self, snapshot: Snapshot, now: Instant, forced: bool) -> bool {
        let gap = self.last_record.map(|last| now.saturating_duration_since(last));
        self.last_record = Some(now);
        let due = match gap {
            None => true,
            Some(gap) => gap > self.debounce,
        };
        if !(forced || self.entries.is_empty() || due) {
            return false;
        }
        self.commit(snapshot);
        true
    }

    fn commit(&mut self, snapshot: Snapshot) {
        if self.time_index > 0 {
            // Undone snapshots are an abandoned future now; the new entry
            // replaces them and the one the cursor points at.
            let discard = (self.time_index + 1).min(self.entries.len());
            self.entries.drain(0..discard);
            self.time_index = 0;
        }
        self.entries.insert(0, snapshot);
        if self.entries.len() > self.max_entries {
            self.entries.pop();
        }
        log::debug!(
            "history commit: {} entries, cursor {}",
            self.entries.len(),
            self.time_index
        );
    }

    /// Step back one snapshot, returning the one to restore.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.time_index += 1;
        self.entries.get(self.time_index).cloned()
    }

    /// Step forward one snapshot, returning the one to restore. Arriving
    /// back at the present drops the front entry; the live document equals
    /// it again and the next commit re-records it.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.time_index -= 1;
        let snapshot = self.entries.get(self.time_index).cloned();
        if self.time_index == 0 {
            self.entries.remove(0);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(content: &str) -> Snapshot {
        Snapshot::new(content, (0, 0))
    }

    fn seconds(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_first_record_always_commits() {
        let mut history = History::new();
        assert!(history.record(snap("a"), Instant::now(), false));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_rapid_records_are_suppressed() {
        let mut history = History::new();
        let t0 = Instant::now();
        assert!(history.record(snap("a"), t0, false));
        for i in 1..10 {
            let committed = history.record(
                snap(&format!("a{i}")),
                t0 + Duration::from_millis(100 * i),
                false,
            );
            assert!(!committed);
        }
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_suppressed_record_restarts_the_clock() {
        let mut history = History::with_limits(seconds(1), 8);
        let t0 = Instant::now();
        history.record(snap("a"), t0, false);
        // 900ms after the first record, but the clock restarted at +500ms.
        history.record(snap("b"), t0 + Duration::from_millis(500), false);
        let committed = history.record(snap("c"), t0 + Duration::from_millis(1400), false);
        assert!(!committed);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_forced_record_bypasses_debounce() {
        let mut history = History::new();
        let t0 = Instant::now();
        history.record(snap("a"), t0, false);
        assert!(history.record(snap("b"), t0 + Duration::from_millis(10), true));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_eviction_applies_to_forced_commits_too() {
        let mut history = History::with_limits(seconds(1), 3);
        let t0 = Instant::now();
        for i in 0..6 {
            history.record(snap(&format!("s{i}")), t0 + seconds(2 * i), true);
        }
        assert_eq!(history.len(), 3);
        // Newest first; the oldest three were evicted.
        assert_eq!(history.undo().unwrap().content, "s4");
        assert_eq!(history.undo().unwrap().content, "s3");
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = History::new();
        let t0 = Instant::now();
        for (i, content) in ["a", "ab", "abc"].iter().enumerate() {
            history.record(snap(content), t0 + seconds(2 * i as u64), false);
        }

        assert_eq!(history.undo().unwrap().content, "ab");
        assert_eq!(history.undo().unwrap().content, "a");
        assert!(history.undo().is_none());

        assert_eq!(history.redo().unwrap().content, "ab");
        assert_eq!(history.redo().unwrap().content, "abc");
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_redo_to_present_drops_front_entry() {
        let mut history = History::new();
        let t0 = Instant::now();
        history.record(snap("a"), t0, false);
        history.record(snap("ab"), t0 + seconds(2), false);

        history.undo();
        history.redo();
        // The front entry was dropped; the next commit re-records the
        // present instead of duplicating it.
        assert_eq!(history.len(), 1);
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_commit_while_undone_discards_the_future() {
        let mut history = History::new();
        let t0 = Instant::now();
        for (i, content) in ["a", "ab", "abc"].iter().enumerate() {
            history.record(snap(content), t0 + seconds(2 * i as u64), false);
        }
        history.undo();
        history.undo();
        assert!(history.can_redo());

        history.record(snap("aX"), t0 + seconds(10), false);
        assert!(!history.can_redo());
        // "abc" and "ab" are gone along with the displayed entry.
        assert!(history.undo().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut history = History::new();
        history.record(snap("a"), Instant::now(), true);
        history.clear();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
