use std::ops::Range;

/// Immutable copy of the document at one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    pub content: String,
    /// Selection at commit time, restored on undo/redo.
    pub selection: Range<usize>,
}

impl HistorySnapshot {
    pub fn new(content: impl Into<String>, selection: Range<usize>) -> Self {
        Self {
            content: content.into(),
            selection,
        }
    }
}

/// Linear undo/redo history.
///
/// Holds at least one snapshot (the initial document); `index` always points
/// at the snapshot matching the live document. Pushing after an undo drops
/// the redo tail. With a limit set, the oldest snapshots are evicted.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<HistorySnapshot>,
    index: usize,
    limit: Option<usize>,
}

impl History {
    pub fn new(initial: HistorySnapshot) -> Self {
        Self::with_limit(initial, None)
    }

    /// `limit` counts snapshots, including the current one; values below 1 act as 1.
    pub fn with_limit(initial: HistorySnapshot, limit: Option<usize>) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Commits a snapshot: truncates after the index, appends, moves to the tail.
    pub fn push(&mut self, snapshot: HistorySnapshot) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(snapshot);
        if let Some(limit) = self.limit
            && self.snapshots.len() > limit
        {
            let excess = self.snapshots.len() - limit;
            self.snapshots.drain(..excess);
            log::debug!("history limit {limit} reached, evicted {excess} snapshot(s)");
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Steps back. Returns `None` (and does nothing) at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&HistorySnapshot> {
        if !self.can_undo() {
            log::debug!("undo at oldest snapshot ignored");
            return None;
        }
        self.index -= 1;
        self.snapshots.get(self.index)
    }

    /// Steps forward. Returns `None` (and does nothing) at the newest snapshot.
    pub fn redo(&mut self) -> Option<&HistorySnapshot> {
        if !self.can_redo() {
            log::debug!("redo at newest snapshot ignored");
            return None;
        }
        self.index += 1;
        self.snapshots.get(self.index)
    }

    pub fn current(&self) -> &HistorySnapshot {
        &self.snapshots[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: a history holds at least its initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Drops everything and starts over from `initial`.
    pub fn reset(&mut self, initial: HistorySnapshot) {
        self.snapshots = vec![initial];
        self.index = 0;
    }
}
