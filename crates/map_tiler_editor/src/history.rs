//! Snapshot-based undo/redo
//!
//! History is a linear list of full grid snapshots with a cursor. The first
//! snapshot is the state the session started from; every committed gesture
//! appends one more. Committing after an undo discards the redoable future.

use crate::store::TileGridStore;
use map_tiler_core::Grid;
use tracing::debug;

/// An immutable copy of the grid at a commit boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Monotonic within one history, independent of wall-clock time
    pub ordinal: u64,
    pub grid: Grid,
}

#[derive(Debug, Clone)]
pub struct HistoryManager {
    snapshots: Vec<Snapshot>,
    index: usize,
    next_ordinal: u64,
    /// Maximum number of snapshots kept; the oldest go first
    limit: Option<usize>,
}

impl HistoryManager {
    /// Start a history whose only snapshot is `initial`
    pub fn new(initial: &Grid) -> Self {
        Self {
            snapshots: vec![Snapshot {
                ordinal: 0,
                grid: initial.clone(),
            }],
            index: 0,
            next_ordinal: 1,
            limit: None,
        }
    }

    /// Cap the number of retained snapshots. A limit below 1 is treated as 1.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.map(|l| l.max(1));
        self.trim();
        self
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record `grid` as the newest state and move the cursor onto it.
    /// Returns the snapshot's ordinal.
    pub fn commit(&mut self, grid: &Grid) -> u64 {
        self.snapshots.truncate(self.index + 1);
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        self.snapshots.push(Snapshot {
            ordinal,
            grid: grid.clone(),
        });
        self.index = self.snapshots.len() - 1;
        self.trim();
        debug!("Committed snapshot {} ({} cells)", ordinal, grid.len());
        ordinal
    }

    /// Step back one snapshot and restore it into `store`.
    /// Returns false at the oldest snapshot.
    pub fn undo(&mut self, store: &mut TileGridStore) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.index -= 1;
        store.restore(&self.snapshots[self.index].grid);
        debug!("Undo to snapshot {}", self.snapshots[self.index].ordinal);
        true
    }

    /// Step forward one snapshot and restore it into `store`.
    /// Returns false at the newest snapshot.
    pub fn redo(&mut self, store: &mut TileGridStore) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.index += 1;
        store.restore(&self.snapshots[self.index].grid);
        debug!("Redo to snapshot {}", self.snapshots[self.index].ordinal);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Number of retained snapshots, including the initial one
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; a history holds at least its initial snapshot
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Position of the cursor in the retained snapshots
    pub fn index(&self) -> usize {
        self.index
    }

    /// The snapshot the cursor points at, i.e. the last committed state
    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.index]
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Drop all history and start over from `grid`
    pub fn reset(&mut self, grid: &Grid) {
        self.snapshots.clear();
        self.snapshots.push(Snapshot {
            ordinal: self.next_ordinal,
            grid: grid.clone(),
        });
        self.next_ordinal += 1;
        self.index = 0;
    }

    fn trim(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        if self.snapshots.len() <= limit {
            return;
        }
        let excess = self.snapshots.len() - limit;
        self.snapshots.drain(..excess);
        self.index = self.index.saturating_sub(excess);
        debug!("History limit {} reached, dropped {} oldest snapshots", limit, excess);
    }
}
