//! Undo/redo history built from full document snapshots.
//!
//! The top of the undo stack is always the current state. The bottom entry is the
//! oldest state still reachable; undo saturates there.

use crate::line_index::LineStarts;
use crate::piece_list::PieceList;

/// A full copy of the document structure at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Piece list
    pub pieces: PieceList,
    /// Document length in bytes
    pub len: usize,
    /// Line start cache
    pub line_starts: LineStarts,
}

/// Snapshot undo/redo stacks.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum number of undoable steps; `None` keeps everything.
    limit: Option<usize>,
    /// Clean point tracking. Uses `undo_stack.len()` as the saved position in the linear history.
    /// When `redo_stack` is non-empty, `clean_index` may be greater than `undo_stack.len()`.
    clean_index: Option<usize>,
}

impl History {
    /// Start a history whose base is `initial`.
    pub fn new(initial: Snapshot, limit: Option<usize>) -> Self {
        Self {
            undo_stack: vec![initial],
            redo_stack: Vec::new(),
            limit,
            clean_index: Some(1),
        }
    }

    /// Record a new current state after an edit. Clears the redo stack.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.clear_redo_and_adjust_clean();
        self.undo_stack.push(snapshot);
        self.enforce_limit();
    }

    /// Step back one edit. Returns the state to restore, or `None` when saturated.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let current = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        self.undo_stack.last()
    }

    /// Re-apply the most recently undone edit. Returns the state to restore.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(snapshot);
        self.undo_stack.last()
    }

    /// Whether there is an edit to undo.
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    /// Whether there is an undone edit to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of edits that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len() - 1
    }

    /// Number of edits that can be redone.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Whether the current state is the one last marked clean.
    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    /// Mark the current state as clean (e.g. just saved).
    pub fn mark_clean(&mut self) {
        self.clean_index = Some(self.undo_stack.len());
    }

    /// Drop every snapshot except the current one, which becomes the new base.
    pub fn clear(&mut self) {
        let was_clean = self.is_clean();
        self.redo_stack.clear();
        let keep_from = self.undo_stack.len() - 1;
        self.undo_stack.drain(..keep_from);
        self.clean_index = was_clean.then_some(1);
    }

    /// Every snapshot held by either stack.
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.undo_stack.iter().chain(self.redo_stack.iter())
    }

    /// Mutable access to every snapshot held by either stack.
    pub fn snapshots_mut(&mut self) -> impl Iterator<Item = &mut Snapshot> {
        self.undo_stack.iter_mut().chain(self.redo_stack.iter_mut())
    }

    fn clear_redo_and_adjust_clean(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }

        // If clean point is in redo area, it becomes unreachable after clearing redo.
        if let Some(clean_index) = self.clean_index
            && clean_index > self.undo_stack.len()
        {
            self.clean_index = None;
        }

        self.redo_stack.clear();
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };

        let excess = self.undo_stack.len().saturating_sub(limit + 1);
        if excess == 0 {
            return;
        }

        self.undo_stack.drain(..excess);
        self.clean_index = match self.clean_index {
            Some(clean_index) if clean_index > excess => Some(clean_index - excess),
            _ => None,
        };
        tracing::debug!(dropped = excess, limit, "trimmed undo history");
    }
}
