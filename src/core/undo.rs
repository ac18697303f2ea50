//! Undo/Redo Log
//!
//! Every primitive edit is recorded as an [`Action`]: a contiguous byte run
//! inserted into or deleted from the text at a given point. Row breaks are
//! carried in the payload as `\n`, so the inverse of any action is a single
//! call to [`Buffer::insert_text`] or [`Buffer::delete_text`].
//!
//! Actions produced by one operation that must not be undone separately (a
//! typed character and the reflow it triggers, for example) are linked with
//! the `chained` flag: a chained action is undone and redone together with the
//! action below it.

use std::collections::VecDeque;

use crate::core::buffer::{Buffer, Point};

/// Maximum number of actions kept; the oldest are dropped first
const MAX_UNDO_DEPTH: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Insert,
    Delete,
}

/// One recorded edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    /// Start of the affected span
    pub at: Point,
    /// The bytes inserted or deleted; `\n` is a row break
    pub data: Vec<u8>,
    /// Cursor before the edit
    pub before: Point,
    /// Cursor after the edit
    pub after: Point,
    /// Undo/redo together with the previous action
    pub chained: bool,
}

impl Action {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The undo and redo stacks of one buffer
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    undo_stack: VecDeque<Action>,
    redo_stack: VecDeque<Action>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new action. Any redo history is discarded.
    pub fn record(&mut self, action: Action) {
        self.redo_stack.clear();
        self.undo_stack.push_back(action);
        if self.undo_stack.len() > MAX_UNDO_DEPTH {
            self.undo_stack.pop_front();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Most recent action, if any
    pub fn last(&self) -> Option<&Action> {
        self.undo_stack.back()
    }

    /// Move the newest group from the undo stack to the redo stack. Returned
    /// newest first, which is the order its inverses must be applied in.
    fn take_undo_group(&mut self) -> Vec<Action> {
        let mut group = Vec::new();
        while let Some(action) = self.undo_stack.pop_back() {
            let chained = action.chained;
            self.redo_stack.push_back(action.clone());
            group.push(action);
            if !chained {
                break;
            }
        }
        group
    }

    /// Move the next group from the redo stack back onto the undo stack,
    /// oldest first.
    fn take_redo_group(&mut self) -> Vec<Action> {
        let mut group = Vec::new();
        while let Some(action) = self.redo_stack.pop_back() {
            self.undo_stack.push_back(action.clone());
            group.push(action);
            if !self.redo_stack.back().is_some_and(|next| next.chained) {
                break;
            }
        }
        group
    }
}

// =============================================================================
// REPLAY
// =============================================================================

impl Buffer {
    /// Record an edit that has already been applied. The cursor must already
    /// be at its post-edit position.
    pub fn record(
        &mut self,
        kind: ActionKind,
        at: Point,
        data: Vec<u8>,
        before: Point,
        chained: bool,
    ) {
        let after = self.cursor();
        self.history.record(Action {
            kind,
            at,
            data,
            before,
            after,
            chained,
        });
    }

    /// Revert the most recent edit group. Returns false when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        let group = self.history.take_undo_group();
        let Some(first) = group.last().map(|a| a.before) else {
            return false;
        };

        for action in &group {
            match action.kind {
                ActionKind::Insert => {
                    self.delete_text(action.at, action.len());
                }
                ActionKind::Delete => {
                    self.insert_text(action.at, &action.data);
                }
            }
        }
        self.selection_active = false;
        self.set_cursor(first);
        true
    }

    /// Re-apply the most recently undone group. Returns false when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let group = self.history.take_redo_group();
        let Some(last) = group.last().map(|a| a.after) else {
            return false;
        };

        for action in &group {
            match action.kind {
                ActionKind::Insert => {
                    self.insert_text(action.at, &action.data);
                }
                ActionKind::Delete => {
                    self.delete_text(action.at, action.len());
                }
            }
        }
        self.selection_active = false;
        self.set_cursor(last);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(kind: ActionKind, at: Point, data: &[u8], chained: bool) -> Action {
        Action {
            kind,
            at,
            data: data.to_vec(),
            before: at,
            after: at,
            chained,
        }
    }

    #[test]
    fn test_record_clears_redo() {
        let mut buffer = Buffer::from_lines(["ab"]);
        buffer.insert_text(Point::new(2, 0), b"c");
        buffer.cx = 3;
        buffer.record(ActionKind::Insert, Point::new(2, 0), b"c".to_vec(), Point::new(2, 0), false);

        assert!(buffer.undo());
        assert!(buffer.history.can_redo());

        buffer.history.record(action(ActionKind::Insert, Point::default(), b"x", false));
        assert!(!buffer.history.can_redo());
        assert!(!buffer.redo());
    }

    #[test]
    fn test_undo_on_empty_log_is_noop() {
        let mut buffer = Buffer::from_lines(["keep"]);
        assert!(!buffer.undo());
        assert!(!buffer.redo());
        assert_eq!(buffer.lines(), vec!["keep"]);
    }

    #[test]
    fn test_undo_delete_reinserts_and_restores_cursor() {
        let mut buffer = Buffer::from_lines(["hello", "world"]);
        buffer.set_cursor(Point::new(0, 1));
        let removed = buffer.delete_text(Point::new(5, 0), 1);
        buffer.set_cursor(Point::new(5, 0));
        buffer.record(ActionKind::Delete, Point::new(5, 0), removed, Point::new(0, 1), false);
        assert_eq!(buffer.lines(), vec!["helloworld"]);

        assert!(buffer.undo());
        assert_eq!(buffer.lines(), vec!["hello", "world"]);
        assert_eq!(buffer.cursor(), Point::new(0, 1));

        assert!(buffer.redo());
        assert_eq!(buffer.lines(), vec!["helloworld"]);
        assert_eq!(buffer.cursor(), Point::new(5, 0));
    }

    #[test]
    fn test_chained_actions_move_as_one_group() {
        let mut log = UndoLog::new();
        log.record(action(ActionKind::Insert, Point::default(), b"a", false));
        log.record(action(ActionKind::Insert, Point::new(1, 0), b"b", false));
        log.record(action(ActionKind::Insert, Point::new(2, 0), b"c", true));

        let group = log.take_undo_group();
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].data, b"c");
        assert_eq!(log.undo_len(), 1);
        assert_eq!(log.redo_len(), 2);

        let group = log.take_redo_group();
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].data, b"b");
        assert_eq!(group[1].data, b"c");
        assert_eq!(log.undo_len(), 3);
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut log = UndoLog::new();
        for _ in 0..MAX_UNDO_DEPTH + 5 {
            log.record(action(ActionKind::Insert, Point::default(), b"x", false));
        }
        assert_eq!(log.undo_len(), MAX_UNDO_DEPTH);
    }
}
