//! Command Interface Layer
//!
//! A value-typed command surface for input-decoding layers: decode a key or text event
//! into a [`Command`], hand it to [`Document::execute`](crate::Document::execute), and
//! check the [`CommandResult`] to decide whether a redraw is needed.
//!
//! Every edit command is its own undo step.
//!
//! # Example
//!
//! ```rust
//! use piece_document::{Command, CommandResult, CursorCommand, Document, EditCommand};
//!
//! let mut doc = Document::empty();
//!
//! let result = doc.execute(Command::Edit(EditCommand::InsertAtCursor {
//!     text: "Hello".to_string(),
//! }));
//! assert_eq!(result, CommandResult::Changed);
//!
//! // Already at the end: nothing happens
//! let result = doc.execute(Command::Cursor(CursorCommand::Right));
//! assert_eq!(result, CommandResult::Unchanged);
//! ```

/// Text editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Insert text at the specified byte offset
    Insert {
        /// Byte offset to insert at.
        offset: usize,
        /// Text to insert.
        text: String,
    },
    /// Delete a byte range
    Delete {
        /// Byte offset of the deletion start.
        start: usize,
        /// Number of bytes to delete.
        length: usize,
    },
    /// Insert text at the cursor
    InsertAtCursor {
        /// Text to insert.
        text: String,
    },
    /// Insert a `'\n'` at the cursor
    Newline,
    /// Delete the byte before the cursor
    Backspace,
    /// Delete the byte under the cursor
    DeleteForward,
    /// Undo last edit operation
    Undo,
    /// Redo last undone operation
    Redo,
}

/// Cursor movement commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCommand {
    /// One byte left
    Left,
    /// One byte right
    Right,
    /// One line up, keeping the desired column
    Up,
    /// One line down, keeping the desired column
    Down,
    /// Start of the current line
    LineStart,
    /// End of the current line
    LineEnd,
    /// Jump to a byte offset (clamped)
    MoveTo {
        /// Target byte offset.
        offset: usize,
    },
}

/// Editor command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Edit command
    Edit(EditCommand),
    /// Cursor command
    Cursor(CursorCommand),
}

impl From<EditCommand> for Command {
    fn from(command: EditCommand) -> Self {
        Command::Edit(command)
    }
}

impl From<CursorCommand> for Command {
    fn from(command: CursorCommand) -> Self {
        Command::Cursor(command)
    }
}

/// Command execution result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// Document content or cursor position changed
    Changed,
    /// The command was a no-op (out-of-range edit, saturated history, cursor at an edge)
    Unchanged,
}

impl CommandResult {
    /// `true` for [`CommandResult::Changed`].
    pub fn is_changed(self) -> bool {
        self == CommandResult::Changed
    }
}
