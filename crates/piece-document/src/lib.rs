#![warn(missing_docs)]
//! Piece Document - Headless Editable Text Engine
//!
//! # Overview
//!
//! `piece-document` stores arbitrarily large mutable text, supports fast localized
//! insertion and deletion, keeps a line start index up to date incrementally, and
//! provides multi-step undo/redo. It does not render anything: a presentation layer asks
//! for visible lines and the cursor's line/column, an input layer applies edits and
//! cursor moves.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Document / Command Interface               │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Cursor (sticky column) · Search · Display  │  ← Navigation & queries
//! ├─────────────────────────────────────────────┤
//! │  History (snapshot undo/redo)               │  ← Edit history
//! ├─────────────────────────────────────────────┤
//! │  Line Start Cache                           │  ← Line access
//! ├─────────────────────────────────────────────┤
//! │  Piece List (arena, stable handles)         │  ← Document order
//! ├─────────────────────────────────────────────┤
//! │  Buffers (original + append-only add)       │  ← Text storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use piece_document::{Document, Position};
//!
//! let mut doc = Document::empty();
//! doc.insert(0, "hello\nworld");
//! assert_eq!(doc.line_count(), 2);
//! assert_eq!(doc.line(0), "hello");
//!
//! doc.move_cursor_to(3);
//! doc.move_cursor_down();
//! assert_eq!(doc.cursor_line_col(), Position::new(1, 3));
//!
//! doc.remove(0, 6);
//! assert_eq!(doc.to_string(), "world");
//! doc.undo();
//! assert_eq!(doc.visible_lines(0, 10), vec!["hello", "world"]);
//! ```
//!
//! # Module Description
//!
//! - [`storage`] - original and add buffers, pieces, add-buffer compaction
//! - [`piece_list`] - arena-backed piece sequence and position resolution
//! - [`line_index`] - incrementally maintained line start cache
//! - [`history`] - snapshot undo/redo stacks
//! - [`cursor`] - cursor with desired-column memory
//! - [`search`] - literal/regex search over document bytes
//! - [`commands`] - command enums for input layers
//! - [`document`] - the [`Document`] type
//!
//! # Positions
//!
//! Every offset and column is a **byte** offset. Text queries decode lossily, so a
//! range that splits a multi-byte character shows a replacement character.
//!
//! # Threading
//!
//! A [`Document`] has no internal synchronization. Share it across threads only behind
//! the caller's own lock, or keep one document per owning task.

pub mod commands;
pub mod config;
pub mod cursor;
pub mod display;
pub mod document;
mod error;
pub mod history;
pub mod line_index;
pub mod piece_list;
pub mod search;
pub mod storage;

pub use commands::{Command, CommandResult, CursorCommand, EditCommand};
pub use config::DocumentConfig;
pub use cursor::{Cursor, Position};
pub use document::Document;
pub use error::{DocumentError, Result};
pub use line_index::LineStarts;
pub use piece_list::{Affinity, PieceId, PieceList};
pub use search::{SearchMatch, SearchOptions};
pub use storage::{BufferKind, Piece};
