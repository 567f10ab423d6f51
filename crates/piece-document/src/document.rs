//! The editable document.
//!
//! [`Document`] aggregates the storage layers and is the only type a frontend needs:
//!
//! - **Buffers**: original content plus the append-only add buffer
//! - **PieceList**: the piece table describing document order
//! - **LineStarts**: incrementally patched line start cache
//! - **History**: snapshot undo/redo
//! - **Cursor**: insertion point with a sticky column
//!
//! All positions are byte offsets. Out-of-range edits are ignored and out-of-range
//! queries return empty results; only file I/O and search patterns can fail.

use crate::commands::{Command, CommandResult, CursorCommand, EditCommand};
use crate::config::DocumentConfig;
use crate::cursor::{Cursor, Position};
use crate::display::display_width;
use crate::error::{DocumentError, Result};
use crate::history::{History, Snapshot};
use crate::line_index::LineStarts;
use crate::piece_list::{Affinity, PieceCursor, PieceList};
use crate::search::{self, SearchMatch, SearchOptions};
use crate::storage::{AddBufferRemap, Buffers};
use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Editable text document backed by a piece table.
///
/// # Example
///
/// ```rust
/// use piece_document::{Document, Position};
///
/// let mut doc = Document::new("ab\ncd");
/// assert_eq!(doc.line_count(), 2);
/// assert_eq!(doc.line(1), "cd");
///
/// doc.insert(2, "!");
/// assert_eq!(doc.to_string(), "ab!\ncd");
///
/// doc.undo();
/// assert_eq!(doc.to_string(), "ab\ncd");
///
/// doc.move_cursor_down();
/// assert_eq!(doc.cursor_line_col(), Position::new(1, 0));
/// ```
pub struct Document {
    buffers: Buffers,
    pieces: PieceList,
    len: usize,
    line_starts: LineStarts,
    history: History,
    cursor: Cursor,
    config: DocumentConfig,
    version: u64,
}

impl Document {
    /// Create a document holding `text`.
    pub fn new(text: &str) -> Self {
        Self::from_bytes(text.as_bytes().to_vec())
    }

    /// Create an empty document.
    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Create a document from raw bytes, stored verbatim.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::with_config(bytes, DocumentConfig::default())
    }

    /// Create a document from raw bytes with explicit configuration.
    pub fn with_config(bytes: Vec<u8>, config: DocumentConfig) -> Self {
        let buffers = Buffers::new(bytes);
        let len = buffers.original_len();

        let mut pieces = PieceList::new();
        if let Some(piece) = buffers.original_piece() {
            pieces.push_back(piece);
        }

        let mut line_starts = LineStarts::new();
        line_starts.rebuild(pieces.iter().map(|p| buffers.bytes(p)));

        let history = History::new(
            Snapshot {
                pieces: pieces.clone(),
                len,
                line_starts: line_starts.clone(),
            },
            config.history_limit,
        );

        Self {
            buffers,
            pieces,
            len,
            line_starts,
            history,
            cursor: Cursor::default(),
            config,
            version: 0,
        }
    }

    /// Load a document from `path`.
    ///
    /// A missing file yields an empty document. A file that exists but cannot be opened
    /// or read is an error.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_from_file_with_config(path, DocumentConfig::default())
    }

    /// [`load_from_file`](Self::load_from_file) with explicit configuration.
    pub fn load_from_file_with_config(
        path: impl AsRef<Path>,
        config: DocumentConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "file not found, starting empty document");
                return Ok(Self::with_config(Vec::new(), config));
            }
            Err(source) => {
                return Err(DocumentError::Open {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| DocumentError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "loaded document");
        Ok(Self::with_config(bytes, config))
    }

    /// Write the document to `path`, truncating it, and mark the document unmodified.
    ///
    /// Pieces are streamed in order without materializing the whole text. A failure
    /// partway may leave a partially written file.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| DocumentError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        self.write_to(BufWriter::new(file))
            .map_err(|source| DocumentError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        self.history.mark_clean();
        tracing::debug!(path = %path.display(), bytes = self.len, "saved document");
        Ok(())
    }

    /// Stream every piece's bytes to `writer` in document order, then flush.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for chunk in self.chunks() {
            writer.write_all(chunk)?;
        }
        writer.flush()
    }

    // ---- editing ----

    /// Insert `text` at byte offset `pos`.
    ///
    /// Ignored when `text` is empty or `pos > len()`.
    pub fn insert(&mut self, pos: usize, text: &str) {
        self.insert_bytes(pos, text.as_bytes());
    }

    /// Insert raw bytes at byte offset `pos`.
    pub fn insert_bytes(&mut self, pos: usize, bytes: &[u8]) {
        if bytes.is_empty() || pos > self.len {
            tracing::trace!(pos, count = bytes.len(), len = self.len, "ignored insert");
            return;
        }

        let new_piece = self.buffers.append(bytes);

        match self.pieces.locate(pos, Affinity::Forward) {
            None => {
                self.pieces.push_back(new_piece);
            }
            Some(at) if at.offset == 0 => {
                self.pieces.insert_before(at.id, new_piece);
            }
            Some(at) => match self.pieces.get(at.id).copied() {
                Some(piece) if at.offset >= piece.len => {
                    self.pieces.insert_after(at.id, new_piece);
                }
                Some(piece) => {
                    let (left, right) = piece.split_at(at.offset);
                    if let Some(slot) = self.pieces.get_mut(at.id) {
                        *slot = left;
                    }
                    let middle = self.pieces.insert_after(at.id, new_piece);
                    self.pieces.insert_after(middle, right);
                }
                None => {
                    self.pieces.push_back(new_piece);
                }
            },
        }

        self.len += bytes.len();
        self.line_starts.apply_insert(pos, bytes);
        self.cursor.on_insert(pos, bytes.len(), &self.line_starts);
        self.commit();
    }

    /// Remove `count` bytes starting at `pos`, clamped to the document end.
    ///
    /// Ignored when `count == 0` or `pos >= len()`.
    pub fn remove(&mut self, pos: usize, count: usize) {
        if count == 0 || pos >= self.len {
            tracing::trace!(pos, count, len = self.len, "ignored remove");
            return;
        }

        let count = count.min(self.len - pos);
        let (Some(start), Some(end)) = (
            self.pieces.locate(pos, Affinity::Forward),
            self.pieces.locate(pos + count, Affinity::Backward),
        ) else {
            return;
        };

        self.line_starts.apply_remove(pos, count);
        self.remove_pieces(start, end);
        self.len -= count;
        self.cursor.on_remove(pos, count, &self.line_starts);
        self.commit();
    }

    /// Insert `text` at the cursor; the cursor ends up after it.
    pub fn insert_at_cursor(&mut self, text: &str) {
        self.insert(self.cursor.position(), text);
    }

    /// Insert a line break at the cursor.
    pub fn newline(&mut self) {
        self.insert_at_cursor("\n");
    }

    /// Delete the byte before the cursor.
    pub fn backspace(&mut self) {
        let pos = self.cursor.position();
        if pos > 0 {
            self.remove(pos - 1, 1);
        }
    }

    /// Delete the byte under the cursor.
    pub fn delete_forward(&mut self) {
        self.remove(self.cursor.position(), 1);
    }

    /// Restore the state before the most recent edit. No-op when nothing can be undone.
    pub fn undo(&mut self) {
        let Some(snapshot) = self.history.undo().cloned() else {
            tracing::trace!("nothing to undo");
            return;
        };
        self.restore(snapshot);
    }

    /// Re-apply the most recently undone edit. No-op when nothing can be redone.
    pub fn redo(&mut self) {
        let Some(snapshot) = self.history.redo().cloned() else {
            tracing::trace!("nothing to redo");
            return;
        };
        self.restore(snapshot);
    }

    /// Whether there is an edit to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether there is an undone edit to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of edits that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Number of edits that can be redone.
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Forget all undo/redo state; the current content becomes the oldest reachable state.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Whether the content differs from the last save (or construction).
    pub fn is_modified(&self) -> bool {
        !self.history.is_clean()
    }

    /// Execute a decoded input command.
    pub fn execute(&mut self, command: impl Into<Command>) -> CommandResult {
        let before = (self.version, self.cursor.position());

        match command.into() {
            Command::Edit(edit) => match edit {
                EditCommand::Insert { offset, text } => self.insert(offset, &text),
                EditCommand::Delete { start, length } => self.remove(start, length),
                EditCommand::InsertAtCursor { text } => self.insert_at_cursor(&text),
                EditCommand::Newline => self.newline(),
                EditCommand::Backspace => self.backspace(),
                EditCommand::DeleteForward => self.delete_forward(),
                EditCommand::Undo => self.undo(),
                EditCommand::Redo => self.redo(),
            },
            Command::Cursor(movement) => match movement {
                CursorCommand::Left => self.move_cursor_left(),
                CursorCommand::Right => self.move_cursor_right(),
                CursorCommand::Up => self.move_cursor_up(),
                CursorCommand::Down => self.move_cursor_down(),
                CursorCommand::LineStart => self.move_cursor_line_start(),
                CursorCommand::LineEnd => self.move_cursor_line_end(),
                CursorCommand::MoveTo { offset } => self.move_cursor_to(offset),
            },
        }

        if (self.version, self.cursor.position()) == before {
            CommandResult::Unchanged
        } else {
            CommandResult::Changed
        }
    }

    /// Rewrite the add buffer to drop bytes no live piece or history snapshot references.
    ///
    /// Returns the number of bytes reclaimed. Never runs implicitly.
    pub fn compact(&mut self) -> usize {
        let remap = AddBufferRemap::build(
            self.pieces
                .iter()
                .chain(self.history.snapshots().flat_map(|s| s.pieces.iter())),
        );
        let reclaimed = self.buffers.compact(&remap);

        self.pieces.for_each_mut(|p| remap.apply(p));
        for snapshot in self.history.snapshots_mut() {
            snapshot.pieces.for_each_mut(|p| remap.apply(p));
        }

        tracing::debug!(
            reclaimed,
            retained = self.buffers.add_len(),
            "compacted add buffer"
        );
        reclaimed
    }

    // ---- cursor ----

    /// Move the cursor one byte left.
    pub fn move_cursor_left(&mut self) {
        self.cursor.move_left(&self.line_starts, self.len);
    }

    /// Move the cursor one byte right.
    pub fn move_cursor_right(&mut self) {
        self.cursor.move_right(&self.line_starts, self.len);
    }

    /// Move the cursor to the previous line, aiming for the desired column.
    pub fn move_cursor_up(&mut self) {
        self.cursor.move_up(&self.line_starts, self.len);
    }

    /// Move the cursor to the next line, aiming for the desired column.
    pub fn move_cursor_down(&mut self) {
        self.cursor.move_down(&self.line_starts, self.len);
    }

    /// Move the cursor to the start of its line.
    pub fn move_cursor_line_start(&mut self) {
        self.cursor.move_line_start(&self.line_starts, self.len);
    }

    /// Move the cursor to the end of its line.
    pub fn move_cursor_line_end(&mut self) {
        self.cursor.move_line_end(&self.line_starts, self.len);
    }

    /// Move the cursor to byte offset `pos`, clamped to the document.
    pub fn move_cursor_to(&mut self, pos: usize) {
        self.cursor.set(pos, &self.line_starts, self.len);
    }

    /// Cursor byte offset.
    pub fn cursor_position(&self) -> usize {
        self.cursor.position()
    }

    /// Cursor line and byte column.
    pub fn cursor_line_col(&self) -> Position {
        self.cursor.line_col(&self.line_starts)
    }

    /// Terminal cell column of the cursor, expanding tabs and wide characters.
    pub fn cursor_display_column(&self) -> usize {
        let pos = self.cursor.position();
        let line = self.line_starts.line_at_offset(pos);
        let start = self.line_starts.line_start(line).unwrap_or(0);
        display_width(&self.range_bytes(start, pos - start), self.config.tab_width)
    }

    // ---- queries ----

    /// Document length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` for an empty document.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of lines; always at least one.
    pub fn line_count(&self) -> usize {
        self.line_starts.line_count()
    }

    /// Byte length of line `index` without its newline; `0` when out of range.
    pub fn line_len(&self, index: usize) -> usize {
        self.line_starts.line_len(index, self.len).unwrap_or(0)
    }

    /// Line `index` without its trailing `'\n'`; empty when out of range.
    pub fn line(&self, index: usize) -> String {
        String::from_utf8_lossy(&self.line_bytes(index)).into_owned()
    }

    /// Raw bytes of line `index` without its trailing `'\n'`.
    pub fn line_bytes(&self, index: usize) -> Vec<u8> {
        match (
            self.line_starts.line_start(index),
            self.line_starts.line_len(index, self.len),
        ) {
            (Some(start), Some(len)) => self.range_bytes(start, len),
            _ => Vec::new(),
        }
    }

    /// Up to `count` lines starting at `first`, clamped to the available lines.
    pub fn visible_lines(&self, first: usize, count: usize) -> Vec<String> {
        let end = first.saturating_add(count).min(self.line_count());
        (first..end).map(|i| self.line(i)).collect()
    }

    /// Text of `[pos, pos + len)`, clamped to the document end.
    pub fn text_in_range(&self, pos: usize, len: usize) -> String {
        String::from_utf8_lossy(&self.range_bytes(pos, len)).into_owned()
    }

    /// Bytes of `[pos, pos + len)`, clamped to the document end.
    pub fn range_bytes(&self, pos: usize, len: usize) -> Vec<u8> {
        let start = pos.min(self.len);
        let end = pos.saturating_add(len).min(self.len);
        let mut result = Vec::with_capacity(end - start);

        let mut piece_start = 0usize;
        for chunk in self.chunks() {
            let piece_end = piece_start + chunk.len();
            if piece_start >= end {
                break;
            }
            if piece_end > start {
                let from = start.saturating_sub(piece_start);
                let to = (end - piece_start).min(chunk.len());
                result.extend_from_slice(&chunk[from..to]);
            }
            piece_start = piece_end;
        }

        result
    }

    /// The whole document as bytes. O(document size); meant for export, not per-frame use.
    pub fn bytes(&self) -> Vec<u8> {
        self.range_bytes(0, self.len)
    }

    /// The whole document as text. O(document size); meant for export, not per-frame use.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    /// Piece contents in document order.
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        self.pieces.iter().map(|p| self.buffers.bytes(p))
    }

    /// Find all occurrences of `query`.
    ///
    /// Each call searches the whole document, so it is O(document size).
    pub fn find_all(&self, query: &str, options: SearchOptions) -> Result<Vec<SearchMatch>> {
        search::find_all(&self.contiguous_bytes(), query, options)
    }

    /// Find the first occurrence at or after `from`, wrapping around to the start.
    ///
    /// Each call searches the whole document, so it is O(document size).
    pub fn find_next(
        &self,
        query: &str,
        from: usize,
        options: SearchOptions,
    ) -> Result<Option<SearchMatch>> {
        search::find_next_wrapping(&self.contiguous_bytes(), query, options, from)
    }

    /// Number of pieces in the piece table.
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Size of the add buffer in bytes.
    pub fn add_buffer_len(&self) -> usize {
        self.buffers.add_len()
    }

    /// Counter bumped by every content change, including undo and redo.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Active configuration.
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    fn remove_pieces(&mut self, start: PieceCursor, end: PieceCursor) {
        if start.id == end.id {
            let Some(piece) = self.pieces.get(start.id).copied() else {
                return;
            };
            if start.offset == 0 && end.offset >= piece.len {
                self.pieces.remove(start.id);
                return;
            }

            let (_, right) = piece.split_at(end.offset);
            if start.offset == 0 {
                if let Some(slot) = self.pieces.get_mut(start.id) {
                    *slot = right;
                }
            } else {
                if let Some(slot) = self.pieces.get_mut(start.id) {
                    slot.len = start.offset;
                }
                if right.len > 0 {
                    self.pieces.insert_after(start.id, right);
                }
            }
            return;
        }

        // Pieces strictly between the two ends are dropped whole
        let mut cur = self.pieces.next(start.id);
        while let Some(id) = cur {
            if id == end.id {
                break;
            }
            cur = self.pieces.next(id);
            self.pieces.remove(id);
        }

        if start.offset == 0 {
            self.pieces.remove(start.id);
        } else if let Some(slot) = self.pieces.get_mut(start.id) {
            slot.len = start.offset;
        }

        let mut end_emptied = false;
        if let Some(slot) = self.pieces.get_mut(end.id) {
            let (_, right) = slot.split_at(end.offset);
            *slot = right;
            end_emptied = slot.len == 0;
        }
        if end_emptied {
            self.pieces.remove(end.id);
        }
    }

    /// Document bytes, borrowed when a single piece holds them all.
    fn contiguous_bytes(&self) -> Cow<'_, [u8]> {
        match self.pieces.first().and_then(|id| self.pieces.get(id)) {
            Some(piece) if self.pieces.len() == 1 => Cow::Borrowed(self.buffers.bytes(piece)),
            None => Cow::Borrowed(&[]),
            Some(_) => Cow::Owned(self.bytes()),
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            pieces: self.pieces.clone(),
            len: self.len,
            line_starts: self.line_starts.clone(),
        }
    }

    fn commit(&mut self) {
        self.version += 1;
        let snapshot = self.snapshot();
        self.history.record(snapshot);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.pieces = snapshot.pieces;
        self.len = snapshot.len;
        self.line_starts = snapshot.line_starts;
        self.cursor
            .set(self.cursor.position(), &self.line_starts, self.len);
        self.version += 1;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.len)
            .field("lines", &self.line_count())
            .field("pieces", &self.pieces.len())
            .field("cursor", &self.cursor)
            .field("version", &self.version)
            .finish()
    }
}
