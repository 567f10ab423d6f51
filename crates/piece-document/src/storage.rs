//! Buffer Storage Layer
//!
//! Owns the two byte buffers a piece table reads from: the read-only original buffer
//! (content at load time) and the append-only add buffer (every inserted byte).
//! Pieces are plain descriptors into one of those buffers.

/// Buffer type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Read-only original buffer
    Original,
    /// Append-only add buffer
    Add,
}

/// Piece structure: references a fragment in a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// Buffer the fragment lives in
    pub buffer: BufferKind,
    /// Start position in the corresponding buffer (byte offset)
    pub start: usize,
    /// Byte length of the fragment
    pub len: usize,
}

impl Piece {
    /// Create a new Piece
    pub fn new(buffer: BufferKind, start: usize, len: usize) -> Self {
        Self { buffer, start, len }
    }

    /// Exclusive end offset inside the owning buffer.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Split at `offset` bytes into the piece, returning `(left, right)`.
    ///
    /// Either half may be empty when `offset` sits on an edge.
    pub fn split_at(&self, offset: usize) -> (Piece, Piece) {
        let offset = offset.min(self.len);
        let left = Piece::new(self.buffer, self.start, offset);
        let right = Piece::new(self.buffer, self.start + offset, self.len - offset);
        (left, right)
    }
}

/// The original and add buffers of a document.
#[derive(Debug, Clone, Default)]
pub struct Buffers {
    /// Read-only original buffer
    original: Vec<u8>,
    /// Append-only add buffer
    add: Vec<u8>,
}

impl Buffers {
    /// Take ownership of the initial document content.
    pub fn new(original: Vec<u8>) -> Self {
        Self {
            original,
            add: Vec::new(),
        }
    }

    /// The piece covering the whole original buffer, if it is non-empty.
    pub fn original_piece(&self) -> Option<Piece> {
        (!self.original.is_empty()).then(|| Piece::new(BufferKind::Original, 0, self.original.len()))
    }

    /// Append `bytes` to the add buffer and return the piece naming them.
    pub fn append(&mut self, bytes: &[u8]) -> Piece {
        let start = self.add.len();
        self.add.extend_from_slice(bytes);
        Piece::new(BufferKind::Add, start, bytes.len())
    }

    /// Bytes referenced by `piece`.
    pub fn bytes(&self, piece: &Piece) -> &[u8] {
        let buffer = match piece.buffer {
            BufferKind::Original => &self.original,
            BufferKind::Add => &self.add,
        };
        &buffer[piece.start..piece.end()]
    }

    /// Size of the original buffer in bytes.
    pub fn original_len(&self) -> usize {
        self.original.len()
    }

    /// Size of the add buffer in bytes (for memory accounting).
    pub fn add_len(&self) -> usize {
        self.add.len()
    }

    /// Rewrite the add buffer so it only holds the spans listed in `remap`.
    ///
    /// Returns the number of bytes reclaimed. Every add piece that was part of the
    /// input to [`AddBufferRemap::build`] must afterwards be passed through
    /// [`AddBufferRemap::apply`].
    pub fn compact(&mut self, remap: &AddBufferRemap) -> usize {
        let before = self.add.len();
        let mut compacted = Vec::with_capacity(remap.retained_len());
        for mapping in &remap.mappings {
            compacted.extend_from_slice(&self.add[mapping.old_start..mapping.old_end]);
        }
        self.add = compacted;
        before - self.add.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct RangeMapping {
    old_start: usize,
    old_end: usize,
    new_start: usize,
}

/// Offset translation produced by add-buffer compaction.
///
/// Built from every add piece that is still reachable (live document and history),
/// so spans shared between snapshots are kept exactly once.
#[derive(Debug, Clone, Default)]
pub struct AddBufferRemap {
    mappings: Vec<RangeMapping>,
}

impl AddBufferRemap {
    /// Collect the referenced add-buffer ranges from `pieces`.
    pub fn build<'a>(pieces: impl IntoIterator<Item = &'a Piece>) -> Self {
        let mut referenced: Vec<(usize, usize)> = pieces
            .into_iter()
            .filter(|p| p.buffer == BufferKind::Add && p.len > 0)
            .map(|p| (p.start, p.end()))
            .collect();

        if referenced.is_empty() {
            return Self::default();
        }

        referenced.sort_unstable_by_key(|r| r.0);

        // Merge overlapping or touching ranges
        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(referenced.len());
        for (start, end) in referenced {
            match merged.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }

        let mut mappings = Vec::with_capacity(merged.len());
        let mut new_start = 0;
        for (old_start, old_end) in merged {
            mappings.push(RangeMapping {
                old_start,
                old_end,
                new_start,
            });
            new_start += old_end - old_start;
        }

        Self { mappings }
    }

    /// Total bytes the compacted add buffer will hold.
    pub fn retained_len(&self) -> usize {
        self.mappings
            .iter()
            .map(|m| m.old_end - m.old_start)
            .sum()
    }

    /// Translate an add piece to its post-compaction offset. Original pieces are untouched.
    pub fn apply(&self, piece: &mut Piece) {
        if piece.buffer != BufferKind::Add {
            return;
        }
        if piece.len == 0 {
            piece.start = 0;
            return;
        }

        // Last mapping whose old_start <= piece.start
        let idx = match self
            .mappings
            .binary_search_by_key(&piece.start, |m| m.old_start)
        {
            Ok(exact) => exact,
            Err(insert_pos) => insert_pos.saturating_sub(1),
        };

        if let Some(m) = self.mappings.get(idx)
            && piece.start >= m.old_start
            && piece.start < m.old_end
        {
            piece.start = m.new_start + (piece.start - m.old_start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_original_has_no_piece() {
        let buffers = Buffers::new(Vec::new());
        assert!(buffers.original_piece().is_none());
    }

    #[test]
    fn test_original_piece_covers_content() {
        let buffers = Buffers::new(b"Hello".to_vec());
        let piece = buffers.original_piece().unwrap();
        assert_eq!(piece, Piece::new(BufferKind::Original, 0, 5));
        assert_eq!(buffers.bytes(&piece), b"Hello");
    }

    #[test]
    fn test_append_only_grows() {
        let mut buffers = Buffers::new(Vec::new());
        let a = buffers.append(b"abc");
        let b = buffers.append(b"de");
        assert_eq!(a, Piece::new(BufferKind::Add, 0, 3));
        assert_eq!(b, Piece::new(BufferKind::Add, 3, 2));
        assert_eq!(buffers.add_len(), 5);
        assert_eq!(buffers.bytes(&b), b"de");
    }

    #[test]
    fn test_split_piece() {
        let piece = Piece::new(BufferKind::Add, 10, 6);
        let (left, right) = piece.split_at(2);
        assert_eq!(left, Piece::new(BufferKind::Add, 10, 2));
        assert_eq!(right, Piece::new(BufferKind::Add, 12, 4));

        let (left, right) = piece.split_at(6);
        assert_eq!(left.len, 6);
        assert_eq!(right.len, 0);
    }

    #[test]
    fn test_compact_drops_unreferenced_spans() {
        let mut buffers = Buffers::new(Vec::new());
        let _dead = buffers.append(b"xxxx");
        let mut live = buffers.append(b"keep");

        let remap = AddBufferRemap::build([&live]);
        let reclaimed = buffers.compact(&remap);
        remap.apply(&mut live);

        assert_eq!(reclaimed, 4);
        assert_eq!(live.start, 0);
        assert_eq!(buffers.bytes(&live), b"keep");
    }

    #[test]
    fn test_compact_shared_and_interior_pieces() {
        let mut buffers = Buffers::new(b"orig".to_vec());
        let whole = buffers.append(b"0123456789");
        let (mut left, right) = whole.split_at(3);
        let (_, mut tail) = right.split_at(4);
        let mut orig = buffers.original_piece().unwrap();

        let remap = AddBufferRemap::build([&left, &tail, &orig]);
        assert_eq!(remap.retained_len(), 6);
        buffers.compact(&remap);
        remap.apply(&mut left);
        remap.apply(&mut tail);
        remap.apply(&mut orig);

        assert_eq!(buffers.bytes(&left), b"012");
        assert_eq!(buffers.bytes(&tail), b"789");
        assert_eq!(buffers.bytes(&orig), b"orig");
    }

    #[test]
    fn test_compact_with_nothing_referenced() {
        let mut buffers = Buffers::new(Vec::new());
        buffers.append(b"gone");
        let remap = AddBufferRemap::build(std::iter::empty());
        assert_eq!(buffers.compact(&remap), 4);
        assert_eq!(buffers.add_len(), 0);
    }
}
