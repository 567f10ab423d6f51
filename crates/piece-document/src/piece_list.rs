//! Piece List
//!
//! An ordered sequence of [`Piece`]s stored in an arena and linked through
//! `prev`/`next` handles. Splicing a piece in or out rewrites a couple of indices and
//! never moves unrelated nodes, so a [`PieceId`] stays valid until its own piece is
//! removed.
//!
//! Concatenating the pieces in list order yields the document text.

use crate::storage::Piece;

/// Stable handle to a piece in a [`PieceList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(usize);

#[derive(Debug, Clone)]
struct Node {
    piece: Piece,
    prev: Option<PieceId>,
    next: Option<PieceId>,
}

/// Which piece wins when a position falls exactly on a boundary between two pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    /// Prefer the start of the following piece (insertion points, range starts).
    Forward,
    /// Prefer the end of the preceding piece (range ends).
    Backward,
}

/// A resolved document position: a piece and a byte offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceCursor {
    /// Piece containing the position
    pub id: PieceId,
    /// Offset into the piece, in `0..=piece.len`
    pub offset: usize,
}

/// Arena-backed doubly linked list of pieces.
#[derive(Debug, Clone, Default)]
pub struct PieceList {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<PieceId>,
    tail: Option<PieceId>,
    count: usize,
}

impl PieceList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pieces currently linked.
    pub fn len(&self) -> usize {
        self.count
    }

    /// `true` when no piece is linked.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Sum of all piece lengths.
    pub fn byte_len(&self) -> usize {
        self.iter().map(|p| p.len).sum()
    }

    /// First piece in document order.
    pub fn first(&self) -> Option<PieceId> {
        self.head
    }

    /// Last piece in document order.
    pub fn last(&self) -> Option<PieceId> {
        self.tail
    }

    /// Piece following `id`.
    pub fn next(&self, id: PieceId) -> Option<PieceId> {
        self.node(id).and_then(|n| n.next)
    }

    /// Piece preceding `id`.
    pub fn prev(&self, id: PieceId) -> Option<PieceId> {
        self.node(id).and_then(|n| n.prev)
    }

    /// Piece addressed by `id`, if it is still linked.
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.node(id).map(|n| &n.piece)
    }

    /// Mutable access to the piece addressed by `id`.
    pub fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .map(|n| &mut n.piece)
    }

    /// Iterate pieces in document order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            next: self.head,
        }
    }

    /// Apply `f` to every linked piece.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut Piece)) {
        for node in self.nodes.iter_mut().flatten() {
            f(&mut node.piece);
        }
    }

    /// Append a piece at the end of the list.
    pub fn push_back(&mut self, piece: Piece) -> PieceId {
        let id = self.alloc(Node {
            piece,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.set_next(tail, Some(id)),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Splice `piece` immediately before `anchor`.
    pub fn insert_before(&mut self, anchor: PieceId, piece: Piece) -> PieceId {
        let prev = self.prev(anchor);
        let id = self.alloc(Node {
            piece,
            prev,
            next: Some(anchor),
        });
        self.set_prev(anchor, Some(id));
        match prev {
            Some(prev) => self.set_next(prev, Some(id)),
            None => self.head = Some(id),
        }
        id
    }

    /// Splice `piece` immediately after `anchor`.
    pub fn insert_after(&mut self, anchor: PieceId, piece: Piece) -> PieceId {
        let next = self.next(anchor);
        let id = self.alloc(Node {
            piece,
            prev: Some(anchor),
            next,
        });
        self.set_next(anchor, Some(id));
        match next {
            Some(next) => self.set_prev(next, Some(id)),
            None => self.tail = Some(id),
        }
        id
    }

    /// Unlink `id` and release its slot. Returns the removed piece.
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let node = self.nodes.get_mut(id.0)?.take()?;
        match node.prev {
            Some(prev) => self.set_next(prev, node.next),
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.set_prev(next, node.prev),
            None => self.tail = node.prev,
        }
        self.free.push(id.0);
        self.count -= 1;
        Some(node.piece)
    }

    /// Resolve a document offset to a piece and an offset inside it.
    ///
    /// - [`Affinity::Forward`]: on a boundary, returns offset `0` of the following piece.
    ///   `pos == byte_len()` resolves to the end of the last piece.
    /// - [`Affinity::Backward`]: on a boundary, returns the end of the preceding piece.
    ///   `pos == 0` resolves to the start of the first piece.
    ///
    /// Returns `None` for an empty list or when `pos` lies past the end.
    pub fn locate(&self, pos: usize, affinity: Affinity) -> Option<PieceCursor> {
        let mut acc = 0usize;
        let mut cur = self.head;

        while let Some(id) = cur {
            let node = self.node(id)?;
            let end = acc + node.piece.len;
            let hit = match affinity {
                Affinity::Forward => pos < end,
                Affinity::Backward => pos <= end && (pos > acc || acc == 0),
            };
            if hit {
                return Some(PieceCursor {
                    id,
                    offset: pos - acc,
                });
            }
            acc = end;
            cur = node.next;
        }

        // Forward resolution of the end-of-document position
        if pos == acc {
            let tail = self.tail?;
            let len = self.get(tail)?.len;
            return Some(PieceCursor {
                id: tail,
                offset: len,
            });
        }

        None
    }

    fn node(&self, id: PieceId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn alloc(&mut self, node: Node) -> PieceId {
        self.count += 1;
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                PieceId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                PieceId(self.nodes.len() - 1)
            }
        }
    }

    fn set_next(&mut self, id: PieceId, next: Option<PieceId>) {
        if let Some(Some(node)) = self.nodes.get_mut(id.0) {
            node.next = next;
        }
    }

    fn set_prev(&mut self, id: PieceId, prev: Option<PieceId>) {
        if let Some(Some(node)) = self.nodes.get_mut(id.0) {
            node.prev = prev;
        }
    }
}

/// Document-order iterator over a [`PieceList`].
pub struct Iter<'a> {
    list: &'a PieceList,
    next: Option<PieceId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Piece;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.next?)?;
        self.next = node.next;
        Some(&node.piece)
    }
}

impl<'a> IntoIterator for &'a PieceList {
    type Item = &'a Piece;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
