//! Forward-only iteration over ascending doc-ID sets.

use crate::search::bitset::BitSet;

/// Identifies a document within one segment.
pub type DocId = u64;

/// A sentinel to indicate that an iterator has exhausted all its docs.
pub const NO_MORE_DOCS: DocId = DocId::MAX;

/// A sentinel to indicate that iteration has not started.
pub const NOT_STARTED: DocId = DocId::MAX - 1;

/// A way to iterate through doc IDs, in strictly increasing order.
///
/// Both sentinels sit above every addressable doc ID, so a segment is
/// limited to fewer than [`NOT_STARTED`] documents. Iterators are
/// single-pass: once [`NO_MORE_DOCS`] has been returned, every further
/// call returns it again without side effects.
///
/// Moving backward is not supported. Calling [`advance`](Self::advance)
/// with a target at or below the current doc is a contract violation;
/// it is rejected by a debug assertion, and each implementation
/// documents its release-mode behavior.
pub trait DocIdSetIterator {
    /// The current doc ID, or a sentinel before the first positioning
    /// call and after exhaustion.
    fn doc_id(&self) -> DocId;

    /// Advance by one step, returning the new doc or [`NO_MORE_DOCS`].
    fn next_doc(&mut self) -> DocId;

    /// Advance to the first doc with `doc_id >= target`, returning it or
    /// [`NO_MORE_DOCS`]. Equivalent to calling [`next_doc`](Self::next_doc)
    /// until it reaches `target`.
    fn advance(&mut self, target: DocId) -> DocId;
}

/// Iterates a pre-sorted doc-ID array.
///
/// `advance` is a linear scan, O(distance) from the current position.
/// In release builds a non-advancing target still moves the cursor one
/// step forward, since the scan always takes at least one step.
#[derive(Debug)]
pub struct ArrayDocIdIterator {
    doc_ids: Vec<DocId>,
    /// Cursor into `doc_ids`; `None` until the first positioning call.
    pos: Option<usize>,
}

impl ArrayDocIdIterator {
    /// Create an iterator over `doc_ids`, which must be strictly
    /// ascending.
    pub fn new(doc_ids: Vec<DocId>) -> Self {
        debug_assert!(
            doc_ids.windows(2).all(|w| w[0] < w[1]),
            "doc ids must be strictly ascending"
        );
        ArrayDocIdIterator { doc_ids, pos: None }
    }
}

impl DocIdSetIterator for ArrayDocIdIterator {
    fn doc_id(&self) -> DocId {
        match self.pos {
            None => NOT_STARTED,
            Some(i) if i >= self.doc_ids.len() => NO_MORE_DOCS,
            Some(i) => self.doc_ids[i],
        }
    }

    fn next_doc(&mut self) -> DocId {
        let next = match self.pos {
            None => 0,
            Some(i) => (i + 1).min(self.doc_ids.len()),
        };
        self.pos = Some(next);

        if next >= self.doc_ids.len() {
            NO_MORE_DOCS
        } else {
            self.doc_ids[next]
        }
    }

    fn advance(&mut self, target: DocId) -> DocId {
        let doc = self.doc_id();
        debug_assert!(
            doc == NOT_STARTED || doc == NO_MORE_DOCS || target > doc,
            "advance target {target} does not move past the current doc {doc}"
        );

        if doc == NO_MORE_DOCS {
            return NO_MORE_DOCS;
        }

        // NO_MORE_DOCS is above every target, so exhaustion ends the scan.
        loop {
            let doc = self.next_doc();
            if doc >= target {
                return doc;
            }
        }
    }
}

/// Converts a [`BitSet`] into a [`DocIdSetIterator`].
///
/// `advance(target)` resolves to the smallest set index at or past
/// `target`; in release builds a non-advancing target is resolved from
/// `target` as given, which cannot move the cursor backward past a set
/// bit it already returned.
#[derive(Debug)]
pub struct BitSetDocIdIterator<'a> {
    bits: &'a dyn BitSet,
    doc: DocId,
}

impl<'a> BitSetDocIdIterator<'a> {
    /// Create an iterator over the set bits of `bits`.
    pub fn new(bits: &'a dyn BitSet) -> Self {
        BitSetDocIdIterator {
            bits,
            doc: NOT_STARTED,
        }
    }
}

impl DocIdSetIterator for BitSetDocIdIterator<'_> {
    fn doc_id(&self) -> DocId {
        if self.doc == NOT_STARTED {
            return NOT_STARTED;
        }
        if self.doc >= self.bits.len() {
            return NO_MORE_DOCS;
        }
        self.doc
    }

    fn next_doc(&mut self) -> DocId {
        match self.doc_id() {
            NOT_STARTED => self.advance(0),
            NO_MORE_DOCS => NO_MORE_DOCS,
            doc => self.advance(doc + 1),
        }
    }

    fn advance(&mut self, target: DocId) -> DocId {
        let doc = self.doc_id();
        debug_assert!(
            doc == NOT_STARTED || doc == NO_MORE_DOCS || target > doc,
            "advance target {target} does not move past the current doc {doc}"
        );

        if doc == NO_MORE_DOCS || target >= self.bits.len() {
            self.doc = NO_MORE_DOCS;
            return NO_MORE_DOCS;
        }

        // The bounds check above makes next_set_bit infallible here.
        match self.bits.next_set_bit(target).ok().flatten() {
            Some(next) => {
                self.doc = next;
                next
            }
            None => {
                self.doc = NO_MORE_DOCS;
                NO_MORE_DOCS
            }
        }
    }
}
