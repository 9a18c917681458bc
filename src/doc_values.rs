//! In-memory numeric doc values: one optional `i64` per document.
//!
//! This is the per-doc value store the skip index summarizes and range
//! scans read. [`EncodedNumericValues`] is its compressed form: present
//! doc IDs are delta-coded then bit-packed, values are offset-normalized
//! against the column minimum and bit-packed. Widths, counts, and the
//! base value travel alongside the buffers, since packed buffers never
//! describe themselves.

use crate::compression::{bitpack, delta};
use crate::error::{CrocusError, Result};
use crate::search::iterator::{DocId, DocIdSetIterator, NO_MORE_DOCS, NOT_STARTED};

/// A numeric column over docs `[0, max_doc)`; a doc either has one
/// `i64` value or none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericDocValues {
    values: Vec<Option<i64>>,
    count: u64,
}

impl NumericDocValues {
    /// Build a column from one slot per doc; `None` means the doc has
    /// no value.
    pub fn new(values: Vec<Option<i64>>) -> Self {
        let count = values.iter().filter(|v| v.is_some()).count() as u64;
        NumericDocValues { values, count }
    }

    /// Number of docs in the column, present or not.
    pub fn max_doc(&self) -> DocId {
        self.values.len() as DocId
    }

    /// Number of docs with a present value.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The value of `doc_id`, or `None` when the doc has no value or
    /// lies outside the column.
    pub fn get(&self, doc_id: DocId) -> Option<i64> {
        self.values
            .get(usize::try_from(doc_id).ok()?)
            .copied()
            .flatten()
    }

    /// A forward-only iterator over the docs with a present value.
    pub fn iterator(&self) -> ValuesIterator<'_> {
        ValuesIterator {
            values: self,
            doc: NOT_STARTED,
        }
    }
}

/// Iterates the present docs of a [`NumericDocValues`], exposing the
/// value at the current position.
///
/// `advance` scans linearly from the target. In release builds a
/// non-advancing target is resolved from the target as given.
#[derive(Debug)]
pub struct ValuesIterator<'a> {
    values: &'a NumericDocValues,
    doc: DocId,
}

impl ValuesIterator<'_> {
    /// The value at the current doc, or `None` at a sentinel position.
    pub fn value(&self) -> Option<i64> {
        self.values.get(self.doc)
    }

    fn seek_from(&mut self, from: DocId) -> DocId {
        let max_doc = self.values.max_doc();
        let mut doc = from;
        while doc < max_doc {
            if self.values.get(doc).is_some() {
                self.doc = doc;
                return doc;
            }
            doc += 1;
        }
        self.doc = NO_MORE_DOCS;
        NO_MORE_DOCS
    }
}

impl DocIdSetIterator for ValuesIterator<'_> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> DocId {
        match self.doc {
            NOT_STARTED => self.seek_from(0),
            NO_MORE_DOCS => NO_MORE_DOCS,
            doc => self.seek_from(doc + 1),
        }
    }

    fn advance(&mut self, target: DocId) -> DocId {
        debug_assert!(
            self.doc == NOT_STARTED || self.doc == NO_MORE_DOCS || target > self.doc,
            "advance target {target} does not move past the current doc {}",
            self.doc
        );

        if self.doc == NO_MORE_DOCS {
            return NO_MORE_DOCS;
        }
        self.seek_from(target)
    }
}

/// The compressed form of a [`NumericDocValues`] column.
///
/// Present doc IDs are delta-coded (absolute first element, gaps after;
/// all non-negative for an ascending list) and bit-packed at their
/// required width. Values are normalized by subtracting the column
/// minimum, which makes them non-negative, then bit-packed likewise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedNumericValues {
    max_doc: DocId,
    count: u64,
    packed_doc_ids: Vec<u8>,
    doc_id_width: u32,
    packed_values: Vec<u8>,
    value_width: u32,
    base_value: i64,
}

impl EncodedNumericValues {
    /// Compress `values`. A column whose value span does not fit in an
    /// `i64` is rejected rather than silently wrapped.
    pub fn encode(values: &NumericDocValues) -> Result<Self> {
        if values.max_doc() > i64::MAX as u64 {
            return Err(CrocusError::invalid_argument(format!(
                "column of {} docs is too large to encode",
                values.max_doc()
            )));
        }

        let mut doc_ids = Vec::with_capacity(values.count() as usize);
        let mut present = Vec::with_capacity(values.count() as usize);
        let mut iter = values.iterator();
        while iter.next_doc() != NO_MORE_DOCS {
            if let Some(value) = iter.value() {
                doc_ids.push(iter.doc_id() as i64);
                present.push(value);
            }
        }

        if present.is_empty() {
            // Nothing to pack; the codec rejects empty slices.
            return Ok(EncodedNumericValues {
                max_doc: values.max_doc(),
                count: 0,
                packed_doc_ids: Vec::new(),
                doc_id_width: 0,
                packed_values: Vec::new(),
                value_width: 0,
                base_value: 0,
            });
        }

        let deltas = delta::encode(&doc_ids);
        let doc_id_width = bitpack::required_width(&deltas)?;
        let packed_doc_ids = bitpack::pack(&deltas)?;

        let mut min = present[0];
        let mut max = present[0];
        for &value in &present {
            min = min.min(value);
            max = max.max(value);
        }
        if (max as i128) - (min as i128) > i64::MAX as i128 {
            return Err(CrocusError::invalid_argument(format!(
                "value span [{min}, {max}] is too wide to bit-pack"
            )));
        }

        let offsets: Vec<i64> = present.iter().map(|v| v.wrapping_sub(min)).collect();
        let value_width = bitpack::required_width(&offsets)?;
        let packed_values = bitpack::pack(&offsets)?;

        Ok(EncodedNumericValues {
            max_doc: values.max_doc(),
            count: present.len() as u64,
            packed_doc_ids,
            doc_id_width,
            packed_values,
            value_width,
            base_value: min,
        })
    }

    /// Reconstruct the column exactly.
    pub fn decode(&self) -> Result<NumericDocValues> {
        let mut slots = vec![None; self.max_doc as usize];
        if self.count == 0 {
            return Ok(NumericDocValues::new(slots));
        }

        let count = self.count as usize;
        let deltas = bitpack::unpack(&self.packed_doc_ids, count, self.doc_id_width)?;
        let doc_ids = delta::decode(&deltas);
        let offsets = bitpack::unpack(&self.packed_values, count, self.value_width)?;

        for (doc_id, offset) in doc_ids.iter().zip(offsets.iter()) {
            let slot = usize::try_from(*doc_id)
                .ok()
                .and_then(|doc| slots.get_mut(doc))
                .ok_or_else(|| {
                    CrocusError::index(format!(
                        "decoded doc id {doc_id} is outside the column [0, {})",
                        self.max_doc
                    ))
                })?;
            *slot = Some(self.base_value.wrapping_add(*offset));
        }

        Ok(NumericDocValues::new(slots))
    }

    /// Number of docs in the encoded column.
    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    /// Number of docs with a present value.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Packed size of both buffers in bytes.
    pub fn packed_len(&self) -> usize {
        self.packed_doc_ids.len() + self.packed_values.len()
    }
}
