//! Fixed-size bit sets with bounds-checked access.

use bit_vec::BitVec;

use crate::error::{CrocusError, Result};
use crate::search::iterator::DocId;

/// A fixed-size vector of bits addressed by doc ID.
///
/// The length is fixed at construction; mutation happens only through
/// [`set`](Self::set). Every accessor rejects indexes outside
/// `[0, len)` with an out-of-bounds error instead of clamping.
pub trait BitSet: std::fmt::Debug {
    /// Set the bit at `index`.
    fn set(&mut self, index: DocId) -> Result<()>;

    /// Whether the bit at `index` is set.
    fn get(&self, index: DocId) -> Result<bool>;

    /// The smallest set index at or after `from`, or `None` when no set
    /// bit remains.
    ///
    /// `from` must be strictly less than [`len`](Self::len); passing
    /// `len` is an error even though it could only ever find nothing.
    fn next_set_bit(&self, from: DocId) -> Result<Option<DocId>>;

    /// Number of addressable bits.
    fn len(&self) -> DocId;

    /// Whether the set addresses zero bits.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The default [`BitSet`] implementation, backed by a [`BitVec`].
#[derive(Debug, Clone)]
pub struct FixedBitSet {
    bits: BitVec,
}

impl FixedBitSet {
    /// Create an all-clear bit set of `len` bits.
    pub fn new(len: usize) -> Self {
        FixedBitSet {
            bits: BitVec::from_elem(len, false),
        }
    }

    fn checked_index(&self, index: DocId, what: &str) -> Result<usize> {
        if index >= self.bits.len() as DocId {
            return Err(CrocusError::out_of_bounds(format!(
                "{what} {index} is out of range [0, {})",
                self.bits.len()
            )));
        }
        Ok(index as usize)
    }
}

impl BitSet for FixedBitSet {
    fn set(&mut self, index: DocId) -> Result<()> {
        let i = self.checked_index(index, "bit index")?;
        self.bits.set(i, true);
        Ok(())
    }

    fn get(&self, index: DocId) -> Result<bool> {
        let i = self.checked_index(index, "bit index")?;
        Ok(self.bits.get(i).unwrap_or(false))
    }

    fn next_set_bit(&self, from: DocId) -> Result<Option<DocId>> {
        let start = self.checked_index(from, "scan start")?;
        Ok(self
            .bits
            .iter()
            .skip(start)
            .position(|bit| bit)
            .map(|offset| (start + offset) as DocId))
    }

    fn len(&self) -> DocId {
        self.bits.len() as DocId
    }
}
