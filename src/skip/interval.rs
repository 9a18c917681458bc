//! Skip intervals and the per-interval pruning decision.

use serde::{Deserialize, Serialize};

use crate::search::iterator::DocId;

/// Summary of one contiguous doc-ID range at one granularity level.
///
/// Invariant: every doc in `[min_doc_id, max_doc_id]` with a present
/// value has that value inside `[min_value, max_value]`; `doc_count`
/// counts only docs with a present value. An interval with no present
/// values carries the inverted range `(i64::MAX, i64::MIN)`, which the
/// decision rule classifies without a special case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipInterval {
    /// First doc ID covered by this interval.
    pub min_doc_id: DocId,
    /// Last doc ID covered by this interval, inclusive.
    pub max_doc_id: DocId,
    /// Smallest present value in the range.
    pub min_value: i64,
    /// Largest present value in the range.
    pub max_value: i64,
    /// Number of docs in the range with a present value.
    pub doc_count: u64,
}

impl SkipInterval {
    /// Whether the interval covers no present values.
    pub fn is_empty(&self) -> bool {
        self.doc_count == 0
    }

    /// Whether the interval holds exactly one distinct value.
    pub fn is_constant(&self) -> bool {
        self.doc_count > 0 && self.min_value == self.max_value
    }
}

/// The pruning outcome for one interval under query bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalDecision {
    /// No doc in the interval can match; contributes zero matches with
    /// no per-doc read.
    Skip,
    /// Every doc with a present value matches; the interval's
    /// `doc_count` is accepted without a per-doc range test.
    AcceptAll,
    /// The value ranges overlap partially; docs must be checked
    /// individually.
    Maybe,
}

/// Classify `interval` against the inclusive bounds
/// `[query_min, query_max]`.
pub fn decide(interval: &SkipInterval, query_min: i64, query_max: i64) -> IntervalDecision {
    if interval.max_value < query_min || interval.min_value > query_max {
        IntervalDecision::Skip
    } else if interval.min_value >= query_min && interval.max_value <= query_max {
        IntervalDecision::AcceptAll
    } else {
        IntervalDecision::Maybe
    }
}
