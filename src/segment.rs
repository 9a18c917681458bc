//! A numeric column bundled with its skip index.

use crate::doc_values::NumericDocValues;
use crate::error::Result;
use crate::search::collector::Collector;
use crate::search::iterator::DocId;
use crate::skip::builder::{SkipIndexBuilder, SkipIndexConfig};
use crate::skip::index::SkipIndex;
use crate::skip::search::NumericRangeScanner;

/// One column of a segment together with the skip index summarizing it.
///
/// The write-time side of the crate: build once, then run any number of
/// range scans against the immutable pair.
#[derive(Debug, Clone)]
pub struct NumericColumnSegment {
    values: NumericDocValues,
    skip: SkipIndex,
}

impl NumericColumnSegment {
    /// Summarize `values` under `config` and bundle the two.
    pub fn build(values: NumericDocValues, config: SkipIndexConfig) -> Result<Self> {
        let skip = SkipIndexBuilder::new(config).build(&values)?;
        Ok(NumericColumnSegment { values, skip })
    }

    /// The column's values.
    pub fn values(&self) -> &NumericDocValues {
        &self.values
    }

    /// The skip index over the column.
    pub fn skip_index(&self) -> &SkipIndex {
        &self.skip
    }

    /// Number of docs in the segment.
    pub fn max_doc(&self) -> DocId {
        self.values.max_doc()
    }

    /// Count docs whose value lies in `[query_min, query_max]`.
    pub fn count(&self, query_min: i64, query_max: i64) -> Result<u64> {
        NumericRangeScanner::new(&self.skip, &self.values)?.count(query_min, query_max)
    }

    /// Scan the segment, delivering surviving docs to `collector`.
    /// Returns the match count.
    pub fn search<C: Collector>(
        &self,
        query_min: i64,
        query_max: i64,
        collector: &mut C,
    ) -> Result<u64> {
        NumericRangeScanner::new(&self.skip, &self.values)?.search(query_min, query_max, collector)
    }
}
