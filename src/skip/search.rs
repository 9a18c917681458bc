//! Range scans over a column, driven by its skip index.

use log::debug;

use crate::doc_values::{NumericDocValues, ValuesIterator};
use crate::error::{CrocusError, Result};
use crate::search::collector::{Collector, LeafCollector, TotalHitCountCollector};
use crate::search::iterator::{DocId, DocIdSetIterator, NO_MORE_DOCS, NOT_STARTED};
use crate::skip::index::SkipIndex;
use crate::skip::interval::{IntervalDecision, SkipInterval, decide};

/// Evaluates inclusive range predicates over one column using its skip
/// index.
///
/// Scans walk the index from the coarsest level down: an interval whose
/// value range falls outside the query bounds is skipped whole, one
/// that falls entirely inside is accepted in bulk, and only partially
/// overlapping level-0 intervals are checked doc by doc. Whatever path
/// an interval takes, the match count equals what an exhaustive linear
/// scan would produce.
#[derive(Debug)]
pub struct NumericRangeScanner<'a> {
    index: &'a SkipIndex,
    values: &'a NumericDocValues,
}

impl<'a> NumericRangeScanner<'a> {
    /// Create a scanner over `values` summarized by `index`.
    pub fn new(index: &'a SkipIndex, values: &'a NumericDocValues) -> Result<Self> {
        if index.max_doc() != values.max_doc() {
            return Err(CrocusError::invalid_argument(format!(
                "skip index covers {} docs but the column holds {}",
                index.max_doc(),
                values.max_doc()
            )));
        }
        Ok(NumericRangeScanner { index, values })
    }

    /// Count docs whose value lies in `[query_min, query_max]`.
    pub fn count(&self, query_min: i64, query_max: i64) -> Result<u64> {
        let mut collector = TotalHitCountCollector::new();
        let total = self.search(query_min, query_max, &mut collector)?;
        debug_assert_eq!(
            total,
            collector.total_hits(),
            "collector hit count diverged from the scan total"
        );
        Ok(total)
    }

    /// Run the scan, delivering surviving docs to `collector` in
    /// strictly increasing doc-ID order. Returns the match count.
    pub fn search<C: Collector>(
        &self,
        query_min: i64,
        query_max: i64,
        collector: &mut C,
    ) -> Result<u64> {
        let mut leaf = collector.leaf_collector(self.values);
        // One single-pass cursor serves every per-doc read of the scan,
        // which keeps delivery strictly ascending across intervals.
        let mut cursor = self.values.iterator();

        let top = self.index.top_level();
        let max_doc = self.index.max_doc();
        let mut total = 0u64;
        let mut doc_id: DocId = 0;
        while doc_id < max_doc {
            let (matched, next) = self.scan_at(
                top,
                doc_id,
                query_min,
                query_max,
                leaf.as_mut(),
                &mut cursor,
            )?;
            total += matched;
            doc_id = next;
        }

        debug!(
            "range scan [{query_min}, {query_max}] matched {total} of {max_doc} docs"
        );
        Ok(total)
    }

    /// Decide the interval containing `doc_id` at `level`. Returns the
    /// matches contributed by that interval and the next cursor
    /// position, `interval.max_doc_id + 1`.
    fn scan_at(
        &self,
        level: usize,
        doc_id: DocId,
        query_min: i64,
        query_max: i64,
        leaf: &mut dyn LeafCollector,
        cursor: &mut ValuesIterator<'_>,
    ) -> Result<(u64, DocId)> {
        let interval = *self.index.interval_at(level, doc_id)?;

        match decide(&interval, query_min, query_max) {
            IntervalDecision::Skip => Ok((0, interval.max_doc_id + 1)),
            IntervalDecision::AcceptAll => {
                if leaf.needs_values() {
                    // The skip index proves membership, not values;
                    // every present doc is still visited, without the
                    // range test.
                    let visited = collect_present(&interval, leaf, cursor, None)?;
                    debug_assert_eq!(
                        visited, interval.doc_count,
                        "interval doc_count does not match its present docs"
                    );
                } else {
                    leaf.collect_count(interval.doc_count)?;
                }
                Ok((interval.doc_count, interval.max_doc_id + 1))
            }
            IntervalDecision::Maybe if level > 0 => {
                let mut matched = 0u64;
                let mut next = doc_id;
                while next <= interval.max_doc_id {
                    let (m, n) =
                        self.scan_at(level - 1, next, query_min, query_max, leaf, cursor)?;
                    matched += m;
                    next = n;
                }
                Ok((matched, interval.max_doc_id + 1))
            }
            IntervalDecision::Maybe => {
                let matched =
                    collect_present(&interval, leaf, cursor, Some((query_min, query_max)))?;
                Ok((matched, interval.max_doc_id + 1))
            }
        }
    }
}

/// Walk the present docs of `interval` through `cursor`. With bounds,
/// collect only docs whose value lies inside them; without, collect
/// every present doc. Returns the number collected.
fn collect_present(
    interval: &SkipInterval,
    leaf: &mut dyn LeafCollector,
    cursor: &mut ValuesIterator<'_>,
    bounds: Option<(i64, i64)>,
) -> Result<u64> {
    let mut doc = cursor.doc_id();
    if doc == NOT_STARTED || doc < interval.min_doc_id {
        doc = cursor.advance(interval.min_doc_id);
    }

    let mut collected = 0u64;
    while doc != NO_MORE_DOCS && doc <= interval.max_doc_id {
        let matches = match bounds {
            Some((lo, hi)) => cursor.value().is_some_and(|v| v >= lo && v <= hi),
            None => true,
        };
        if matches {
            leaf.collect(doc)?;
            collected += 1;
        }
        doc = cursor.next_doc();
    }

    Ok(collected)
}
