//! Collectors consume surviving doc IDs from a scan.
//!
//! A collector is a sink that receives doc IDs and builds something out
//! of them: a hit count, a histogram, an average. Collection happens per
//! leaf (segment), but accumulator state lives at the parent collector,
//! so each leaf collector writes into the parent's fields.

use ahash::AHashMap;

use crate::doc_values::NumericDocValues;
use crate::error::{CrocusError, Result};
use crate::search::iterator::DocId;

/// Builds one [`LeafCollector`] per segment.
///
/// A collector is bound once per query; its leaves borrow the parent
/// accumulator state and are single-use.
pub trait Collector {
    /// Create the leaf collector for one segment, bound to that
    /// segment's values.
    fn leaf_collector<'a>(&'a mut self, values: &'a NumericDocValues)
    -> Box<dyn LeafCollector + 'a>;
}

/// Collects results at segment level. No scoring in this core.
pub trait LeafCollector {
    /// Collect one surviving document. Calls arrive in strictly
    /// increasing doc-ID order.
    fn collect(&mut self, doc_id: DocId) -> Result<()>;

    /// Whether collected docs must be visited individually so their
    /// stored values can be read.
    ///
    /// A skip index proves range membership only, not value retrieval;
    /// when this returns `true`, bulk-accepted intervals are still
    /// delivered doc by doc through [`collect`](Self::collect). When it
    /// returns `false`, whole intervals may arrive through
    /// [`collect_count`](Self::collect_count) instead.
    fn needs_values(&self) -> bool {
        true
    }

    /// Accept `count` docs at once from an interval proven to match
    /// entirely.
    ///
    /// The default fails, so a collector that reads values can never
    /// absorb a bulk count it did not opt into.
    fn collect_count(&mut self, count: u64) -> Result<()> {
        let _ = count;
        Err(CrocusError::invalid_operation(
            "collector requires per-document collection",
        ))
    }
}

/// Counts how many documents matched.
#[derive(Debug, Default)]
pub struct TotalHitCountCollector {
    // Shared across leaves and not thread-safe, so a single collector
    // is always used within one thread.
    total_hits: u64,
}

impl TotalHitCountCollector {
    /// Create a collector with a zero count.
    pub fn new() -> Self {
        TotalHitCountCollector::default()
    }

    /// Number of documents collected so far.
    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }
}

impl Collector for TotalHitCountCollector {
    fn leaf_collector<'a>(
        &'a mut self,
        _values: &'a NumericDocValues,
    ) -> Box<dyn LeafCollector + 'a> {
        Box::new(TotalHitCountLeaf {
            total_hits: &mut self.total_hits,
        })
    }
}

struct TotalHitCountLeaf<'a> {
    total_hits: &'a mut u64,
}

impl LeafCollector for TotalHitCountLeaf<'_> {
    fn collect(&mut self, _doc_id: DocId) -> Result<()> {
        *self.total_hits += 1;
        Ok(())
    }

    fn needs_values(&self) -> bool {
        false
    }

    fn collect_count(&mut self, count: u64) -> Result<()> {
        *self.total_hits += count;
        Ok(())
    }
}

/// Builds a value histogram by reading actual stored values.
///
/// Forces per-doc value reads even where the skip index proves a whole
/// interval matches.
#[derive(Debug, Default)]
pub struct HistogramCollector {
    histogram: AHashMap<i64, u64>,
}

impl HistogramCollector {
    /// Create a collector with an empty histogram.
    pub fn new() -> Self {
        HistogramCollector::default()
    }

    /// The collected value frequencies.
    pub fn histogram(&self) -> &AHashMap<i64, u64> {
        &self.histogram
    }

    /// Total number of documents collected.
    pub fn total_hits(&self) -> u64 {
        self.histogram.values().sum()
    }
}

impl Collector for HistogramCollector {
    fn leaf_collector<'a>(
        &'a mut self,
        values: &'a NumericDocValues,
    ) -> Box<dyn LeafCollector + 'a> {
        Box::new(HistogramLeaf {
            histogram: &mut self.histogram,
            values,
        })
    }
}

struct HistogramLeaf<'a> {
    histogram: &'a mut AHashMap<i64, u64>,
    values: &'a NumericDocValues,
}

impl LeafCollector for HistogramLeaf<'_> {
    fn collect(&mut self, doc_id: DocId) -> Result<()> {
        if let Some(value) = self.values.get(doc_id) {
            *self.histogram.entry(value).or_insert(0) += 1;
        }
        Ok(())
    }
}

/// Computes the average of collected values.
///
/// Like [`HistogramCollector`], must read every matched value.
#[derive(Debug, Default)]
pub struct AverageCollector {
    sum: i128,
    count: u64,
}

impl AverageCollector {
    /// Create a collector with an empty accumulator.
    pub fn new() -> Self {
        AverageCollector::default()
    }

    /// The average of collected values, or 0.0 when nothing matched.
    pub fn average(&self) -> f64 {
        if self.count > 0 {
            self.sum as f64 / self.count as f64
        } else {
            0.0
        }
    }

    /// Number of documents collected.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Collector for AverageCollector {
    fn leaf_collector<'a>(
        &'a mut self,
        values: &'a NumericDocValues,
    ) -> Box<dyn LeafCollector + 'a> {
        Box::new(AverageLeaf {
            sum: &mut self.sum,
            count: &mut self.count,
            values,
        })
    }
}

struct AverageLeaf<'a> {
    sum: &'a mut i128,
    count: &'a mut u64,
    values: &'a NumericDocValues,
}

impl LeafCollector for AverageLeaf<'_> {
    fn collect(&mut self, doc_id: DocId) -> Result<()> {
        if let Some(value) = self.values.get(doc_id) {
            *self.sum += value as i128;
            *self.count += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> NumericDocValues {
        NumericDocValues::new(vec![Some(5), Some(3), None, Some(5), Some(8)])
    }

    #[test]
    fn test_total_hit_count() {
        let values = column();
        let mut collector = TotalHitCountCollector::new();
        {
            let mut leaf = collector.leaf_collector(&values);
            assert!(!leaf.needs_values());
            leaf.collect(0).unwrap();
            leaf.collect(3).unwrap();
            leaf.collect_count(7).unwrap();
        }
        assert_eq!(collector.total_hits(), 9);
    }

    #[test]
    fn test_histogram_reads_values() {
        let values = column();
        let mut collector = HistogramCollector::new();
        {
            let mut leaf = collector.leaf_collector(&values);
            assert!(leaf.needs_values());
            for doc in [0u64, 1, 3, 4] {
                leaf.collect(doc).unwrap();
            }
        }

        assert_eq!(collector.total_hits(), 4);
        assert_eq!(collector.histogram().get(&5), Some(&2));
        assert_eq!(collector.histogram().get(&3), Some(&1));
        assert_eq!(collector.histogram().get(&8), Some(&1));
    }

    #[test]
    fn test_value_collector_rejects_bulk_counts() {
        let values = column();
        let mut collector = HistogramCollector::new();
        let mut leaf = collector.leaf_collector(&values);
        assert!(leaf.collect_count(4).is_err());
    }

    #[test]
    fn test_average() {
        let values = column();
        let mut collector = AverageCollector::new();
        {
            let mut leaf = collector.leaf_collector(&values);
            for doc in [0u64, 1, 4] {
                leaf.collect(doc).unwrap();
            }
        }

        assert_eq!(collector.count(), 3);
        let expected = (5.0 + 3.0 + 8.0) / 3.0;
        assert!((collector.average() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_average_of_nothing() {
        let collector = AverageCollector::new();
        assert_eq!(collector.average(), 0.0);
        assert_eq!(collector.count(), 0);
    }
}
