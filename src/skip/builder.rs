//! Write-time construction of skip indexes.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::doc_values::NumericDocValues;
use crate::error::{CrocusError, Result};
use crate::search::iterator::DocId;
use crate::skip::index::SkipIndex;
use crate::skip::interval::SkipInterval;

/// Configuration for skip index construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipIndexConfig {
    /// Number of docs summarized per level-0 interval, before
    /// constant-run merging.
    pub interval_size: usize,

    /// Number of consecutive intervals grouped into one interval of the
    /// next coarser level. A fanout larger than the level-0 interval
    /// count yields a single-level index.
    pub fanout: usize,
}

impl Default for SkipIndexConfig {
    fn default() -> Self {
        SkipIndexConfig {
            interval_size: 4096,
            fanout: 8,
        }
    }
}

/// Builds a [`SkipIndex`] by scanning a column once.
///
/// The column is scanned in fixed-size doc-ID chunks, recording
/// min/max/count per chunk. Adjacent chunks holding one identical
/// constant value are merged into a single interval, so constant runs
/// may grow arbitrarily longer than the nominal chunk size.
#[derive(Debug, Clone)]
pub struct SkipIndexBuilder {
    config: SkipIndexConfig,
}

impl SkipIndexBuilder {
    /// Create a builder with the given configuration.
    pub fn new(config: SkipIndexConfig) -> Self {
        SkipIndexBuilder { config }
    }

    /// Summarize `values` into a skip index.
    pub fn build(&self, values: &NumericDocValues) -> Result<SkipIndex> {
        if self.config.interval_size == 0 {
            return Err(CrocusError::invalid_argument(
                "interval_size must be at least 1",
            ));
        }
        if self.config.fanout < 2 {
            return Err(CrocusError::invalid_argument("fanout must be at least 2"));
        }

        let mut levels = vec![self.build_level0(values)];
        while let Some(level) = levels.last() {
            if level.len() <= self.config.fanout {
                break;
            }
            let next = group_level(level, self.config.fanout);
            levels.push(next);
        }

        debug!(
            "built skip index: {} levels, {} level-0 intervals over {} docs",
            levels.len(),
            levels.first().map(|level| level.len()).unwrap_or(0),
            values.max_doc()
        );

        SkipIndex::from_levels(levels, values.max_doc())
    }

    fn build_level0(&self, values: &NumericDocValues) -> Vec<SkipInterval> {
        let max_doc = values.max_doc();
        let chunk_size = self.config.interval_size as DocId;
        let mut intervals: Vec<SkipInterval> = Vec::new();

        let mut start: DocId = 0;
        while start < max_doc {
            let end = (start.saturating_add(chunk_size)).min(max_doc) - 1;

            let mut min_value = i64::MAX;
            let mut max_value = i64::MIN;
            let mut doc_count = 0u64;
            for doc in start..=end {
                if let Some(value) = values.get(doc) {
                    min_value = min_value.min(value);
                    max_value = max_value.max(value);
                    doc_count += 1;
                }
            }

            let chunk = SkipInterval {
                min_doc_id: start,
                max_doc_id: end,
                min_value,
                max_value,
                doc_count,
            };

            // Extend the previous interval when both hold the same
            // single constant value.
            match intervals.last_mut() {
                Some(last)
                    if last.is_constant()
                        && chunk.is_constant()
                        && last.min_value == chunk.min_value =>
                {
                    last.max_doc_id = chunk.max_doc_id;
                    last.doc_count += chunk.doc_count;
                }
                _ => intervals.push(chunk),
            }

            start = end + 1;
        }

        intervals
    }
}

fn group_level(below: &[SkipInterval], fanout: usize) -> Vec<SkipInterval> {
    below
        .chunks(fanout)
        .map(|group| {
            let mut merged = group[0];
            for interval in &group[1..] {
                merged.max_doc_id = interval.max_doc_id;
                merged.min_value = merged.min_value.min(interval.min_value);
                merged.max_value = merged.max_value.max(interval.max_value);
                merged.doc_count += interval.doc_count;
            }
            merged
        })
        .collect()
}
