//! Immutable skip indexes.

use crate::error::{CrocusError, Result};
use crate::search::iterator::DocId;
use crate::skip::interval::SkipInterval;

/// An ordered set of summary levels over one column.
///
/// Level 0 is finest; every level's intervals partition `[0, max_doc)`
/// without gaps or overlap. Built once at write time and immutable
/// thereafter, so it can be shared across concurrent readers without
/// locking.
#[derive(Debug, Clone)]
pub struct SkipIndex {
    levels: Vec<Vec<SkipInterval>>,
    max_doc: DocId,
}

impl SkipIndex {
    /// Assemble an index from per-level intervals, level 0 first.
    ///
    /// Each level must partition `[0, max_doc)` exactly; violations are
    /// reported as index errors so hand-built partitions fail loudly.
    pub fn from_levels(levels: Vec<Vec<SkipInterval>>, max_doc: DocId) -> Result<Self> {
        if levels.is_empty() {
            return Err(CrocusError::index("a skip index needs at least one level"));
        }

        for (level, intervals) in levels.iter().enumerate() {
            validate_partition(level, intervals, max_doc)?;
        }
        for (level, pair) in levels.windows(2).enumerate() {
            validate_alignment(level, &pair[0], &pair[1])?;
        }

        Ok(SkipIndex { levels, max_doc })
    }

    /// Number of levels; at least one.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Index of the coarsest level.
    pub fn top_level(&self) -> usize {
        self.levels.len() - 1
    }

    /// Number of docs covered, present or not.
    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    /// The intervals of one level, finest first, or `None` for an
    /// unknown level.
    pub fn level_intervals(&self, level: usize) -> Option<&[SkipInterval]> {
        self.levels.get(level).map(|intervals| intervals.as_slice())
    }

    /// The interval containing `doc_id` at `level`.
    pub fn interval_at(&self, level: usize, doc_id: DocId) -> Result<&SkipInterval> {
        let intervals = self.levels.get(level).ok_or_else(|| {
            CrocusError::index(format!(
                "level {level} does not exist; the index has {} levels",
                self.levels.len()
            ))
        })?;

        // Levels are validated partitions, so the first interval whose
        // end is not before doc_id either contains it or doc_id is out
        // of range.
        let pos = intervals.partition_point(|interval| interval.max_doc_id < doc_id);
        intervals
            .get(pos)
            .filter(|interval| interval.min_doc_id <= doc_id)
            .ok_or_else(|| {
                CrocusError::index(format!(
                    "no interval at level {level} covers doc {doc_id}"
                ))
            })
    }
}

fn validate_partition(level: usize, intervals: &[SkipInterval], max_doc: DocId) -> Result<()> {
    if max_doc == 0 {
        if intervals.is_empty() {
            return Ok(());
        }
        return Err(CrocusError::index(format!(
            "level {level} has intervals but the index covers no docs"
        )));
    }

    if intervals.is_empty() {
        return Err(CrocusError::index(format!(
            "level {level} is empty but the index covers {max_doc} docs"
        )));
    }

    let mut expected_start: DocId = 0;
    for interval in intervals {
        if interval.min_doc_id != expected_start {
            return Err(CrocusError::index(format!(
                "level {level} has a gap or overlap at doc {}; expected {expected_start}",
                interval.min_doc_id
            )));
        }
        if interval.max_doc_id < interval.min_doc_id {
            return Err(CrocusError::index(format!(
                "level {level} interval [{}, {}] is inverted",
                interval.min_doc_id, interval.max_doc_id
            )));
        }
        if interval.max_doc_id >= max_doc {
            return Err(CrocusError::index(format!(
                "level {level} interval ends at doc {} beyond the index's {max_doc} docs",
                interval.max_doc_id
            )));
        }
        expected_start = interval.max_doc_id + 1;
    }

    if expected_start != max_doc {
        return Err(CrocusError::index(format!(
            "level {level} covers [0, {expected_start}) but the index covers [0, {max_doc})"
        )));
    }

    Ok(())
}

/// Every interval of the coarser level must cover whole intervals of
/// the finer one; the scanner's top-down descent depends on it.
fn validate_alignment(
    level: usize,
    finer: &[SkipInterval],
    coarser: &[SkipInterval],
) -> Result<()> {
    let mut i = 0;
    for coarse in coarser {
        let aligned_start = finer
            .get(i)
            .is_some_and(|fine| fine.min_doc_id == coarse.min_doc_id);

        let mut aligned_end = false;
        if aligned_start {
            while let Some(fine) = finer.get(i) {
                if fine.max_doc_id > coarse.max_doc_id {
                    break;
                }
                i += 1;
                if fine.max_doc_id == coarse.max_doc_id {
                    aligned_end = true;
                    break;
                }
            }
        }

        if !aligned_start || !aligned_end {
            return Err(CrocusError::index(format!(
                "level {} interval [{}, {}] does not align with level {level} boundaries",
                level + 1,
                coarse.min_doc_id,
                coarse.max_doc_id
            )));
        }
    }
    Ok(())
}
