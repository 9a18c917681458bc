//! Skip indexes: hierarchical min/max summaries for range pruning.
//!
//! A skip index summarizes a numeric column per doc-ID interval so a
//! range query can decide, interval by interval, whether to skip,
//! bulk-accept, or individually scan. The first two outcomes need no
//! per-doc value reads at all.

pub mod builder;
pub mod index;
pub mod interval;
pub mod search;
