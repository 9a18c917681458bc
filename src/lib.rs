//! # Crocus
//!
//! Columnar index primitives for document search, inspired by Lucene's
//! doc-values machinery.
//!
//! ## Features
//!
//! - Forward-only doc-ID iteration over sorted sets, array- or
//!   bitset-backed
//! - Fixed-width bit packing and delta coding for integer columns
//! - Hierarchical skip indexes that prune range queries interval by
//!   interval
//! - A collector boundary for consuming surviving doc IDs

// Core modules
pub mod compression;
pub mod doc_values;
mod error;
pub mod search;
pub mod segment;
pub mod skip;

// Re-exports for the public API
pub use doc_values::{EncodedNumericValues, NumericDocValues, ValuesIterator};
pub use error::{CrocusError, Result};
pub use search::bitset::{BitSet, FixedBitSet};
pub use search::collector::{
    AverageCollector, Collector, HistogramCollector, LeafCollector, TotalHitCountCollector,
};
pub use search::iterator::{
    ArrayDocIdIterator, BitSetDocIdIterator, DocId, DocIdSetIterator, NO_MORE_DOCS, NOT_STARTED,
};
pub use segment::NumericColumnSegment;
pub use skip::builder::{SkipIndexBuilder, SkipIndexConfig};
pub use skip::index::SkipIndex;
pub use skip::interval::{IntervalDecision, SkipInterval, decide};
pub use skip::search::NumericRangeScanner;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
