//! Seams between the popularity core and its consumers.
//!
//! ```text
//!   external tree/trie builders           experiment harness
//!             │                                   │
//!             ▼                                   ▼
//!    ┌─────────────────────┐          ┌──────────────────────┐
//!    │ PopularityQuery     │          │ MemoryFootprint      │
//!    │                     │          │                      │
//!    │ range_sum(&Range)   │          │ approx_bytes()       │
//!    │ total_sum()         │          │                      │
//!    └─────────┬───────────┘          └─────────┬────────────┘
//!              │                                │
//!      LinearPopularityIndex          FrequencyEstimator
//!      PlanarPopularityIndex          TopKRetainer / TopFlowSketch
//!                                     both indexes
//! ```
//!
//! Builders call `range_sum` once per candidate split or stride decision
//! while constructing a classification structure; the call is referentially
//! transparent and safe to repeat arbitrarily often against the same frozen
//! index. `MemoryFootprint` feeds footprint reporting in the surrounding
//! measurement harness and carries no correctness weight.

use crate::index::linear::LinearPopularityIndex;
use crate::index::planar::{FieldBounds, PlanarPopularityIndex};
use crate::sketch::estimator::FrequencyEstimator;
use crate::sketch::retainer::TopKRetainer;
use crate::sketch::top_flows::TopFlowSketch;

/// Range-sum popularity queries against a frozen index.
///
/// `Range` is the index's native range descriptor: an inclusive
/// `(low, high)` address pair for the linear index, a [`FieldBounds`] box
/// for the planar one.
pub trait PopularityQuery {
    type Range;

    /// Sum of observed counts inside `range`.
    fn range_sum(&self, range: &Self::Range) -> f64;

    /// Sum of all observed counts (the whole key space).
    fn total_sum(&self) -> f64;
}

impl PopularityQuery for LinearPopularityIndex {
    type Range = (u128, u128);

    fn range_sum(&self, &(low, high): &Self::Range) -> f64 {
        LinearPopularityIndex::range_sum(self, low, high)
    }

    fn total_sum(&self) -> f64 {
        LinearPopularityIndex::total_sum(self)
    }
}

impl PopularityQuery for PlanarPopularityIndex {
    type Range = FieldBounds;

    fn range_sum(&self, range: &Self::Range) -> f64 {
        PlanarPopularityIndex::range_sum(self, range)
    }

    fn total_sum(&self) -> f64 {
        PlanarPopularityIndex::total_sum(self)
    }
}

/// Per-component byte accounting for footprint reporting.
pub trait MemoryFootprint {
    /// Approximate heap + inline footprint in bytes.
    fn approx_bytes(&self) -> usize;
}

impl MemoryFootprint for FrequencyEstimator {
    fn approx_bytes(&self) -> usize {
        FrequencyEstimator::approx_bytes(self)
    }
}

impl<K> MemoryFootprint for TopKRetainer<K>
where
    K: Eq + Clone,
{
    fn approx_bytes(&self) -> usize {
        TopKRetainer::approx_bytes(self)
    }
}

impl<K> MemoryFootprint for TopFlowSketch<K>
where
    K: AsRef<[u8]> + Eq + Clone,
{
    fn approx_bytes(&self) -> usize {
        TopFlowSketch::approx_bytes(self)
    }
}

impl MemoryFootprint for LinearPopularityIndex {
    fn approx_bytes(&self) -> usize {
        LinearPopularityIndex::approx_bytes(self)
    }
}

impl MemoryFootprint for PlanarPopularityIndex {
    fn approx_bytes(&self) -> usize {
        PlanarPopularityIndex::approx_bytes(self)
    }
}
