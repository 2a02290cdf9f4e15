//! flowkit: traffic-popularity estimation for classification-structure builders.
//!
//! The crate tracks which flows dominate a traffic trace and answers "how much
//! observed traffic falls inside this key range" so that downstream trie and
//! decision-tree builders can bias their shape toward the hot part of the key
//! space. Data flows strictly forward:
//!
//! ```text
//!   raw flow keys
//!        │ insert
//!        ▼
//!   FrequencyEstimator ──► TopKRetainer ──► frozen snapshot
//!   (decaying counters)    (≤ K flows)          │ build once
//!                                               ▼
//!                               LinearPopularityIndex / PlanarPopularityIndex
//!                                               │ range_sum / total_sum
//!                                               ▼
//!                                     external tree/trie builders
//! ```
//!
//! Everything is single-threaded and batch-oriented: ingest the whole trace,
//! freeze a snapshot, build an index, then query it as often as construction
//! needs. All storage is pre-allocated at construction time and linked by
//! arena slot indices; there is no dynamic growth and no `unsafe`.

pub mod config;
pub mod ds;
pub mod error;
pub mod index;
pub mod key;
pub mod prelude;
pub mod sketch;
pub mod traits;
