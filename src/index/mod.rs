//! Popularity indexes built once from a frozen sketch snapshot.
//!
//! Both variants are read-only after construction and are consumed by
//! external tree/trie builders during structure construction only — never on
//! the lookup hot path. The builders' contract is the
//! [`PopularityQuery`](crate::traits::PopularityQuery) trait.

pub mod linear;
pub mod planar;

pub use linear::LinearPopularityIndex;
pub use planar::{FieldBounds, PlanarPopularityIndex};
