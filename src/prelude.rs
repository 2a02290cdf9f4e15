pub use crate::config::SketchConfig;
pub use crate::ds::{SlotArena, SlotId};
pub use crate::error::ConfigError;
pub use crate::index::{FieldBounds, LinearPopularityIndex, PlanarPopularityIndex};
pub use crate::key::{AddrKey, FieldPairKey};
pub use crate::sketch::{FrequencyEstimator, TopFlowSketch, TopKRetainer};
pub use crate::traits::{MemoryFootprint, PopularityQuery};
