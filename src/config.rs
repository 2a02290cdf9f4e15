//! Sketch tuning parameters.
//!
//! `K` (retained flow capacity) and `columns` (counter table width) are the
//! two knobs callers actually size deployments with, and stay constructor
//! parameters. Everything else that differed between historical deployments
//! of this scheme — decay base, tracked-flow hash table size, the admission
//! log offset, the hash seed — is collected here so one implementation covers
//! all of them.

use crate::error::ConfigError;

/// Default counter decay base; tuned so that large counters are
/// exponentially harder to evict than small ones.
pub const DEFAULT_DECAY_BASE: f64 = 1.08;

/// Default number of low hash bits addressing the tracked-flow hash table
/// (table size `2^hash_bits`).
pub const DEFAULT_HASH_BITS: u32 = 12;

/// Default seed for the 64-bit flow-key hash and the decay RNG.
pub const DEFAULT_HASH_SEED: u64 = 1005;

/// Tunables shared by [`FrequencyEstimator`](crate::sketch::FrequencyEstimator)
/// and [`TopKRetainer`](crate::sketch::TopKRetainer).
///
/// # Example
///
/// ```
/// use flowkit::config::SketchConfig;
///
/// let config = SketchConfig::default();
/// assert!(config.validate().is_ok());
///
/// let bad = SketchConfig {
///     decay_base: 0.5,
///     ..SketchConfig::default()
/// };
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchConfig {
    /// Base `b` of the decay probability `1 / b^count`. Must be finite and
    /// greater than 1.
    pub decay_base: f64,
    /// Number of low hash bits selecting a tracked-flow hash slot.
    pub hash_bits: u32,
    /// Offset added to an observed count before taking `floor(log2)` for
    /// bucket placement. 0 for address traces; classifier deployments
    /// historically used 1.
    pub log_offset: u64,
    /// Seed for flow-key hashing and the decay RNG. Runs with the same seed
    /// and the same input stream behave identically.
    pub hash_seed: u64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            decay_base: DEFAULT_DECAY_BASE,
            hash_bits: DEFAULT_HASH_BITS,
            log_offset: 0,
            hash_seed: DEFAULT_HASH_SEED,
        }
    }
}

impl SketchConfig {
    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.decay_base.is_finite() || self.decay_base <= 1.0 {
            return Err(ConfigError::new(format!(
                "decay_base must be finite and > 1.0, got {}",
                self.decay_base
            )));
        }
        if self.hash_bits == 0 || self.hash_bits > 24 {
            return Err(ConfigError::new(format!(
                "hash_bits must be in 1..=24, got {}",
                self.hash_bits
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SketchConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_exponential_decay_base() {
        for base in [1.0, 0.9, f64::NAN, f64::INFINITY] {
            let config = SketchConfig {
                decay_base: base,
                ..SketchConfig::default()
            };
            assert!(config.validate().is_err(), "base {base} should be rejected");
        }
    }

    #[test]
    fn rejects_degenerate_hash_bits() {
        for bits in [0, 25, 64] {
            let config = SketchConfig {
                hash_bits: bits,
                ..SketchConfig::default()
            };
            assert!(config.validate().is_err(), "bits {bits} should be rejected");
        }
    }

    #[test]
    fn log_offset_is_free_form() {
        let config = SketchConfig {
            log_offset: 1,
            ..SketchConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
