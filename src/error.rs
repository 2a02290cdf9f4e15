//! Error types for the flowkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when construction parameters are invalid
//!   (e.g. zero Top-K capacity, a counter table too narrow for its row
//!   moduli, a non-exponential decay base).
//!
//! Internal consistency violations are deliberately **not** represented as an
//! error type. A minimum bucket that reports a live head it does not have, a
//! free-slot pool that runs dry under correct bookkeeping, or a decay
//! probability that overflows all indicate a corrupted structure or a bug in
//! chain maintenance, never a recoverable runtime condition; those paths
//! panic with a message naming the violated invariant.
//!
//! ## Example Usage
//!
//! ```
//! use flowkit::error::ConfigError;
//! use flowkit::key::AddrKey;
//! use flowkit::sketch::TopFlowSketch;
//!
//! // Fallible constructor for user-configurable parameters
//! let sketch: Result<TopFlowSketch<AddrKey>, ConfigError> =
//!     TopFlowSketch::try_new(32, 1024);
//! assert!(sketch.is_ok());
//!
//! // Zero capacity is caught without panicking
//! let bad = TopFlowSketch::<AddrKey>::try_new(0, 1024);
//! assert!(bad.is_err());
//! ```

use std::fmt;

/// Error returned when construction parameters are invalid.
///
/// Produced by the `try_*` constructors on
/// [`TopFlowSketch`](crate::sketch::TopFlowSketch),
/// [`FrequencyEstimator`](crate::sketch::FrequencyEstimator) and
/// [`TopKRetainer`](crate::sketch::TopKRetainer), and by
/// [`SketchConfig::validate`](crate::config::SketchConfig::validate).
/// Carries a human-readable description of which parameter failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}
