//! Decay-based frequency estimation over a fixed counter table.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                     FrequencyEstimator                           │
//!   │                                                                  │
//!   │   row 0  (modulus = columns - 1):                                │
//!   │   ┌──────────┬──────────┬──────────┬─────┬──────────┐            │
//!   │   │ count/fp │ count/fp │ count/fp │ ... │ count/fp │            │
//!   │   └──────────┴──────────┴──────────┴─────┴──────────┘            │
//!   │   row 1  (modulus = columns + 1):                                │
//!   │   ┌──────────┬──────────┬──────────┬─────┬──────────┐            │
//!   │   │ count/fp │ count/fp │ count/fp │ ... │ count/fp │            │
//!   │   └──────────┴──────────┴──────────┴─────┴──────────┘            │
//!   │                                                                  │
//!   │   process(hash):                                                 │
//!   │     fingerprint = top 8 bits of hash                             │
//!   │     per row: cell = row[hash % row_modulus]                      │
//!   │       match    → increment (growth-capped for untracked keys)    │
//!   │       mismatch → decay resident count w.p. 1 / base^count;       │
//!   │                  claim the cell when it reaches zero             │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two rows use distinct moduli close to `columns`, so a key rarely
//! aliases to the same cell in both rows. Decay probability shrinks
//! exponentially with the resident count: heavy flows are nearly impossible
//! to dislodge while one-off flows are flushed quickly, which is what bounds
//! the estimate error on the heavy tail.
//!
//! Memory is `rows × (columns + slack)` cells regardless of how many
//! distinct keys the stream contains.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SketchConfig;
use crate::error::ConfigError;

/// Number of independent counter rows.
pub const ESTIMATOR_ROWS: usize = 2;

/// Extra cells allocated per row beyond `columns`, covering the largest row
/// modulus.
pub const COLUMN_SLACK: usize = 10;

/// Bit shift extracting the 8-bit fingerprint from a 64-bit hash.
const FINGERPRINT_SHIFT: u32 = 56;

#[derive(Debug, Clone, Copy, Default)]
struct CounterCell {
    count: u32,
    fingerprint: u8,
}

/// Bounded-memory approximate frequency counter with probabilistic decay.
///
/// `process` consumes one pre-hashed key occurrence and reports the largest
/// counter value this occurrence produced across rows, or 0 when the
/// occurrence left no visible trace for this key. The caller feeds that
/// signal to a [`TopKRetainer`](crate::sketch::TopKRetainer).
///
/// # Example
///
/// ```
/// use flowkit::sketch::FrequencyEstimator;
///
/// let mut estimator = FrequencyEstimator::try_new(64).unwrap();
///
/// // A fresh key claims its cells and counts up from 1
/// assert_eq!(estimator.process(42, false, 8), 1);
/// assert_eq!(estimator.process(42, false, 8), 2);
/// ```
#[derive(Debug)]
pub struct FrequencyEstimator {
    columns: usize,
    decay_base: f64,
    row_modulus: [u64; ESTIMATOR_ROWS],
    cells: Vec<CounterCell>,
    rng: StdRng,
}

impl FrequencyEstimator {
    /// Creates an estimator with `columns` cells per row (plus slack) and
    /// default tuning.
    pub fn try_new(columns: usize) -> Result<Self, ConfigError> {
        Self::try_with_config(columns, &SketchConfig::default())
    }

    /// Creates an estimator with explicit tuning.
    ///
    /// Fails if `columns` is too narrow to give every row a positive
    /// modulus, or if the config itself is invalid.
    pub fn try_with_config(columns: usize, config: &SketchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut row_modulus = [0u64; ESTIMATOR_ROWS];
        for (row, modulus) in row_modulus.iter_mut().enumerate() {
            // Distinct per-row moduli near `columns`; see module docs.
            let value = (columns + 2 * row + 3)
                .checked_sub(2 * ESTIMATOR_ROWS)
                .unwrap_or(0);
            if value == 0 {
                return Err(ConfigError::new(format!(
                    "columns = {columns} leaves row {row} without a positive modulus"
                )));
            }
            *modulus = value as u64;
        }
        Ok(Self {
            columns,
            decay_base: config.decay_base,
            row_modulus,
            cells: vec![CounterCell::default(); ESTIMATOR_ROWS * (columns + COLUMN_SLACK)],
            rng: StdRng::seed_from_u64(config.hash_seed),
        })
    }

    /// Per-row table width this estimator was sized for.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Processes one occurrence of the key behind `hash`.
    ///
    /// `is_tracked` says whether the retainer currently holds this key;
    /// untracked keys stop incrementing a matching cell once its count
    /// exceeds `2^(min_log_count + 1)`, so flows that will never make the
    /// Top-K cut cannot grow counters without bound.
    ///
    /// Returns the largest counter value this call produced for the key
    /// across rows, or 0 if no row matched or claimed a cell.
    ///
    /// # Panics
    ///
    /// Panics if a decay probability overflows (`base^count` non-finite),
    /// which means a counter grew implausibly large for the configured
    /// table — a sizing bug, not a runtime condition.
    pub fn process(&mut self, hash: u64, is_tracked: bool, min_log_count: u32) -> u64 {
        let fingerprint = (hash >> FINGERPRINT_SHIFT) as u8;
        let stride = self.columns + COLUMN_SLACK;
        let growth_cap = 1u64
            .checked_shl(min_log_count + 1)
            .unwrap_or(u64::MAX);

        let mut observed_max = 0u64;
        for row in 0..ESTIMATOR_ROWS {
            let index = row * stride + (hash % self.row_modulus[row]) as usize;
            let cell = &mut self.cells[index];

            if cell.fingerprint == fingerprint {
                if is_tracked || u64::from(cell.count) <= growth_cap {
                    cell.count += 1;
                }
                observed_max = observed_max.max(u64::from(cell.count));
            } else {
                let denominator = self.decay_base.powi(cell.count as i32);
                if !denominator.is_finite() || denominator < 1.0 {
                    panic!(
                        "decay probability overflowed (base {}, count {}): \
                         counter grew implausibly large for this table",
                        self.decay_base, cell.count
                    );
                }
                if self.rng.gen_range(0..denominator as u64) == 0 {
                    cell.count = cell.count.saturating_sub(1);
                    if cell.count == 0 {
                        cell.fingerprint = fingerprint;
                        cell.count = 1;
                        observed_max = observed_max.max(1);
                    }
                }
            }
        }
        observed_max
    }

    /// Resets every counter cell. The RNG stream is left where it is.
    pub fn clear(&mut self) {
        self.cells.fill(CounterCell::default());
    }

    /// Approximate heap + inline footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.cells.capacity() * std::mem::size_of::<CounterCell>()
    }
}
