//! End-to-end flow tracking: estimator and retainer behind one `insert`.

use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::config::SketchConfig;
use crate::error::ConfigError;
use crate::sketch::estimator::FrequencyEstimator;
use crate::sketch::retainer::TopKRetainer;

/// Streaming Top-K flow sketch.
///
/// Owns one [`FrequencyEstimator`] and one [`TopKRetainer`] and drives them
/// per key occurrence: hash once, look the key up once, let the estimator
/// produce a count signal, and feed that signal back to the retainer. After
/// ingestion, [`snapshot`](Self::snapshot) freezes the retained flows for
/// index construction.
///
/// `K` is any fixed-width byte key; see [`crate::key`] for the shipped ones.
///
/// # Example
///
/// ```
/// use flowkit::key::AddrKey;
/// use flowkit::sketch::TopFlowSketch;
///
/// let mut sketch = TopFlowSketch::try_new(4, 256).unwrap();
///
/// let heavy = AddrKey::new(0xdead);
/// for _ in 0..50 {
///     sketch.insert(&heavy);
/// }
/// sketch.insert(&AddrKey::new(1));
///
/// assert_eq!(sketch.tracked_count(&heavy), Some(50));
/// assert_eq!(sketch.snapshot()[0], (heavy, 50));
/// ```
#[derive(Debug)]
pub struct TopFlowSketch<K> {
    estimator: FrequencyEstimator,
    retainer: TopKRetainer<K>,
    hash_seed: u64,
}

impl<K> TopFlowSketch<K>
where
    K: AsRef<[u8]> + Eq + Clone,
{
    /// Creates a sketch retaining at most `k` flows over a counter table
    /// `columns` cells wide per row, with default tuning.
    pub fn try_new(k: usize, columns: usize) -> Result<Self, ConfigError> {
        Self::try_with_config(k, columns, &SketchConfig::default())
    }

    /// Creates a sketch with explicit tuning.
    pub fn try_with_config(
        k: usize,
        columns: usize,
        config: &SketchConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            estimator: FrequencyEstimator::try_with_config(columns, config)?,
            retainer: TopKRetainer::try_with_config(k, config)?,
            hash_seed: config.hash_seed,
        })
    }

    /// Ingests one occurrence of `key`.
    pub fn insert(&mut self, key: &K) {
        let hash = xxh3_64_with_seed(key.as_ref(), self.hash_seed);
        let found = self.retainer.lookup(key, hash);
        let min_log = self.retainer.min_log_count() as u32;
        let observed = self.estimator.process(hash, found.is_some(), min_log);
        self.retainer.record(found, key, hash, observed);
    }

    /// Ingests a batch of occurrences; returns how many were processed.
    pub fn insert_batch<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
    {
        let mut processed = 0;
        for key in keys {
            self.insert(&key);
            processed += 1;
        }
        processed
    }

    /// Stored peak count for `key`, if currently retained.
    pub fn tracked_count(&self, key: &K) -> Option<u64> {
        let hash = xxh3_64_with_seed(key.as_ref(), self.hash_seed);
        self.retainer.tracked_count(key, hash)
    }

    /// Freezes the retained flows: highest bucket first, head-to-tail within
    /// a bucket. Non-mutating and deterministic between `insert` calls.
    pub fn snapshot(&self) -> Vec<(K, u64)> {
        self.retainer.snapshot()
    }

    /// Number of currently retained flows.
    pub fn len(&self) -> usize {
        self.retainer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retainer.is_empty()
    }

    /// Configured Top-K capacity.
    pub fn k(&self) -> usize {
        self.retainer.capacity()
    }

    /// Configured per-row counter table width.
    pub fn columns(&self) -> usize {
        self.estimator.columns()
    }

    /// Resets both components for a fresh trace.
    pub fn clear(&mut self) {
        self.estimator.clear();
        self.retainer.clear();
    }

    /// Read access to the retention component.
    pub fn retainer(&self) -> &TopKRetainer<K> {
        &self.retainer
    }

    /// Read access to the estimation component.
    pub fn estimator(&self) -> &FrequencyEstimator {
        &self.estimator
    }

    /// Approximate heap + inline footprint in bytes, both components
    /// included.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.estimator.approx_bytes()
            + self.retainer.approx_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::AddrKey;

    #[test]
    fn repeated_key_accumulates_deterministically() {
        let mut sketch = TopFlowSketch::try_new(8, 256).unwrap();
        let key = AddrKey::new(42);
        for _ in 0..30 {
            sketch.insert(&key);
        }
        // A lone key claims its cells on the first pass and counts up from
        // there with no interference.
        assert_eq!(sketch.tracked_count(&key), Some(30));
        assert_eq!(sketch.snapshot(), vec![(key, 30)]);
    }

    #[test]
    fn dominant_flows_outrank_noise() {
        let mut sketch = TopFlowSketch::try_new(4, 512).unwrap();
        let heavy = AddrKey::new(0xaaaa);
        let medium = AddrKey::new(0xbbbb);
        for i in 0..400u128 {
            sketch.insert(&heavy);
            if i % 2 == 0 {
                sketch.insert(&medium);
            }
            sketch.insert(&AddrKey::new(0x1_0000 + i));
        }
        let snap = sketch.snapshot();
        assert_eq!(snap[0].0, heavy);
        assert!(snap.iter().any(|&(k, _)| k == medium));
        assert!(sketch.len() <= 4);
    }

    #[test]
    fn clear_then_reuse() {
        let mut sketch = TopFlowSketch::try_new(4, 256).unwrap();
        let key = AddrKey::new(7);
        for _ in 0..10 {
            sketch.insert(&key);
        }
        sketch.clear();
        assert!(sketch.is_empty());
        for _ in 0..5 {
            sketch.insert(&key);
        }
        assert_eq!(sketch.tracked_count(&key), Some(5));
    }

    #[test]
    fn construction_validates_both_components() {
        assert!(TopFlowSketch::<AddrKey>::try_new(0, 256).is_err());
        assert!(TopFlowSketch::<AddrKey>::try_new(8, 1).is_err());
        assert!(TopFlowSketch::<AddrKey>::try_new(8, 256).is_ok());
    }

    #[test]
    fn accounting_covers_both_components() {
        let sketch = TopFlowSketch::<AddrKey>::try_new(8, 256).unwrap();
        assert!(sketch.approx_bytes() > sketch.estimator().approx_bytes());
        assert!(sketch.approx_bytes() > sketch.retainer().approx_bytes());
    }
}
