//! Range-sum popularity over a single linear key space.

use crate::key::AddrKey;

/// Immutable popularity index over 128-bit addresses.
///
/// Built once from a frozen sketch snapshot; answers inclusive range sums
/// and prefix sums in `O(log N + span)`. Rebuilding from a fresh snapshot is
/// the only update path. Queries that fall entirely outside the observed
/// keys return 0 — no traffic there is a normal outcome, not an error.
///
/// # Example
///
/// ```
/// use flowkit::index::LinearPopularityIndex;
/// use flowkit::key::AddrKey;
///
/// let snapshot = vec![
///     (AddrKey::new(10), 5),
///     (AddrKey::new(20), 3),
///     (AddrKey::new(30), 7),
/// ];
/// let index = LinearPopularityIndex::from_snapshot(&snapshot);
///
/// assert_eq!(index.range_sum(10, 20), 8.0);
/// assert_eq!(index.range_sum(21, 30), 7.0);
/// assert_eq!(index.range_sum(0, u128::MAX), 15.0);
/// assert_eq!(index.range_sum(0, 0), 15.0); // zero-length range = whole space
/// assert_eq!(index.total_sum(), 15.0);
/// ```
#[derive(Debug, Clone)]
pub struct LinearPopularityIndex {
    entries: Vec<(u128, u64)>,
    total: f64,
}

impl LinearPopularityIndex {
    /// Builds the index from a frozen `(key, count)` snapshot.
    pub fn from_snapshot(snapshot: &[(AddrKey, u64)]) -> Self {
        let mut entries: Vec<(u128, u64)> = snapshot
            .iter()
            .map(|&(key, count)| (key.addr(), count))
            .collect();
        entries.sort_unstable_by_key(|&(addr, _)| addr);
        let total = entries.iter().map(|&(_, count)| count as f64).sum();
        Self { entries, total }
    }

    /// Sums counts over the inclusive range `[low, high]`.
    ///
    /// `low == high == 0` denotes the whole space, matching the builders'
    /// "no constraint yet" query; an inverted range sums to 0.
    pub fn range_sum(&self, low: u128, high: u128) -> f64 {
        if low == 0 && high == 0 {
            return self.total;
        }
        self.span_sum(low, high)
    }

    /// Sums counts over the addresses matching `addr`'s first `prefix_len`
    /// bits. Length 0 denotes the whole space.
    pub fn prefix_sum(&self, addr: u128, prefix_len: u8) -> f64 {
        if prefix_len == 0 {
            return self.total;
        }
        let mask = prefix_mask(prefix_len);
        let low = addr & mask;
        self.span_sum(low, low | !mask)
    }

    /// Sum over everything observed.
    pub fn total_sum(&self) -> f64 {
        self.total
    }

    /// Number of distinct keys indexed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Approximate heap + inline footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.entries.capacity() * std::mem::size_of::<(u128, u64)>()
    }

    fn span_sum(&self, low: u128, high: u128) -> f64 {
        if low > high {
            return 0.0;
        }
        let start = self.entries.partition_point(|&(addr, _)| addr < low);
        let end = self.entries.partition_point(|&(addr, _)| addr <= high);
        self.entries[start..end]
            .iter()
            .map(|&(_, count)| count as f64)
            .sum()
    }
}

fn prefix_mask(prefix_len: u8) -> u128 {
    if prefix_len >= 128 {
        u128::MAX
    } else {
        u128::MAX << (128 - prefix_len as u32)
    }
}
