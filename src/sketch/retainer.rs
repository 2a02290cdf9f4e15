//! Bounded Top-K flow retention with O(1) bucketed eviction.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                          TopKRetainer<K>                               │
//! │                                                                        │
//! │   nodes: SlotArena<FlowNode<K>>          hash_heads: Vec<Option<Slot>> │
//! │   ┌──────┬─────────────────────────┐     ┌───────┬─────────┐           │
//! │   │ Slot │ FlowNode                │     │ slot  │ head    │           │
//! │   ├──────┼─────────────────────────┤     ├───────┼─────────┤           │
//! │   │ id_0 │ log:3 raw:9  prev/next  │◄────┤ 0x6b2 │ id_0    │           │
//! │   │ id_1 │ log:0 raw:1  prev/next  │◄────┤ 0x11f │ id_1 ───┼─► id_4    │
//! │   │ id_4 │ log:3 raw:12 prev/next  │     └───────┴─────────┘           │
//! │   └──────┴─────────────────────────┘      (chains via hash_next)       │
//! │                                                                        │
//! │   buckets: one head per log-scaled count, occupied buckets doubly      │
//! │   linked in ascending order; bucket 0 is the permanent sentinel        │
//! │                                                                        │
//! │     [0] ──right──► [3] ──right──► [7] ──right──► 0                     │
//! │      │              │              │                                   │
//! │     id_1        id_4 ◄─► id_0     id_9                                 │
//! │                                                                        │
//! │   minimum = bucket 0 if occupied, else sentinel's right neighbor       │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation         | Time        | Notes                                 |
//! |-------------------|-------------|---------------------------------------|
//! | `observe`         | O(1) am.    | admit / promote / ignore one signal   |
//! | `pop_min`         | O(1)        | evict head of the minimum bucket      |
//! | `min_log_count`   | O(1)        | sentinel + right-neighbor lookup      |
//! | `snapshot`        | O(K + logs) | highest bucket → lowest, head → tail  |
//!
//! Every relationship is an arena slot index or a bucket index; a node is
//! always reachable both through its bucket list and through the hash chain
//! of its key's slot, and every mutation maintains the two in lockstep.
//!
//! Newly occupied buckets splice into the chain by scanning backward through
//! at most [`BUCKET_SCAN_LIMIT`] lower buckets for an occupied predecessor,
//! falling back to the caller-known predecessor (the sentinel on admission).
//! The bound makes the splice O(1) at the cost of being an approximation:
//! a count jump past more than `BUCKET_SCAN_LIMIT` consecutive empty buckets
//! can splice out of order. Single-step counter growth keeps log counts
//! moving one bucket at a time, so such jumps require a fingerprint-collision
//! artifact in the estimator; `debug_validate_invariants` checks ordering in
//! debug builds.

use crate::config::SketchConfig;
use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::ConfigError;

/// Highest representable log-scaled count (`floor(log2(u64))` fits below it).
pub const MAX_LOG_COUNT: usize = 64;

/// Extra bucket heads allocated beyond [`MAX_LOG_COUNT`].
const BUCKET_SLACK: usize = 10;

/// Extra arena slots allocated beyond `k`.
const NODE_SLACK: usize = 10;

/// How many lower buckets a newly occupied bucket scans when splicing into
/// the ascending chain.
pub const BUCKET_SCAN_LIMIT: usize = 10;

#[derive(Debug)]
struct FlowNode<K> {
    // Hot fields, touched on every relink
    prev: Option<SlotId>,
    next: Option<SlotId>,
    hash_next: Option<SlotId>,
    hash_slot: usize,
    log_count: usize,
    raw_count: u64,
    key: K,
}

/// One head per possible log count. `left`/`right` are bucket indices with 0
/// doubling as the chain terminator; bucket 0 itself is always part of the
/// chain, anchoring the minimum search even when empty.
#[derive(Debug, Clone, Copy, Default)]
struct BucketHead {
    head: Option<SlotId>,
    left: usize,
    right: usize,
}

/// Capacity-K retention of the heaviest flows, ranked by log-scaled count.
///
/// The retainer decides, per observed signal, whether a flow is worth
/// tracking: always while below capacity, and afterwards only when the flow
/// has just crossed one bucket above the current global minimum. At capacity
/// an admission first evicts the minimum, so `len() <= k` holds after every
/// call and the structure holds exactly `k` flows once warm.
///
/// # Example
///
/// ```
/// use flowkit::sketch::TopKRetainer;
///
/// let mut retainer: TopKRetainer<&str> = TopKRetainer::try_new(2).unwrap();
///
/// retainer.observe(&"a", 0x11, 4); // below capacity: admitted (log 2)
/// retainer.observe(&"b", 0x22, 1); // below capacity: admitted (log 0)
///
/// // At capacity: "c" crosses one bucket above the minimum, so it is
/// // admitted and the minimum ("b") is evicted first.
/// retainer.observe(&"c", 0x33, 2);
///
/// assert_eq!(retainer.len(), 2);
/// assert_eq!(retainer.tracked_count(&"a", 0x11), Some(4));
/// assert_eq!(retainer.tracked_count(&"b", 0x22), None);
/// assert_eq!(retainer.snapshot(), vec![("a", 4), ("c", 2)]);
/// ```
#[derive(Debug)]
pub struct TopKRetainer<K> {
    k: usize,
    log_offset: u64,
    hash_mask: u64,
    nodes: SlotArena<FlowNode<K>>,
    buckets: Vec<BucketHead>,
    hash_heads: Vec<Option<SlotId>>,
}

impl<K> TopKRetainer<K>
where
    K: Eq + Clone,
{
    /// Creates a retainer holding at most `k` flows, with default tuning.
    pub fn try_new(k: usize) -> Result<Self, ConfigError> {
        Self::try_with_config(k, &SketchConfig::default())
    }

    /// Creates a retainer with explicit tuning.
    pub fn try_with_config(k: usize, config: &SketchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if k == 0 {
            return Err(ConfigError::new("k must be > 0"));
        }
        Ok(Self {
            k,
            log_offset: config.log_offset,
            hash_mask: (1u64 << config.hash_bits) - 1,
            nodes: SlotArena::with_capacity(k + NODE_SLACK),
            buckets: vec![BucketHead::default(); MAX_LOG_COUNT + BUCKET_SLACK],
            hash_heads: vec![None; 1usize << config.hash_bits],
        })
    }

    /// Number of currently tracked flows.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Configured capacity `k`.
    pub fn capacity(&self) -> usize {
        self.k
    }

    /// Smallest log-scaled count among tracked flows.
    ///
    /// 0 when bucket 0 is occupied — and also when nothing is tracked at
    /// all, which is harmless: below capacity the admission test never
    /// consults it.
    pub fn min_log_count(&self) -> usize {
        if self.buckets[0].head.is_some() {
            0
        } else {
            self.buckets[0].right
        }
    }

    /// Feeds one estimator signal for `key`.
    ///
    /// A zero `observed_max` is a no-op (the estimator saw nothing for this
    /// occurrence). Otherwise the flow is admitted when below capacity or
    /// when its log count has just crossed one bucket above the current
    /// minimum; an already-tracked flow is promoted when the signal exceeds
    /// its stored peak, relinking buckets if the log count changed.
    pub fn observe(&mut self, key: &K, hash: u64, observed_max: u64) {
        let found = self.lookup(key, hash);
        self.record(found, key, hash, observed_max);
    }

    /// `observe` with the hash-chain lookup already done, so a caller that
    /// needed the lookup for other reasons does not walk the chain twice.
    pub(crate) fn record(
        &mut self,
        found: Option<SlotId>,
        key: &K,
        hash: u64,
        observed_max: u64,
    ) {
        if observed_max == 0 {
            return;
        }
        let log = self.log_bucket(observed_max);
        match found {
            None => {
                if self.nodes.len() < self.k || log == self.min_log_count() + 1 {
                    self.admit(key.clone(), hash, log, observed_max);
                }
            }
            Some(id) => {
                let raw = self
                    .nodes
                    .get(id)
                    .expect("tracked flow vanished from arena")
                    .raw_count;
                if observed_max > raw {
                    self.promote(id, log, observed_max);
                }
            }
        }
    }

    /// Finds the tracked node for `key`, if any.
    pub(crate) fn lookup(&self, key: &K, hash: u64) -> Option<SlotId> {
        let mut cursor = self.hash_heads[self.hash_slot(hash)];
        while let Some(id) = cursor {
            let node = self.nodes.get(id).expect("hash chain references a free slot");
            if node.key == *key {
                return Some(id);
            }
            cursor = node.hash_next;
        }
        None
    }

    /// Stored peak count for `key`, if tracked.
    pub fn tracked_count(&self, key: &K, hash: u64) -> Option<u64> {
        let id = self.lookup(key, hash)?;
        self.nodes.get(id).map(|node| node.raw_count)
    }

    /// Removes and returns the flow at the head of the minimum bucket.
    ///
    /// Returns `None` when nothing is tracked.
    ///
    /// # Panics
    ///
    /// Panics if the chain reports a minimum bucket whose head is null —
    /// a bucket-maintenance bug, not a runtime condition.
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        if self.nodes.is_empty() {
            return None;
        }
        let min = self.min_log_count();
        let id = self.buckets[min]
            .head
            .expect("minimum bucket reports no live head");
        self.cut_node(id);
        self.unchain_hash(id);
        let node = self
            .nodes
            .remove(id)
            .expect("evicted flow missing from arena");
        Some((node.key, node.raw_count))
    }

    /// Emits every tracked flow, highest bucket first and head-to-tail
    /// within a bucket. Does not mutate; two calls with no intervening
    /// `observe` return identical sequences.
    pub fn snapshot(&self) -> Vec<(K, u64)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for log in (0..self.buckets.len()).rev() {
            let mut cursor = self.buckets[log].head;
            while let Some(id) = cursor {
                let node = self.nodes.get(id).expect("bucket list references a free slot");
                out.push((node.key.clone(), node.raw_count));
                cursor = node.next;
            }
        }
        out
    }

    /// Forgets every tracked flow, restoring the freshly built state.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets.fill(BucketHead::default());
        self.hash_heads.fill(None);
    }

    /// Approximate heap + inline footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.nodes.approx_bytes()
            + self.buckets.capacity() * std::mem::size_of::<BucketHead>()
            + self.hash_heads.capacity() * std::mem::size_of::<Option<SlotId>>()
    }

    fn log_bucket(&self, observed_max: u64) -> usize {
        (observed_max + self.log_offset).ilog2() as usize
    }

    fn hash_slot(&self, hash: u64) -> usize {
        (hash & self.hash_mask) as usize
    }

    fn admit(&mut self, key: K, hash: u64, log: usize, raw: u64) {
        while self.nodes.len() >= self.k {
            self.pop_min()
                .expect("eviction required but nothing is tracked");
        }
        let slot = self.hash_slot(hash);
        let id = self.nodes.insert(FlowNode {
            prev: None,
            next: None,
            hash_next: self.hash_heads[slot],
            hash_slot: slot,
            log_count: log,
            raw_count: raw,
            key,
        });
        self.hash_heads[slot] = Some(id);
        self.link_node(0, id);
    }

    fn promote(&mut self, id: SlotId, new_log: usize, new_raw: u64) {
        let old_log = self
            .nodes
            .get(id)
            .expect("promoted flow missing from arena")
            .log_count;
        if old_log == new_log {
            if let Some(node) = self.nodes.get_mut(id) {
                node.raw_count = new_raw;
            }
            return;
        }

        // The sentinel's own `left` field is scribble from chain splices;
        // the sentinel itself is always a valid predecessor.
        let mut predecessor = if old_log == 0 {
            0
        } else {
            self.buckets[old_log].left
        };
        self.cut_node(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.log_count = new_log;
            node.raw_count = new_raw;
        }
        // The old bucket, if still occupied, is a closer known predecessor
        // than its left neighbor.
        if self.buckets[old_log].head.is_some() {
            predecessor = old_log;
        }
        self.link_node(predecessor, id);
    }

    /// Pushes `id` onto its bucket's list, splicing the bucket into the
    /// ascending chain if it was empty. `fallback_predecessor` is the
    /// caller's best-known occupied bucket below the target, used when the
    /// bounded backward scan finds nothing.
    fn link_node(&mut self, fallback_predecessor: usize, id: SlotId) {
        let log = self
            .nodes
            .get(id)
            .expect("linked flow missing from arena")
            .log_count;

        let was_empty = self.buckets[log].head.is_none();
        let old_head = self.buckets[log].head;
        if let Some(node) = self.nodes.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(head) = old_head {
            self.nodes
                .get_mut(head)
                .expect("bucket head missing from arena")
                .prev = Some(id);
        }
        self.buckets[log].head = Some(id);

        // Bucket 0 is the sentinel and never leaves the chain.
        if log == 0 || !was_empty {
            return;
        }
        let stop = log.saturating_sub(BUCKET_SCAN_LIMIT);
        let mut candidate = log - 1;
        while candidate > 0 && candidate > stop {
            if self.buckets[candidate].head.is_some() {
                self.link_bucket(candidate, log);
                return;
            }
            candidate -= 1;
        }
        self.link_bucket(fallback_predecessor, log);
    }

    /// Unlinks `id` from its bucket's list, removing the bucket from the
    /// chain if it became empty.
    fn cut_node(&mut self, id: SlotId) {
        let (log, prev, next) = {
            let node = self.nodes.get(id).expect("cut flow missing from arena");
            (node.log_count, node.prev, node.next)
        };

        if self.buckets[log].head == Some(id) {
            self.buckets[log].head = next;
            match next {
                None => {
                    if log != 0 {
                        self.cut_bucket(log);
                    }
                }
                Some(new_head) => {
                    self.nodes
                        .get_mut(new_head)
                        .expect("bucket head missing from arena")
                        .prev = None;
                }
            }
        } else {
            let prev = prev.expect("interior bucket node without predecessor");
            self.nodes
                .get_mut(prev)
                .expect("bucket predecessor missing from arena")
                .next = next;
            if let Some(next) = next {
                self.nodes
                    .get_mut(next)
                    .expect("bucket successor missing from arena")
                    .prev = Some(prev);
            }
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }

    /// Splices bucket `current` into the chain immediately after `pre`.
    fn link_bucket(&mut self, pre: usize, current: usize) {
        let pre_right = self.buckets[pre].right;
        self.buckets[current].left = pre;
        self.buckets[current].right = pre_right;
        self.buckets[pre].right = current;
        self.buckets[pre_right].left = current;
    }

    fn cut_bucket(&mut self, current: usize) {
        let left = self.buckets[current].left;
        let right = self.buckets[current].right;
        self.buckets[left].right = right;
        self.buckets[right].left = left;
    }

    fn unchain_hash(&mut self, id: SlotId) {
        let (slot, hash_next) = {
            let node = self.nodes.get(id).expect("unchained flow missing from arena");
            (node.hash_slot, node.hash_next)
        };
        if self.hash_heads[slot] == Some(id) {
            self.hash_heads[slot] = hash_next;
            return;
        }
        let mut cursor = self.hash_heads[slot];
        while let Some(current) = cursor {
            let next = self
                .nodes
                .get(current)
                .expect("hash chain references a free slot")
                .hash_next;
            if next == Some(id) {
                self.nodes
                    .get_mut(current)
                    .expect("hash chain references a free slot")
                    .hash_next = hash_next;
                return;
            }
            cursor = next;
        }
        panic!("evicted flow was not on its hash chain");
    }

    #[cfg(any(test, debug_assertions))]
    /// Asserts every structural invariant: bucket lists agree with the
    /// arena, the chain from the sentinel is strictly ascending and covers
    /// exactly the occupied buckets, and every live node sits on the hash
    /// chain of its slot. Ordering holds whenever log counts move at most
    /// [`BUCKET_SCAN_LIMIT`] buckets past an empty run at a time.
    pub fn debug_validate_invariants(&self) {
        let mut via_buckets = 0usize;
        for log in 0..self.buckets.len() {
            let mut prev: Option<SlotId> = None;
            let mut cursor = self.buckets[log].head;
            while let Some(id) = cursor {
                let node = self.nodes.get(id).expect("bucket list references a free slot");
                assert_eq!(node.log_count, log, "node linked into the wrong bucket");
                assert_eq!(node.prev, prev, "intra-bucket prev link broken");
                via_buckets += 1;
                prev = Some(id);
                cursor = node.next;
            }
        }
        assert_eq!(
            via_buckets,
            self.nodes.len(),
            "bucket lists disagree with arena occupancy"
        );

        let occupied: Vec<usize> = (1..self.buckets.len())
            .filter(|&log| self.buckets[log].head.is_some())
            .collect();
        let mut walked = Vec::new();
        let mut last = 0usize;
        let mut cursor = self.buckets[0].right;
        while cursor != 0 {
            assert!(cursor > last, "bucket chain is not strictly ascending");
            walked.push(cursor);
            last = cursor;
            cursor = self.buckets[cursor].right;
        }
        assert_eq!(walked, occupied, "chain misses or invents occupied buckets");

        let mut via_chains = 0usize;
        for slot in 0..self.hash_heads.len() {
            let mut cursor = self.hash_heads[slot];
            while let Some(id) = cursor {
                let node = self.nodes.get(id).expect("hash chain references a free slot");
                assert_eq!(node.hash_slot, slot, "node chained into the wrong hash slot");
                via_chains += 1;
                cursor = node.hash_next;
            }
        }
        assert_eq!(
            via_chains,
            self.nodes.len(),
            "hash chains disagree with arena occupancy"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn retainer(k: usize) -> TopKRetainer<u64> {
        TopKRetainer::try_new(k).unwrap()
    }

    // Keys double as their own hashes in these tests.
    fn observe(r: &mut TopKRetainer<u64>, key: u64, count: u64) {
        r.observe(&key, key, count);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(TopKRetainer::<u64>::try_new(0).is_err());
    }

    #[test]
    fn zero_signal_is_a_no_op() {
        let mut r = retainer(4);
        observe(&mut r, 1, 0);
        assert!(r.is_empty());
    }

    #[test]
    fn admits_freely_below_capacity() {
        let mut r = retainer(4);
        for key in 1..=4 {
            observe(&mut r, key, 1);
            r.debug_validate_invariants();
        }
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn at_capacity_requires_crossing_one_above_minimum() {
        let mut r = retainer(2);
        observe(&mut r, 1, 8); // log 3
        observe(&mut r, 2, 8); // log 3
        assert_eq!(r.min_log_count(), 3);

        // log 0 and log 3 signals do not cross min + 1
        observe(&mut r, 3, 1);
        observe(&mut r, 4, 15);
        assert_eq!(r.tracked_count(&3, 3), None);
        assert_eq!(r.tracked_count(&4, 4), None);

        // log 4 crosses exactly one bucket above the minimum
        observe(&mut r, 5, 16);
        assert_eq!(r.tracked_count(&5, 5), Some(16));
        assert_eq!(r.len(), 2);
        r.debug_validate_invariants();
    }

    #[test]
    fn capacity_never_exceeded() {
        let mut r = retainer(3);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let key = rng.gen_range(0..64u64);
            let count = rng.gen_range(1..=512u64);
            observe(&mut r, key, count);
            assert!(r.len() <= 3);
            r.debug_validate_invariants();
        }
    }

    #[test]
    fn promotion_updates_peak_and_bucket() {
        let mut r = retainer(4);
        observe(&mut r, 9, 2);
        assert_eq!(r.tracked_count(&9, 9), Some(2));

        // Same bucket: peak moves, no relink
        observe(&mut r, 9, 3);
        assert_eq!(r.tracked_count(&9, 9), Some(3));
        assert_eq!(r.min_log_count(), 1);

        // Higher bucket: relinks
        observe(&mut r, 9, 64);
        assert_eq!(r.tracked_count(&9, 9), Some(64));
        assert_eq!(r.min_log_count(), 6);
        r.debug_validate_invariants();
    }

    #[test]
    fn promotion_out_of_the_sentinel_keeps_the_chain_ordered() {
        let mut r = retainer(4);
        observe(&mut r, 1, 600); // log 9, the rightmost bucket
        observe(&mut r, 2, 1); // sole bucket-0 flow
        // Jump straight past several empty buckets; the new bucket must
        // land between the sentinel and bucket 9, not after it.
        observe(&mut r, 2, 40);
        r.debug_validate_invariants();
        assert_eq!(r.min_log_count(), 5);
        assert_eq!(r.snapshot(), vec![(1, 600), (2, 40)]);
    }

    #[test]
    fn stale_signal_never_lowers_peak() {
        let mut r = retainer(4);
        observe(&mut r, 9, 64);
        observe(&mut r, 9, 3);
        assert_eq!(r.tracked_count(&9, 9), Some(64));
    }

    #[test]
    fn pop_min_returns_smallest_bucket_first() {
        let mut r = retainer(8);
        observe(&mut r, 1, 100); // log 6
        observe(&mut r, 2, 4); // log 2
        observe(&mut r, 3, 33); // log 5
        observe(&mut r, 4, 1); // log 0

        assert_eq!(r.pop_min(), Some((4, 1)));
        assert_eq!(r.pop_min(), Some((2, 4)));
        assert_eq!(r.pop_min(), Some((3, 33)));
        assert_eq!(r.pop_min(), Some((1, 100)));
        assert_eq!(r.pop_min(), None);
        r.debug_validate_invariants();
    }

    #[test]
    fn snapshot_runs_highest_to_lowest() {
        let mut r = retainer(8);
        observe(&mut r, 1, 100);
        observe(&mut r, 2, 4);
        observe(&mut r, 3, 33);
        let snap = r.snapshot();
        assert_eq!(snap, vec![(1, 100), (3, 33), (2, 4)]);
    }

    #[test]
    fn snapshot_is_deterministic_and_non_mutating() {
        let mut r = retainer(8);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let key = rng.gen_range(0..32u64);
            observe(&mut r, key, rng.gen_range(1..=256u64));
        }
        let first = r.snapshot();
        let second = r.snapshot();
        assert_eq!(first, second);
        r.debug_validate_invariants();
    }

    #[test]
    fn hash_collisions_chain_and_unchain() {
        let mut r = retainer(8);
        // Same low 12 bits, distinct keys
        let (h1, h2, h3) = (0x1_0005, 0x2_0005, 0x3_0005);
        r.observe(&1, h1, 4);
        r.observe(&2, h2, 4);
        r.observe(&3, h3, 4);
        assert_eq!(r.tracked_count(&1, h1), Some(4));
        assert_eq!(r.tracked_count(&2, h2), Some(4));
        assert_eq!(r.tracked_count(&3, h3), Some(4));
        r.debug_validate_invariants();

        // Evict all three and make sure every chain entry disappears
        while r.pop_min().is_some() {}
        assert_eq!(r.tracked_count(&1, h1), None);
        assert_eq!(r.tracked_count(&2, h2), None);
        assert_eq!(r.tracked_count(&3, h3), None);
        r.debug_validate_invariants();
    }

    #[test]
    fn interior_bucket_node_cut() {
        let mut r = retainer(8);
        // Three nodes in the same bucket; promote the middle one (tail order
        // is insertion-reversed, so key 2 sits in the interior)
        observe(&mut r, 1, 4);
        observe(&mut r, 2, 4);
        observe(&mut r, 3, 4);
        observe(&mut r, 2, 8);
        assert_eq!(r.tracked_count(&2, 2), Some(8));
        r.debug_validate_invariants();

        // And the tail node
        observe(&mut r, 1, 8);
        r.debug_validate_invariants();
        assert_eq!(r.snapshot().len(), 3);
    }

    #[test]
    fn min_log_count_tracks_the_sentinel() {
        let mut r = retainer(4);
        assert_eq!(r.min_log_count(), 0);
        observe(&mut r, 1, 16);
        assert_eq!(r.min_log_count(), 4);
        observe(&mut r, 2, 1);
        assert_eq!(r.min_log_count(), 0);
        assert_eq!(r.pop_min(), Some((2, 1)));
        assert_eq!(r.min_log_count(), 4);
    }

    #[test]
    fn log_offset_shifts_bucket_placement() {
        let config = SketchConfig {
            log_offset: 1,
            ..SketchConfig::default()
        };
        let mut r: TopKRetainer<u64> = TopKRetainer::try_with_config(4, &config).unwrap();
        // count 1 lands in bucket floor(log2(2)) = 1 instead of 0
        r.observe(&1, 1, 1);
        assert_eq!(r.min_log_count(), 1);
    }

    #[test]
    fn clear_resets_everything() {
        let mut r = retainer(4);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let key = rng.gen_range(0..16u64);
            observe(&mut r, key, rng.gen_range(1..=64u64));
        }
        r.clear();
        assert!(r.is_empty());
        assert_eq!(r.min_log_count(), 0);
        assert_eq!(r.snapshot(), vec![]);
        observe(&mut r, 1, 1);
        assert_eq!(r.len(), 1);
        r.debug_validate_invariants();
    }
}
