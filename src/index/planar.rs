//! Range-sum popularity over two range-coded fields.

use rustc_hash::FxHashMap;

use crate::key::FieldPairKey;

/// Inclusive query box over the two indexed fields.
///
/// `low[d] ..= high[d]` bounds field `d`. [`FieldBounds::everything`] covers
/// the whole plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBounds {
    pub low: [u32; 2],
    pub high: [u32; 2],
}

impl FieldBounds {
    pub fn new(field0: (u32, u32), field1: (u32, u32)) -> Self {
        Self {
            low: [field0.0, field1.0],
            high: [field0.1, field1.1],
        }
    }

    /// The whole plane.
    pub fn everything() -> Self {
        Self {
            low: [0, 0],
            high: [u32::MAX, u32::MAX],
        }
    }
}

/// Immutable popularity index over pairs of range-coded fields.
///
/// The distinct values observed per field form two sorted coordinate axes; a
/// sparse cell table keyed by axis positions holds the count mass at each
/// observed coordinate pair. A box query binary-searches each axis and sums
/// the cells in the resulting position rectangle — a dense double loop over
/// *distinct coordinate counts*, which is fine at construction time where
/// these queries live. Rebuilding from a fresh snapshot is the only update
/// path.
///
/// # Example
///
/// ```
/// use flowkit::index::{FieldBounds, PlanarPopularityIndex};
/// use flowkit::key::FieldPairKey;
///
/// let snapshot = vec![
///     (FieldPairKey::new(10, 100), 5),
///     (FieldPairKey::new(20, 100), 3),
///     (FieldPairKey::new(20, 200), 7),
/// ];
/// let index = PlanarPopularityIndex::from_snapshot(&snapshot);
///
/// assert_eq!(index.range_sum(&FieldBounds::new((10, 20), (100, 100))), 8.0);
/// assert_eq!(index.range_sum(&FieldBounds::new((20, 20), (0, u32::MAX))), 10.0);
/// assert_eq!(index.total_sum(), 15.0);
/// ```
#[derive(Debug, Clone)]
pub struct PlanarPopularityIndex {
    axes: [Vec<u32>; 2],
    cells: FxHashMap<(u32, u32), u64>,
    total: f64,
}

impl PlanarPopularityIndex {
    /// Builds the index from a frozen `(key, count)` snapshot.
    pub fn from_snapshot(snapshot: &[(FieldPairKey, u64)]) -> Self {
        let mut axes = [Vec::new(), Vec::new()];
        for &(key, _) in snapshot {
            let (field0, field1) = key.fields();
            axes[0].push(field0);
            axes[1].push(field1);
        }
        for axis in &mut axes {
            axis.sort_unstable();
            axis.dedup();
        }

        let mut cells =
            FxHashMap::with_capacity_and_hasher(snapshot.len(), Default::default());
        let mut total = 0.0;
        for &(key, count) in snapshot {
            let (field0, field1) = key.fields();
            let x = axis_position(&axes[0], field0);
            let y = axis_position(&axes[1], field1);
            *cells.entry((x, y)).or_insert(0) += count;
            total += count as f64;
        }
        Self { axes, cells, total }
    }

    /// Sums counts over the inclusive box `bounds`.
    pub fn range_sum(&self, bounds: &FieldBounds) -> f64 {
        let (x_start, x_end) = axis_span(&self.axes[0], bounds.low[0], bounds.high[0]);
        let (y_start, y_end) = axis_span(&self.axes[1], bounds.low[1], bounds.high[1]);

        let mut sum = 0.0;
        for x in x_start..x_end {
            for y in y_start..y_end {
                if let Some(&count) = self.cells.get(&(x as u32, y as u32)) {
                    sum += count as f64;
                }
            }
        }
        sum
    }

    /// Sum over everything observed.
    pub fn total_sum(&self) -> f64 {
        self.total
    }

    /// Distinct coordinate counts per field.
    pub fn axis_lens(&self) -> (usize, usize) {
        (self.axes[0].len(), self.axes[1].len())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Approximate heap + inline footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.axes[0].capacity() * std::mem::size_of::<u32>()
            + self.axes[1].capacity() * std::mem::size_of::<u32>()
            + self.cells.capacity() * std::mem::size_of::<((u32, u32), u64)>()
    }
}

/// Position of an observed value on its sorted axis.
fn axis_position(axis: &[u32], value: u32) -> u32 {
    axis.partition_point(|&v| v < value) as u32
}

/// Half-open position span covering axis values in `low ..= high`.
fn axis_span(axis: &[u32], low: u32, high: u32) -> (usize, usize) {
    let start = axis.partition_point(|&v| v < low);
    let end = axis.partition_point(|&v| v <= high);
    (start, end)
}
