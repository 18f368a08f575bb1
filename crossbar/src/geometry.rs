use crate::error::GeometryError;

/// Partition (lane) layout of a crossbar along both dimensions.
///
/// Partitions are contiguous and ordered, and together cover the full
/// `[0, rows)` / `[0, cols)` extent; one extra always-zero row and column is
/// appended past the declared totals. By convention the last partition of
/// each dimension is a reserved constant region (pre-written round
/// constants, rotation offsets, ground lines) rather than a compute lane;
/// the geometry itself does not distinguish the two.
#[derive(Debug, Clone)]
pub struct CrossbarGeometry {
    rows: usize,
    cols: usize,
    row_starts: Vec<usize>,
    col_starts: Vec<usize>,
    row_lane_of: Vec<usize>,
    col_lane_of: Vec<usize>,
}

impl CrossbarGeometry {
    /// Builds a geometry from the per-partition sizes of both dimensions.
    /// Totals are derived: `rows = Σ row_sizes`, `cols = Σ col_sizes`.
    pub fn new(row_sizes: &[usize], col_sizes: &[usize]) -> Result<Self, GeometryError> {
        let (row_starts, row_lane_of) = lane_tables(row_sizes)?;
        let (col_starts, col_lane_of) = lane_tables(col_sizes)?;
        Ok(Self {
            rows: row_lane_of.len(),
            cols: col_lane_of.len(),
            row_starts,
            col_starts,
            row_lane_of,
            col_lane_of,
        })
    }

    /// Declared row extent, excluding the extra zero row.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Declared column extent, excluding the extra zero column.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row_lanes(&self) -> usize {
        self.row_starts.len()
    }

    pub fn col_lanes(&self) -> usize {
        self.col_starts.len()
    }

    pub fn row_lane_size(&self, lane: usize) -> usize {
        let end = self
            .row_starts
            .get(lane + 1)
            .copied()
            .unwrap_or(self.rows);
        end - self.row_starts[lane]
    }

    pub fn col_lane_size(&self, lane: usize) -> usize {
        let end = self
            .col_starts
            .get(lane + 1)
            .copied()
            .unwrap_or(self.cols);
        end - self.col_starts[lane]
    }

    /// Converts a (partition, intra-partition index) row address to an
    /// absolute row address.
    #[inline]
    pub fn abs_row(&self, lane: usize, idx: usize) -> usize {
        self.row_starts[lane] + idx
    }

    #[inline]
    pub fn abs_col(&self, lane: usize, idx: usize) -> usize {
        self.col_starts[lane] + idx
    }

    /// Partition holding the given absolute row address.
    #[inline]
    pub fn row_lane_of(&self, addr: usize) -> usize {
        self.row_lane_of[addr]
    }

    #[inline]
    pub fn col_lane_of(&self, addr: usize) -> usize {
        self.col_lane_of[addr]
    }
}

fn lane_tables(sizes: &[usize]) -> Result<(Vec<usize>, Vec<usize>), GeometryError> {
    if sizes.len() < 2 {
        return Err(GeometryError::TooFewPartitions(sizes.len()));
    }
    let mut starts = Vec::with_capacity(sizes.len());
    let mut lane_of = Vec::with_capacity(sizes.iter().sum());
    for (index, &size) in sizes.iter().enumerate() {
        if size == 0 {
            return Err(GeometryError::ZeroPartition { index });
        }
        starts.push(lane_of.len());
        lane_of.extend(std::iter::repeat(index).take(size));
    }
    Ok((starts, lane_of))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_totals_and_starts() {
        let g = CrossbarGeometry::new(&[72, 72, 16], &[37, 25]).unwrap();
        assert_eq!(g.rows(), 160);
        assert_eq!(g.cols(), 62);
        assert_eq!(g.row_lanes(), 3);
        assert_eq!(g.col_lanes(), 2);
        assert_eq!(g.abs_row(0, 0), 0);
        assert_eq!(g.abs_row(1, 5), 77);
        assert_eq!(g.abs_col(1, 3), 40);
        assert_eq!(g.row_lane_size(1), 72);
        assert_eq!(g.col_lane_size(1), 25);
    }

    #[test]
    fn test_translation_is_bijective() {
        let g = CrossbarGeometry::new(&[8, 4, 6], &[3, 3]).unwrap();
        let mut seen = HashSet::new();
        for lane in 0..g.row_lanes() {
            for idx in 0..g.row_lane_size(lane) {
                let addr = g.abs_row(lane, idx);
                assert!(seen.insert(addr), "row address {addr} aliased");
                assert_eq!(g.row_lane_of(addr), lane);
            }
        }
        assert_eq!(seen.len(), g.rows());
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert_eq!(
            CrossbarGeometry::new(&[8], &[4, 4]).unwrap_err(),
            GeometryError::TooFewPartitions(1)
        );
        assert_eq!(
            CrossbarGeometry::new(&[8, 0], &[4, 4]).unwrap_err(),
            GeometryError::ZeroPartition { index: 1 }
        );
    }
}
