//! Register map of the Keccak state over a partitioned crossbar.

use pim_crossbar::{
    Batch, Crossbar, CrossbarError, CrossbarGeometry, GateDirection, GateKind, GeometryError,
    LaneCtx, Operation,
};

use crate::constants::{LANE_BITS, LOG_LANE_BITS, NUM_LANES, NUM_ROUNDS, RC, ROT};

/// Column-direction scratch registers the round mapping needs in every
/// compute partition, past the 25 state lanes.
pub const COL_SCRATCH: usize = 12;

/// Row-direction scratch registers past the 64 state bit rows.
pub const ROW_SCRATCH: usize = 7;

/// Where everything lives on the crossbar.
///
/// The last partition of each dimension is the reserved constant region:
/// its first 6 rows hold the per-lane rotation offsets bit-serially, its
/// first 24 columns hold the round constants, and its last row/column is
/// the all-zero ground line driven as the neutral operand of OR-based
/// copies. All remaining partitions are compute lanes.
#[derive(Debug, Clone)]
pub struct KeccakLayout {
    /// Compute lane counts, reserved partitions excluded.
    pub row_lanes: usize,
    pub col_lanes: usize,
    /// The 64 state bit rows of every compute row partition; mask for
    /// in-row (column-register) gates.
    pub state_rows: Vec<usize>,
    /// The 25 lane columns of every compute column partition; mask for
    /// in-column (bit-row) gates.
    pub lane_cols: Vec<usize>,
    /// The rotated-parity registers `C_r` of every compute column
    /// partition; mask for the θ rotation chain.
    pub parity_cols: Vec<usize>,
    /// Absolute rows of the six rotation-offset bit lines.
    pub rot_rows: [usize; LOG_LANE_BITS],
    /// Absolute columns of the 24 round-constant lines.
    pub rc_cols: [usize; NUM_ROUNDS],
    /// All-zero ground lines inside the reserved partitions.
    pub ground_row: usize,
    pub ground_col: usize,
}

impl KeccakLayout {
    pub fn new(geometry: &CrossbarGeometry) -> Result<Self, GeometryError> {
        let row_parts = geometry.row_lanes();
        let col_parts = geometry.col_lanes();
        let row_lanes = row_parts - 1;
        let col_lanes = col_parts - 1;

        for lane in 0..row_lanes {
            check_size(geometry.row_lane_size(lane), LANE_BITS + ROW_SCRATCH)?;
        }
        for lane in 0..col_lanes {
            check_size(geometry.col_lane_size(lane), NUM_LANES + COL_SCRATCH)?;
        }
        // Reserved regions: rotation rows plus ground, constant columns
        // plus ground.
        check_size(geometry.row_lane_size(row_lanes), LOG_LANE_BITS + 1)?;
        check_size(geometry.col_lane_size(col_lanes), NUM_ROUNDS + 1)?;

        let state_rows = (0..row_lanes)
            .flat_map(|rp| (0..LANE_BITS).map(move |z| (rp, z)))
            .map(|(rp, z)| geometry.abs_row(rp, z))
            .collect();
        let lane_cols = (0..col_lanes)
            .flat_map(|cp| (0..NUM_LANES).map(move |j| (cp, j)))
            .map(|(cp, j)| geometry.abs_col(cp, j))
            .collect();
        let parity_cols = (0..col_lanes)
            .flat_map(|cp| (0..5).map(move |i| (cp, NUM_LANES + 5 + i)))
            .map(|(cp, reg)| geometry.abs_col(cp, reg))
            .collect();

        let rot_rows = core::array::from_fn(|i| geometry.abs_row(row_lanes, i));
        let rc_cols = core::array::from_fn(|ir| geometry.abs_col(col_lanes, ir));

        Ok(Self {
            row_lanes,
            col_lanes,
            state_rows,
            lane_cols,
            parity_cols,
            rot_rows,
            rc_cols,
            ground_row: geometry.rows() - 1,
            ground_col: geometry.cols() - 1,
        })
    }

    /// Column register of lane `(x, y)`, relative to its partition.
    #[inline]
    pub fn lane_reg(&self, x: usize, y: usize) -> usize {
        x + 5 * y
    }

    /// Relative column address of scratch register `i` (`0..COL_SCRATCH`).
    #[inline]
    pub fn col_scratch(&self, i: usize) -> usize {
        debug_assert!(i < COL_SCRATCH);
        NUM_LANES + i
    }

    /// Relative row address of scratch row `i` (`0..ROW_SCRATCH`).
    #[inline]
    pub fn row_scratch(&self, i: usize) -> usize {
        debug_assert!(i < ROW_SCRATCH);
        LANE_BITS + i
    }

    /// Context for in-row gates over the column registers of every compute
    /// unit: one gate per column lane, masked to the state bit rows.
    pub fn in_row(&self) -> LaneCtx<'_> {
        LaneCtx::new(GateDirection::InRow, self.col_lanes, &self.state_rows)
    }

    /// Context for in-column gates over the bit rows, masked to the 25
    /// lane columns.
    pub fn in_col(&self) -> LaneCtx<'_> {
        LaneCtx::new(GateDirection::InColumn, self.row_lanes, &self.lane_cols)
    }

    /// Like [`Self::in_col`] but masked to the rotated-parity registers.
    pub fn in_col_parity(&self) -> LaneCtx<'_> {
        LaneCtx::new(GateDirection::InColumn, self.row_lanes, &self.parity_cols)
    }

    /// Pre-writes the rotation offsets and round constants into the
    /// reserved lines and grounds the two neutral lines.
    ///
    /// The direct stores model one-off device programming and carry no
    /// gate cost; only the two ground INIT0 batches go through the
    /// executor. Must run once before [`crate::permute`].
    pub fn setup(&self, xb: &mut Crossbar) -> Result<(), CrossbarError> {
        for (ir, &rc) in RC.iter().enumerate() {
            for z in 0..LANE_BITS {
                let bit = (rc >> z) & 1 == 1;
                for rp in 0..self.row_lanes {
                    let row = xb.geometry().abs_row(rp, z);
                    xb.set(row, self.rc_cols[ir], bit);
                }
            }
        }
        for (j, &rot) in ROT.iter().enumerate() {
            for (i, &row) in self.rot_rows.iter().enumerate() {
                let bit = (rot >> i) & 1 == 1;
                for cp in 0..self.col_lanes {
                    let col = xb.geometry().abs_col(cp, j);
                    xb.set(row, col, bit);
                }
            }
        }

        xb.perform(&Batch::single(Operation {
            kind: GateKind::Init0,
            direction: GateDirection::InRow,
            inputs: vec![],
            outputs: vec![self.ground_col],
            mask: Some(self.state_rows.clone()),
        }))?;
        xb.perform(&Batch::single(Operation {
            kind: GateKind::Init0,
            direction: GateDirection::InColumn,
            inputs: vec![],
            outputs: vec![self.ground_row],
            mask: Some(self.lane_cols.clone()),
        }))?;
        Ok(())
    }

    /// Copies bit `stage` of every lane's rotation offset from the
    /// reserved rows into scratch row `dst` of every compute partition.
    ///
    /// One single-operation batch per partition: the source lies in the
    /// reserved region, so the address span crosses partitions and the
    /// copies cannot share a cycle.
    pub fn fetch_rot_bit(
        &self,
        xb: &mut Crossbar,
        stage: usize,
        dst: usize,
    ) -> Result<(), CrossbarError> {
        for rp in 0..self.row_lanes {
            let out = xb.geometry().abs_row(rp, dst);
            xb.perform(&Batch::single(Operation {
                kind: GateKind::Or,
                direction: GateDirection::InColumn,
                inputs: vec![self.rot_rows[stage], self.ground_row],
                outputs: vec![out],
                mask: Some(self.lane_cols.clone()),
            }))?;
        }
        Ok(())
    }

    /// Copies the round constant column of `round` into scratch register
    /// `dst` of every compute partition, one batch per partition.
    pub fn fetch_rc(
        &self,
        xb: &mut Crossbar,
        round: usize,
        dst: usize,
    ) -> Result<(), CrossbarError> {
        for cp in 0..self.col_lanes {
            let out = xb.geometry().abs_col(cp, dst);
            xb.perform(&Batch::single(Operation {
                kind: GateKind::Or,
                direction: GateDirection::InRow,
                inputs: vec![self.rc_cols[round], self.ground_col],
                outputs: vec![out],
                mask: Some(self.state_rows.clone()),
            }))?;
        }
        Ok(())
    }
}

/// Geometry hosting a `row_units × col_units` grid of replica units plus
/// the reserved constant region, with the minimal partition sizes the
/// mapping needs.
pub fn replica_geometry(
    row_units: usize,
    col_units: usize,
) -> Result<CrossbarGeometry, GeometryError> {
    let mut rows = vec![LANE_BITS + ROW_SCRATCH; row_units];
    rows.push(LOG_LANE_BITS + 1);
    let mut cols = vec![NUM_LANES + COL_SCRATCH; col_units];
    cols.push(NUM_ROUNDS + 1);
    CrossbarGeometry::new(&rows, &cols)
}

fn check_size(got: usize, need: usize) -> Result<(), GeometryError> {
    if got < need {
        return Err(GeometryError::PartitionTooSmall { need, got });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replica_geometry_hosts_layout() {
        let geometry = replica_geometry(2, 3).unwrap();
        let layout = KeccakLayout::new(&geometry).unwrap();
        assert_eq!(layout.row_lanes, 2);
        assert_eq!(layout.col_lanes, 3);
        assert_eq!(layout.state_rows.len(), 2 * LANE_BITS);
        assert_eq!(layout.lane_cols.len(), 3 * NUM_LANES);
        assert_eq!(layout.parity_cols.len(), 3 * 5);
        assert_eq!(layout.ground_row, geometry.rows() - 1);
    }

    #[test]
    fn test_rejects_undersized_partitions() {
        // Compute partition too small for the 64 + 7 row registers.
        let geometry = CrossbarGeometry::new(&[64, 7], &[37, 25]).unwrap();
        assert_eq!(
            KeccakLayout::new(&geometry).unwrap_err(),
            GeometryError::PartitionTooSmall { need: 71, got: 64 }
        );
        // Reserved column region too small for the 24 constants + ground.
        let geometry = CrossbarGeometry::new(&[71, 7], &[37, 24]).unwrap();
        assert_eq!(
            KeccakLayout::new(&geometry).unwrap_err(),
            GeometryError::PartitionTooSmall { need: 25, got: 24 }
        );
    }
}
