use itertools::Itertools;
use pim_crossbar::{gates, Crossbar, CrossbarError};

use crate::constants::NUM_LANES;
use crate::layout::{KeccakLayout, COL_SCRATCH};

/// π: permute lanes as `(x, y) -> (y, 2x + 3y mod 5)`.
///
/// The permutation is a single 24-cycle plus the fixed point (0, 0), so it
/// is realized as one chained copy walk along that cycle through the
/// scratch registers, each step saving the next lane before overwriting it
/// via zero-then-OR. When the scratch chain fills, the carried lane spills
/// back to its head.
pub(super) fn pi(xb: &mut Crossbar, layout: &KeccakLayout) -> Result<(), CrossbarError> {
    let rows = layout.in_row();
    let t = |i: usize| layout.col_scratch(i);
    let ground = t(COL_SCRATCH - 1);

    gates::init0(xb, &rows, &[ground])?;
    gates::init1(xb, &rows, &(0..COL_SCRATCH - 1).map(t).collect_vec())?;

    let mut tmp = 0usize;
    let (mut x, mut y) = (1usize, 0usize);
    gates::or(xb, &rows, layout.lane_reg(x, y), ground, t(tmp))?;

    for _ in 0..NUM_LANES - 1 {
        if tmp >= COL_SCRATCH - 2 {
            gates::init1(xb, &rows, &[t(0)])?;
            gates::or(xb, &rows, t(tmp), ground, t(0))?;
            gates::init1(xb, &rows, &(1..COL_SCRATCH - 1).map(t).collect_vec())?;
            tmp = 0;
        }

        let (nx, ny) = (y, (2 * x + 3 * y) % 5);
        gates::or(xb, &rows, layout.lane_reg(nx, ny), ground, t(tmp + 1))?;
        gates::init1(xb, &rows, &[layout.lane_reg(nx, ny)])?;
        gates::or(xb, &rows, t(tmp), ground, layout.lane_reg(nx, ny))?;

        (x, y) = (nx, ny);
        tmp += 1;
    }
    Ok(())
}
