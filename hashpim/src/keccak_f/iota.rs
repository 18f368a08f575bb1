use pim_crossbar::{gates, Crossbar, CrossbarError};

use crate::layout::{KeccakLayout, COL_SCRATCH};

/// ι: XOR the round constant into lane (0, 0) only, fetched from the
/// pre-written constant column via masked OR.
pub(super) fn iota(
    xb: &mut Crossbar,
    layout: &KeccakLayout,
    round: usize,
) -> Result<(), CrossbarError> {
    let rows = layout.in_row();
    let t = |i: usize| layout.col_scratch(i);
    let ground = t(COL_SCRATCH - 1);
    let lane00 = layout.lane_reg(0, 0);

    gates::init1(xb, &rows, &[t(0), t(1)])?;
    layout.fetch_rc(xb, round, t(0))?;
    gates::xor(xb, &rows, lane00, t(0), t(1))?;
    gates::init1(xb, &rows, &[lane00])?;
    gates::or(xb, &rows, t(1), ground, lane00)?;
    Ok(())
}
