use itertools::Itertools;
use pim_crossbar::{gates, Crossbar, CrossbarError};

use crate::layout::{KeccakLayout, COL_SCRATCH};

/// χ: `A[x] ^= !A[x+1] & A[x+2]` along each row of the state.
///
/// Without a native three-input gate: complement every lane of the row
/// into scratch, NOR the original next lane with the complemented
/// one-past lane to get the and-of-complement term directly, XOR it into
/// the original lane, and copy the results back through the ground
/// register.
pub(super) fn chi(xb: &mut Crossbar, layout: &KeccakLayout) -> Result<(), CrossbarError> {
    let rows = layout.in_row();
    let lane = |x: usize, y: usize| layout.lane_reg(x, y);
    let t = |i: usize| layout.col_scratch(i);
    let ground = t(COL_SCRATCH - 1);

    for y in 0..5 {
        gates::init1(xb, &rows, &(0..COL_SCRATCH - 1).map(t).collect_vec())?;

        for x in 0..5 {
            gates::not(xb, &rows, lane(x, y), t(x))?;
        }
        for x in 0..5 {
            // t[5+x] = !(A[x+1] | !A[x+2]) = !A[x+1] & A[x+2]
            gates::nor(xb, &rows, lane((x + 1) % 5, y), t((x + 2) % 5), t(5 + x))?;
        }

        gates::init1(xb, &rows, &[t(0), t(1), t(2), t(3), t(4)])?;
        for x in 0..5 {
            gates::xor(xb, &rows, lane(x, y), t(5 + x), t(x))?;
        }

        gates::init1(xb, &rows, &(0..5).map(|x| lane(x, y)).collect_vec())?;
        for x in 0..5 {
            gates::or(xb, &rows, t(x), ground, lane(x, y))?;
        }
    }
    Ok(())
}
