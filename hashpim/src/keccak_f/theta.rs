use itertools::Itertools;
use pim_crossbar::{gates, Crossbar, CrossbarError};

use crate::constants::LANE_BITS;
use crate::layout::{KeccakLayout, COL_SCRATCH, ROW_SCRATCH};

/// θ: fold each column parity into the two neighbouring columns.
///
/// `C[x]` is accumulated with two chained XOR pairs, copied into `C_r[x]`
/// through the zeroed neutral register, rotated left by one bit with a
/// shift-register walk down the 64 bit rows, and finally
/// `D[x] = C[x-1] ^ C_r[x+1]` is XORed into all five lanes of column `x`.
pub(super) fn theta(xb: &mut Crossbar, layout: &KeccakLayout) -> Result<(), CrossbarError> {
    let rows = layout.in_row();
    let cols = layout.in_col();
    let par = layout.in_col_parity();

    let lane = |x: usize, y: usize| layout.lane_reg(x, y);
    let t = |i: usize| layout.col_scratch(i);
    let s = |i: usize| layout.row_scratch(i);
    // Column parities and their rotated copies.
    let c = t;
    let cr = |x: usize| t(5 + x);

    gates::init1(xb, &rows, &(0..COL_SCRATCH).map(t).collect_vec())?;
    gates::init1(xb, &cols, &(0..ROW_SCRATCH).map(s).collect_vec())?;

    // C[x] = A[x,0] ^ A[x,1] ^ A[x,2] ^ A[x,3] ^ A[x,4]
    for x in 0..5 {
        gates::xor(xb, &rows, lane(x, 0), lane(x, 1), t(5))?;
        gates::xor(xb, &rows, lane(x, 2), lane(x, 3), t(6))?;
        gates::xor(xb, &rows, lane(x, 4), t(5), t(7))?;
        gates::xor(xb, &rows, t(6), t(7), c(x))?;
        gates::init1(xb, &rows, &[t(5), t(6), t(7)])?;
    }

    // Copy C into C_r through the zeroed neutral register.
    gates::init0(xb, &rows, &[t(10)])?;
    gates::init1(xb, &rows, &[cr(0), cr(1), cr(2), cr(3), cr(4)])?;
    for x in 0..5 {
        gates::or(xb, &rows, c(x), t(10), cr(x))?;
    }

    // Rotate C_r left by one bit: bit-serial shift register over the 64
    // bit rows, each source row re-armed to 1 right after its value moves.
    gates::init0(xb, &par, &[s(1)])?;
    gates::init1(xb, &par, &[s(0)])?;
    for i in 0..LANE_BITS {
        gates::or(xb, &par, s(0) - i - 1, s(1), s(0) - i)?;
        gates::init1(xb, &par, &[s(0) - i - 1])?;
    }
    gates::or(xb, &par, s(0), s(1), s(0) - LANE_BITS)?;

    // D[x] = C[x-1] ^ C_r[x+1]; the spent C[x-1] register is re-zeroed and
    // then serves as the copy ground for folding D into column x.
    for x in 0..5 {
        let prev = c((x + 4) % 5);
        let next = cr((x + 1) % 5);
        gates::init1(xb, &rows, &[t(10)])?;
        gates::xor(xb, &rows, prev, next, t(10))?;
        gates::init0(xb, &rows, &[prev])?;

        // A[x,y] ^= D[x]
        for y in 0..5 {
            gates::init1(xb, &rows, &[t(11)])?;
            gates::xor(xb, &rows, lane(x, y), t(10), t(11))?;
            gates::init1(xb, &rows, &[lane(x, y)])?;
            gates::or(xb, &rows, prev, t(11), lane(x, y))?;
        }
    }
    Ok(())
}
