use pim_crossbar::{gates, Crossbar, CrossbarError};

use crate::constants::{LANE_BITS, LOG_LANE_BITS};
use crate::layout::KeccakLayout;

/// ρ: rotate every lane left by its fixed offset, all 25 lanes at once.
///
/// Six barrel-rotator stages; stage `i` rotates each lane by `2^i` exactly
/// when bit `i` of its pre-written rotation offset is set. Within a stage a
/// moving pointer pair `(d0 = d1 + 2^i)` sweeps all 64 bit rows once,
/// MUX2-selecting per lane between the bit `2^i` below and the unshifted
/// bit. Overwriting row `d0` in place would destroy the source of the next
/// step along its rotation cycle, so the just-read bit is carried in one of
/// two alternating scratch rows; when a cycle closes the pointers advance
/// to the next untouched row and the carry is re-seeded.
pub(super) fn rho(xb: &mut Crossbar, layout: &KeccakLayout) -> Result<(), CrossbarError> {
    let cols = layout.in_col();
    let s = |i: usize| layout.row_scratch(i);

    // Neutral zero row for the OR-based copies.
    gates::init0(xb, &cols, &[s(0)])?;

    for stage in 0..LOG_LANE_BITS {
        let step = 1usize << stage;

        // s1 = per-lane rotation bit of this stage, s2 = its complement.
        gates::init1(xb, &cols, &[s(1), s(2), s(3), s(4)])?;
        layout.fetch_rot_bit(xb, stage, s(1))?;
        gates::not(xb, &cols, s(1), s(2))?;

        let mut d1 = 0usize;
        let mut d0 = step % LANE_BITS;

        gates::init1(xb, &cols, &[s(4)])?;
        gates::or(xb, &cols, d1, s(0), s(4))?;

        let mut rotated = [false; LANE_BITS];
        for j in 0..LANE_BITS {
            if rotated[d0] {
                // Cycle closed: advance to the next untouched row and
                // reload the carry from its unshifted source.
                d0 += 1;
                d1 += 1;
                gates::init1(xb, &cols, &[s(3), s(4)])?;
                gates::or(xb, &cols, d1, s(0), s(4))?;
            }

            gates::init1(xb, &cols, &[s(5), s(6)])?;
            if j % 2 == 0 {
                // Carry sits in s4; load the unshifted bit into s3.
                gates::init1(xb, &cols, &[s(3)])?;
                gates::or(xb, &cols, d0, s(0), s(3))?;
                gates::init1(xb, &cols, &[d0])?;
                gates::mux2(xb, &cols, s(4), s(3), s(1), s(2), d0, [s(5), s(6)])?;
            } else {
                gates::init1(xb, &cols, &[s(4)])?;
                gates::or(xb, &cols, d0, s(0), s(4))?;
                gates::init1(xb, &cols, &[d0])?;
                gates::mux2(xb, &cols, s(3), s(4), s(1), s(2), d0, [s(5), s(6)])?;
            }

            rotated[d0] = true;
            d1 = (d1 + step) % LANE_BITS;
            d0 = (d0 + step) % LANE_BITS;
        }
    }
    Ok(())
}
