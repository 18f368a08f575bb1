//! Composite operations built from the six raw gate types.
//!
//! Each primitive issues a short, fixed sequence of batches, replicating
//! the same relative register addresses across a set of compute lanes so
//! that one call advances every lane's corresponding bit in lock-step.

use itertools::iproduct;

use crate::error::CrossbarError;
use crate::op::{Batch, GateDirection, GateKind, Operation};
use crate::sim::Crossbar;

/// Replication context for a primitive call: the direction the gates run
/// in, the number of compute lanes the relative register addresses are
/// replicated across, and the mask of active lines in the orthogonal
/// dimension.
#[derive(Debug, Clone, Copy)]
pub struct LaneCtx<'a> {
    pub direction: GateDirection,
    pub lanes: usize,
    pub mask: Option<&'a [usize]>,
}

impl<'a> LaneCtx<'a> {
    pub fn new(direction: GateDirection, lanes: usize, mask: &'a [usize]) -> Self {
        Self {
            direction,
            lanes,
            mask: Some(mask),
        }
    }

    pub fn unmasked(direction: GateDirection, lanes: usize) -> Self {
        Self {
            direction,
            lanes,
            mask: None,
        }
    }
}

fn translate(xb: &Crossbar, ctx: &LaneCtx, lane: usize, reg: usize) -> usize {
    match ctx.direction {
        GateDirection::InRow => xb.geometry().abs_col(lane, reg),
        GateDirection::InColumn => xb.geometry().abs_row(lane, reg),
    }
}

/// One batch with the same gate issued per lane, addresses translated from
/// relative registers. The per-lane operations are disjoint by
/// construction, so the batch always passes the collision check.
fn replicate(
    xb: &Crossbar,
    ctx: &LaneCtx,
    kind: GateKind,
    inputs: &[usize],
    outputs: &[usize],
) -> Batch {
    let ops = (0..ctx.lanes)
        .map(|lane| Operation {
            kind,
            direction: ctx.direction,
            inputs: inputs.iter().map(|&r| translate(xb, ctx, lane, r)).collect(),
            outputs: outputs
                .iter()
                .map(|&r| translate(xb, ctx, lane, r))
                .collect(),
            mask: ctx.mask.map(<[usize]>::to_vec),
        })
        .collect();
    Batch::new(ops)
}

/// `c <- a | b`. The destination must be preset to 1.
pub fn or(
    xb: &mut Crossbar,
    ctx: &LaneCtx,
    a: usize,
    b: usize,
    c: usize,
) -> Result<(), CrossbarError> {
    let batch = replicate(xb, ctx, GateKind::Or, &[a, b], &[c]);
    xb.perform(&batch)
}

/// `c <- !(a | b)`. The destination must be preset to 1.
pub fn nor(
    xb: &mut Crossbar,
    ctx: &LaneCtx,
    a: usize,
    b: usize,
    c: usize,
) -> Result<(), CrossbarError> {
    let batch = replicate(xb, ctx, GateKind::Nor, &[a, b], &[c]);
    xb.perform(&batch)
}

/// `c <- !a`. The destination must be preset to 1.
pub fn not(xb: &mut Crossbar, ctx: &LaneCtx, a: usize, c: usize) -> Result<(), CrossbarError> {
    let batch = replicate(xb, ctx, GateKind::Not, &[a], &[c]);
    xb.perform(&batch)
}

/// `c <- a ^ b` in two cycles: `c <- a | b`, then `c <- c & !(a & b)`.
/// The destination must be preset to 1.
pub fn xor(
    xb: &mut Crossbar,
    ctx: &LaneCtx,
    a: usize,
    b: usize,
    c: usize,
) -> Result<(), CrossbarError> {
    let batch = replicate(xb, ctx, GateKind::Or, &[a, b], &[c]);
    xb.perform(&batch)?;
    let batch = replicate(xb, ctx, GateKind::Nand, &[a, b], &[c]);
    xb.perform(&batch)
}

/// 2-way multiplexer: `c <- a` where `sel` is 1, `c <- b` where it is 0.
///
/// `sel_n` must hold the complement of `sel`; `c` and both scratch
/// registers must be preset to 1. Three NOR cycles:
/// `t0 = !(a | sel_n)`, `t1 = !(b | sel)`, `c = !(t0 | t1)`, which reduces
/// to `(a AND sel) OR (b AND sel_n)` once `sel_n = !sel`.
pub fn mux2(
    xb: &mut Crossbar,
    ctx: &LaneCtx,
    a: usize,
    b: usize,
    sel: usize,
    sel_n: usize,
    c: usize,
    scratch: [usize; 2],
) -> Result<(), CrossbarError> {
    let batch = replicate(xb, ctx, GateKind::Nor, &[a, sel_n], &[scratch[0]]);
    xb.perform(&batch)?;
    let batch = replicate(xb, ctx, GateKind::Nor, &[b, sel], &[scratch[1]]);
    xb.perform(&batch)?;
    let batch = replicate(xb, ctx, GateKind::Nor, &[scratch[0], scratch[1]], &[c]);
    xb.perform(&batch)
}

fn init(
    xb: &mut Crossbar,
    ctx: &LaneCtx,
    kind: GateKind,
    regs: &[usize],
) -> Result<(), CrossbarError> {
    let outputs = iproduct!(0..ctx.lanes, regs)
        .map(|(lane, &r)| translate(xb, ctx, lane, r))
        .collect();
    let op = Operation {
        kind,
        direction: ctx.direction,
        inputs: vec![],
        outputs,
        mask: ctx.mask.map(<[usize]>::to_vec),
    };
    xb.perform(&Batch::single(op))
}

/// Sets a group of registers to 0 across every lane in a single cycle, so
/// initialization cost is paid once per register set.
pub fn init0(xb: &mut Crossbar, ctx: &LaneCtx, regs: &[usize]) -> Result<(), CrossbarError> {
    init(xb, ctx, GateKind::Init0, regs)
}

/// Sets a group of registers to 1 across every lane in a single cycle.
pub fn init1(xb: &mut Crossbar, ctx: &LaneCtx, regs: &[usize]) -> Result<(), CrossbarError> {
    init(xb, ctx, GateKind::Init1, regs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrossbarError;
    use crate::geometry::CrossbarGeometry;

    const MASK: [usize; 1] = [0];

    fn crossbar() -> Crossbar {
        Crossbar::new(CrossbarGeometry::new(&[2, 2], &[8, 8]).unwrap())
    }

    fn ctx() -> LaneCtx<'static> {
        LaneCtx::new(GateDirection::InRow, 2, &MASK)
    }

    fn write(xb: &mut Crossbar, lane: usize, reg: usize, value: bool) {
        let col = xb.geometry().abs_col(lane, reg);
        xb.set(0, col, value);
    }

    fn read(xb: &Crossbar, lane: usize, reg: usize) -> bool {
        xb.get(0, xb.geometry().abs_col(lane, reg))
    }

    #[test]
    fn test_xor_exhaustive() {
        for a in [false, true] {
            for b in [false, true] {
                let mut xb = crossbar();
                for lane in 0..2 {
                    write(&mut xb, lane, 0, a);
                    write(&mut xb, lane, 1, b);
                    write(&mut xb, lane, 2, true);
                }
                xor(&mut xb, &ctx(), 0, 1, 2).unwrap();
                for lane in 0..2 {
                    assert_eq!(read(&xb, lane, 2), a ^ b, "lane {lane} a={a} b={b}");
                }
                // Two batches, each one gate per lane.
                assert_eq!(xb.latency(), 2);
                assert_eq!(xb.energy(), 4);
            }
        }
    }

    #[test]
    fn test_xor_requires_preset_destination() {
        let mut xb = crossbar();
        let err = xor(&mut xb, &ctx(), 0, 1, 2).unwrap_err();
        assert!(matches!(err, CrossbarError::PreconditionViolation { .. }));
    }

    #[test]
    fn test_mux2_exhaustive() {
        for a in [false, true] {
            for b in [false, true] {
                for sel in [false, true] {
                    let mut xb = crossbar();
                    for lane in 0..2 {
                        write(&mut xb, lane, 0, a);
                        write(&mut xb, lane, 1, b);
                        write(&mut xb, lane, 2, sel);
                        write(&mut xb, lane, 3, !sel);
                        for reg in 4..7 {
                            write(&mut xb, lane, reg, true);
                        }
                    }
                    mux2(&mut xb, &ctx(), 0, 1, 2, 3, 4, [5, 6]).unwrap();
                    let expected = if sel { a } else { b };
                    for lane in 0..2 {
                        assert_eq!(read(&xb, lane, 4), expected, "a={a} b={b} sel={sel}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_bulk_init_cost() {
        let mut xb = crossbar();
        init1(&mut xb, &ctx(), &[0, 1, 2]).unwrap();
        // One cycle; 3 registers times 2 lanes times 1 masked line.
        assert_eq!(xb.latency(), 1);
        assert_eq!(xb.energy(), 6);
        for lane in 0..2 {
            for reg in 0..3 {
                assert!(read(&xb, lane, reg));
            }
        }
        init0(&mut xb, &ctx(), &[1]).unwrap();
        assert!(!read(&xb, 0, 1));
        assert!(read(&xb, 0, 0));
    }
}
