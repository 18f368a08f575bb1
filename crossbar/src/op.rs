use itertools::Itertools;
use itertools::MinMaxResult::{MinMax, NoElements, OneElement};

/// One of the six supported stateful gate types.
///
/// NOT, NOR and OR overwrite a destination line that must be preset to 1;
/// NAND overwrites unconditionally (see the executor for the exact
/// semantics); INIT0/INIT1 force a set of lines to a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    Not,
    Nor,
    Nand,
    Or,
    Init0,
    Init1,
}

/// Orientation of a gate.
///
/// `InRow` gates read and write column lines, with the mask selecting which
/// rows participate; `InColumn` is the transpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDirection {
    InRow,
    InColumn,
}

/// A single row- or column-parallel gate application.
///
/// Addresses are absolute; `mask` restricts the set of active lines in the
/// orthogonal dimension (all of them when `None`).
#[derive(Debug, Clone)]
pub struct Operation {
    pub kind: GateKind,
    pub direction: GateDirection,
    pub inputs: Vec<usize>,
    pub outputs: Vec<usize>,
    pub mask: Option<Vec<usize>>,
}

impl Operation {
    /// Inclusive address span this operation touches, inputs and outputs
    /// combined. `None` for an operation with no addresses at all.
    pub(crate) fn span(&self) -> Option<(usize, usize)> {
        match self.inputs.iter().chain(&self.outputs).minmax() {
            NoElements => None,
            OneElement(&a) => Some((a, a)),
            MinMax(&lo, &hi) => Some((lo, hi)),
        }
    }
}

/// A set of operations issued in one logical cycle.
///
/// All operations of a batch share a direction; the executor charges one
/// latency cycle for the whole batch regardless of its size.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub ops: Vec<Operation>,
}

impl Batch {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    pub fn single(op: Operation) -> Self {
        Self { ops: vec![op] }
    }
}
