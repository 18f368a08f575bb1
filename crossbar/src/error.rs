use thiserror::Error;

use crate::op::GateKind;

/// Rejected partition layouts. Raised at construction time and never
/// recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("each dimension needs at least two partitions (compute plus reserved), got {0}")]
    TooFewPartitions(usize),
    #[error("partition {index} has zero size")]
    ZeroPartition { index: usize },
    #[error("partition of {got} lines cannot host {need} registers")]
    PartitionTooSmall { need: usize, got: usize },
}

/// Fatal simulator errors.
///
/// None of these are retried or downgraded: a violated invariant means the
/// computed result would silently be wrong, so execution aborts instead of
/// continuing with partial state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrossbarError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A gate that expects its destination line preset to 1 found a 0.
    /// Signals a bug in the generated gate sequence, not a data condition.
    #[error("{gate:?} expects its destination preset to 1, found 0 at ({row}, {col})")]
    PreconditionViolation {
        gate: GateKind,
        row: usize,
        col: usize,
    },

    /// Two operations of one batch touched overlapping partitions.
    #[error("batch operations collide: lane spans {first:?} and {second:?} intersect")]
    PartitionCollision {
        first: (usize, usize),
        second: (usize, usize),
    },
}
