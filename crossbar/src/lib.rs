//! Simulator for a single memory crossbar that computes in place with
//! stateful logic gates, partitioned along both dimensions into independent
//! compute lanes.
//!
//! All mutation goes through [`Crossbar::perform`], which enforces the
//! no-overlapping-partitions invariant per batch and accumulates the two
//! cost counters (latency in logical cycles, energy in gate-cost units).

pub mod error;
pub mod gates;
pub mod geometry;
pub mod op;
pub mod sim;

pub use error::{CrossbarError, GeometryError};
pub use gates::LaneCtx;
pub use geometry::CrossbarGeometry;
pub use op::{Batch, GateDirection, GateKind, Operation};
pub use sim::{CostReport, Crossbar};
