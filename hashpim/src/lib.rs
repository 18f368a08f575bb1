//! Bit-serial mapping of the Keccak-f[1600] permutation onto a partitioned
//! stateful-logic crossbar.
//!
//! The logical 5×5×64-bit Keccak state is replicated across every
//! (row-lane × column-lane) unit of the crossbar: lane `(x, y)` lives in
//! column register `x + 5y` of each column partition, bit `z` of the lane
//! in bit row `z` of each row partition. Every primitive gate call advances
//! one bit position of all replica units in lock-step within a single
//! cycle; only the fetches from the reserved constant region pay one cycle
//! per partition.

pub mod constants;
pub mod keccak_f;
pub mod layout;
pub mod sponge;

pub use keccak_f::permute;
pub use layout::KeccakLayout;
pub use sponge::{hash_message, Sha3Params};
