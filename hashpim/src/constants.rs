//! Public constants of the Keccak-f[1600] permutation.

pub const NUM_ROUNDS: usize = 24;

/// State width `b` in bits.
pub const STATE_BITS: usize = 1600;

/// Lane width `w` in bits.
pub const LANE_BITS: usize = 64;

/// Number of 64-bit lanes, `b / w`.
pub const NUM_LANES: usize = 25;

/// Barrel-rotator stages, `log2 w`.
pub const LOG_LANE_BITS: usize = 6;

/// Round constants XORed into lane (0, 0) by the ι step.
pub const RC: [u64; NUM_ROUNDS] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808A,
    0x8000000080008000,
    0x000000000000808B,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008A,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000A,
    0x000000008000808B,
    0x800000000000008B,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800A,
    0x800000008000000A,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];

/// Left-rotation offset of lane `x + 5y` in the ρ step.
pub const ROT: [u32; NUM_LANES] = [
    0, 1, 62, 28, 27, 36, 44, 6, 55, 20, 3, 10, 43, 25, 39, 41, 45, 15, 21, 8, 18, 2, 61, 56, 14,
];
