//! Single-block SHA-3 sponge around the in-memory permutation.

use pim_crossbar::{CostReport, Crossbar, CrossbarError};
use tracing::info;

use crate::constants::{LANE_BITS, STATE_BITS};
use crate::keccak_f::permute;
use crate::layout::{replica_geometry, KeccakLayout};

/// One SHA-3 instance: rate and digest width in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sha3Params {
    pub name: &'static str,
    pub rate_bits: usize,
    pub digest_bits: usize,
}

impl Sha3Params {
    pub const SHA3_224: Self = Self::new("SHA3-224", 224);
    pub const SHA3_256: Self = Self::new("SHA3-256", 256);
    pub const SHA3_384: Self = Self::new("SHA3-384", 384);
    pub const SHA3_512: Self = Self::new("SHA3-512", 512);

    pub const ALL: [Self; 4] = [
        Self::SHA3_224,
        Self::SHA3_256,
        Self::SHA3_384,
        Self::SHA3_512,
    ];

    const fn new(name: &'static str, digest_bits: usize) -> Self {
        Self {
            name,
            rate_bits: STATE_BITS - 2 * digest_bits,
            digest_bits,
        }
    }

    /// Largest message this instance can absorb in its single block: the
    /// `01` domain suffix and the two mandatory `pad10*1` bits must fit.
    pub fn max_message_bytes(&self) -> usize {
        (self.rate_bits - 4) / 8
    }
}

/// Lays out `msg` as a full padded state block: message bits in byte
/// little-endian order, the `01` domain suffix, `pad10*1` up to the rate,
/// zeros over the capacity.
///
/// # Panics
///
/// If the message exceeds [`Sha3Params::max_message_bytes`] for this rate.
pub fn pad_message(msg: &[u8], rate_bits: usize) -> Vec<bool> {
    let len = msg.len() * 8;
    assert!(
        len + 4 <= rate_bits,
        "message of {len} bits does not fit a single {rate_bits}-bit block"
    );

    let mut bits = vec![false; STATE_BITS];
    for (i, &byte) in msg.iter().enumerate() {
        for k in 0..8 {
            bits[8 * i + k] = (byte >> k) & 1 == 1;
        }
    }
    // Domain suffix 01, then pad10*1. The suffix zero and the run of pad
    // zeros are already in place.
    bits[len + 1] = true;
    bits[len + 2] = true;
    bits[rate_bits - 1] = true;
    bits
}

/// Stores a padded block into the state registers of one replica unit.
///
/// State bit `b` of the flat Keccak numbering lives at bit row `b mod 64`
/// of lane column `b div 64`. Direct stores model the external write port;
/// the state is assumed all-zero, so storing and XOR-absorbing coincide.
pub fn absorb(xb: &mut Crossbar, unit: (usize, usize), block: &[bool]) {
    debug_assert_eq!(block.len(), STATE_BITS);
    for (b, &bit) in block.iter().enumerate() {
        let row = xb.geometry().abs_row(unit.0, b % LANE_BITS);
        let col = xb.geometry().abs_col(unit.1, b / LANE_BITS);
        xb.set(row, col, bit);
    }
}

/// Reads the first `digest_bits` state bits of one replica unit back out as
/// bytes, little-endian bit order within each byte.
pub fn squeeze(xb: &Crossbar, unit: (usize, usize), digest_bits: usize) -> Vec<u8> {
    (0..digest_bits / 8)
        .map(|k| {
            (0..8).fold(0u8, |byte, i| {
                let b = 8 * k + i;
                let row = xb.geometry().abs_row(unit.0, b % LANE_BITS);
                let col = xb.geometry().abs_col(unit.1, b / LANE_BITS);
                byte | ((xb.get(row, col) as u8) << i)
            })
        })
        .collect()
}

/// Hashes a single-block message on a freshly programmed minimal crossbar
/// and returns the digest with the accumulated cycle and gate-cost
/// counters.
pub fn hash_message(
    params: &Sha3Params,
    msg: &[u8],
) -> Result<(Vec<u8>, CostReport), CrossbarError> {
    let geometry = replica_geometry(1, 1)?;
    let mut xb = Crossbar::new(geometry);
    let layout = KeccakLayout::new(xb.geometry())?;
    layout.setup(&mut xb)?;

    let block = pad_message(msg, params.rate_bits);
    absorb(&mut xb, (0, 0), &block);
    permute(&mut xb, &layout)?;
    let digest = squeeze(&xb, (0, 0), params.digest_bits);

    let cost = xb.cost();
    info!(
        algorithm = params.name,
        bytes = msg.len(),
        latency = cost.latency,
        energy = cost.energy,
        "hashed message"
    );
    Ok((digest, cost))
}
