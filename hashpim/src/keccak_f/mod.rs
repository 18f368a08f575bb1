//! The five Keccak-f round steps as primitive gate sequences.

mod chi;
mod iota;
mod pi;
mod rho;
mod theta;

use pim_crossbar::{Crossbar, CrossbarError};
use tracing::debug;

use crate::constants::NUM_ROUNDS;
use crate::layout::KeccakLayout;

use chi::chi;
use iota::iota;
use pi::pi;
use rho::rho;
use theta::theta;

/// Runs the full 24-round Keccak-f[1600] permutation over every replica
/// unit of the crossbar.
///
/// The input block must already be absorbed into the state registers and
/// [`KeccakLayout::setup`] must have run once. Rounds are strictly
/// sequential; within a round the five steps run in the fixed θρπχι order.
pub fn permute(xb: &mut Crossbar, layout: &KeccakLayout) -> Result<(), CrossbarError> {
    for round in 0..NUM_ROUNDS {
        debug!(round, latency = xb.latency(), "keccak-f round");
        theta(xb, layout)?;
        rho(xb, layout)?;
        pi(xb, layout)?;
        chi(xb, layout)?;
        iota(xb, layout, round)?;
    }
    Ok(())
}
