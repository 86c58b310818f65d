use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::cards::{standard_deck, Card, DECK_SIZE};

/// Identifier of the frozen shuffle construction. Recorded in every seed
/// manifest and calibration summary; changing the PRNG family, its seeding,
/// or the sampling method is a breaking change to all stored seeds.
pub const PRNG_ID: &str = "fisher-yates/pcg64/seed-from-u64/v1";

/// Deterministic deck permutation for a 64-bit seed.
///
/// Implementation detail:
/// - The 64-bit seed is expanded via `SeedableRng::seed_from_u64`
///   (SplitMix64-based) into a PCG 64-bit generator (rand_pcg::Pcg64).
/// - Fisher–Yates over the canonical deck, i from 51 down to 1, with
///   `j = gen_range(0..=i)` (uniform integer sampling with rejection,
///   never modulo bias).
/// - Same seed, everywhere, forever, yields the same permutation.
pub fn shuffled_deck(seed: u64) -> [Card; DECK_SIZE] {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut deck = standard_deck();
    for i in (1..DECK_SIZE).rev() {
        let j = rng.gen_range(0..=i);
        deck.swap(i, j);
    }
    deck
}

/// Deterministic RNG for a calibration rollout stream, derived from the
/// (seed, candidate index, rollout index) triple. Streams for distinct
/// triples are decorrelated by odd-multiplier mixing before seeding.
#[inline]
pub fn rollout_rng(seed: u64, candidate: u64, rollout: u64) -> impl Rng {
    let derived: u64 = seed
        ^ candidate.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ rollout.wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    Pcg64::seed_from_u64(derived)
}
