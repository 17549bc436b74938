//! RNG module - seeded randomness and cookie kind draws
//!
//! The level never touches a process-global generator; it owns whatever `rand::Rng`
//! it was built with. [`DefaultRng`] is a PCG32 so a seed fully determines every
//! fill, refill and reshuffle.
//!
//! Kind draws are uniform over the allowed kinds. Excluding kinds up front is the
//! same distribution as redrawing until an allowed kind comes up, but takes exactly
//! one draw per cookie.

use arrayvec::ArrayVec;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::types::{CookieType, MAX_COOKIE_KINDS};

/// Generator used when the caller only supplies a seed
pub type DefaultRng = Pcg32;

/// Create the default generator from a seed
pub fn seeded(seed: u64) -> DefaultRng {
    Pcg32::seed_from_u64(seed)
}

/// Draw one of `kinds` uniformly at random
pub fn draw_kind<R: Rng>(rng: &mut R, kinds: &[CookieType]) -> CookieType {
    draw_kind_except(rng, kinds, &[])
}

/// Draw one of `kinds` uniformly at random, never returning a kind in `excluded`
///
/// Panics if every kind is excluded; a level with at least three kinds never asks
/// for that.
pub fn draw_kind_except<R: Rng>(rng: &mut R, kinds: &[CookieType], excluded: &[CookieType]) -> CookieType {
    let allowed: ArrayVec<CookieType, { MAX_COOKIE_KINDS as usize }> = kinds
        .iter()
        .copied()
        .filter(|kind| !excluded.contains(kind))
        .collect();
    assert!(
        !allowed.is_empty(),
        "no cookie kind left to draw: {:?} all excluded",
        kinds
    );
    allowed[rng.random_range(0..allowed.len())]
}
