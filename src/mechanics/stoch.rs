/// Stochastic mechanics: the injected random source and the draws built on it.
/// Generation never touches ambient randomness; callers hand in a
/// `RandomSource` (normally a seeded `bevy_prng::WyRand`).
use bevy_prng::WyRand;
use rand_core::{RngCore, SeedableRng};

/// Uniform reals in [0, 1).
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        ((self.next_u64() >> 11) as f64) / ((1u64 << 53) as f64)
    }
}

/// The stock generator, seeded the same way everywhere.
pub fn seeded(seed: u64) -> WyRand {
    WyRand::from_seed(seed.to_le_bytes())
}

/// Uniform in [lo, hi).
#[inline]
pub fn uniform<R: RandomSource + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + rng.next_f64() * (hi - lo)
}

/// Centred offset: (u - 0.5) * span, i.e. within ±span/2.
#[inline]
pub fn centered<R: RandomSource + ?Sized>(rng: &mut R, span: f64) -> f64 {
    (rng.next_f64() - 0.5) * span
}

/// Bearing in [0, 2π).
#[inline]
pub fn angle<R: RandomSource + ?Sized>(rng: &mut R) -> f64 {
    rng.next_f64() * std::f64::consts::TAU
}

/// Fair coin.
#[inline]
pub fn coin<R: RandomSource + ?Sized>(rng: &mut R) -> bool {
    rng.next_f64() > 0.5
}

/// Integer count `base + floor(scale * t)`.
#[inline]
pub fn scaled_count(base: usize, scale: f64, t: f64) -> usize {
    base + (scale * t).floor().max(0.0) as usize
}
