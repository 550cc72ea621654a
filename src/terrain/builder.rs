//! Archetype synthesis.
//!
//! Every field gets one primary peak at a random bearing from the spawn,
//! `600 + 1400·difficulty` away, whose amplitude and spread grow with
//! difficulty. Each archetype then layers its own features on top. All
//! randomness comes from the caller's `RandomSource`.

use std::f64::consts::FRAC_PI_2;

use crate::mechanics::{Axis, Coord, Dimension, RandomSource, stoch};
use crate::terrain::field::{
    Archetype, Feature, HeightField, NoiseParams, Peak, RosenbrockValley, SaddlePoint,
};

pub const TARGET_BASE_DISTANCE: f64 = 600.0;
pub const TARGET_DISTANCE_SPAN: f64 = 1400.0;
/// Vertical (z) offset of the target relative to the horizontal distance.
pub const TARGET_ELEVATION_SCALE: f64 = 0.6;
pub const PRIMARY_AMPLITUDE: (f64, f64) = (140.0, 240.0);
pub const PRIMARY_SIGMA: (f64, f64) = (250.0, 350.0);

const RIDGE_NARROW_SIGMA: f64 = 30.0;
const RIDGE_WIDE_SIGMA: f64 = 200.0;

#[inline]
fn lerp((lo, hi): (f64, f64), t: f64) -> f64 {
    lo + (hi - lo) * t
}

/// Synthesizes [`HeightField`]s for one archetype/dimension/difficulty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldBuilder {
    archetype: Archetype,
    dimension: Dimension,
    difficulty: f64,
    world_size: f64,
    extras: bool,
}

/// Working state while features are layered.
struct Draft {
    spawn: Coord,
    target: Coord,
    primary: Peak,
    features: Vec<Feature>,
    ridge_axis: Option<Axis>,
}

impl Draft {
    fn peak(&mut self, center: Coord, amplitude: f64, sigma: f64) {
        self.features.push(Feature::Peak(Peak::isotropic(center, amplitude, sigma)));
    }

    fn midpoint(&self) -> Coord {
        Coord::new(
            (self.spawn.x() + self.target.x()) / 2.0,
            (self.spawn.y() + self.target.y()) / 2.0,
            self.spawn.z(),
        )
    }

    /// Random point within ±span/2 of `around` on x and y; z stays on the spawn plane.
    fn scatter_xy<R: RandomSource + ?Sized>(&self, around: Coord, span: f64, rng: &mut R) -> Coord {
        let x = around.x() + stoch::centered(rng, span);
        let y = around.y() + stoch::centered(rng, span);
        Coord::new(x, y, self.spawn.z())
    }
}

impl FieldBuilder {
    pub fn new(archetype: Archetype, dimension: Dimension, difficulty: f64) -> Self {
        Self {
            archetype,
            dimension,
            difficulty: difficulty.clamp(0.0, 1.0),
            world_size: 5000.0,
            extras: true,
        }
    }

    pub fn with_world_size(mut self, world_size: f64) -> Self {
        self.world_size = world_size;
        self
    }

    /// Build only the primary peak; archetype features are skipped.
    pub fn primary_only(mut self) -> Self {
        self.extras = false;
        self
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn build<R: RandomSource + ?Sized>(&self, spawn: Coord, rng: &mut R) -> HeightField {
        let d = self.difficulty;
        let dist = TARGET_BASE_DISTANCE + d * TARGET_DISTANCE_SPAN;
        let bearing = stoch::angle(rng);
        let elevation = stoch::uniform(rng, -FRAC_PI_2, FRAC_PI_2);

        let mut target = spawn;
        target.0[0] += bearing.cos() * dist;
        if self.dimension >= Dimension::Two {
            target.0[1] += bearing.sin() * dist;
        }
        if self.dimension >= Dimension::Three {
            target.0[2] += elevation.sin() * dist * TARGET_ELEVATION_SCALE;
        }
        let target = target.clamped(self.world_size);

        let primary = Peak::isotropic(target, lerp(PRIMARY_AMPLITUDE, d), lerp(PRIMARY_SIGMA, d));
        let mut draft = Draft {
            spawn,
            target,
            primary,
            features: vec![Feature::Peak(primary)],
            ridge_axis: None,
        };

        if self.extras {
            match self.archetype {
                Archetype::Simple => add_simple(&mut draft, d, rng),
                Archetype::Multimodal => add_multimodal(&mut draft, d, rng),
                Archetype::Plateau => add_plateau(&mut draft, rng),
                Archetype::Saddle => add_saddle(&mut draft, d, rng),
                Archetype::Ridge => add_ridge(&mut draft, rng),
                Archetype::Rosenbrock => add_rosenbrock(&mut draft, d, rng),
                Archetype::Noisy => add_noisy(&mut draft, d, rng),
                Archetype::Deceptive => add_deceptive(&mut draft, d, rng),
            }
        }

        HeightField::new(self.archetype, draft.target, draft.features).with_ridge_axis(draft.ridge_axis)
    }
}

/// 5–20 small distractors scattered on all three axes.
fn add_simple<R: RandomSource + ?Sized>(draft: &mut Draft, d: f64, rng: &mut R) {
    let n = stoch::scaled_count(5, 15.0, d);
    for _ in 0..n {
        let s = draft.spawn;
        let center = Coord::new(
            s.x() + stoch::centered(rng, 3000.0),
            s.y() + stoch::centered(rng, 3000.0),
            s.z() + stoch::centered(rng, 3000.0),
        );
        let amplitude = stoch::uniform(rng, 20.0, 80.0);
        let sigma = stoch::uniform(rng, 100.0, 300.0);
        draft.peak(center, amplitude, sigma);
    }
}

/// A ring of 3–8 competing peaks plus 20 small distractors.
fn add_multimodal<R: RandomSource + ?Sized>(draft: &mut Draft, d: f64, rng: &mut R) {
    let n = stoch::scaled_count(3, 5.0, d);
    let s = draft.spawn;
    for i in 0..n {
        let a = (i as f64 / n as f64) * std::f64::consts::TAU;
        let r = stoch::uniform(rng, 400.0, 1200.0);
        let center = Coord::new(s.x() + a.cos() * r, s.y() + a.sin() * r, s.z());
        let amplitude = stoch::uniform(rng, 60.0, 140.0);
        let sigma = stoch::uniform(rng, 150.0, 350.0);
        draft.peak(center, amplitude, sigma);
    }
    for _ in 0..20 {
        let center = draft.scatter_xy(s, 3000.0, rng);
        let amplitude = stoch::uniform(rng, 10.0, 50.0);
        let sigma = stoch::uniform(rng, 50.0, 200.0);
        draft.peak(center, amplitude, sigma);
    }
}

/// Wide low mesa at the midpoint, ringed by six dips, dotted with tiny bumps.
fn add_plateau<R: RandomSource + ?Sized>(draft: &mut Draft, rng: &mut R) {
    let m = draft.midpoint();
    draft.peak(m, 50.0, 800.0);
    for i in 0..6 {
        let a = (i as f64 / 6.0) * std::f64::consts::TAU;
        draft.peak(Coord::new(m.x() + a.cos() * 500.0, m.y() + a.sin() * 500.0, m.z()), -30.0, 200.0);
    }
    for _ in 0..10 {
        let center = draft.scatter_xy(m, 600.0, rng);
        let amplitude = stoch::uniform(rng, 3.0, 8.0);
        let sigma = stoch::uniform(rng, 100.0, 200.0);
        draft.peak(center, amplitude, sigma);
    }
}

fn add_saddle<R: RandomSource + ?Sized>(draft: &mut Draft, d: f64, rng: &mut R) {
    let m = draft.midpoint();
    draft.features.push(Feature::Saddle(SaddlePoint {
        center: m,
        strength: 40.0 + d * 30.0,
    }));
    let s = draft.spawn;
    for _ in 0..10 {
        let center = draft.scatter_xy(s, 2500.0, rng);
        let amplitude = stoch::uniform(rng, 20.0, 70.0);
        let sigma = stoch::uniform(rng, 100.0, 300.0);
        draft.peak(center, amplitude, sigma);
    }
}

/// Eight anisotropic peaks chained spawn -> target, narrow on one axis,
/// with negative wall dips around the midpoint.
fn add_ridge<R: RandomSource + ?Sized>(draft: &mut Draft, rng: &mut R) {
    let axis = if stoch::coin(rng) { Axis::X } else { Axis::Y };
    draft.ridge_axis = Some(axis);
    let (sigma, sigma_y) = match axis {
        Axis::X => (RIDGE_NARROW_SIGMA, RIDGE_WIDE_SIGMA),
        _ => (RIDGE_WIDE_SIGMA, RIDGE_NARROW_SIGMA),
    };
    let (s, t) = (draft.spawn, draft.target);
    for i in 0..8 {
        let k = i as f64 / 7.0;
        let mut center = s.lerp(&t, k);
        center.0[2] = s.z();
        draft
            .features
            .push(Feature::Peak(Peak::anisotropic(center, 30.0 + k * 40.0, sigma, sigma_y)));
    }
    let m = draft.midpoint();
    for _ in 0..15 {
        let center = draft.scatter_xy(m, 2000.0, rng);
        let amplitude = -stoch::uniform(rng, 20.0, 50.0);
        let sigma = stoch::uniform(rng, 100.0, 200.0);
        draft.peak(center, amplitude, sigma);
    }
}

/// Curved valley toward the target with small peaks jittered along it.
fn add_rosenbrock<R: RandomSource + ?Sized>(draft: &mut Draft, d: f64, rng: &mut R) {
    let (s, t) = (draft.spawn, draft.target);
    draft.features.push(Feature::Rosenbrock(RosenbrockValley {
        start: s,
        target: t,
        a: 1.0,
        b: 100.0 * (0.5 + d * 0.5),
    }));
    for i in 0..8 {
        let k = i as f64 / 7.0;
        let on_line = s.lerp(&t, k);
        let center = draft.scatter_xy(on_line, 300.0, rng);
        let amplitude = stoch::uniform(rng, 20.0, 50.0);
        let sigma = stoch::uniform(rng, 150.0, 250.0);
        draft.peak(center, amplitude, sigma);
    }
}

fn add_noisy<R: RandomSource + ?Sized>(draft: &mut Draft, d: f64, rng: &mut R) {
    draft.features.push(Feature::Noise(NoiseParams {
        frequency: 0.02 + d * 0.03,
        amplitude: 8.0 + d * 15.0,
    }));
    let s = draft.spawn;
    for _ in 0..15 {
        let center = draft.scatter_xy(s, 3000.0, rng);
        let amplitude = stoch::uniform(rng, 20.0, 70.0);
        let sigma = stoch::uniform(rng, 100.0, 300.0);
        draft.peak(center, amplitude, sigma);
    }
}

/// 3–7 decoys at 70–95% of the primary amplitude, plus small distractors.
fn add_deceptive<R: RandomSource + ?Sized>(draft: &mut Draft, d: f64, rng: &mut R) {
    let n = stoch::scaled_count(3, 4.0, d);
    let s = draft.spawn;
    let top = draft.primary.amplitude;
    for _ in 0..n {
        let a = stoch::angle(rng);
        let r = stoch::uniform(rng, 500.0, 1700.0);
        let z = s.z() + stoch::centered(rng, 600.0);
        let center = Coord::new(s.x() + a.cos() * r, s.y() + a.sin() * r, z);
        let amplitude = top * stoch::uniform(rng, 0.7, 0.95);
        let sigma = stoch::uniform(rng, 150.0, 350.0);
        draft.peak(center, amplitude, sigma);
    }
    for _ in 0..15 {
        let center = draft.scatter_xy(s, 3000.0, rng);
        let amplitude = stoch::uniform(rng, 10.0, 35.0);
        let sigma = stoch::uniform(rng, 80.0, 230.0);
        draft.peak(center, amplitude, sigma);
    }
}
