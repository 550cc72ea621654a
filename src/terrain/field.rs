//! Closed-form height fields.
//!
//! A field is a gentle two-axis base undulation plus a set of basis
//! features, floored at zero. It is built once and never mutated; its
//! `max_height` is the height at the registered target, evaluated with the
//! exact same function players and simulations use.

use serde::{Deserialize, Serialize};

use crate::mechanics::{Axis, Coord};

/// Base elevation every field starts from.
pub const BASE_HEIGHT: f64 = 30.0;
/// Amplitude of the ambient sine/cosine undulation.
pub const BASE_WAVE_AMPLITUDE: f64 = 6.0;
/// Spatial frequency of the ambient undulation.
pub const BASE_WAVE_FREQUENCY: f64 = 0.004;

const SADDLE_SCALE: f64 = 300.0;
const SADDLE_RADIUS_SQ: f64 = 9.0;
const SADDLE_FALLOFF: f64 = 0.3;
const ROSENBROCK_SCALE: f64 = 500.0;
const ROSENBROCK_HEIGHT: f64 = 80.0;

/// Terrain-shaping strategy of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Simple,
    Multimodal,
    Plateau,
    Saddle,
    Ridge,
    Rosenbrock,
    Noisy,
    Deceptive,
}

impl Archetype {
    pub const ALL: [Archetype; 8] = [
        Archetype::Simple,
        Archetype::Multimodal,
        Archetype::Plateau,
        Archetype::Saddle,
        Archetype::Ridge,
        Archetype::Rosenbrock,
        Archetype::Noisy,
        Archetype::Deceptive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Simple => "simple",
            Archetype::Multimodal => "multimodal",
            Archetype::Plateau => "plateau",
            Archetype::Saddle => "saddle",
            Archetype::Ridge => "ridge",
            Archetype::Rosenbrock => "rosenbrock",
            Archetype::Noisy => "noisy",
            Archetype::Deceptive => "deceptive",
        }
    }
}

/// Gaussian bump (or dip, with negative amplitude).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub center: Coord,
    pub amplitude: f64,
    /// Spread on x and z, and on y unless `sigma_y` is set. Must be > 0.
    pub sigma: f64,
    pub sigma_y: Option<f64>,
}

impl Peak {
    pub fn isotropic(center: Coord, amplitude: f64, sigma: f64) -> Self {
        Self { center, amplitude, sigma, sigma_y: None }
    }

    pub fn anisotropic(center: Coord, amplitude: f64, sigma: f64, sigma_y: f64) -> Self {
        Self { center, amplitude, sigma, sigma_y: Some(sigma_y) }
    }

    #[inline]
    pub fn contribution(&self, p: &Coord) -> f64 {
        let sx = self.sigma;
        let sy = self.sigma_y.unwrap_or(self.sigma);
        let sz = self.sigma;
        let dx = p.x() - self.center.x();
        let dy = p.y() - self.center.y();
        let dz = p.z() - self.center.z();
        let d_sq = (dx * dx) / (sx * sx) + (dy * dy) / (sy * sy) + (dz * dz) / (sz * sz);
        self.amplitude * (-0.5 * d_sq).exp()
    }
}

/// Localised hyperbolic saddle; zero outside a bounded radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaddlePoint {
    pub center: Coord,
    pub strength: f64,
}

impl SaddlePoint {
    #[inline]
    pub fn contribution(&self, p: &Coord) -> f64 {
        let dx = (p.x() - self.center.x()) / SADDLE_SCALE;
        let dy = (p.y() - self.center.y()) / SADDLE_SCALE;
        let dz = (p.z() - self.center.z()) / SADDLE_SCALE;
        let dist = dx * dx + dy * dy + dz * dz;
        if dist < SADDLE_RADIUS_SQ {
            self.strength * (dx * dx - dy * dy) * (-dist * SADDLE_FALLOFF).exp()
        } else {
            0.0
        }
    }
}

/// Inverted Rosenbrock bowl: the classic valley floor becomes a curved ridge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RosenbrockValley {
    pub start: Coord,
    pub target: Coord,
    pub a: f64,
    /// Curvature coefficient.
    pub b: f64,
}

impl RosenbrockValley {
    #[inline]
    pub fn contribution(&self, p: &Coord) -> f64 {
        let dx = (p.x() - self.target.x()) / ROSENBROCK_SCALE;
        let dy = (p.y() - self.target.y()) / ROSENBROCK_SCALE;
        let bend = dy - dx * dx;
        let r = (self.a - dx) * (self.a - dx) + self.b * bend * bend;
        ROSENBROCK_HEIGHT / (1.0 + r * 0.5)
    }
}

/// Three-harmonic trig texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseParams {
    pub frequency: f64,
    pub amplitude: f64,
}

impl NoiseParams {
    #[inline]
    pub fn contribution(&self, p: &Coord) -> f64 {
        let (x, y) = (p.x(), p.y());
        let (f, a) = (self.frequency, self.amplitude);
        (x * f * 7.3 + y * 3.1).sin() * a * 0.4
            + (x * f * 4.7 - y * 5.3).cos() * a * 0.3
            + ((x + y) * f * 2.1).sin() * a * 0.3
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Feature {
    Peak(Peak),
    Saddle(SaddlePoint),
    Rosenbrock(RosenbrockValley),
    Noise(NoiseParams),
}

/// Ambient undulation: 30 + 6 sin(0.004 x) + 6 cos(0.004 y).
#[inline]
pub fn base_height(p: &Coord) -> f64 {
    BASE_HEIGHT
        + (p.x() * BASE_WAVE_FREQUENCY).sin() * BASE_WAVE_AMPLITUDE
        + (p.y() * BASE_WAVE_FREQUENCY).cos() * BASE_WAVE_AMPLITUDE
}

/// Row-major height map, `map[v][u]`.
pub type HeightMap = Vec<Vec<f64>>;

#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    archetype: Archetype,
    target: Coord,
    features: Vec<Feature>,
    ridge_axis: Option<Axis>,
    max_height: f64,
}

impl HeightField {
    /// Freeze a feature set. `max_height` is evaluated at `target` after
    /// every feature is in place.
    pub fn new(archetype: Archetype, target: Coord, features: Vec<Feature>) -> Self {
        let mut field = Self {
            archetype,
            target,
            features,
            ridge_axis: None,
            max_height: 0.0,
        };
        field.max_height = field.height(&target);
        field
    }

    pub(crate) fn with_ridge_axis(mut self, axis: Option<Axis>) -> Self {
        self.ridge_axis = axis;
        self
    }

    /// Elevation at `p`; never negative.
    pub fn height(&self, p: &Coord) -> f64 {
        let mut h = base_height(p);
        for feature in &self.features {
            h += match feature {
                Feature::Noise(n) if self.archetype == Archetype::Noisy => n.contribution(p),
                Feature::Noise(_) => 0.0,
                Feature::Saddle(s) => s.contribution(p),
                Feature::Rosenbrock(r) => r.contribution(p),
                Feature::Peak(pk) => pk.contribution(p),
            };
        }
        h.max(0.0)
    }

    #[inline]
    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    #[inline]
    pub fn target(&self) -> Coord {
        self.target
    }

    #[inline]
    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    /// Narrow axis of a ridge field.
    #[inline]
    pub fn ridge_axis(&self) -> Option<Axis> {
        self.ridge_axis
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn peaks(&self) -> impl Iterator<Item = &Peak> {
        self.features.iter().filter_map(|f| match f {
            Feature::Peak(p) => Some(p),
            _ => None,
        })
    }

    /// The peak registered at the target.
    pub fn primary(&self) -> Option<&Peak> {
        self.peaks().next()
    }

    pub fn saddles(&self) -> impl Iterator<Item = &SaddlePoint> {
        self.features.iter().filter_map(|f| match f {
            Feature::Saddle(s) => Some(s),
            _ => None,
        })
    }

    pub fn rosenbrock(&self) -> Option<&RosenbrockValley> {
        self.features.iter().find_map(|f| match f {
            Feature::Rosenbrock(r) => Some(r),
            _ => None,
        })
    }

    pub fn noise(&self) -> Option<&NoiseParams> {
        self.features.iter().find_map(|f| match f {
            Feature::Noise(n) => Some(n),
            _ => None,
        })
    }

    /// Sample a square slice through `origin` spanned by axes `u` and `v`,
    /// `resolution` samples per side covering `origin ± extent/2`; a single
    /// sample lands on `origin`. Feeds heatmaps and minimaps.
    pub fn sample_grid(
        &self,
        origin: Coord,
        u: Axis,
        v: Axis,
        extent: f64,
        resolution: usize,
    ) -> HeightMap {
        let n = resolution.max(1);
        let (step, half) = if n > 1 { (extent / (n - 1) as f64, extent * 0.5) } else { (0.0, 0.0) };
        let start_u = origin.axis(u) - half;
        let start_v = origin.axis(v) - half;
        (0..n)
            .map(|j| {
                (0..n)
                    .map(|i| {
                        let mut p = origin;
                        p.0[u.index()] = start_u + step * i as f64;
                        p.0[v.index()] = start_v + step * j as f64;
                        self.height(&p)
                    })
                    .collect()
            })
            .collect()
    }
}

/// Free-function form of [`HeightField::height`].
#[inline]
pub fn height(field: &HeightField, coord: &Coord) -> f64 {
    field.height(coord)
}
