/// Spatial mechanics: world coordinates, axes and dimensionality.
use serde::{Deserialize, Serialize};

use crate::error::{PeakError, PeakResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// How many axes a level lets the player move along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Dimension {
    pub fn from_count(n: u8) -> PeakResult<Self> {
        match n {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(PeakError::InvalidLevel(format!("dimension must be 1, 2 or 3, got {n}"))),
        }
    }

    #[inline]
    pub fn axes(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_active(self, axis: Axis) -> bool {
        axis.index() < self.axes()
    }

    /// Zero every component on an inactive axis.
    #[inline]
    pub fn mask(self, v: [f64; 3]) -> [f64; 3] {
        let mut out = v;
        for axis in Axis::ALL {
            if !self.is_active(axis) {
                out[axis.index()] = 0.0;
            }
        }
        out
    }
}

/// A point of the world. Always three axes; axes a level does not use stay
/// pinned where the spawn put them (the world centre).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord(pub [f64; 3]);

impl Coord {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self([v, v, v])
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0[0]
    }
    #[inline]
    pub fn y(&self) -> f64 {
        self.0[1]
    }
    #[inline]
    pub fn z(&self) -> f64 {
        self.0[2]
    }

    #[inline]
    pub fn axis(&self, axis: Axis) -> f64 {
        self.0[axis.index()]
    }

    /// Same point moved by `delta` along one axis (unclamped; probes may peek past the edge).
    #[inline]
    pub fn offset(mut self, axis: usize, delta: f64) -> Self {
        self.0[axis] += delta;
        self
    }

    #[inline]
    pub fn distance(&self, other: &Coord) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Clamp every axis to `[0, world]`.
    #[inline]
    pub fn clamped(self, world: f64) -> Self {
        Self(self.0.map(|v| v.clamp(0.0, world)))
    }

    /// Linear interpolation toward `other` (t = 0 gives `self`).
    #[inline]
    pub fn lerp(&self, other: &Coord, t: f64) -> Self {
        Self([
            self.0[0] + (other.0[0] - self.0[0]) * t,
            self.0[1] + (other.0[1] - self.0[1]) * t,
            self.0[2] + (other.0[2] - self.0[2]) * t,
        ])
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}
