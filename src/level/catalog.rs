//! The built-in campaign: level number -> metadata.
//!
//! Levels 1–40 are 1D, 41–100 2D and 101–110 3D. Difficulty ramps within
//! each block; optimizer, schedule and terrain come in bands of a few levels.

use crate::error::{PeakError, PeakResult};
use crate::level::LevelSpec;
use crate::mechanics::{Dimension, Schedule};
use crate::optim::OptimizerKind;
use crate::terrain::Archetype;

pub const TOTAL_LEVELS: u32 = 110;

pub fn dimension(n: u32) -> Dimension {
    match n {
        0..=40 => Dimension::One,
        41..=100 => Dimension::Two,
        _ => Dimension::Three,
    }
}

pub fn difficulty(n: u32) -> f64 {
    let i = n as f64;
    let d = match n {
        0..=40 => (i - 1.0) / 120.0,
        41..=100 => 0.33 + (i - 40.0) / 100.0,
        _ => 0.7 + (i - 100.0) / 35.0,
    };
    d.clamp(0.0, 1.0)
}

fn band(n: u32) -> (OptimizerKind, Schedule, Archetype) {
    use Archetype::*;
    use OptimizerKind::*;
    use Schedule::*;
    match n {
        1..=8 => (Sgd, Fixed, Simple),
        9..=16 => (Sgd, StepDecay, Multimodal),
        17..=24 => (Momentum, Fixed, Plateau),
        25..=32 => (Momentum, StepDecay, if n % 2 == 0 { Saddle } else { Plateau }),
        33..=40 => (Adam, Fixed, if n <= 36 { Noisy } else { Multimodal }),
        41..=50 => (Sgd, Fixed, if n >= 46 { Multimodal } else { Simple }),
        51..=58 => (Sgd, StepDecay, if n >= 55 { Ridge } else { Multimodal }),
        59..=66 => (Momentum, Fixed, if n >= 63 { Saddle } else { Plateau }),
        67..=74 => (Momentum, StepDecay, Rosenbrock),
        75..=82 => (Momentum, Warmup, Deceptive),
        83..=90 => (RmsProp, Fixed, Ridge),
        91..=95 => (Adam, Fixed, Deceptive),
        96..=100 => (Adam, Cosine, Deceptive),
        101..=103 => (Sgd, Fixed, Multimodal),
        104..=106 => (Momentum, Fixed, Saddle),
        _ => (Adam, Cosine, Deceptive),
    }
}

/// Metadata of campaign level `n` (1-based).
pub fn level(n: u32) -> PeakResult<LevelSpec> {
    if n == 0 || n > TOTAL_LEVELS {
        return Err(PeakError::UnknownLevel(n));
    }
    let (optimizer, schedule, archetype) = band(n);
    LevelSpec::new(dimension(n), optimizer, schedule, archetype, difficulty(n))
}

/// Every campaign level in order.
pub fn campaign() -> impl Iterator<Item = (u32, LevelSpec)> {
    (1..=TOTAL_LEVELS).filter_map(|n| level(n).ok().map(|spec| (n, spec)))
}
