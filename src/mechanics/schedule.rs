/// Learning-rate schedules: step index -> multiplier on the base rate.
use serde::{Deserialize, Serialize};

/// Per-step retention of Step-Decay.
pub const DECAY_RATE: f64 = 0.995;
/// Length of the Warmup ramp.
pub const WARMUP_STEPS: usize = 10;
/// Cosine annealing horizon; flat afterwards.
pub const COSINE_PERIOD: usize = 500;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Schedule {
    #[default]
    Fixed,
    StepDecay,
    Warmup,
    Cosine,
}

impl Schedule {
    pub const ALL: [Schedule; 4] = [
        Schedule::Fixed,
        Schedule::StepDecay,
        Schedule::Warmup,
        Schedule::Cosine,
    ];

    #[inline]
    pub fn multiplier(self, step: usize) -> f64 {
        match self {
            Schedule::Fixed => 1.0,
            Schedule::StepDecay => step_decay(step),
            Schedule::Warmup => warmup(step),
            Schedule::Cosine => cosine(step),
        }
    }

    /// `base` scaled by the multiplier at `step`.
    #[inline]
    pub fn rate(self, base: f64, step: usize) -> f64 {
        base * self.multiplier(step)
    }
}

/// 0.995^step.
#[inline]
pub fn step_decay(step: usize) -> f64 {
    DECAY_RATE.powi(step.min(i32::MAX as usize) as i32)
}

/// min(1, (step+1)/10).
#[inline]
pub fn warmup(step: usize) -> f64 {
    if step < WARMUP_STEPS {
        (step + 1) as f64 / WARMUP_STEPS as f64
    } else {
        1.0
    }
}

/// 0.5 * (1 + cos(pi * min(step, 500) / 500)).
#[inline]
pub fn cosine(step: usize) -> f64 {
    let t = step.min(COSINE_PERIOD) as f64 / COSINE_PERIOD as f64;
    0.5 * (1.0 + (std::f64::consts::PI * t).cos())
}
