/// Star rating: player effort against the forged par.
use serde::{Deserialize, Serialize};

/// Seconds of play that cost one extra step.
pub const SECONDS_PER_STEP: f64 = 2.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    /// Terrain visible.
    Dummy,
    #[default]
    Normal,
    /// Tight thresholds.
    Hard,
}

impl PlayMode {
    /// Par multiples for 3, 2 and 1 stars.
    pub fn thresholds(self) -> [f64; 3] {
        match self {
            PlayMode::Hard => [1.05, 1.15, 1.5],
            PlayMode::Dummy | PlayMode::Normal => [1.3, 2.5, 5.0],
        }
    }
}

/// steps + floor(elapsed / 2), saturating.
#[inline]
pub fn effective_steps(steps: usize, elapsed_secs: f64) -> usize {
    steps.saturating_add((elapsed_secs.max(0.0) / SECONDS_PER_STEP).floor() as usize)
}

/// 0..=3 stars.
pub fn rate(steps: usize, elapsed_secs: f64, par: usize, mode: PlayMode) -> u8 {
    let effective = effective_steps(steps, elapsed_secs) as f64;
    let par = par as f64;
    mode.thresholds()
        .iter()
        .position(|k| effective <= par * k)
        .map_or(0, |i| 3 - i as u8)
}
