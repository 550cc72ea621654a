//! Engine configuration.
//!
//! Tunables a host may want to override (world extent, verification budget,
//! spawn acceptance band, ...). Optimizer hyper-parameters and schedule shapes
//! are fixed constants in their own modules because scoring depends on them.

use serde::{Deserialize, Serialize};

use crate::error::{PeakError, PeakResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Edge length of the cubic world; every axis is clamped to `[0, world_size]`.
    /// Default: 5000.
    pub world_size: f64,

    /// Forward finite-difference probe distance for gradient estimates.
    /// Default: 5.
    pub probe_delta: f64,

    /// Base learning rate of autonomous runs, before the schedule multiplier.
    /// Default: 10.
    pub base_learning_rate: f64,

    /// An autonomous run has reached the peak once `height >= win_ratio * max_height`.
    /// Default: 0.985.
    pub win_ratio: f64,

    /// The level's practical win threshold is `target_ratio * max_height`.
    /// Default: 0.97.
    pub target_ratio: f64,

    /// Autonomous runs stop after the first step taken at a rate below this.
    /// Default: 0.01.
    pub learning_rate_floor: f64,

    /// A step whose height change is below this counts as stalled.
    /// Default: 0.001.
    pub stall_threshold: f64,

    /// Consecutive stalled steps before an anti-stall perturbation.
    /// Default: 50.
    pub stall_window: usize,

    /// Perturbation span is `jitter_base + jitter_growth * step`.
    /// Default: 30.
    pub jitter_base: f64,

    /// Default: 0.1.
    pub jitter_growth: f64,

    /// Fields synthesized before falling back. Default: 5.
    pub field_attempts: usize,

    /// Spawn candidates sampled per field. Default: 15.
    pub spawn_attempts: usize,

    /// Step budget of a verification (and replay) run. Default: 1500.
    pub verify_max_steps: usize,

    /// Spawn candidates are drawn within `±spawn_radius` of the world centre
    /// on each active axis. Default: 400.
    pub spawn_radius: f64,

    /// Spawn candidates must stand strictly higher than this. Default: 25.
    pub spawn_min_height: f64,

    /// Spawn candidates must stand below `spawn_ceiling_ratio * dynamic_target`.
    /// Default: 0.7.
    pub spawn_ceiling_ratio: f64,

    /// Spawn candidates must be at least this far from the target. Default: 500.
    pub spawn_min_distance: f64,

    /// Player power slider, percent of `player_max_step`. Default: 20.
    pub player_power: f64,

    /// Player step length at 100% power. Default: 20.
    pub player_max_step: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            world_size: 5000.0,
            probe_delta: 5.0,
            base_learning_rate: 10.0,
            win_ratio: 0.985,
            target_ratio: 0.97,
            learning_rate_floor: 0.01,
            stall_threshold: 0.001,
            stall_window: 50,
            jitter_base: 30.0,
            jitter_growth: 0.1,
            field_attempts: 5,
            spawn_attempts: 15,
            verify_max_steps: 1500,
            spawn_radius: 400.0,
            spawn_min_height: 25.0,
            spawn_ceiling_ratio: 0.7,
            spawn_min_distance: 500.0,
            player_power: 20.0,
            player_max_step: 20.0,
        }
    }
}

impl EngineConfig {
    /// World centre on every axis; inactive axes are pinned here.
    #[inline]
    pub fn center(&self) -> f64 {
        self.world_size * 0.5
    }

    /// Player step length before the schedule multiplier.
    #[inline]
    pub fn player_step(&self) -> f64 {
        (self.player_power / 100.0) * self.player_max_step
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> PeakResult<()> {
        if !(self.world_size.is_finite() && self.world_size > 0.0) {
            return Err(PeakError::Config(format!(
                "world_size must be > 0, got {}",
                self.world_size
            )));
        }
        if !(self.probe_delta > 0.0 && self.probe_delta < self.world_size) {
            return Err(PeakError::Config(format!(
                "probe_delta must be in (0, world_size), got {}",
                self.probe_delta
            )));
        }
        if self.base_learning_rate <= 0.0 {
            return Err(PeakError::Config(format!(
                "base_learning_rate must be > 0, got {}",
                self.base_learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.win_ratio) || !(0.0..=1.0).contains(&self.target_ratio) {
            return Err(PeakError::Config(format!(
                "win_ratio and target_ratio must be in [0, 1], got {} and {}",
                self.win_ratio, self.target_ratio
            )));
        }
        if self.stall_window == 0 {
            return Err(PeakError::Config("stall_window must be >= 1".to_string()));
        }
        if self.field_attempts == 0 || self.spawn_attempts == 0 {
            return Err(PeakError::Config(format!(
                "field_attempts and spawn_attempts must be >= 1, got {} and {}",
                self.field_attempts, self.spawn_attempts
            )));
        }
        if self.verify_max_steps == 0 {
            return Err(PeakError::Config("verify_max_steps must be >= 1".to_string()));
        }
        if self.spawn_radius < 0.0 || self.spawn_radius > self.center() {
            return Err(PeakError::Config(format!(
                "spawn_radius must be in [0, world_size/2], got {}",
                self.spawn_radius
            )));
        }
        if !(0.0..=100.0).contains(&self.player_power) {
            return Err(PeakError::Config(format!(
                "player_power must be in [0, 100], got {}",
                self.player_power
            )));
        }
        Ok(())
    }

    /// Load from JSON string; missing fields take their defaults.
    pub fn from_json(json: &str) -> PeakResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| PeakError::Config(format!("JSON parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
