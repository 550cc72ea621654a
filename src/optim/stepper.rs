//! One optimizer step.
//!
//! Player-driven and autonomous movement share this code path; the
//! [`DirectionSource`] picks the momentum constants and the way Adam turns
//! its moments into a displacement. A step is a pure function of the prior
//! state and its inputs.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::mechanics::{Coord, Dimension, Schedule, control};
use crate::terrain::HeightField;

pub const BETA1: f64 = 0.9;
pub const BETA2: f64 = 0.999;
pub const RMS_DECAY: f64 = 0.9;
/// Added to the root second moment of RMSprop and Adam.
pub const ADAPTIVE_EPSILON: f64 = 0.01;
pub const GRADIENT_MOMENTUM: f64 = 0.9;
pub const PLAYER_MOMENTUM: f64 = 0.85;
/// Share of the player step fed into the velocity each move.
pub const PLAYER_VELOCITY_GAIN: f64 = 0.5;
/// Velocity retained on an axis whose input reverses it (player Momentum).
pub const REVERSAL_PENALTY: f64 = 0.5;
/// Cap on player-mode Adam's per-axis adaptive scale.
pub const ADAM_SCALE_CAP: f64 = 4.0;
/// Floor on the gradient norm when normalising.
pub const MIN_GRADIENT_NORM: f64 = 1e-4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptimizerKind {
    #[default]
    Sgd,
    Momentum,
    RmsProp,
    Adam,
}

impl OptimizerKind {
    pub const ALL: [OptimizerKind; 4] = [
        OptimizerKind::Sgd,
        OptimizerKind::Momentum,
        OptimizerKind::RmsProp,
        OptimizerKind::Adam,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OptimizerKind::Sgd => "SGD",
            OptimizerKind::Momentum => "Momentum",
            OptimizerKind::RmsProp => "RMSprop",
            OptimizerKind::Adam => "Adam",
        }
    }

    /// Whether the optimizer carries a velocity between steps.
    pub fn has_velocity(self) -> bool {
        matches!(self, OptimizerKind::Momentum | OptimizerKind::Adam)
    }
}

/// Where the step direction comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectionSource {
    /// Unit-normalised finite-difference gradient (autonomous runs).
    Gradient,
    /// Raw ±1 per-axis input from the player.
    PlayerInput,
}

/// Per-run optimizer memory. Owned by exactly one run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OptimizerState {
    pub position: Coord,
    pub velocity: [f64; 3],
    /// EMA of the squared gradient (RMSprop, Adam second moment).
    pub second_moment: [f64; 3],
    /// EMA of the gradient/direction (Adam first moment).
    pub first_moment: [f64; 3],
    pub step: usize,
}

impl OptimizerState {
    pub fn at(position: Coord) -> Self {
        Self { position, ..Self::default() }
    }

    pub fn reset_velocity(&mut self) {
        self.velocity = [0.0; 3];
    }

    pub fn speed(&self) -> f64 {
        self.velocity.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self
                .velocity
                .iter()
                .chain(self.first_moment.iter())
                .chain(self.second_moment.iter())
                .all(|v| v.is_finite())
    }
}

/// Result of one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    pub state: OptimizerState,
    /// Requested move, before clamping.
    pub displacement: [f64; 3],
    /// Scheduled learning rate used for this step.
    pub learning_rate: f64,
    /// Some axis would have left the world and was clamped.
    pub boundary: bool,
}

/// Optimizer rule + schedule, bound to a level's dimensionality.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stepper {
    pub optimizer: OptimizerKind,
    pub schedule: Schedule,
    pub source: DirectionSource,
    pub dimension: Dimension,
    pub base_rate: f64,
    pub probe_delta: f64,
    pub world_size: f64,
}

impl Stepper {
    /// Stepper for simulated runs: gradient directions, `base_learning_rate`.
    pub fn autonomous(
        optimizer: OptimizerKind,
        schedule: Schedule,
        dimension: Dimension,
        cfg: &EngineConfig,
    ) -> Self {
        Self {
            optimizer,
            schedule,
            source: DirectionSource::Gradient,
            dimension,
            base_rate: cfg.base_learning_rate,
            probe_delta: cfg.probe_delta,
            world_size: cfg.world_size,
        }
    }

    /// Stepper for player input: raw directions, power-slider step length.
    pub fn player(
        optimizer: OptimizerKind,
        schedule: Schedule,
        dimension: Dimension,
        cfg: &EngineConfig,
    ) -> Self {
        Self {
            optimizer,
            schedule,
            source: DirectionSource::PlayerInput,
            dimension,
            base_rate: cfg.player_step(),
            probe_delta: cfg.probe_delta,
            world_size: cfg.world_size,
        }
    }

    #[inline]
    pub fn learning_rate(&self, step: usize) -> f64 {
        self.schedule.rate(self.base_rate, step)
    }

    /// Advance `state` by one step. `direction` and `gradient` are masked
    /// to the active axes; the step index is `state.step`.
    pub fn step(&self, state: &OptimizerState, direction: [f64; 3], gradient: [f64; 3]) -> StepOutcome {
        let lr = self.learning_rate(state.step);
        let dir = self.dimension.mask(direction);
        let g = self.dimension.mask(gradient);
        let player = self.source == DirectionSource::PlayerInput;

        let mut next = *state;
        let mut disp = [0.0; 3];

        match self.optimizer {
            OptimizerKind::Sgd => {
                for i in 0..3 {
                    disp[i] = dir[i] * lr;
                }
            }
            OptimizerKind::Momentum => {
                for i in 0..3 {
                    let v = &mut next.velocity[i];
                    if player {
                        if dir[i] != 0.0 && control::sign(dir[i]) != control::sign(*v) {
                            *v *= REVERSAL_PENALTY;
                        }
                        *v = *v * PLAYER_MOMENTUM + dir[i] * lr * PLAYER_VELOCITY_GAIN;
                    } else {
                        *v = GRADIENT_MOMENTUM * *v + lr * dir[i];
                    }
                    disp[i] = *v;
                }
            }
            OptimizerKind::RmsProp => {
                for i in 0..3 {
                    let s = control::ema(next.second_moment[i], g[i] * g[i], RMS_DECAY);
                    next.second_moment[i] = s;
                    disp[i] = lr * dir[i] / (s.sqrt() + ADAPTIVE_EPSILON);
                }
            }
            OptimizerKind::Adam => {
                let t = (state.step + 1).min(i32::MAX as usize) as i32;
                let bc1 = 1.0 - BETA1.powi(t);
                let bc2 = 1.0 - BETA2.powi(t);
                for i in 0..3 {
                    let s = control::ema(next.second_moment[i], g[i] * g[i], BETA2);
                    next.second_moment[i] = s;
                    let v_hat = s / bc2;
                    if player {
                        // The first moment is tracked but the move is a momentum
                        // velocity scaled per axis by Adam's adaptive factor.
                        next.first_moment[i] = control::ema(next.first_moment[i], g[i], BETA1);
                        let scale = (1.0 / (v_hat.sqrt() + ADAPTIVE_EPSILON)).min(ADAM_SCALE_CAP);
                        let v = next.velocity[i] * PLAYER_MOMENTUM + dir[i] * lr * PLAYER_VELOCITY_GAIN;
                        next.velocity[i] = v;
                        disp[i] = v * scale;
                    } else {
                        let m = control::ema(next.first_moment[i], dir[i], BETA1);
                        next.first_moment[i] = m;
                        disp[i] = lr * (m / bc1) / (v_hat.sqrt() + ADAPTIVE_EPSILON);
                    }
                }
            }
        }

        let mut boundary = false;
        for i in 0..self.dimension.axes() {
            let (p, hit) = control::clamp_report(next.position.0[i] + disp[i], 0.0, self.world_size);
            next.position.0[i] = p;
            boundary |= hit;
        }
        next.step += 1;

        StepOutcome {
            state: next,
            displacement: disp,
            learning_rate: lr,
            boundary,
        }
    }
}

/// Forward-difference gradient on every active axis:
/// `g_i = height(p + delta·e_i) - height(p)`, with `here = height(p)`.
pub fn forward_gradient(
    field: &HeightField,
    at: &Coord,
    here: f64,
    dimension: Dimension,
    delta: f64,
) -> [f64; 3] {
    let mut g = [0.0; 3];
    for (i, gi) in g.iter_mut().enumerate().take(dimension.axes()) {
        *gi = field.height(&at.offset(i, delta)) - here;
    }
    g
}

/// Forward difference probed along the player's input: only axes with
/// non-zero input are probed, in the direction of that input.
pub fn directional_probe(
    field: &HeightField,
    at: &Coord,
    here: f64,
    direction: [f64; 3],
    delta: f64,
) -> [f64; 3] {
    let mut g = [0.0; 3];
    for i in 0..3 {
        if direction[i] != 0.0 {
            g[i] = field.height(&at.offset(i, delta * direction[i])) - here;
        }
    }
    g
}

/// Unit vector along `g`; a vanishing gradient yields a vanishing direction.
#[inline]
pub fn normalize(g: [f64; 3]) -> [f64; 3] {
    let len = g.iter().map(|v| v * v).sum::<f64>().sqrt().max(MIN_GRADIENT_NORM);
    g.map(|v| v / len)
}

/// Outcome of a player move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerMove {
    pub state: OptimizerState,
    pub displacement: [f64; 3],
    pub height: f64,
    pub boundary: bool,
}

/// Advance a player's state by one input. Input components are reduced to
/// their sign and masked to the level's active axes.
pub fn apply_player_move(
    field: &HeightField,
    stepper: &Stepper,
    state: &OptimizerState,
    raw_direction: [f64; 3],
) -> PlayerMove {
    let dir = stepper.dimension.mask(raw_direction.map(control::sign));
    let here = field.height(&state.position);
    let g = directional_probe(field, &state.position, here, dir, stepper.probe_delta);
    let out = stepper.step(state, dir, g);
    if out.boundary {
        log::trace!("player move clamped at world boundary: {:?}", out.state.position);
    }
    PlayerMove {
        state: out.state,
        displacement: out.displacement,
        height: field.height(&out.state.position),
        boundary: out.boundary,
    }
}
