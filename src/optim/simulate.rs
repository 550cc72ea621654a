//! Autonomous runs.
//!
//! A run follows the normalised forward-difference gradient from a start
//! point until it reaches `win_ratio · max_height`, exhausts its step budget
//! or takes a step whose scheduled learning rate is under the floor. Long
//! flat stretches are escaped by an anti-stall perturbation tracked by
//! [`StallMonitor`].

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::level::LevelSpec;
use crate::mechanics::{Coord, RandomSource, control, stoch};
use crate::optim::stepper::{OptimizerState, Stepper, forward_gradient, normalize};
use crate::terrain::HeightField;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub coord: Coord,
    pub height: f64,
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    Reached,
    StepBudget,
    LearningRateFloor,
}

/// Append-only record of one run, initial sample included.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    samples: Vec<Sample>,
    termination: Termination,
    perturbations: Vec<usize>,
    boundary_hits: usize,
}

impl Trajectory {
    #[inline]
    pub fn reached(&self) -> bool {
        self.termination == Termination::Reached
    }

    /// Steps taken; the initial sample is not a step.
    #[inline]
    pub fn steps(&self) -> usize {
        self.samples.len().saturating_sub(1)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Step indices at which an anti-stall perturbation fired.
    pub fn perturbations(&self) -> &[usize] {
        &self.perturbations
    }

    pub fn boundary_hits(&self) -> usize {
        self.boundary_hits
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Highest elevation seen along the run.
    pub fn peak_height(&self) -> f64 {
        self.samples.iter().map(|s| s.height).fold(0.0, f64::max)
    }
}

/// Anti-stall phases: `Stepping -> Stalled(n) -> Jittered -> Stepping`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StallPhase {
    #[default]
    Stepping,
    /// `n` consecutive steps below the stall threshold.
    Stalled(usize),
    /// A perturbation was just requested; the count restarts.
    Jittered,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StallMonitor {
    phase: StallPhase,
    window: usize,
    threshold: f64,
}

impl StallMonitor {
    pub fn new(window: usize, threshold: f64) -> Self {
        Self {
            phase: StallPhase::Stepping,
            window: window.max(1),
            threshold,
        }
    }

    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self::new(cfg.stall_window, cfg.stall_threshold)
    }

    #[inline]
    pub fn phase(&self) -> StallPhase {
        self.phase
    }

    /// Feed one step's height change; `true` means perturb now.
    pub fn observe(&mut self, dh: f64) -> bool {
        if dh.abs() >= self.threshold {
            self.phase = StallPhase::Stepping;
            return false;
        }
        let n = match self.phase {
            StallPhase::Stalled(n) => n + 1,
            StallPhase::Stepping | StallPhase::Jittered => 1,
        };
        if n >= self.window {
            self.phase = StallPhase::Jittered;
            true
        } else {
            self.phase = StallPhase::Stalled(n);
            false
        }
    }
}

/// Drives a [`Stepper`] over a field.
#[derive(Clone, Copy, Debug)]
pub struct PathSimulator<'a> {
    field: &'a HeightField,
    stepper: Stepper,
    cfg: &'a EngineConfig,
}

impl<'a> PathSimulator<'a> {
    pub fn new(field: &'a HeightField, stepper: Stepper, cfg: &'a EngineConfig) -> Self {
        Self { field, stepper, cfg }
    }

    /// Height an autonomous run must reach.
    #[inline]
    pub fn goal(&self) -> f64 {
        self.cfg.win_ratio * self.field.max_height()
    }

    pub fn run<R: RandomSource + ?Sized>(&self, start: Coord, max_steps: usize, rng: &mut R) -> Trajectory {
        let field = self.field;
        let dim = self.stepper.dimension;
        let goal = self.goal();

        let mut state = OptimizerState::at(start.clamped(self.cfg.world_size));
        let mut h = field.height(&state.position);
        let mut samples = Vec::with_capacity(max_steps.min(2048) + 1);
        samples.push(Sample { coord: state.position, height: h });

        let mut perturbations = Vec::new();
        let mut boundary_hits = 0;
        let mut monitor = StallMonitor::from_config(self.cfg);

        let mut termination = if h >= goal { Termination::Reached } else { Termination::StepBudget };

        if termination != Termination::Reached {
            for step in 0..max_steps {
                let g = forward_gradient(field, &state.position, h, dim, self.stepper.probe_delta);
                let out = self.stepper.step(&state, normalize(g), g);
                if out.boundary {
                    boundary_hits += 1;
                    log::trace!("step {step}: clamped at world boundary {:?}", out.state.position);
                }
                state = out.state;

                let next_h = field.height(&state.position);
                samples.push(Sample { coord: state.position, height: next_h });
                if next_h >= goal {
                    termination = Termination::Reached;
                    break;
                }

                if monitor.observe(next_h - h) {
                    let span = self.cfg.jitter_base + self.cfg.jitter_growth * step as f64;
                    for i in 0..dim.axes() {
                        let nudged = state.position.0[i] + stoch::centered(rng, span);
                        state.position.0[i] = control::clamp_report(nudged, 0.0, self.cfg.world_size).0;
                    }
                    state.reset_velocity();
                    perturbations.push(step);
                    log::debug!("step {step}: stalled for {} steps, jitter span {span:.1}", self.cfg.stall_window);
                    h = field.height(&state.position);
                    if h >= goal {
                        // The step ends where the jitter left it.
                        if let Some(last) = samples.last_mut() {
                            *last = Sample { coord: state.position, height: h };
                        }
                        termination = Termination::Reached;
                        break;
                    }
                } else {
                    h = next_h;
                }

                // The step at a sub-floor rate is still taken.
                if out.learning_rate < self.cfg.learning_rate_floor {
                    termination = Termination::LearningRateFloor;
                    break;
                }
            }
        }

        Trajectory {
            samples,
            termination,
            perturbations,
            boundary_hits,
        }
    }
}

/// Autonomous run of `spec`'s optimizer and schedule over `field`.
pub fn simulate<R: RandomSource + ?Sized>(
    spec: &LevelSpec,
    field: &HeightField,
    start: Coord,
    max_steps: usize,
    cfg: &EngineConfig,
    rng: &mut R,
) -> Trajectory {
    let stepper = Stepper::autonomous(spec.optimizer, spec.schedule, spec.dimension, cfg);
    PathSimulator::new(field, stepper, cfg).run(start, max_steps, rng)
}
