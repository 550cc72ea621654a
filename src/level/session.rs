//! A player's live run on a forged level.

use crate::config::EngineConfig;
use crate::level::forge::ForgedLevel;
use crate::level::scoring::{self, PlayMode};
use crate::mechanics::Coord;
use crate::optim::{OptimizerState, PlayerMove, Sample, Stepper, apply_player_move};

#[derive(Clone, Debug)]
pub struct PlayerRun<'a> {
    level: &'a ForgedLevel,
    stepper: Stepper,
    state: OptimizerState,
    trail: Vec<Sample>,
    win_height: f64,
    won: bool,
    boundary_hits: usize,
}

impl<'a> PlayerRun<'a> {
    pub fn new(level: &'a ForgedLevel, cfg: &EngineConfig) -> Self {
        let spec = level.spec();
        let stepper = Stepper::player(spec.optimizer, spec.schedule, spec.dimension, cfg);
        let win_height = level.dynamic_target().min(cfg.win_ratio * level.field().max_height());
        let mut run = Self {
            level,
            stepper,
            state: OptimizerState::default(),
            trail: Vec::new(),
            win_height,
            won: false,
            boundary_hits: 0,
        };
        run.reset();
        run
    }

    /// Back to the spawn with fresh optimizer memory.
    pub fn reset(&mut self) {
        let spawn = self.level.spawn();
        let h = self.level.field().height(&spawn);
        self.state = OptimizerState::at(spawn);
        self.trail.clear();
        self.trail.push(Sample { coord: spawn, height: h });
        self.won = h >= self.win_height;
        self.boundary_hits = 0;
    }

    /// One jump along `direction` (per-axis sign; inactive axes ignored).
    /// `None` once the run is won.
    pub fn jump(&mut self, direction: [f64; 3]) -> Option<PlayerMove> {
        if self.won {
            return None;
        }
        let mv = apply_player_move(self.level.field(), &self.stepper, &self.state, direction);
        self.state = mv.state;
        self.boundary_hits += mv.boundary as usize;
        self.trail.push(Sample {
            coord: mv.state.position,
            height: mv.height,
        });
        if mv.height >= self.win_height {
            self.won = true;
            log::debug!("player reached the peak in {} jumps", self.steps());
        }
        Some(mv)
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn steps(&self) -> usize {
        self.state.step
    }

    pub fn position(&self) -> Coord {
        self.state.position
    }

    pub fn height(&self) -> f64 {
        self.trail.last().map_or(0.0, |s| s.height)
    }

    pub fn state(&self) -> &OptimizerState {
        &self.state
    }

    pub fn trail(&self) -> &[Sample] {
        &self.trail
    }

    pub fn boundary_hits(&self) -> usize {
        self.boundary_hits
    }

    /// Height that counts as a win.
    pub fn win_height(&self) -> f64 {
        self.win_height
    }

    /// Step length the next jump would use, before optimizer scaling.
    pub fn next_step_length(&self) -> f64 {
        self.stepper.learning_rate(self.state.step)
    }

    /// Star rating of a won run; `None` while still playing.
    pub fn stars(&self, elapsed_secs: f64, mode: PlayMode) -> Option<u8> {
        self.won
            .then(|| scoring::rate(self.steps(), elapsed_secs, self.level.min_steps_required(), mode))
    }
}
