//! Level metadata and the forged, playable state built from it.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{PeakError, PeakResult};
use crate::mechanics::{Dimension, RandomSource, Schedule};
use crate::optim::OptimizerKind;
use crate::terrain::{Archetype, FieldBuilder};

#[cfg(feature = "catalog")]
pub mod catalog;
pub mod forge;
pub mod scoring;
pub mod session;

pub use forge::{Forge, ForgeStep, ForgeTier, ForgedLevel, forge};
pub use scoring::{PlayMode, effective_steps, rate};
pub use session::PlayerRun;

/// What a level asks for, before any terrain exists.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub dimension: Dimension,
    pub optimizer: OptimizerKind,
    pub schedule: Schedule,
    pub archetype: Archetype,
    /// In [0, 1].
    pub difficulty: f64,
}

impl LevelSpec {
    pub fn new(
        dimension: Dimension,
        optimizer: OptimizerKind,
        schedule: Schedule,
        archetype: Archetype,
        difficulty: f64,
    ) -> PeakResult<Self> {
        if !(0.0..=1.0).contains(&difficulty) {
            return Err(PeakError::InvalidLevel(format!(
                "difficulty must be in [0, 1], got {difficulty}"
            )));
        }
        Ok(Self {
            dimension,
            optimizer,
            schedule,
            archetype,
            difficulty,
        })
    }

    pub fn field_builder(&self, cfg: &EngineConfig) -> FieldBuilder {
        FieldBuilder::new(self.archetype, self.dimension, self.difficulty).with_world_size(cfg.world_size)
    }

    /// Same optimizer, schedule and dimension over a different terrain.
    pub fn with_archetype(mut self, archetype: Archetype, difficulty: f64) -> Self {
        self.archetype = archetype;
        self.difficulty = difficulty.clamp(0.0, 1.0);
        self
    }
}

/// A level as the game holds it: metadata, plus the frozen terrain once forged.
#[derive(Clone, Debug)]
pub struct Level {
    spec: LevelSpec,
    forged: Option<ForgedLevel>,
}

impl Level {
    pub fn new(spec: LevelSpec) -> Self {
        Self { spec, forged: None }
    }

    pub fn spec(&self) -> &LevelSpec {
        &self.spec
    }

    pub fn forged(&self) -> Option<&ForgedLevel> {
        self.forged.as_ref()
    }

    pub fn is_forged(&self) -> bool {
        self.forged.is_some()
    }

    /// Forge on first use; later calls return the committed terrain.
    pub fn ensure_forged<R: RandomSource + ?Sized>(&mut self, cfg: &EngineConfig, rng: &mut R) -> &ForgedLevel {
        let spec = self.spec;
        self.forged.get_or_insert_with(|| forge(&spec, cfg, rng))
    }

    /// Drop the committed terrain so the next `ensure_forged` builds a new one.
    pub fn discard(&mut self) -> Option<ForgedLevel> {
        self.forged.take()
    }
}
