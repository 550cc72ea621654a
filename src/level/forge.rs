//! Solvable-level forging.
//!
//! The search synthesizes up to `field_attempts` fields and, per field, up to
//! `spawn_attempts` spawn candidates near the world centre. A candidate is
//! kept only when an autonomous run of the level's own optimizer reaches the
//! peak from it. When the search is exhausted the forge falls back to a
//! `simple` field spawned at the centre, and if even that run does not
//! reach, to an anchor field carrying the primary peak alone.
//!
//! [`Forge`] performs one attempt per [`Forge::advance`] so a host can yield
//! between attempts. Dropping it abandons the search.

use serde::{Deserialize, Serialize};

use crate::attempt_det;
use crate::config::EngineConfig;
use crate::level::LevelSpec;
use crate::level::session::PlayerRun;
use crate::mechanics::{Coord, RandomSource, stoch};
use crate::optim::{Trajectory, simulate};
use crate::terrain::{Archetype, FieldBuilder, HeightField};

/// Which rung of the search produced a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForgeTier {
    /// Requested archetype, sampled spawn, verified run.
    Verified,
    /// `simple` field at the requested difficulty, spawn at the centre.
    SimpleFallback,
    /// Primary peak only, difficulty 0, spawn at the centre.
    Anchor,
}

/// A committed level. Read-only once built.
#[derive(Clone, Debug)]
pub struct ForgedLevel {
    spec: LevelSpec,
    field: HeightField,
    spawn: Coord,
    dynamic_target: f64,
    min_steps_required: usize,
    tier: ForgeTier,
    verified: bool,
    verification: Trajectory,
}

impl ForgedLevel {
    fn commit(
        spec: LevelSpec,
        field: HeightField,
        spawn: Coord,
        verification: Trajectory,
        tier: ForgeTier,
        cfg: &EngineConfig,
    ) -> Self {
        let dynamic_target = cfg.target_ratio * field.max_height();
        Self {
            spec,
            dynamic_target,
            min_steps_required: verification.steps().max(1),
            verified: verification.reached(),
            field,
            spawn,
            tier,
            verification,
        }
    }

    /// The level as requested. The committed field's archetype may differ
    /// when a fallback tier was used.
    pub fn spec(&self) -> &LevelSpec {
        &self.spec
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    pub fn spawn(&self) -> Coord {
        self.spawn
    }

    /// Practical win threshold for players: `target_ratio · max_height`.
    pub fn dynamic_target(&self) -> f64 {
        self.dynamic_target
    }

    /// Par: steps the verification run needed. Never zero.
    pub fn min_steps_required(&self) -> usize {
        self.min_steps_required
    }

    pub fn tier(&self) -> ForgeTier {
        self.tier
    }

    /// The verification run reached the peak.
    pub fn verified(&self) -> bool {
        self.verified
    }

    pub fn verification(&self) -> &Trajectory {
        &self.verification
    }

    /// Fresh autonomous run from the spawn, for "watch the optimizer solve".
    pub fn replay<R: RandomSource + ?Sized>(&self, cfg: &EngineConfig, rng: &mut R) -> Trajectory {
        simulate(&self.spec, &self.field, self.spawn, cfg.verify_max_steps, cfg, rng)
    }

    /// Start a player run at the spawn.
    pub fn start_run(&self, cfg: &EngineConfig) -> PlayerRun<'_> {
        PlayerRun::new(self, cfg)
    }
}

/// Result of one [`Forge::advance`].
#[derive(Clone, Debug)]
pub enum ForgeStep {
    Pending,
    Done(Box<ForgedLevel>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Searching { attempt: usize },
    Fallback,
    Anchor,
}

/// Cooperative forge: one outer attempt (or fallback rung) per `advance`.
#[derive(Clone, Debug)]
pub struct Forge {
    spec: LevelSpec,
    cfg: EngineConfig,
    phase: Phase,
}

impl Forge {
    pub fn new(spec: LevelSpec, cfg: EngineConfig) -> Self {
        Self {
            spec,
            cfg,
            phase: Phase::Searching { attempt: 0 },
        }
    }

    /// Outer attempts made so far.
    pub fn attempts(&self) -> usize {
        match self.phase {
            Phase::Searching { attempt } => attempt,
            Phase::Fallback | Phase::Anchor => self.cfg.field_attempts,
        }
    }

    fn center(&self) -> Coord {
        Coord::splat(self.cfg.center())
    }

    pub fn advance<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> ForgeStep {
        match self.phase {
            Phase::Searching { attempt } => {
                let next = attempt + 1;
                self.phase = if next < self.cfg.field_attempts {
                    Phase::Searching { attempt: next }
                } else {
                    Phase::Fallback
                };
                match self.search(attempt, rng) {
                    Some(level) => self.finish(level),
                    None => ForgeStep::Pending,
                }
            }
            Phase::Fallback => {
                self.phase = Phase::Anchor;
                log::warn!(
                    "no winnable spawn after {} fields ({:?}), falling back to a simple field",
                    self.cfg.field_attempts,
                    self.spec.archetype
                );
                let spec = self.spec;
                let builder = spec.with_archetype(Archetype::Simple, spec.difficulty).field_builder(&self.cfg);
                match self.verify_at_center(builder, ForgeTier::SimpleFallback, rng) {
                    Some(level) => self.finish(level),
                    None => ForgeStep::Pending,
                }
            }
            Phase::Anchor => {
                log::warn!("simple fallback did not verify, using an anchor field");
                let level = self.anchor(rng);
                self.finish(level)
            }
        }
    }

    /// A finished forge starts over on the next `advance`.
    fn finish(&mut self, level: ForgedLevel) -> ForgeStep {
        log::info!(
            "forged {:?}/{:?}/{:?} level: tier {:?}, par {}, max height {:.1}",
            self.spec.dimension,
            self.spec.optimizer,
            self.spec.archetype,
            level.tier,
            level.min_steps_required,
            level.field.max_height()
        );
        self.phase = Phase::Searching { attempt: 0 };
        ForgeStep::Done(Box::new(level))
    }

    fn search<R: RandomSource + ?Sized>(&self, attempt: usize, rng: &mut R) -> Option<ForgedLevel> {
        let cfg = &self.cfg;
        let spec = self.spec;
        let field = spec.field_builder(cfg).build(self.center(), rng);
        let dynamic_target = cfg.target_ratio * field.max_height();

        let found = attempt_det(cfg.spawn_attempts, |_| {
            let spawn = self.sample_spawn(rng);
            let h = field.height(&spawn);
            if h <= cfg.spawn_min_height
                || h >= cfg.spawn_ceiling_ratio * dynamic_target
                || spawn.distance(&field.target()) < cfg.spawn_min_distance
            {
                return None;
            }
            let run = simulate(&spec, &field, spawn, cfg.verify_max_steps, cfg, rng);
            run.reached().then_some((spawn, run))
        });

        match found {
            Some((spawn, run)) => Some(ForgedLevel::commit(spec, field, spawn, run, ForgeTier::Verified, cfg)),
            None => {
                log::debug!(
                    "field attempt {}/{}: no winnable spawn ({:?}, max height {:.1})",
                    attempt + 1,
                    cfg.field_attempts,
                    spec.archetype,
                    field.max_height()
                );
                None
            }
        }
    }

    /// Centre ± `spawn_radius` on every active axis; inactive axes stay centred.
    fn sample_spawn<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Coord {
        let mut spawn = self.center();
        for i in 0..self.spec.dimension.axes() {
            spawn.0[i] += stoch::centered(rng, 2.0 * self.cfg.spawn_radius);
        }
        spawn.clamped(self.cfg.world_size)
    }

    fn verify_at_center<R: RandomSource + ?Sized>(
        &self,
        builder: FieldBuilder,
        tier: ForgeTier,
        rng: &mut R,
    ) -> Option<ForgedLevel> {
        let spawn = self.center();
        let field = builder.build(spawn, rng);
        let run = simulate(&self.spec, &field, spawn, self.cfg.verify_max_steps, &self.cfg, rng);
        if run.reached() {
            Some(ForgedLevel::commit(self.spec, field, spawn, run, tier, &self.cfg))
        } else {
            log::debug!("{tier:?} candidate did not reach ({:?} after {} steps)", run.termination(), run.steps());
            None
        }
    }

    fn anchor<R: RandomSource + ?Sized>(&self, rng: &mut R) -> ForgedLevel {
        let builder = FieldBuilder::new(Archetype::Simple, self.spec.dimension, 0.0)
            .with_world_size(self.cfg.world_size)
            .primary_only();
        attempt_det(self.cfg.field_attempts, |_| self.verify_at_center(builder, ForgeTier::Anchor, rng))
            .unwrap_or_else(|| {
                log::warn!("anchor field did not verify; committing it unverified");
                let spawn = self.center();
                let field = builder.build(spawn, rng);
                let run = simulate(&self.spec, &field, spawn, self.cfg.verify_max_steps, &self.cfg, rng);
                ForgedLevel::commit(self.spec, field, spawn, run, ForgeTier::Anchor, &self.cfg)
            })
    }
}

/// Forge `spec` to completion.
pub fn forge<R: RandomSource + ?Sized>(spec: &LevelSpec, cfg: &EngineConfig, rng: &mut R) -> ForgedLevel {
    let mut forge = Forge::new(*spec, *cfg);
    loop {
        if let ForgeStep::Done(level) = forge.advance(rng) {
            return *level;
        }
    }
}
