// tests/forge.rs
use peak_finder::level::{Forge, ForgeStep, Level};
use peak_finder::mechanics::{Coord, Dimension, Schedule, seeded};
use peak_finder::optim::OptimizerKind;
use peak_finder::terrain::Archetype;
use peak_finder::{EngineConfig, ForgeTier, ForgedLevel, LevelSpec, forge};

const DIMS: [Dimension; 3] = [Dimension::One, Dimension::Two, Dimension::Three];

fn check_committed(level: &ForgedLevel, cfg: &EngineConfig) {
    let field = level.field();
    let run = level.verification();
    assert!(level.verified());
    assert!(run.reached(), "{:?} {:?}", level.spec(), level.tier());
    assert!(level.min_steps_required() >= 1);
    assert!(run.steps() <= cfg.verify_max_steps);
    assert_eq!(run.first().unwrap().coord, level.spawn());
    assert!(run.last().unwrap().height >= cfg.win_ratio * field.max_height());
    assert_eq!(level.dynamic_target(), cfg.target_ratio * field.max_height());
    for axis in level.spec().dimension.axes()..3 {
        assert_eq!(level.spawn().0[axis], cfg.center());
    }
}

/* ──────────────────────────────────────────────────────────────────────────
1) Every archetype × dimension forges a winnable level
────────────────────────────────────────────────────────────────────────── */

#[test]
fn forge_always_commits_a_winnable_level() {
    let cfg = EngineConfig::default();
    let mut n = 0usize;
    for seed in 0..5u64 {
        let mut rng = seeded(1000 + seed);
        for archetype in Archetype::ALL {
            for dim in DIMS {
                let opt = OptimizerKind::ALL[n % 4];
                let schedule = Schedule::ALL[(n / 4) % 4];
                let difficulty = (n % 3) as f64 / 2.0;
                let spec = LevelSpec::new(dim, opt, schedule, archetype, difficulty).unwrap();
                let level = forge(&spec, &cfg, &mut rng);
                check_committed(&level, &cfg);
                if level.tier() == ForgeTier::Verified {
                    assert_eq!(level.field().archetype(), archetype);
                    assert_eq!(level.min_steps_required(), level.verification().steps());
                }
                n += 1;
            }
        }
    }
    assert_eq!(n, 120);
}

#[test]
fn verified_spawn_respects_acceptance_band() {
    let cfg = EngineConfig::default();
    let mut rng = seeded(31);
    let mut verified = 0;
    for archetype in Archetype::ALL {
        let spec = LevelSpec::new(Dimension::Two, OptimizerKind::Adam, Schedule::Fixed, archetype, 0.3).unwrap();
        let level = forge(&spec, &cfg, &mut rng);
        if level.tier() != ForgeTier::Verified {
            continue;
        }
        verified += 1;
        let h = level.field().height(&level.spawn());
        assert!(h > cfg.spawn_min_height);
        assert!(h < cfg.spawn_ceiling_ratio * level.dynamic_target());
        assert!(level.spawn().distance(&level.field().target()) >= cfg.spawn_min_distance);
        for axis in 0..2 {
            assert!((level.spawn().0[axis] - cfg.center()).abs() <= cfg.spawn_radius);
        }
    }
    assert!(verified > 0);
}

/* ──────────────────────────────────────────────────────────────────────────
2) Fallback ladder
────────────────────────────────────────────────────────────────────────── */

#[test]
fn exhausted_search_falls_back_to_center_spawn() {
    let cfg = EngineConfig {
        spawn_min_height: 1.0e9,
        field_attempts: 2,
        ..EngineConfig::default()
    };
    let mut rng = seeded(8);
    for dim in DIMS {
        let spec = LevelSpec::new(dim, OptimizerKind::Momentum, Schedule::StepDecay, Archetype::Ridge, 0.9).unwrap();
        let level = forge(&spec, &cfg, &mut rng);
        assert_ne!(level.tier(), ForgeTier::Verified);
        assert_eq!(level.spawn(), Coord::splat(cfg.center()));
        assert_eq!(level.field().archetype(), Archetype::Simple);
        assert_eq!(level.spec().archetype, Archetype::Ridge);
        check_committed(&level, &cfg);
    }
}

#[test]
fn unverifiable_budget_commits_an_unverified_anchor() {
    let cfg = EngineConfig {
        spawn_min_height: 1.0e9,
        field_attempts: 2,
        verify_max_steps: 1,
        ..EngineConfig::default()
    };
    let spec = LevelSpec::new(Dimension::Two, OptimizerKind::Sgd, Schedule::Fixed, Archetype::Saddle, 0.5).unwrap();
    let level = forge(&spec, &cfg, &mut seeded(9));
    assert_eq!(level.tier(), ForgeTier::Anchor);
    assert!(!level.verified());
    assert_eq!(level.min_steps_required(), 1);
    assert_eq!(level.field().features().len(), 1);
    assert_eq!(level.field().primary().unwrap().amplitude, 140.0);
}

/* ──────────────────────────────────────────────────────────────────────────
3) Cooperative forging
────────────────────────────────────────────────────────────────────────── */

#[test]
fn forge_yields_between_attempts() {
    let cfg = EngineConfig {
        spawn_min_height: 1.0e9,
        field_attempts: 3,
        ..EngineConfig::default()
    };
    let spec = LevelSpec::new(Dimension::Two, OptimizerKind::Sgd, Schedule::Fixed, Archetype::Simple, 0.2).unwrap();
    let mut rng = seeded(10);
    let mut f = Forge::new(spec, cfg);
    for i in 0..3 {
        assert_eq!(f.attempts(), i);
        assert!(matches!(f.advance(&mut rng), ForgeStep::Pending));
    }
    let mut done = None;
    for _ in 0..2 {
        if let ForgeStep::Done(level) = f.advance(&mut rng) {
            done = Some(level);
            break;
        }
    }
    let level = done.expect("fallback rungs commit within two advances");
    assert_ne!(level.tier(), ForgeTier::Verified);
    // A finished forge starts a fresh search.
    assert_eq!(f.attempts(), 0);
}

#[test]
fn default_forge_finishes_within_the_ladder() {
    let cfg = EngineConfig::default();
    let spec = LevelSpec::new(Dimension::Two, OptimizerKind::Adam, Schedule::Cosine, Archetype::Deceptive, 0.6).unwrap();
    let mut rng = seeded(11);
    let mut f = Forge::new(spec, cfg);
    let mut advances = 0;
    let level = loop {
        advances += 1;
        if let ForgeStep::Done(level) = f.advance(&mut rng) {
            break level;
        }
        assert!(advances <= cfg.field_attempts + 2);
    };
    check_committed(&level, &cfg);
}

/* ──────────────────────────────────────────────────────────────────────────
4) Replay and the level wrapper
────────────────────────────────────────────────────────────────────────── */

#[test]
fn replay_starts_at_spawn_and_matches_jitter_free_verification() {
    let cfg = EngineConfig::default();
    let mut rng = seeded(12);
    let spec = LevelSpec::new(Dimension::Two, OptimizerKind::Momentum, Schedule::Fixed, Archetype::Simple, 0.1).unwrap();
    let level = forge(&spec, &cfg, &mut rng);
    let replay = level.replay(&cfg, &mut rng);
    assert_eq!(replay.first().unwrap().coord, level.spawn());
    if level.verification().perturbations().is_empty() {
        assert_eq!(&replay, level.verification());
    }
}

#[test]
fn level_forges_once_until_discarded() {
    let cfg = EngineConfig::default();
    let mut rng = seeded(13);
    let spec = LevelSpec::new(Dimension::One, OptimizerKind::Sgd, Schedule::Fixed, Archetype::Multimodal, 0.1).unwrap();
    let mut level = Level::new(spec);
    assert!(!level.is_forged());
    let spawn = level.ensure_forged(&cfg, &mut rng).spawn();
    assert!(level.is_forged());
    assert_eq!(level.ensure_forged(&cfg, &mut rng).spawn(), spawn);
    assert!(level.discard().is_some());
    assert!(level.forged().is_none());
}

#[test]
fn difficulty_outside_unit_interval_is_rejected() {
    for d in [-0.1, 1.5, f64::NAN] {
        let r = LevelSpec::new(Dimension::One, OptimizerKind::Sgd, Schedule::Fixed, Archetype::Simple, d);
        assert!(matches!(r, Err(peak_finder::PeakError::InvalidLevel(_))));
    }
}
