// demos/watch_solve.rs
// Run with:
//   cargo run --example watch_solve

use peak_finder::mechanics::{Axis, Dimension, Schedule, seeded, sign};
use peak_finder::optim::OptimizerKind;
use peak_finder::terrain::Archetype;
use peak_finder::{EngineConfig, LevelSpec, forge};

const RAMP: &[u8] = b" .:-=+*#%@";

fn main() {
    let cfg = EngineConfig::default();
    let mut rng = seeded(7);
    let spec = LevelSpec::new(Dimension::Two, OptimizerKind::Momentum, Schedule::Fixed, Archetype::Plateau, 0.4)
        .expect("valid level");
    let level = forge(&spec, &cfg, &mut rng);
    let field = level.field();

    println!("== {:?} / {} / {} ==", spec.dimension, spec.optimizer.name(), spec.archetype.name());
    println!("spawn  {:?}", level.spawn().0);
    println!("target {:?}  max {:.1}  win at {:.1}", field.target().0, field.max_height(), level.dynamic_target());
    println!("par    {} steps ({:?})", level.min_steps_required(), level.tier());

    // Coarse heatmap around the spawn/target pair.
    let origin = level.spawn().lerp(&field.target(), 0.5);
    let grid = field.sample_grid(origin, Axis::X, Axis::Y, 3200.0, 40);
    let top = field.max_height().max(1.0);
    for row in grid.iter().rev() {
        let line: String = row
            .iter()
            .map(|h| RAMP[((h / top) * (RAMP.len() - 1) as f64).clamp(0.0, (RAMP.len() - 1) as f64) as usize] as char)
            .collect();
        println!("  {line}");
    }

    let replay = level.replay(&cfg, &mut rng);
    println!("\n-- optimizer replay: {:?} after {} steps --", replay.termination(), replay.steps());
    for (i, s) in replay.samples().iter().enumerate().step_by(10usize.max(replay.steps() / 12)) {
        println!("  step {i:>4}  ({:>7.1}, {:>7.1})  h = {:>6.1}", s.coord.x(), s.coord.y(), s.height);
    }
    if !replay.perturbations().is_empty() {
        println!("  anti-stall jitter at steps {:?}", replay.perturbations());
    }

    // A player that always presses toward the target.
    let mut run = level.start_run(&cfg);
    let target = field.target();
    while !run.won() && run.steps() < 5000 {
        let p = run.position();
        run.jump([sign(target.x() - p.x()), sign(target.y() - p.y()), 0.0]);
    }
    println!("\n-- greedy player: won = {}, {} jumps, stars = {:?} --", run.won(), run.steps(), run.stars(0.0, Default::default()));
}
