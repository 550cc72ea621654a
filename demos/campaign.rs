// demos/campaign.rs
// Run with:
//   cargo run --release --example campaign [seed]

use peak_finder::level::catalog;
use peak_finder::mechanics::seeded;
use peak_finder::{EngineConfig, ForgeTier, forge};

fn main() {
    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(2025u64);
    let cfg = EngineConfig::default();
    let mut rng = seeded(seed);

    println!("== Campaign (seed {seed}) ==");
    println!("{:>4} {:>3} {:>9} {:>9} {:>11} {:>5} {:>5} {:>15}", "lvl", "dim", "opt", "schedule", "terrain", "diff", "par", "tier");

    let mut fallbacks = 0;
    for (n, spec) in catalog::campaign() {
        let level = forge(&spec, &cfg, &mut rng);
        if level.tier() != ForgeTier::Verified {
            fallbacks += 1;
        }
        println!(
            "{:>4} {:>3} {:>9} {:>9} {:>11} {:>5.2} {:>5} {:>15}",
            n,
            spec.dimension.axes(),
            spec.optimizer.name(),
            format!("{:?}", spec.schedule),
            spec.archetype.name(),
            spec.difficulty,
            level.min_steps_required(),
            format!("{:?}", level.tier()),
        );
    }
    println!("-- {fallbacks} of {} levels used a fallback terrain", catalog::TOTAL_LEVELS);
}
