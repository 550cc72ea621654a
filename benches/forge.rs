use criterion::{Criterion, criterion_group, criterion_main};
use peak_finder::mechanics::{Axis, Coord, Dimension, Schedule, seeded};
use peak_finder::optim::OptimizerKind;
use peak_finder::terrain::{Archetype, FieldBuilder};
use peak_finder::{EngineConfig, LevelSpec, forge, simulate};

const SEED: u64 = 2025;
const CENTER: Coord = Coord::splat(2500.0);

fn bench_heatmap(c: &mut Criterion) {
    let field = FieldBuilder::new(Archetype::Deceptive, Dimension::Two, 0.8).build(CENTER, &mut seeded(SEED));
    c.bench_function("deceptive field 128x128 heatmap", |b| {
        b.iter(|| field.sample_grid(CENTER, Axis::X, Axis::Y, 5000.0, 128))
    });
}

fn bench_simulate(c: &mut Criterion) {
    let cfg = EngineConfig::default();
    let spec = LevelSpec::new(Dimension::Two, OptimizerKind::Adam, Schedule::Fixed, Archetype::Multimodal, 0.5)
        .expect("valid level");
    let field = spec.field_builder(&cfg).build(CENTER, &mut seeded(SEED));
    c.bench_function("Adam 2D multimodal, 1500-step budget", |b| {
        b.iter(|| {
            let mut rng = seeded(SEED);
            simulate(&spec, &field, CENTER, cfg.verify_max_steps, &cfg, &mut rng)
        })
    });
}

fn bench_forge(c: &mut Criterion) {
    let cfg = EngineConfig::default();
    for (name, spec) in [
        ("forge 1D SGD simple", (Dimension::One, OptimizerKind::Sgd, Schedule::Fixed, Archetype::Simple)),
        ("forge 2D RMSprop ridge", (Dimension::Two, OptimizerKind::RmsProp, Schedule::Fixed, Archetype::Ridge)),
        ("forge 3D Adam deceptive", (Dimension::Three, OptimizerKind::Adam, Schedule::Cosine, Archetype::Deceptive)),
    ] {
        let spec = LevelSpec::new(spec.0, spec.1, spec.2, spec.3, 0.7).expect("valid level");
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut rng = seeded(SEED);
                forge(&spec, &cfg, &mut rng)
            })
        });
    }
}

criterion_group!(benches, bench_heatmap, bench_simulate, bench_forge);
criterion_main!(benches);
