// tests/field.rs
use bevy_prng::WyRand;
use rand_core::SeedableRng;

use peak_finder::mechanics::{Axis, Coord, Dimension, seeded};
use peak_finder::terrain::{Archetype, Feature, FieldBuilder, HeightField, NoiseParams, Peak, base_height};

const CENTER: Coord = Coord::splat(2500.0);

fn every_field(seed: u64) -> Vec<HeightField> {
    let mut rng = seeded(seed);
    let mut out = Vec::new();
    for (k, archetype) in Archetype::ALL.into_iter().enumerate() {
        for dim in [Dimension::One, Dimension::Two, Dimension::Three] {
            let d = (k % 3) as f64 / 2.0;
            out.push(FieldBuilder::new(archetype, dim, d).build(CENTER, &mut rng));
        }
    }
    out
}

/* ──────────────────────────────────────────────────────────────────────────
1) Floor invariant and exact max at target
────────────────────────────────────────────────────────────────────────── */

#[test]
fn height_is_never_negative() {
    let mut rng = seeded(7);
    for field in every_field(11) {
        for _ in 0..400 {
            let p = Coord::new(
                peak_finder::mechanics::uniform(&mut rng, -500.0, 5500.0),
                peak_finder::mechanics::uniform(&mut rng, -500.0, 5500.0),
                peak_finder::mechanics::uniform(&mut rng, -500.0, 5500.0),
            );
            assert!(field.height(&p) >= 0.0, "{:?} at {p:?}", field.archetype());
        }
    }
}

#[test]
fn max_height_is_height_at_target() {
    for seed in 0..4 {
        for field in every_field(seed) {
            assert_eq!(field.height(&field.target()), field.max_height());
            assert_eq!(peak_finder::height(&field, &field.target()), field.max_height());
        }
    }
}

#[test]
fn deep_depression_floors_to_zero() {
    let field = HeightField::new(
        Archetype::Plateau,
        Coord::new(4000.0, 2500.0, 2500.0),
        vec![Feature::Peak(Peak::isotropic(CENTER, -400.0, 500.0))],
    );
    assert_eq!(field.height(&CENTER), 0.0);
}

/* ──────────────────────────────────────────────────────────────────────────
2) Target placement
────────────────────────────────────────────────────────────────────────── */

#[test]
fn target_distance_scales_with_difficulty() {
    let mut rng = seeded(3);
    for d in [0.0, 0.5, 1.0] {
        for _ in 0..20 {
            let field = FieldBuilder::new(Archetype::Simple, Dimension::Two, d)
                .primary_only()
                .build(CENTER, &mut rng);
            let dist = field.target().distance(&CENTER);
            assert!((dist - (600.0 + 1400.0 * d)).abs() < 1e-6, "d={d} dist={dist}");
        }
    }
}

#[test]
fn inactive_axes_keep_target_on_spawn_line() {
    let mut rng = seeded(5);
    for _ in 0..20 {
        let one = FieldBuilder::new(Archetype::Multimodal, Dimension::One, 0.4).build(CENTER, &mut rng);
        assert_eq!(one.target().y(), 2500.0);
        assert_eq!(one.target().z(), 2500.0);
        let two = FieldBuilder::new(Archetype::Multimodal, Dimension::Two, 0.4).build(CENTER, &mut rng);
        assert_eq!(two.target().z(), 2500.0);
    }
}

#[test]
fn primary_scales_linearly_with_difficulty() {
    let mut rng = seeded(8);
    let easy = FieldBuilder::new(Archetype::Simple, Dimension::One, 0.0).build(CENTER, &mut rng);
    let hard = FieldBuilder::new(Archetype::Simple, Dimension::One, 1.0).build(CENTER, &mut rng);
    let (e, h) = (easy.primary().unwrap(), hard.primary().unwrap());
    assert_eq!((e.amplitude, e.sigma), (140.0, 250.0));
    assert_eq!((h.amplitude, h.sigma), (240.0, 350.0));
    assert_eq!(e.center, easy.target());
    // Out-of-range difficulty is clamped before any draw.
    assert_eq!(FieldBuilder::new(Archetype::Simple, Dimension::One, 1.7).difficulty(), 1.0);
    assert_eq!(FieldBuilder::new(Archetype::Simple, Dimension::One, -0.2).difficulty(), 0.0);
}

/* ──────────────────────────────────────────────────────────────────────────
3) Primary-only fields peak at the target (grid check)
────────────────────────────────────────────────────────────────────────── */

#[test]
fn primary_only_field_is_maximized_at_target() {
    let mut rng = seeded(21);
    for k in 0..30 {
        let dim = [Dimension::One, Dimension::Two, Dimension::Three][k % 3];
        let d = (k % 7) as f64 / 6.0;
        let field = FieldBuilder::new(Archetype::Deceptive, dim, d)
            .primary_only()
            .build(CENTER, &mut rng);
        let grid = field.sample_grid(field.target(), Axis::X, Axis::Y, 3000.0, 31);
        let mut best = (0, 0, f64::MIN);
        for (j, row) in grid.iter().enumerate() {
            for (i, &h) in row.iter().enumerate() {
                if h > best.2 {
                    best = (i, j, h);
                }
            }
        }
        assert_eq!((best.0, best.1), (15, 15), "k={k}");
        assert!((best.2 - field.max_height()).abs() < 1e-6);
    }
}

#[test]
fn sample_grid_shape_and_orientation() {
    let field = HeightField::new(
        Archetype::Simple,
        Coord::new(3000.0, 2500.0, 2500.0),
        vec![Feature::Peak(Peak::isotropic(Coord::new(3000.0, 2500.0, 2500.0), 200.0, 300.0))],
    );
    let grid = field.sample_grid(CENTER, Axis::X, Axis::Z, 1000.0, 5);
    assert_eq!(grid.len(), 5);
    assert!(grid.iter().all(|row| row.len() == 5));
    // u runs along x: the right edge (x = 3000) sits on the peak.
    assert_eq!(grid[2][4], field.height(&Coord::new(3000.0, 2500.0, 2500.0)));
    assert_eq!(field.sample_grid(CENTER, Axis::X, Axis::Y, 100.0, 1), vec![vec![field.height(&CENTER)]]);
}

/* ──────────────────────────────────────────────────────────────────────────
4) Archetype shapes
────────────────────────────────────────────────────────────────────────── */

#[test]
fn deceptive_has_one_registered_peak_and_lower_decoys() {
    let mut rng = seeded(42);
    for k in 0..40 {
        let dim = [Dimension::Two, Dimension::Three][k % 2];
        let field = FieldBuilder::new(Archetype::Deceptive, dim, k as f64 / 39.0).build(CENTER, &mut rng);
        let primary = *field.primary().unwrap();
        let at_target = field.peaks().filter(|p| p.center == field.target()).count();
        assert_eq!(at_target, 1);
        assert_eq!(field.height(&field.target()), field.max_height());
        for p in field.peaks().skip(1) {
            assert!(p.amplitude < primary.amplitude);
        }
        let decoys = field.peaks().filter(|p| p.amplitude >= 0.7 * primary.amplitude).count();
        assert!((1 + 3..=1 + 7).contains(&decoys), "decoys={decoys}");
    }
}

#[test]
fn ridge_chain_is_narrow_on_its_axis() {
    let mut rng = seeded(9);
    let mut seen = [false; 2];
    for _ in 0..30 {
        let field = FieldBuilder::new(Archetype::Ridge, Dimension::Two, 0.6).build(CENTER, &mut rng);
        let axis = field.ridge_axis().unwrap();
        let chain: Vec<&Peak> = field.peaks().filter(|p| p.sigma_y.is_some()).collect();
        assert_eq!(chain.len(), 8);
        for p in chain {
            let (sx, sy) = (p.sigma, p.sigma_y.unwrap());
            match axis {
                Axis::X => assert_eq!((sx, sy), (30.0, 200.0)),
                _ => assert_eq!((sx, sy), (200.0, 30.0)),
            }
        }
        seen[axis.index()] = true;
    }
    assert_eq!(seen, [true, true]);
}

#[test]
fn noise_only_applies_to_noisy_fields() {
    let noise = Feature::Noise(NoiseParams { frequency: 0.05, amplitude: 23.0 });
    let t = Coord::new(3000.0, 3000.0, 2500.0);
    let quiet = HeightField::new(Archetype::Simple, t, vec![noise]);
    let noisy = HeightField::new(Archetype::Noisy, t, vec![noise]);
    let p = Coord::new(2711.0, 2403.0, 2500.0);
    assert_eq!(quiet.height(&p), base_height(&p));
    assert_ne!(noisy.height(&p), base_height(&p));
}

#[test]
fn saddle_and_rosenbrock_features_are_registered() {
    let mut rng = seeded(12);
    let saddle = FieldBuilder::new(Archetype::Saddle, Dimension::Two, 0.5).build(CENTER, &mut rng);
    let s = saddle.saddles().next().unwrap();
    assert_eq!(s.strength, 55.0);
    // Hyperbolic: rises along x, falls along y, vanishes far away.
    let c = s.center;
    assert!(s.contribution(&c.offset(0, 300.0)) > 0.0);
    assert!(s.contribution(&c.offset(1, 300.0)) < 0.0);
    assert_eq!(s.contribution(&c.offset(0, 1000.0)), 0.0);

    let valley = FieldBuilder::new(Archetype::Rosenbrock, Dimension::Two, 1.0).build(CENTER, &mut rng);
    let r = valley.rosenbrock().unwrap();
    assert_eq!(r.b, 100.0);
    assert_eq!(r.target, valley.target());
    assert!(valley.noise().is_none());
}

#[test]
fn same_seed_same_field() {
    let a = FieldBuilder::new(Archetype::Multimodal, Dimension::Three, 0.8).build(CENTER, &mut seeded(99));
    let b = FieldBuilder::new(Archetype::Multimodal, Dimension::Three, 0.8).build(CENTER, &mut seeded(99));
    assert_eq!(a, b);
}

#[test]
fn any_rng_core_drives_the_builder() {
    let mut raw = WyRand::from_seed(99u64.to_le_bytes());
    let a = FieldBuilder::new(Archetype::Noisy, Dimension::Two, 0.3).build(CENTER, &mut raw);
    let b = FieldBuilder::new(Archetype::Noisy, Dimension::Two, 0.3).build(CENTER, &mut seeded(99));
    assert_eq!(a, b);
    assert!(a.noise().is_some());
}
