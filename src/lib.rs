/*!
`peak_finder` — procedural height fields, optimizer stepping and solvable-level forging
for a gradient-ascent puzzle game.

What it does
- Evaluates closed-form terrains (`terrain`): a base undulation plus Gaussian peaks,
  saddles, a Rosenbrock ridge and trig noise, floored at zero.
- Synthesizes one terrain per level archetype from an injected random source.
- Steps SGD / Momentum / RMSprop / Adam under Fixed / Step-Decay / Warmup / Cosine
  schedules, for both player input and autonomous gradient following (`optim`).
- Forges levels that are provably solvable: a spawn is committed only after an
  autonomous run of the level's own optimizer reaches the peak from it (`level`).

How to use (call surface only)
- Describe a level with `LevelSpec` (or take one from `level::catalog`).
- `forge(&spec, &cfg, &mut rng) -> ForgedLevel` (or drive `Forge::advance` to yield between attempts).
- Play with `ForgedLevel::start_run(&cfg)` and `PlayerRun::jump(direction)`.
- Watch the optimizer with `ForgedLevel::replay(&cfg, &mut rng)`.
- Read terrain with `height(field, coord)` / `HeightField::sample_grid`.

What it does NOT do
- No rendering, input mapping, persistence or networking.
- No ambient randomness: every generator takes a `RandomSource`.
*/

pub mod config;
pub mod error;
pub mod level;
pub mod mechanics;
pub mod optim;
pub mod terrain;

pub use config::EngineConfig;
pub use error::{PeakError, PeakResult};
pub use level::{ForgeTier, ForgedLevel, Level, LevelSpec, PlayerRun, forge};
pub use mechanics::{Coord, Dimension, RandomSource, Schedule};
pub use optim::{OptimizerKind, Trajectory, apply_player_move, simulate};
pub use terrain::{Archetype, HeightField, height};

/// Bounded retry: calls `attempt(i)` for i = 0, 1, .. and returns the first `Some`.
pub fn attempt_det<T, F>(max_attempts: usize, mut attempt: F) -> Option<T>
where
    F: FnMut(usize) -> Option<T>,
{
    for i in 0..max_attempts {
        if let Some(found) = attempt(i) {
            return Some(found);
        }
    }
    None
}
