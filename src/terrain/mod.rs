// Procedural terrain: the height function and the archetype synthesizer.

pub mod builder;
pub mod field;

pub use builder::FieldBuilder;
pub use field::{
    Archetype, Feature, HeightField, HeightMap, NoiseParams, Peak, RosenbrockValley, SaddlePoint,
    base_height, height,
};
