//! Error type for the construction/configuration boundary.
//!
//! The engine itself (height evaluation, stepping, simulation, forging) is
//! infallible; only validating inputs handed to it can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeakError {
    /// Engine configuration rejected by `EngineConfig::validate`.
    #[error("config error: {0}")]
    Config(String),

    /// Level metadata outside its domain (difficulty, dimension).
    #[error("invalid level: {0}")]
    InvalidLevel(String),

    /// Catalog lookup for a level number that does not exist.
    #[error("unknown level {0}")]
    UnknownLevel(u32),
}

pub type PeakResult<T> = Result<T, PeakError>;
