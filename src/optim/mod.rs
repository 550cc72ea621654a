pub mod simulate;
pub mod stepper;

pub use simulate::{PathSimulator, Sample, StallMonitor, StallPhase, Termination, Trajectory, simulate};
pub use stepper::{
    DirectionSource, OptimizerKind, OptimizerState, PlayerMove, StepOutcome, Stepper,
    apply_player_move, directional_probe, forward_gradient, normalize,
};
