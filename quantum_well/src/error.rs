//! Error types for control input validation.

use thiserror::Error;

/// Grid axis a mode number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "nx"),
            Axis::Y => write!(f, "ny"),
        }
    }
}

/// Result type for quantum well operations.
pub type Result<T> = std::result::Result<T, QuantumWellError>;

/// Input rejected before it can reach the simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantumWellError {
    /// Mode numbers index standing waves and start at 1.
    #[error("Invalid mode number {axis} = {value}: must be at least 1")]
    InvalidModeNumber { axis: Axis, value: u32 },

    /// Mode number above the range the controls allow.
    #[error("Mode number {axis} = {value} is out of range 1..={max}")]
    ModeNumberOutOfRange { axis: Axis, value: u32, max: u32 },

    /// Negative, NaN or infinite time speed.
    #[error("Invalid time speed {0}: must be a finite non-negative number")]
    InvalidTimeSpeed(f32),

    /// Surface grid too coarse to triangulate.
    #[error("Invalid grid resolution {0}: need at least 2 samples per side")]
    InvalidResolution(usize),
}
