//! Quantum Well Visualization
//!
//! Real-time view of a particle in a 2D infinite square well. The stationary
//! state (nx, ny) is evaluated on a fixed grid every frame and shown as three
//! overlaid height fields:
//!
//! - **Re(ψ)**: real part, red wireframe
//! - **Im(ψ)**: imaginary part, blue wireframe
//! - **|ψ|²**: probability density, green solid surface
//!
//! The physics and frame driver ([`wavefunction`], [`surface`], [`simulation`])
//! are independent of the GPU; [`renderer`], [`controls`] and [`equations_ui`]
//! are the wgpu/egui presentation layer.

pub mod config;
pub mod controls;
pub mod equations_ui;
pub mod error;
pub mod renderer;
pub mod simulation;
pub mod surface;
pub mod wavefunction;

pub use error::{Axis, QuantumWellError};
pub use simulation::{CommandEffect, ControlCommand, DisplayMode, QuantumWell, SimulationState};
pub use surface::{GridSample, SurfaceBuffer, SurfaceGrid, SurfaceSet};
pub use wavefunction::{evaluate, QuantumNumbers, Quantity, WaveValue};

/// Display-unit constants for the wavefunction
pub mod constants {
    /// Slow-down applied to simulation time before phase evolution
    pub const TIME_SCALE: f64 = 0.1;

    /// Amplitude prefactor of the spatial part (kept unnormalized for display)
    pub const SPATIAL_PREFACTOR: f32 = 2.0;

    /// Half-width of the well in scene units; the well spans [-1, 1]²
    pub const WELL_HALF_WIDTH: f32 = 1.0;
}
