//! Wavefunction of a particle in a 2D infinite square well
//!
//! The well spans [-1, 1]² in scene coordinates. A stationary state (nx, ny) is
//!
//! ```text
//! ψ(x, y, t) = 2 sin(nx π u) sin(ny π v) e^(-iωt),   u = (x+1)/2, v = (y+1)/2
//! ```
//!
//! with ω = nx² + ny² in the simplified unit system used for display, and the
//! time axis slowed down by [`TIME_SCALE`](crate::constants::TIME_SCALE).

use std::f32::consts::PI;
use std::f64::consts::TAU;

use crate::constants::{SPATIAL_PREFACTOR, TIME_SCALE};
use crate::error::{Axis, QuantumWellError};

/// Complex amplitude split into the three displayed quantities
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveValue {
    pub real: f32,
    pub imaginary: f32,
    /// |ψ|², always `real² + imaginary²`
    pub probability: f32,
}

impl WaveValue {
    fn from_parts(real: f32, imaginary: f32) -> Self {
        Self {
            real,
            imaginary,
            probability: real * real + imaginary * imaginary,
        }
    }

    /// Select one displayed component
    pub fn component(&self, quantity: Quantity) -> f32 {
        match quantity {
            Quantity::Real => self.real,
            Quantity::Imaginary => self.imaginary,
            Quantity::Probability => self.probability,
        }
    }
}

/// Which part of ψ a surface displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Real,
    Imaginary,
    Probability,
}

impl Quantity {
    pub const ALL: [Quantity; 3] = [Quantity::Real, Quantity::Imaginary, Quantity::Probability];

    pub fn name(&self) -> &'static str {
        match self {
            Quantity::Real => "Re(ψ)",
            Quantity::Imaginary => "Im(ψ)",
            Quantity::Probability => "|ψ|²",
        }
    }
}

/// Mode numbers (nx, ny) of a standing wave, both strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantumNumbers {
    nx: u32,
    ny: u32,
}

impl QuantumNumbers {
    pub fn new(nx: u32, ny: u32) -> Result<Self, QuantumWellError> {
        if nx == 0 {
            return Err(QuantumWellError::InvalidModeNumber { axis: Axis::X, value: nx });
        }
        if ny == 0 {
            return Err(QuantumWellError::InvalidModeNumber { axis: Axis::Y, value: ny });
        }
        Ok(Self { nx, ny })
    }

    pub fn nx(&self) -> u32 {
        self.nx
    }

    pub fn ny(&self) -> u32 {
        self.ny
    }

    pub fn get(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.nx,
            Axis::Y => self.ny,
        }
    }

    /// Copy with one axis replaced
    pub fn with(&self, axis: Axis, value: u32) -> Result<Self, QuantumWellError> {
        match axis {
            Axis::X => Self::new(value, self.ny),
            Axis::Y => Self::new(self.nx, value),
        }
    }

    /// Energy in display units, E = nx² + ny²
    pub fn energy(&self) -> f32 {
        (self.nx * self.nx + self.ny * self.ny) as f32
    }

    /// Angular frequency; numerically equal to the energy (ℏ = 1)
    pub fn omega(&self) -> f32 {
        self.energy()
    }

    /// Simulation time after which Re(ψ) and Im(ψ) repeat
    pub fn period(&self) -> f64 {
        TAU / (TIME_SCALE * f64::from(self.omega()))
    }

    /// Phase ω·t' at simulation time `t`, reduced to [0, 2π).
    ///
    /// The product and the reduction run in f64 so long sessions keep full
    /// phase resolution; only the reduced angle is narrowed to f32.
    pub fn phase(&self, t: f64) -> f32 {
        let scaled_time = t * TIME_SCALE;
        (f64::from(self.omega()) * scaled_time).rem_euclid(TAU) as f32
    }

    pub fn label(&self) -> String {
        format!("({}, {})", self.nx, self.ny)
    }
}

/// sin(π·x) with exact zeros at integer arguments.
///
/// Reducing modulo 2 before multiplying by π keeps the well walls and nodal
/// lines at exactly zero, which `(x * PI).sin()` does not.
pub fn sin_pi(x: f32) -> f32 {
    let r = x.rem_euclid(2.0);
    if r.fract() == 0.0 {
        return 0.0;
    }
    (r * PI).sin()
}

/// Unnormalized spatial amplitude 2 sin(nx π u) sin(ny π v)
pub fn spatial_amplitude(x: f32, y: f32, modes: QuantumNumbers) -> f32 {
    let u = (x + 1.0) / 2.0;
    let v = (y + 1.0) / 2.0;
    SPATIAL_PREFACTOR * sin_pi(modes.nx as f32 * u) * sin_pi(modes.ny as f32 * v)
}

/// Evaluate ψ at scene position (x, y) ∈ [-1, 1]² and simulation time `t`.
///
/// Pure and total: every valid input produces a finite value.
pub fn evaluate(x: f32, y: f32, t: f64, modes: QuantumNumbers) -> WaveValue {
    let (sin_wt, cos_wt) = modes.phase(t).sin_cos();

    let spatial = spatial_amplitude(x, y, modes);

    // e^(-iωt) = cos(ωt) - i sin(ωt)
    WaveValue::from_parts(spatial * cos_wt, -spatial * sin_wt)
}
