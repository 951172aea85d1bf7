//! Tunable settings for the visualization

use crate::error::{Axis, QuantumWellError, Result};
use crate::wavefunction::{QuantumNumbers, Quantity};

/// Samples per side of the surface grid (50 × 50 = 2500 vertices per surface)
pub const GRID_RESOLUTION: usize = 50;

/// Height multiplier applied to every displayed quantity
pub const HEIGHT_SCALE: f32 = 0.3;

/// Mode numbers shown at startup
pub const DEFAULT_NX: u32 = 3;
pub const DEFAULT_NY: u32 = 4;

/// Largest mode number the controls accept
pub const MODE_NUMBER_MAX: u32 = 6;

/// Time speed multiplier: default and slider range
pub const DEFAULT_TIME_SPEED: f32 = 1.0;
pub const TIME_SPEED_MAX: f32 = 5.0;

/// Keyboard +/- step for the time speed
pub const TIME_SPEED_STEP: f32 = 0.1;

/// Frame deltas are clamped so a stalled window does not jump the phase
pub const MAX_FRAME_DT: f32 = 0.1;

/// Windows at or below this width get the compact camera layout
pub const COMPACT_LAYOUT_WIDTH: u32 = 768;

/// Background clear color (#111111)
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0x11 as f64 / 255.0,
    g: 0x11 as f64 / 255.0,
    b: 0x11 as f64 / 255.0,
    a: 1.0,
};

/// Well boundary line color
pub const BOUNDARY_COLOR: [f32; 4] = [0.533, 0.533, 0.533, 1.0];

/// Session settings
#[derive(Debug, Clone, PartialEq)]
pub struct WellConfig {
    /// Samples per side of the surface grid
    pub resolution: usize,
    /// Height multiplier for all surfaces
    pub height_scale: f32,
    pub initial_nx: u32,
    pub initial_ny: u32,
    pub time_speed: f32,
}

impl Default for WellConfig {
    fn default() -> Self {
        Self {
            resolution: GRID_RESOLUTION,
            height_scale: HEIGHT_SCALE,
            initial_nx: DEFAULT_NX,
            initial_ny: DEFAULT_NY,
            time_speed: DEFAULT_TIME_SPEED,
        }
    }
}

impl WellConfig {
    /// Check every field against the same rules the controls enforce
    pub fn validate(&self) -> Result<QuantumNumbers> {
        if self.resolution < 2 {
            return Err(QuantumWellError::InvalidResolution(self.resolution));
        }
        validate_time_speed(self.time_speed)?;
        let modes = QuantumNumbers::new(self.initial_nx, self.initial_ny)?;
        validate_mode_number(Axis::X, modes.nx())?;
        validate_mode_number(Axis::Y, modes.ny())?;
        Ok(modes)
    }
}

/// Reject mode numbers outside 1..=MODE_NUMBER_MAX
pub fn validate_mode_number(axis: Axis, value: u32) -> Result<u32> {
    if value == 0 {
        return Err(QuantumWellError::InvalidModeNumber { axis, value });
    }
    if value > MODE_NUMBER_MAX {
        return Err(QuantumWellError::ModeNumberOutOfRange {
            axis,
            value,
            max: MODE_NUMBER_MAX,
        });
    }
    Ok(value)
}

/// Reject negative or non-finite speed multipliers
pub fn validate_time_speed(speed: f32) -> Result<f32> {
    if !speed.is_finite() || speed < 0.0 {
        return Err(QuantumWellError::InvalidTimeSpeed(speed));
    }
    Ok(speed)
}

/// Static look of one surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStyle {
    pub color: [f32; 3],
    pub opacity: f32,
    pub wireframe: bool,
    /// Constant Z offset that keeps overlapping surfaces apart
    pub z_offset: f32,
}

impl SurfaceStyle {
    pub fn for_quantity(quantity: Quantity) -> Self {
        match quantity {
            Quantity::Real => Self {
                color: hex_rgb(0xff6666),
                opacity: 0.7,
                wireframe: true,
                z_offset: 0.1,
            },
            Quantity::Imaginary => Self {
                color: hex_rgb(0x6666ff),
                opacity: 0.7,
                wireframe: true,
                z_offset: -0.1,
            },
            Quantity::Probability => Self {
                color: hex_rgb(0x66ff66),
                opacity: 0.8,
                wireframe: false,
                z_offset: 0.0,
            },
        }
    }

    pub fn rgba(&self) -> [f32; 4] {
        [self.color[0], self.color[1], self.color[2], self.opacity]
    }
}

fn hex_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Initial camera placement, chosen from the window width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPreset {
    pub position: [f32; 3],
    pub min_distance: f32,
    pub max_distance: f32,
}

impl CameraPreset {
    /// Close-up view for regular windows
    pub const DESKTOP: CameraPreset = CameraPreset {
        position: [2.0, 2.0, 2.0],
        min_distance: 1.0,
        max_distance: 10.0,
    };

    /// Pulled back so the panels do not cover the well on narrow windows
    pub const COMPACT: CameraPreset = CameraPreset {
        position: [3.0, 3.0, 4.0],
        min_distance: 2.0,
        max_distance: 15.0,
    };

    pub fn for_width(width: u32) -> Self {
        if width <= COMPACT_LAYOUT_WIDTH {
            Self::COMPACT
        } else {
            Self::DESKTOP
        }
    }

    pub fn is_compact(&self) -> bool {
        *self == Self::COMPACT
    }

    /// Preset to switch to after a resize, if the layout class changed.
    ///
    /// A zero-sized window (minimized) never changes the layout, so restoring
    /// it keeps the current orbit.
    pub fn after_resize(&self, width: u32, height: u32) -> Option<CameraPreset> {
        if width == 0 || height == 0 {
            return None;
        }
        let preset = Self::for_width(width);
        (preset != *self).then_some(preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WellConfig::default();
        let modes = config.validate().unwrap();
        assert_eq!((modes.nx(), modes.ny()), (3, 4));
        assert_eq!(config.resolution, 50);
        assert_eq!(config.height_scale, 0.3);
    }

    #[test]
    fn test_config_rejects_bad_fields() {
        let coarse = WellConfig { resolution: 1, ..Default::default() };
        assert_eq!(coarse.validate(), Err(QuantumWellError::InvalidResolution(1)));

        let zero_mode = WellConfig { initial_ny: 0, ..Default::default() };
        assert!(matches!(
            zero_mode.validate(),
            Err(QuantumWellError::InvalidModeNumber { axis: Axis::Y, .. })
        ));

        let big_mode = WellConfig { initial_nx: 9, ..Default::default() };
        assert!(matches!(
            big_mode.validate(),
            Err(QuantumWellError::ModeNumberOutOfRange { axis: Axis::X, value: 9, max: 6 })
        ));

        let reverse = WellConfig { time_speed: -1.0, ..Default::default() };
        assert!(matches!(reverse.validate(), Err(QuantumWellError::InvalidTimeSpeed(_))));
    }

    #[test]
    fn test_mode_number_range() {
        assert!(validate_mode_number(Axis::X, 0).is_err());
        assert_eq!(validate_mode_number(Axis::X, 1), Ok(1));
        assert_eq!(validate_mode_number(Axis::Y, 6), Ok(6));
        assert!(validate_mode_number(Axis::Y, 7).is_err());
    }

    #[test]
    fn test_time_speed_validation() {
        assert_eq!(validate_time_speed(0.0), Ok(0.0));
        assert_eq!(validate_time_speed(2.5), Ok(2.5));
        assert!(validate_time_speed(-0.1).is_err());
        assert!(validate_time_speed(f32::NAN).is_err());
        assert!(validate_time_speed(f32::INFINITY).is_err());
    }

    #[test]
    fn test_surface_styles() {
        let real = SurfaceStyle::for_quantity(Quantity::Real);
        assert_eq!(real.color, [1.0, 0.4, 0.4]);
        assert!(real.wireframe);
        assert_eq!(real.z_offset, 0.1);

        let imaginary = SurfaceStyle::for_quantity(Quantity::Imaginary);
        assert_eq!(imaginary.color, [0.4, 0.4, 1.0]);
        assert_eq!(imaginary.z_offset, -0.1);

        let probability = SurfaceStyle::for_quantity(Quantity::Probability);
        assert!(!probability.wireframe);
        assert_eq!(probability.rgba(), [0.4, 1.0, 0.4, 0.8]);
    }

    #[test]
    fn test_camera_preset_follows_width() {
        assert_eq!(CameraPreset::for_width(768), CameraPreset::COMPACT);
        assert_eq!(CameraPreset::for_width(400), CameraPreset::COMPACT);
        assert_eq!(CameraPreset::for_width(769), CameraPreset::DESKTOP);
        assert!(!CameraPreset::for_width(1280).is_compact());
    }

    #[test]
    fn test_preset_switches_only_across_the_breakpoint() {
        let desktop = CameraPreset::DESKTOP;
        assert_eq!(desktop.after_resize(1024, 700), None);
        assert_eq!(desktop.after_resize(700, 900), Some(CameraPreset::COMPACT));
        assert_eq!(CameraPreset::COMPACT.after_resize(1280, 720), Some(CameraPreset::DESKTOP));
    }

    #[test]
    fn test_minimized_window_keeps_preset() {
        assert_eq!(CameraPreset::DESKTOP.after_resize(0, 0), None);
        assert_eq!(CameraPreset::DESKTOP.after_resize(0, 720), None);
        assert_eq!(CameraPreset::DESKTOP.after_resize(1280, 0), None);
        assert_eq!(CameraPreset::COMPACT.after_resize(0, 0), None);
    }
}
