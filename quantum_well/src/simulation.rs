//! Simulation state and per-frame driver
//!
//! [`QuantumWell`] owns the [`SimulationState`] and the three surfaces. The UI
//! never touches either directly: it emits [`ControlCommand`]s which are
//! applied between frames, and the clock feeds [`QuantumWell::tick`].

use crate::config::{validate_mode_number, validate_time_speed, WellConfig};
use crate::error::{Axis, Result};
use crate::surface::{SurfaceBuffer, SurfaceGrid, SurfaceSet};
use crate::wavefunction::{QuantumNumbers, Quantity};

/// Which surfaces are handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    #[default]
    All,
    Real,
    Imaginary,
    Probability,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 4] = [
        DisplayMode::All,
        DisplayMode::Real,
        DisplayMode::Imaginary,
        DisplayMode::Probability,
    ];

    /// Surfaces drawn in this mode, solid surface first
    pub fn visible(&self) -> &'static [Quantity] {
        match self {
            DisplayMode::All => &[Quantity::Probability, Quantity::Real, Quantity::Imaginary],
            DisplayMode::Real => &[Quantity::Real],
            DisplayMode::Imaginary => &[Quantity::Imaginary],
            DisplayMode::Probability => &[Quantity::Probability],
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayMode::All => write!(f, "All"),
            DisplayMode::Real => write!(f, "Real part"),
            DisplayMode::Imaginary => write!(f, "Imaginary part"),
            DisplayMode::Probability => write!(f, "Probability density"),
        }
    }
}

/// Everything the frame loop and the controls share
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    simulation_time: f64,
    time_speed: f32,
    paused: bool,
    modes: QuantumNumbers,
    display_mode: DisplayMode,
}

impl SimulationState {
    pub fn new(modes: QuantumNumbers, time_speed: f32) -> Self {
        Self {
            simulation_time: 0.0,
            time_speed,
            paused: false,
            modes,
            display_mode: DisplayMode::default(),
        }
    }

    /// Same state at a different simulation time
    pub fn with_time(mut self, simulation_time: f64) -> Self {
        self.simulation_time = simulation_time;
        self
    }

    pub fn simulation_time(&self) -> f64 {
        self.simulation_time
    }

    pub fn time_speed(&self) -> f32 {
        self.time_speed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn modes(&self) -> QuantumNumbers {
        self.modes
    }

    pub fn mode_number(&self, axis: Axis) -> u32 {
        self.modes.get(axis)
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }
}

/// Intent emitted by the controls or the keyboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    SetModeNumber { axis: Axis, value: u32 },
    SetTimeSpeed(f32),
    TogglePause,
    Reset,
    SetDisplayMode(DisplayMode),
}

/// What applying a command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEffect {
    /// Surfaces were rewritten
    Recomputed,
    /// State changed, surfaces untouched
    Updated,
    /// Only the set of drawn surfaces changed
    VisibilityChanged,
    /// Command matched the current state
    Unchanged,
}

/// One visualization session
#[derive(Debug, Clone)]
pub struct QuantumWell {
    state: SimulationState,
    surfaces: SurfaceSet,
    height_scale: f32,
    generation: u64,
}

impl QuantumWell {
    pub fn new(config: &WellConfig) -> Result<Self> {
        let modes = config.validate()?;
        let grid = SurfaceGrid::new(config.resolution)?;

        let mut well = Self {
            state: SimulationState::new(modes, config.time_speed),
            surfaces: SurfaceSet::new(grid),
            height_scale: config.height_scale,
            generation: 0,
        };
        well.recompute();

        log::info!(
            "Quantum well ready: modes {}, {}×{} grid",
            modes.label(),
            grid.resolution(),
            grid.resolution()
        );
        Ok(well)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn surfaces(&self) -> &SurfaceSet {
        &self.surfaces
    }

    pub fn height_scale(&self) -> f32 {
        self.height_scale
    }

    /// Bumped on every recompute; lets the renderer skip uploads while frozen
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Surfaces selected by the display mode, in draw order
    pub fn visible_surfaces(&self) -> impl Iterator<Item = (Quantity, &SurfaceBuffer)> + '_ {
        self.state
            .display_mode
            .visible()
            .iter()
            .map(move |&q| (q, self.surfaces.get(q)))
    }

    /// Rewrite all three surfaces from the current state
    pub fn recompute(&mut self) {
        self.surfaces.update_all(self.height_scale, &self.state);
        self.generation += 1;
    }

    /// Advance by one frame. Returns whether the surfaces changed.
    ///
    /// While paused the tick is swallowed: time and surfaces stay frozen and
    /// resuming continues from the same value.
    pub fn tick(&mut self, frame_dt: f32) -> bool {
        if self.state.paused {
            return false;
        }
        // max() also maps NaN to zero
        let dt = frame_dt.max(0.0);
        // f64 accumulator: an f32 stops advancing around t ≈ 3e4 at slow speeds
        self.state.simulation_time += f64::from(dt) * f64::from(self.state.time_speed);
        self.recompute();
        true
    }

    /// Apply a control intent. A rejected command leaves the session untouched.
    pub fn apply(&mut self, command: ControlCommand) -> Result<CommandEffect> {
        let effect = match command {
            ControlCommand::SetModeNumber { axis, value } => {
                validate_mode_number(axis, value)?;
                let modes = self.state.modes.with(axis, value)?;
                if modes == self.state.modes {
                    CommandEffect::Unchanged
                } else {
                    self.state.modes = modes;
                    self.recompute();
                    log::debug!("Mode numbers now {}", modes.label());
                    CommandEffect::Recomputed
                }
            }
            ControlCommand::SetTimeSpeed(speed) => {
                let speed = validate_time_speed(speed)?;
                if speed == self.state.time_speed {
                    CommandEffect::Unchanged
                } else {
                    self.state.time_speed = speed;
                    CommandEffect::Updated
                }
            }
            ControlCommand::TogglePause => {
                self.state.paused = !self.state.paused;
                log::debug!("{}", if self.state.paused { "Paused" } else { "Resumed" });
                CommandEffect::Updated
            }
            ControlCommand::Reset => {
                self.state.simulation_time = 0.0;
                self.recompute();
                log::debug!("Reset simulation time");
                CommandEffect::Recomputed
            }
            ControlCommand::SetDisplayMode(mode) => {
                if mode == self.state.display_mode {
                    CommandEffect::Unchanged
                } else {
                    self.state.display_mode = mode;
                    CommandEffect::VisibilityChanged
                }
            }
        };
        Ok(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuantumWellError;

    fn small_well() -> QuantumWell {
        QuantumWell::new(&WellConfig {
            resolution: 16,
            ..Default::default()
        })
        .unwrap()
    }

    fn heights(well: &QuantumWell) -> Vec<Vec<f32>> {
        Quantity::ALL
            .iter()
            .map(|&q| well.surfaces().get(q).vertices().iter().map(|v| v.z).collect())
            .collect()
    }

    #[test]
    fn test_new_session_defaults() {
        let well = QuantumWell::new(&WellConfig::default()).unwrap();
        let state = well.state();
        assert_eq!(state.simulation_time(), 0.0);
        assert_eq!(state.time_speed(), 1.0);
        assert!(!state.is_paused());
        assert_eq!((state.mode_number(Axis::X), state.mode_number(Axis::Y)), (3, 4));
        assert_eq!(state.display_mode(), DisplayMode::All);
        assert_eq!(well.surfaces().get(Quantity::Real).len(), 2500);
        assert_eq!(well.generation(), 1);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = WellConfig { initial_nx: 0, ..Default::default() };
        assert!(QuantumWell::new(&config).is_err());
    }

    #[test]
    fn test_tick_advances_scaled_time() {
        let mut well = small_well();
        well.apply(ControlCommand::SetTimeSpeed(2.0)).unwrap();

        assert!(well.tick(0.25));
        assert_eq!(well.state().simulation_time(), 0.5);
        assert!(well.tick(0.25));
        assert_eq!(well.state().simulation_time(), 1.0);
        assert_eq!(well.generation(), 3);
    }

    #[test]
    fn test_slow_ticks_advance_late_in_a_session() {
        let mut well = small_well();
        well.tick(32768.0);
        assert_eq!(well.state().simulation_time(), 32768.0);

        well.apply(ControlCommand::SetTimeSpeed(0.1)).unwrap();
        let before = heights(&well);
        for _ in 0..600 {
            well.tick(1.0 / 60.0);
        }

        let elapsed = well.state().simulation_time() - 32768.0;
        assert!((elapsed - 1.0).abs() < 1e-4, "advanced by {}", elapsed);
        assert_ne!(heights(&well), before);
    }

    #[test]
    fn test_tick_ignores_negative_and_nan_dt() {
        let mut well = small_well();
        well.tick(-1.0);
        well.tick(f32::NAN);
        assert_eq!(well.state().simulation_time(), 0.0);
    }

    #[test]
    fn test_pause_freezes_time_and_surfaces() {
        let mut well = small_well();
        well.tick(0.4);
        let frozen_time = well.state().simulation_time();
        let frozen = heights(&well);
        let generation = well.generation();

        well.apply(ControlCommand::TogglePause).unwrap();
        for _ in 0..100 {
            assert!(!well.tick(0.016));
        }

        assert_eq!(well.state().simulation_time(), frozen_time);
        assert_eq!(heights(&well), frozen);
        assert_eq!(well.generation(), generation);

        // Resume continues from the frozen value without a jump
        well.apply(ControlCommand::TogglePause).unwrap();
        well.tick(0.05);
        assert!((well.state().simulation_time() - (frozen_time + 0.05)).abs() < 1e-6);
    }

    #[test]
    fn test_reset_zeroes_time_even_when_paused() {
        let mut well = small_well();
        let initial = heights(&well);
        for _ in 0..10 {
            well.tick(0.1);
        }
        well.apply(ControlCommand::TogglePause).unwrap();
        assert_ne!(heights(&well), initial);

        let generation = well.generation();
        assert_eq!(well.apply(ControlCommand::Reset), Ok(CommandEffect::Recomputed));
        assert_eq!(well.state().simulation_time(), 0.0);
        assert!(well.state().is_paused());
        assert_eq!(well.generation(), generation + 1);
        assert_eq!(heights(&well), initial);
    }

    #[test]
    fn test_reset_while_running() {
        let mut well = small_well();
        well.tick(0.3);
        well.apply(ControlCommand::Reset).unwrap();
        assert_eq!(well.state().simulation_time(), 0.0);
        assert!(!well.state().is_paused());
    }

    #[test]
    fn test_mode_change_recomputes_immediately() {
        let mut well = small_well();
        well.tick(0.5);
        well.apply(ControlCommand::TogglePause).unwrap();
        let before = heights(&well);

        let effect = well
            .apply(ControlCommand::SetModeNumber { axis: Axis::X, value: 1 })
            .unwrap();
        assert_eq!(effect, CommandEffect::Recomputed);
        assert_eq!(well.state().mode_number(Axis::X), 1);
        assert_eq!(well.state().simulation_time(), 0.5);
        assert_ne!(heights(&well), before);

        let mut expected = SurfaceSet::new(well.surfaces().grid());
        expected.update_all(well.height_scale(), well.state());
        for q in Quantity::ALL {
            assert_eq!(expected.get(q).vertices(), well.surfaces().get(q).vertices());
        }
    }

    #[test]
    fn test_same_mode_number_is_a_no_op() {
        let mut well = small_well();
        let generation = well.generation();
        let effect = well
            .apply(ControlCommand::SetModeNumber { axis: Axis::Y, value: 4 })
            .unwrap();
        assert_eq!(effect, CommandEffect::Unchanged);
        assert_eq!(well.generation(), generation);
    }

    #[test]
    fn test_invalid_commands_are_rejected_without_side_effects() {
        let mut well = small_well();
        well.tick(0.2);
        let snapshot = well.state().clone();
        let surfaces = heights(&well);

        assert_eq!(
            well.apply(ControlCommand::SetModeNumber { axis: Axis::X, value: 0 }),
            Err(QuantumWellError::InvalidModeNumber { axis: Axis::X, value: 0 })
        );
        assert_eq!(
            well.apply(ControlCommand::SetModeNumber { axis: Axis::Y, value: 7 }),
            Err(QuantumWellError::ModeNumberOutOfRange { axis: Axis::Y, value: 7, max: 6 })
        );
        assert!(well.apply(ControlCommand::SetTimeSpeed(-2.0)).is_err());

        assert_eq!(well.state(), &snapshot);
        assert_eq!(heights(&well), surfaces);
    }

    #[test]
    fn test_display_mode_does_not_recompute() {
        let mut well = small_well();
        let generation = well.generation();

        let effect = well
            .apply(ControlCommand::SetDisplayMode(DisplayMode::Imaginary))
            .unwrap();
        assert_eq!(effect, CommandEffect::VisibilityChanged);
        assert_eq!(well.generation(), generation);

        let visible: Vec<Quantity> = well.visible_surfaces().map(|(q, _)| q).collect();
        assert_eq!(visible, vec![Quantity::Imaginary]);
    }

    #[test]
    fn test_display_mode_visibility() {
        assert_eq!(DisplayMode::All.visible().len(), 3);
        assert_eq!(DisplayMode::All.visible()[0], Quantity::Probability);
        assert!(DisplayMode::All.visible().contains(&Quantity::Real));
        assert_eq!(DisplayMode::Probability.visible(), &[Quantity::Probability]);
        assert_eq!(DisplayMode::Real.visible(), &[Quantity::Real]);
        assert_eq!(DisplayMode::default(), DisplayMode::All);
    }

    #[test]
    fn test_zero_speed_keeps_time_but_still_redraws() {
        let mut well = small_well();
        well.apply(ControlCommand::SetTimeSpeed(0.0)).unwrap();
        let generation = well.generation();
        assert!(well.tick(0.5));
        assert_eq!(well.state().simulation_time(), 0.0);
        assert_eq!(well.generation(), generation + 1);
    }
}
