//! Control panel and keyboard bindings.
//!
//! Both surfaces only read the [`SimulationState`] and return
//! [`ControlCommand`]s; the session applies them after the UI pass.

use egui::{Color32, Context, RichText};
use winit::keyboard::KeyCode;

use crate::config::{MODE_NUMBER_MAX, TIME_SPEED_MAX, TIME_SPEED_STEP};
use crate::error::Axis;
use crate::simulation::{ControlCommand, DisplayMode, SimulationState};

/// Build the controls panel and collect the commands the user issued.
pub fn draw_control_panel(ctx: &Context, state: &SimulationState) -> Vec<ControlCommand> {
    let mut commands = Vec::new();

    egui::SidePanel::left("controls_panel")
        .min_width(220.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading(RichText::new("Controls").color(Color32::from_rgb(100, 200, 255)));
            ui.add_space(8.0);

            for axis in [Axis::X, Axis::Y] {
                let mut value = state.mode_number(axis);
                let response = ui.add(
                    egui::Slider::new(&mut value, 1..=MODE_NUMBER_MAX).text(axis.to_string()),
                );
                if response.changed() {
                    commands.push(ControlCommand::SetModeNumber { axis, value });
                }
            }

            ui.add_space(8.0);

            let mut speed = state.time_speed();
            let response = ui.add(
                egui::Slider::new(&mut speed, 0.0..=TIME_SPEED_MAX)
                    .step_by(TIME_SPEED_STEP as f64)
                    .fixed_decimals(1)
                    .text("Time speed"),
            );
            if response.changed() {
                commands.push(ControlCommand::SetTimeSpeed(speed));
            }

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let label = if state.is_paused() { "Resume" } else { "Pause" };
                if ui.button(label).clicked() {
                    commands.push(ControlCommand::TogglePause);
                }
                if ui.button("Reset").clicked() {
                    commands.push(ControlCommand::Reset);
                }
            });

            ui.add_space(8.0);

            let mut mode = state.display_mode();
            egui::ComboBox::from_label("Display")
                .selected_text(mode.to_string())
                .show_ui(ui, |ui| {
                    for option in DisplayMode::ALL {
                        ui.selectable_value(&mut mode, option, option.to_string());
                    }
                });
            if mode != state.display_mode() {
                commands.push(ControlCommand::SetDisplayMode(mode));
            }

            ui.add_space(12.0);
            ui.separator();
            ui.label(RichText::new(KEY_HELP).small().color(Color32::GRAY));
        });

    commands
}

const KEY_HELP: &str = "Space: pause · R: reset · 1-4: display\n\
                        ←/→: nx · ↑/↓: ny · +/-: speed · H: hide panels\n\
                        Drag: orbit · Scroll: zoom";

/// Top status bar: time, modes, speed and run state
pub fn draw_status_bar(ctx: &Context, state: &SimulationState, compact: bool) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("Time: {:.2}", state.simulation_time()));
            ui.separator();
            ui.label(format!("(nx, ny) = {}", state.modes().label()));
            ui.separator();
            ui.label(format!("Speed: {:.1}x", state.time_speed()));
            ui.separator();
            if state.is_paused() {
                ui.label(RichText::new("PAUSED").color(Color32::YELLOW));
            } else {
                ui.label(RichText::new("RUNNING").color(Color32::GREEN));
            }
            if compact {
                ui.separator();
                ui.label("Compact layout");
            }
        });
    });
}

/// Translate a key press into a command, if the key is bound.
///
/// Mode and speed steps saturate at their limits instead of producing a
/// command the session would reject.
pub fn command_for_key(key: KeyCode, state: &SimulationState) -> Option<ControlCommand> {
    match key {
        KeyCode::Space => Some(ControlCommand::TogglePause),
        KeyCode::KeyR => Some(ControlCommand::Reset),
        KeyCode::Digit1 => Some(ControlCommand::SetDisplayMode(DisplayMode::All)),
        KeyCode::Digit2 => Some(ControlCommand::SetDisplayMode(DisplayMode::Real)),
        KeyCode::Digit3 => Some(ControlCommand::SetDisplayMode(DisplayMode::Imaginary)),
        KeyCode::Digit4 => Some(ControlCommand::SetDisplayMode(DisplayMode::Probability)),
        KeyCode::ArrowLeft => step_mode(state, Axis::X, -1),
        KeyCode::ArrowRight => step_mode(state, Axis::X, 1),
        KeyCode::ArrowDown => step_mode(state, Axis::Y, -1),
        KeyCode::ArrowUp => step_mode(state, Axis::Y, 1),
        KeyCode::Equal | KeyCode::NumpadAdd => step_speed(state, 1.0),
        KeyCode::Minus | KeyCode::NumpadSubtract => step_speed(state, -1.0),
        _ => None,
    }
}

fn step_mode(state: &SimulationState, axis: Axis, delta: i64) -> Option<ControlCommand> {
    let current = state.mode_number(axis);
    let next = (current as i64 + delta).clamp(1, MODE_NUMBER_MAX as i64) as u32;
    (next != current).then_some(ControlCommand::SetModeNumber { axis, value: next })
}

fn step_speed(state: &SimulationState, direction: f32) -> Option<ControlCommand> {
    let current = state.time_speed();
    // Snap to the slider's 0.1 grid so repeated presses do not drift
    let steps = (current / TIME_SPEED_STEP).round() + direction;
    let next = (steps * TIME_SPEED_STEP).clamp(0.0, TIME_SPEED_MAX);
    (next != current).then_some(ControlCommand::SetTimeSpeed(next))
}
