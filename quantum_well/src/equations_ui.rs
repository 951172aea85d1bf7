//! Equations sidebar for the quantum well
//!
//! Provides an egui sidebar with the infinite-well equations and the values
//! they take for the current mode numbers

use egui::{Color32, Context, FontFamily, FontId, RichText};

use crate::simulation::SimulationState;

/// Equation entry with label and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

/// Draw the equation sidebar with a live readout of the current state
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    equations: &[Equation],
    variables: &[(&str, &str)],
    state: &SimulationState,
) {
    egui::SidePanel::right("equations_panel")
        .min_width(280.0)
        .max_width(350.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new(title).color(Color32::from_rgb(100, 200, 255)));
            });

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Equations").strong().color(Color32::from_rgb(255, 200, 100)));
            ui.add_space(5.0);

            for eq in equations {
                draw_equation(ui, eq);
                ui.add_space(8.0);
            }

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Current State").strong().color(Color32::from_rgb(255, 200, 100)));
            ui.add_space(5.0);

            let modes = state.modes();
            let phase = modes.phase(state.simulation_time());
            for (symbol, value) in [
                ("(nx, ny)", modes.label()),
                ("E", format!("{:.0}", modes.energy())),
                ("ω", format!("{:.0}", modes.omega())),
                ("T", format!("{:.3}", modes.period())),
                ("ωt'", format!("{:.2} rad", phase)),
            ] {
                draw_variable(ui, symbol, &value);
            }

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Variables").strong().color(Color32::from_rgb(255, 200, 100)));
            ui.add_space(5.0);

            for (symbol, meaning) in variables {
                draw_variable(ui, symbol, meaning);
            }
        });
}

fn draw_variable(ui: &mut egui::Ui, symbol: &str, meaning: &str) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(symbol)
                .color(Color32::from_rgb(150, 255, 150))
                .font(FontId::new(14.0, FontFamily::Monospace)),
        );
        ui.label(RichText::new("=").color(Color32::GRAY));
        ui.label(RichText::new(meaning).color(Color32::LIGHT_GRAY));
    });
}

/// Draw a single equation with name, formula, and description
fn draw_equation(ui: &mut egui::Ui, eq: &Equation) {
    ui.group(|ui| {
        ui.label(RichText::new(eq.name).strong().color(Color32::WHITE));
        ui.label(
            RichText::new(eq.formula)
                .font(FontId::new(16.0, FontFamily::Monospace))
                .color(Color32::from_rgb(200, 220, 255)),
        );
        ui.label(RichText::new(eq.description).small().color(Color32::GRAY));
    });
}

// ============================================
// Infinite Square Well Equations
// ============================================

pub const WELL_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Stationary State",
        formula: "ψ(x,y) = 2 sin(nₓπu) sin(nᵧπv)",
        description: "Standing wave, u = (x+1)/2, v = (y+1)/2",
    },
    Equation {
        name: "Energy Levels",
        formula: "E = nₓ² + nᵧ²",
        description: "Display units, ℏ = 1",
    },
    Equation {
        name: "Time Evolution",
        formula: "ψ(x,y,t) = ψ(x,y) e^(-iωt')",
        description: "ω = E, t' = 0.1 t (slowed for display)",
    },
    Equation {
        name: "Real / Imaginary Parts",
        formula: "Re ψ = ψ cos ωt'\nIm ψ = -ψ sin ωt'",
        description: "Red and blue wireframes",
    },
    Equation {
        name: "Probability Density",
        formula: "ρ = |ψ|² = Re² + Im²",
        description: "Green surface, constant for a single mode",
    },
];

pub const WELL_VARIABLES: &[(&str, &str)] = &[
    ("nₓ, nᵧ", "Mode numbers (1–6)"),
    ("u, v", "Position across the well (0–1)"),
    ("E", "Energy"),
    ("ω", "Angular frequency"),
    ("T", "Oscillation period 2π/(0.1ω)"),
    ("ρ", "Probability density"),
];
