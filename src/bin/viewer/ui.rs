use bevy::prelude::*;
use bevy_egui::EguiContexts;
use bevy_egui::egui;
use nbody_sandbox::{ForceSolver, SimError};
use nbody_sandbox::resources::{SPAWN_SPEED_UNIT, TIME_STEP_UNIT};

use crate::SimHandle;

/// Keeps the last rejected parameter write for display; a successful write
/// clears it.
fn record(result: Result<(), SimError>, last_error: &mut Option<String>) {
    *last_error = result.err().map(|err| err.to_string());
}

/// Parameter panel.
pub fn ui_controls(
    mut contexts: EguiContexts,
    sim: Option<ResMut<SimHandle>>,
    mut frames_rendered: Local<usize>,
    mut show_energy: Local<bool>,
    mut last_error: Local<Option<String>>,
) {
    if *frames_rendered < 5 {
        *frames_rendered += 1;
        return;
    }
    let Some(mut sim) = sim else {
        return;
    };
    let sim = &mut sim.0;
    let last_error = &mut *last_error;

    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Window::new("Simulation Controls")
            .default_pos(egui::pos2(10.0, 10.0))
            .max_size([320.0, 420.0])
            .vscroll(true)
            .show(ctx, |ui| {
                ui.heading("Simulation");
                ui.label(format!("Bodies: {}", sim.len()));

                let mut dt = sim.config().time_step() / TIME_STEP_UNIT;
                if ui
                    .add(egui::Slider::new(&mut dt, -5.0..=5.0).text("Time Step"))
                    .changed()
                {
                    record(sim.set_dt(dt), last_error);
                }

                let mut gravity = sim.config().gravity();
                if ui
                    .add(egui::Slider::new(&mut gravity, -10.0..=10.0).text("G (Gravity)"))
                    .changed()
                {
                    record(sim.set_gravity(gravity), last_error);
                }

                let mut theta = sim.config().theta();
                if ui
                    .add(egui::Slider::new(&mut theta, 0.0..=1.5).text("Theta (Approximation)"))
                    .changed()
                {
                    record(sim.set_theta(theta), last_error);
                }

                let mut solver = sim.config().solver();
                ui.horizontal(|ui| {
                    ui.radio_value(&mut solver, ForceSolver::BarnesHut, "Barnes-Hut");
                    ui.radio_value(&mut solver, ForceSolver::DirectSum, "Direct sum");
                });
                if solver != sim.config().solver() {
                    sim.set_solver(solver);
                }

                ui.separator();
                ui.heading("Spawning");
                let mut radius = sim.config().spawn_radius();
                if ui
                    .add(egui::Slider::new(&mut radius, 1.0..=200.0).text("Spawn Radius"))
                    .changed()
                {
                    record(sim.set_spawn_radius(radius), last_error);
                }

                let mut speed = sim.config().spawn_speed() / SPAWN_SPEED_UNIT;
                if ui
                    .add(egui::Slider::new(&mut speed, 0.0..=10.0).text("Spawn Speed"))
                    .changed()
                {
                    record(sim.set_spawn_speed(speed), last_error);
                }

                ui.separator();
                ui.heading("View");
                let mut zoom = sim.config().zoom();
                if ui
                    .add(egui::Slider::new(&mut zoom, 0.1..=10.0).logarithmic(true).text("Zoom"))
                    .changed()
                {
                    record(sim.set_scale_multiplier(zoom), last_error);
                }

                let mut follow = sim.viewport().follows_center_of_mass();
                if ui.checkbox(&mut follow, "Follow Center of Mass").changed() {
                    sim.set_follow_center_of_mass(follow);
                }
                let mut auto_scale = sim.viewport().auto_scales();
                if ui.checkbox(&mut auto_scale, "Auto Scale").changed() {
                    sim.set_auto_scale(auto_scale);
                }

                ui.separator();
                ui.checkbox(&mut *show_energy, "Show Energy");
                if *show_energy {
                    let energy = sim.energy();
                    ui.label(format!("Kinetic: {:.3}", energy.kinetic));
                    ui.label(format!("Potential: {:.3}", energy.potential));
                    ui.label(format!("Total: {:.3}", energy.total));
                }

                ui.separator();
                ui.heading("Controls");
                ui.label("Spawn: drag and release (touch: tap twice)");
                ui.label("Zoom: Scroll Wheel / Z & X");

                if let Some(message) = last_error.as_deref() {
                    ui.colored_label(egui::Color32::LIGHT_RED, message);
                }

                if ui.button("Reset Simulation").clicked() {
                    sim.reset();
                    *last_error = None;
                }
            });
    }
}
