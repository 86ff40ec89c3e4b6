//! Desktop front end: draws the simulation with gizmos, forwards pointer and
//! touch input, and exposes the live parameters in an egui panel.

mod input;
mod render;
mod ui;

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResolution};
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};
use nbody_sandbox::Simulation;

/// Initial window edge in logical pixels.
const WINDOW_SIZE: u32 = 1000;
/// Bodies seeded at startup.
const NUM_BODIES: usize = 1000;
/// Simulation steps per second.
const STEP_RATE_HZ: f64 = 60.0;

/// The simulation this viewer drives.
#[derive(Resource)]
pub struct SimHandle(pub Simulation);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "N-Body Sandbox".into(),
                resolution: WindowResolution::new(WINDOW_SIZE, WINDOW_SIZE),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(Time::<Fixed>::from_hz(STEP_RATE_HZ))
        .add_systems(Startup, setup_scene)
        .add_systems(EguiPrimaryContextPass, ui::ui_controls)
        .add_systems(
            Update,
            (
                input::pointer_input,
                input::zoom_input,
                render::draw_bodies,
                render::draw_drag_arrow,
            )
                .chain(),
        )
        .add_systems(FixedUpdate, tick_simulation)
        .run();
}

/// Spawns the camera and seeds a simulation sized to the primary window.
fn setup_scene(mut commands: Commands, windows: Query<&Window, With<PrimaryWindow>>) {
    commands.spawn(Camera2d);

    let size = windows
        .single()
        .map(|window| window.size())
        .unwrap_or(Vec2::splat(WINDOW_SIZE as f32));
    commands.insert_resource(SimHandle(Simulation::create(size.x, size.y, NUM_BODIES, false)));
}

fn tick_simulation(mut sim: ResMut<SimHandle>) {
    sim.0.tick();
}
