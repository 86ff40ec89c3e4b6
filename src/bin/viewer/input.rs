use bevy::input::mouse::MouseWheel;
use bevy::prelude::MessageReader;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::input::EguiWantsInput;

use crate::SimHandle;

const ZOOM_STEP: f32 = 1.1;
const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

/// Mouse press/move/release and touch toggles, in window coordinates.
///
/// Presses over the egui panel are left to egui; moves and releases always
/// reach the simulation so a drag that ends over the panel still completes.
pub fn pointer_input(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    egui_input: Res<EguiWantsInput>,
    sim: Option<ResMut<SimHandle>>,
) {
    let (Some(mut sim), Ok(window)) = (sim, windows.single()) else {
        return;
    };
    let over_ui = egui_input.wants_any_pointer_input();

    if let Some(cursor) = window.cursor_position() {
        if buttons.just_pressed(MouseButton::Left) && !over_ui {
            sim.0.on_click(cursor.x, cursor.y);
        }
        sim.0.update_mouse_position(cursor.x, cursor.y);
        if buttons.just_released(MouseButton::Left) {
            sim.0.off_click(cursor.x, cursor.y);
        }
    }

    if over_ui {
        return;
    }
    for touch in touches.iter_just_pressed() {
        let point = touch.position();
        sim.0.on_toggle(point.x, point.y);
    }
}

/// Scroll wheel and Z/X keys adjust the view zoom.
pub fn zoom_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    time: Res<Time>,
    egui_input: Res<EguiWantsInput>,
    sim: Option<ResMut<SimHandle>>,
) {
    let Some(mut sim) = sim else {
        return;
    };
    if egui_input.wants_any_pointer_input() {
        mouse_wheel.clear();
        return;
    }

    let mut zoom = sim.0.config().zoom();
    for event in mouse_wheel.read() {
        if event.y > 0.0 {
            zoom *= ZOOM_STEP;
        } else if event.y < 0.0 {
            zoom /= ZOOM_STEP;
        }
    }

    let zoom_speed = 1.0 * time.delta_secs();
    if keyboard.pressed(KeyCode::KeyZ) {
        zoom *= 1.0 + zoom_speed;
    }
    if keyboard.pressed(KeyCode::KeyX) {
        zoom *= 1.0 - zoom_speed;
    }

    let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    if zoom != sim.0.config().zoom() {
        if let Err(err) = sim.0.set_scale_multiplier(zoom) {
            debug!("zoom input ignored: {err}");
        }
    }
}
