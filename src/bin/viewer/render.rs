use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::SimHandle;

const DRAG_ARROW_COLOR: Color = Color::srgb(1.0, 0.2, 0.2);

/// Canvas space has its origin top-left with y down; the 2D camera looks at
/// the window centre with y up.
fn canvas_to_world(point: Vec2, window_size: Vec2) -> Vec2 {
    vec2(point.x - window_size.x / 2.0, window_size.y / 2.0 - point.y)
}

pub fn draw_bodies(
    mut gizmos: Gizmos,
    sim: Option<Res<SimHandle>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let (Some(sim), Ok(window)) = (sim, windows.single()) else {
        return;
    };
    let size = window.size();
    for body in sim.0.snapshot() {
        gizmos.circle_2d(
            Isometry2d::from_translation(canvas_to_world(body.position, size)),
            body.size / 2.0,
            body.color.to_color(),
        );
    }
}

/// Arrow from the press point along the launch direction.
pub fn draw_drag_arrow(
    mut gizmos: Gizmos,
    sim: Option<Res<SimHandle>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let (Some(sim), Ok(window)) = (sim, windows.single()) else {
        return;
    };
    let Some((origin, current)) = sim.0.drag_arrow() else {
        return;
    };
    let size = window.size();
    let start = canvas_to_world(origin, size);
    let end = canvas_to_world(origin + (origin - current), size);
    gizmos.arrow_2d(start, end, DRAG_ARROW_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_corners_map_to_world_corners() {
        let size = vec2(800.0, 600.0);
        assert_eq!(canvas_to_world(Vec2::ZERO, size), vec2(-400.0, 300.0));
        assert_eq!(canvas_to_world(size, size), vec2(400.0, -300.0));
        assert_eq!(canvas_to_world(size / 2.0, size), Vec2::ZERO);
    }
}
