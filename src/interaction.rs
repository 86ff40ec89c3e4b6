//! Pointer gestures that launch new bodies.
//!
//! A gesture starts at a press, follows the pointer while it moves and ends
//! at a release. The launch velocity points from the release point back
//! towards the press point ("pull back to launch") and grows with the drag
//! length times the spawn speed scale.
//!
//! Mouse input arrives as separate press and release events. Touch input
//! arrives as a single toggle that alternates between the two. Both feed
//! the same state machine.

use bevy::prelude::*;

use crate::components::{Body, BodyColor};
use crate::error::SimError;
use crate::resources::SimConfig;

/// An in-progress drag, in simulation space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragGesture {
    pub origin: Vec2,
    pub current: Vec2,
}

impl DragGesture {
    /// Launch vector: from the current pointer back to the origin.
    pub fn displacement(&self) -> Vec2 {
        self.origin - self.current
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragGesture),
}

/// A finished gesture, ready to become a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
}

impl SpawnRequest {
    fn from_gesture(gesture: &DragGesture, config: &SimConfig) -> Self {
        let displacement = gesture.displacement();
        let speed = displacement.length() * config.spawn_speed();
        Self {
            position: gesture.origin,
            velocity: displacement.normalize_or_zero() * speed,
            mass: config.spawn_mass(),
        }
    }

    /// Fails with `InvalidMass` when the spawn radius gave a non-positive mass.
    pub fn into_body(self) -> Result<Body, SimError> {
        Body::new(self.position, self.velocity, self.mass, BodyColor::SPAWNED)
    }
}

#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    state: DragState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn gesture(&self) -> Option<&DragGesture> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging(gesture) => Some(gesture),
        }
    }

    /// Starts a gesture at `point`. A press while already dragging restarts
    /// the gesture there.
    pub fn on_press(&mut self, point: Vec2) {
        self.state = DragState::Dragging(DragGesture {
            origin: point,
            current: point,
        });
    }

    /// Tracks the pointer. Ignored while idle.
    pub fn on_move(&mut self, point: Vec2) {
        if let DragState::Dragging(gesture) = &mut self.state {
            gesture.current = point;
        }
    }

    /// Ends the gesture at `point`. Returns `None` when no gesture was active.
    pub fn on_release(&mut self, point: Vec2, config: &SimConfig) -> Option<SpawnRequest> {
        let DragState::Dragging(mut gesture) = std::mem::take(&mut self.state) else {
            return None;
        };
        gesture.current = point;
        Some(SpawnRequest::from_gesture(&gesture, config))
    }

    /// Touch entry point: presses when idle, releases when dragging.
    pub fn on_toggle(&mut self, point: Vec2, config: &SimConfig) -> Option<SpawnRequest> {
        match self.state {
            DragState::Idle => {
                self.on_press(point);
                None
            }
            DragState::Dragging(_) => self.on_release(point, config),
        }
    }

    /// Drops any active gesture without spawning.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_speed_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.set_spawn_speed(1.0).unwrap();
        config
    }

    #[test]
    fn drag_launches_opposite_to_the_drag() {
        let config = unit_speed_config();
        let mut controller = InteractionController::new();

        controller.on_press(vec2(0.0, 0.0));
        let request = controller.on_release(vec2(10.0, 0.0), &config).unwrap();

        assert_eq!(request.position, vec2(0.0, 0.0));
        assert_eq!(request.velocity, vec2(-10.0, 0.0));
        assert!(!controller.is_dragging());
    }

    #[test]
    fn speed_scales_with_spawn_speed() {
        let mut config = SimConfig::default();
        config.set_spawn_speed(0.5).unwrap();
        let mut controller = InteractionController::new();

        controller.on_press(vec2(1.0, 1.0));
        let request = controller.on_release(vec2(1.0, -3.0), &config).unwrap();
        assert!((request.velocity - vec2(0.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn zero_length_drag_spawns_at_rest() {
        let config = unit_speed_config();
        let mut controller = InteractionController::new();
        controller.on_press(vec2(4.0, 4.0));
        let request = controller.on_release(vec2(4.0, 4.0), &config).unwrap();
        assert_eq!(request.velocity, Vec2::ZERO);
        assert!(request.into_body().is_ok());
    }

    #[test]
    fn move_updates_current_only_while_dragging() {
        let mut controller = InteractionController::new();
        controller.on_move(vec2(9.0, 9.0));
        assert_eq!(controller.gesture(), None);

        controller.on_press(vec2(1.0, 2.0));
        controller.on_move(vec2(5.0, 6.0));
        let gesture = controller.gesture().unwrap();
        assert_eq!(gesture.origin, vec2(1.0, 2.0));
        assert_eq!(gesture.current, vec2(5.0, 6.0));
    }

    #[test]
    fn release_while_idle_is_ignored() {
        let mut controller = InteractionController::new();
        assert_eq!(controller.on_release(vec2(3.0, 3.0), &SimConfig::default()), None);
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn toggles_alternate_press_and_release() {
        let config = unit_speed_config();
        let mut controller = InteractionController::new();

        assert_eq!(controller.on_toggle(vec2(0.0, 0.0), &config), None);
        assert!(controller.is_dragging());

        let request = controller.on_toggle(vec2(0.0, 5.0), &config).unwrap();
        assert_eq!(request.velocity, vec2(0.0, -5.0));
        assert!(!controller.is_dragging());

        assert_eq!(controller.on_toggle(vec2(2.0, 2.0), &config), None);
        assert!(controller.is_dragging());
    }

    #[test]
    fn second_press_restarts_the_gesture() {
        let config = unit_speed_config();
        let mut controller = InteractionController::new();
        controller.on_press(vec2(0.0, 0.0));
        controller.on_press(vec2(7.0, 7.0));
        let request = controller.on_release(vec2(7.0, 8.0), &config).unwrap();
        assert_eq!(request.position, vec2(7.0, 7.0));
    }

    #[test]
    fn non_positive_spawn_radius_is_refused() {
        let mut config = unit_speed_config();
        config.set_spawn_radius(0.0).unwrap();
        let mut controller = InteractionController::new();
        controller.on_press(Vec2::ZERO);
        let request = controller.on_release(Vec2::X, &config).unwrap();
        assert!(matches!(request.into_body(), Err(SimError::InvalidMass(_))));
    }

    #[test]
    fn cancel_discards_the_gesture() {
        let mut controller = InteractionController::new();
        controller.on_press(Vec2::ZERO);
        controller.cancel();
        assert_eq!(controller.on_release(Vec2::X, &SimConfig::default()), None);
    }
}
