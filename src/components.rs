use std::fmt;

use bevy::prelude::*;

use crate::error::SimError;

/// Position of a body in simulation space (2D).
#[derive(Component, Deref, DerefMut, Clone, Copy, Debug, PartialEq)]
pub struct Position(pub Vec2);

/// Linear velocity of a body.
#[derive(Component, Deref, DerefMut, Clone, Copy, Debug, PartialEq)]
pub struct Velocity(pub Vec2);

/// Acceleration from the last force evaluation.
#[derive(Component, Deref, DerefMut, Clone, Copy, Debug, Default, PartialEq)]
pub struct Acceleration(pub Vec2);

/// Mass of a body. Always positive.
#[derive(Component, Deref, Clone, Copy, Debug, PartialEq)]
pub struct Mass(pub f32);

/// Insertion order within a `BodySet`, used for stable iteration.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpawnIndex(pub u64);

/// Render colour, fixed at spawn.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyColor(pub [u8; 3]);

impl BodyColor {
    pub const SPAWNED: BodyColor = BodyColor([255, 0, 0]);

    pub fn to_color(self) -> Color {
        let [r, g, b] = self.0;
        Color::srgb_u8(r, g, b)
    }
}

/// CSS `rgb(r,g,b)` form, as canvas fill styles expect.
impl fmt::Display for BodyColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "rgb({r},{g},{b})")
    }
}

/// Component set of one simulated point mass.
///
/// Only constructible through [`Body::new`], which rejects non-positive
/// masses, so every body in a `BodySet` has `mass > 0`.
#[derive(Bundle, Clone, Debug)]
pub struct Body {
    position: Position,
    velocity: Velocity,
    acceleration: Acceleration,
    mass: Mass,
    color: BodyColor,
}

impl Body {
    pub fn new(position: Vec2, velocity: Vec2, mass: f32, color: BodyColor) -> Result<Self, SimError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimError::InvalidMass(mass));
        }
        Ok(Self {
            position: Position(position),
            velocity: Velocity(velocity),
            acceleration: Acceleration::default(),
            mass: Mass(mass),
            color,
        })
    }

    pub fn position(&self) -> Vec2 {
        self.position.0
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity.0
    }

    pub fn mass(&self) -> f32 {
        self.mass.0
    }

    pub fn color(&self) -> BodyColor {
        self.color
    }
}
