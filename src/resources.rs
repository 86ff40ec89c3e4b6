use bevy::prelude::*;

use crate::error::SimError;

// --- Simulation Defaults ---
/// Scale applied to time steps coming from the UI (`set_dt(1.0)` -> 0.1).
pub const TIME_STEP_UNIT: f32 = 0.1;
/// Scale applied to spawn speeds coming from the UI.
pub const SPAWN_SPEED_UNIT: f32 = 0.01;
/// Default time step, one UI unit.
pub const DEFAULT_TIME_STEP: f32 = 1.0 * TIME_STEP_UNIT;
/// Default gravitational constant.
pub const DEFAULT_GRAVITY: f32 = 1.0;
/// Default spawn radius in simulation units.
pub const DEFAULT_SPAWN_RADIUS: f32 = 50.0;
/// Default launch speed per unit of drag length.
pub const DEFAULT_SPAWN_SPEED: f32 = 1.0 * SPAWN_SPEED_UNIT;
/// Default view zoom.
pub const DEFAULT_ZOOM: f32 = 1.0;
/// Distance softening added to |d|^3 to keep close encounters finite.
pub const DEFAULT_SOFTENING: f32 = 0.1;
/// Default Barnes-Hut opening threshold; smaller is more accurate.
pub const DEFAULT_THETA: f32 = 0.9;
/// Mass given to a spawned body per unit of spawn radius.
pub const SPAWN_MASS_PER_RADIUS: f32 = 0.1;
/// Fraction of the initial count kept in reduced mode.
pub const REDUCED_COUNT_DIVISOR: usize = 4;
/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 0x5EED_B0D1;

/// How pairwise gravity is evaluated each step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ForceSolver {
    /// Exact O(n^2) sum over every pair.
    DirectSum,
    /// Quadtree approximation governed by `theta`.
    #[default]
    BarnesHut,
}

/// Live-tunable simulation parameters, read by the integrator every step.
///
/// Fields are private so every write goes through a validating setter; a
/// rejected write keeps the previous value.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SimConfig {
    time_step: f32,
    gravity: f32,
    spawn_radius: f32,
    spawn_speed: f32,
    zoom: f32,
    softening: f32,
    theta: f32,
    solver: ForceSolver,
    max_speed: Option<f32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            gravity: DEFAULT_GRAVITY,
            spawn_radius: DEFAULT_SPAWN_RADIUS,
            spawn_speed: DEFAULT_SPAWN_SPEED,
            zoom: DEFAULT_ZOOM,
            softening: DEFAULT_SOFTENING,
            theta: DEFAULT_THETA,
            solver: ForceSolver::default(),
            max_speed: None,
        }
    }
}

fn finite(name: &'static str, value: f32) -> Result<f32, SimError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

fn positive(name: &'static str, value: f32) -> Result<f32, SimError> {
    match finite(name, value)? {
        v if v > 0.0 => Ok(v),
        _ => Err(SimError::InvalidParameter { name, value }),
    }
}

impl SimConfig {
    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn spawn_radius(&self) -> f32 {
        self.spawn_radius
    }

    pub fn spawn_speed(&self) -> f32 {
        self.spawn_speed
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn softening(&self) -> f32 {
        self.softening
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn solver(&self) -> ForceSolver {
        self.solver
    }

    pub fn max_speed(&self) -> Option<f32> {
        self.max_speed
    }

    /// Negative steps run time backwards; zero freezes motion.
    pub fn set_time_step(&mut self, value: f32) -> Result<(), SimError> {
        self.time_step = finite("time_step", value)?;
        Ok(())
    }

    /// Negative values make gravity repulsive.
    pub fn set_gravity(&mut self, value: f32) -> Result<(), SimError> {
        self.gravity = finite("gravity", value)?;
        Ok(())
    }

    /// Accepts any finite value. A non-positive radius is caught later, when
    /// a spawned body would get a non-positive mass.
    pub fn set_spawn_radius(&mut self, value: f32) -> Result<(), SimError> {
        self.spawn_radius = finite("spawn_radius", value)?;
        Ok(())
    }

    pub fn set_spawn_speed(&mut self, value: f32) -> Result<(), SimError> {
        self.spawn_speed = finite("spawn_speed", value)?;
        Ok(())
    }

    /// Zoom divides pointer coordinates, so it must stay strictly positive.
    pub fn set_zoom(&mut self, value: f32) -> Result<(), SimError> {
        self.zoom = positive("zoom", value)?;
        Ok(())
    }

    pub fn set_softening(&mut self, value: f32) -> Result<(), SimError> {
        self.softening = positive("softening", value)?;
        Ok(())
    }

    pub fn set_theta(&mut self, value: f32) -> Result<(), SimError> {
        match finite("theta", value)? {
            v if v >= 0.0 => self.theta = v,
            _ => return Err(SimError::InvalidParameter { name: "theta", value }),
        }
        Ok(())
    }

    pub fn set_solver(&mut self, solver: ForceSolver) {
        self.solver = solver;
    }

    /// `None` removes the clamp.
    pub fn set_max_speed(&mut self, value: Option<f32>) -> Result<(), SimError> {
        self.max_speed = value.map(|v| positive("max_speed", v)).transpose()?;
        Ok(())
    }

    /// Mass a body spawned under the current parameters receives.
    pub fn spawn_mass(&self) -> f32 {
        self.spawn_radius * SPAWN_MASS_PER_RADIUS
    }
}
