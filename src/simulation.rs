use bevy::log::{debug, info, warn};
use bevy::prelude::*;

use crate::body_set::{BodySet, BodySnapshot, effective_count};
use crate::energy::{SystemEnergy, system_energy};
use crate::error::SimError;
use crate::integrator::Integrator;
use crate::interaction::{InteractionController, SpawnRequest};
use crate::resources::{DEFAULT_SEED, ForceSolver, SPAWN_SPEED_UNIT, SimConfig, TIME_STEP_UNIT};
use crate::viewport::Viewport;

/// A running simulation and the only object the embedding layer holds.
///
/// Pointer coordinates and rendered positions are in canvas space (the
/// `width x height` given at creation); everything else is in simulation
/// space. Every method runs to completion on the caller's thread, so a
/// `tick` can never interleave with an event or a setter.
pub struct Simulation {
    config: SimConfig,
    bodies: BodySet,
    integrator: Integrator,
    interaction: InteractionController,
    viewport: Viewport,
    initial_count: usize,
    seed: u64,
}

impl Simulation {
    pub fn create(width: f32, height: f32, initial_count: usize, reduced: bool) -> Self {
        Self::create_seeded(width, height, initial_count, reduced, DEFAULT_SEED)
    }

    pub fn create_seeded(width: f32, height: f32, initial_count: usize, reduced: bool, seed: u64) -> Self {
        let bodies = BodySet::seed(initial_count, width, height, reduced, seed);
        info!(
            "created simulation: {}x{} canvas, {} bodies (requested {}, reduced {}), seed {}",
            width,
            height,
            bodies.len(),
            initial_count,
            reduced,
            seed
        );
        Self {
            config: SimConfig::default(),
            bodies,
            integrator: Integrator::new(),
            interaction: InteractionController::new(),
            viewport: Viewport::new(width, height),
            initial_count,
            seed,
        }
    }

    /// Reseeds the initial bodies and restores default parameters and
    /// framing. Any gesture in progress is dropped.
    pub fn reset(&mut self) {
        let size = self.viewport.size();
        let reduced = self.bodies.is_reduced();
        self.config = SimConfig::default();
        self.bodies = BodySet::seed(self.initial_count, size.x, size.y, reduced, self.seed);
        self.interaction.cancel();
        self.viewport = Viewport::new(size.x, size.y);
        info!(
            "simulation reset to {} bodies",
            effective_count(self.initial_count, reduced)
        );
    }

    /// Advances one time step and returns the frame to draw.
    pub fn tick(&mut self) -> Vec<BodySnapshot> {
        self.integrator.step(&mut self.bodies, &self.config);
        if self.viewport.follows_center_of_mass() || self.viewport.auto_scales() {
            self.viewport.update(&self.bodies.states());
        }
        self.snapshot()
    }

    /// Current bodies in canvas space, without stepping.
    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        let zoom = self.config.zoom();
        self.bodies
            .snapshot()
            .into_iter()
            .map(|body| BodySnapshot {
                position: self.viewport.to_canvas(body.position, zoom),
                ..body
            })
            .collect()
    }

    fn to_simulation(&self, x: f32, y: f32) -> Vec2 {
        self.viewport.to_simulation(vec2(x, y), self.config.zoom())
    }

    pub fn on_click(&mut self, x: f32, y: f32) {
        let point = self.to_simulation(x, y);
        self.interaction.on_press(point);
    }

    pub fn off_click(&mut self, x: f32, y: f32) {
        let point = self.to_simulation(x, y);
        let request = self.interaction.on_release(point, &self.config);
        self.spawn(request);
    }

    /// Touch variant: the first call presses, the next releases.
    pub fn on_toggle(&mut self, x: f32, y: f32) {
        let point = self.to_simulation(x, y);
        let request = self.interaction.on_toggle(point, &self.config);
        self.spawn(request);
    }

    pub fn update_mouse_position(&mut self, x: f32, y: f32) {
        let point = self.to_simulation(x, y);
        self.interaction.on_move(point);
    }

    fn spawn(&mut self, request: Option<SpawnRequest>) {
        let Some(request) = request else {
            return;
        };
        match request.into_body() {
            Ok(body) => {
                debug!(
                    "spawned body at {} with velocity {}",
                    request.position, request.velocity
                );
                self.bodies.insert(body);
            }
            Err(err) => warn!("spawn refused: {err}"),
        }
    }

    /// Origin and current pointer of the active gesture, in canvas space.
    pub fn drag_arrow(&self) -> Option<(Vec2, Vec2)> {
        let zoom = self.config.zoom();
        self.interaction.gesture().map(|gesture| {
            (
                self.viewport.to_canvas(gesture.origin, zoom),
                self.viewport.to_canvas(gesture.current, zoom),
            )
        })
    }

    fn logged(result: Result<(), SimError>) -> Result<(), SimError> {
        if let Err(err) = &result {
            warn!("{err}");
        }
        result
    }

    /// Time step in UI units (1.0 is the default step).
    pub fn set_dt(&mut self, value: f32) -> Result<(), SimError> {
        Self::logged(self.config.set_time_step(value * TIME_STEP_UNIT))
    }

    pub fn set_gravity(&mut self, value: f32) -> Result<(), SimError> {
        Self::logged(self.config.set_gravity(value))
    }

    pub fn set_spawn_radius(&mut self, value: f32) -> Result<(), SimError> {
        Self::logged(self.config.set_spawn_radius(value))
    }

    /// Launch speed in UI units (1.0 is the default scale).
    pub fn set_spawn_speed(&mut self, value: f32) -> Result<(), SimError> {
        Self::logged(self.config.set_spawn_speed(value * SPAWN_SPEED_UNIT))
    }

    pub fn set_scale_multiplier(&mut self, value: f32) -> Result<(), SimError> {
        Self::logged(self.config.set_zoom(value))
    }

    pub fn set_theta(&mut self, value: f32) -> Result<(), SimError> {
        Self::logged(self.config.set_theta(value))
    }

    pub fn set_max_speed(&mut self, value: Option<f32>) -> Result<(), SimError> {
        Self::logged(self.config.set_max_speed(value))
    }

    pub fn set_solver(&mut self, solver: ForceSolver) {
        self.config.set_solver(solver);
    }

    pub fn set_follow_center_of_mass(&mut self, enabled: bool) {
        self.viewport.set_follow_center_of_mass(enabled);
    }

    pub fn set_auto_scale(&mut self, enabled: bool) {
        self.viewport.set_auto_scale(enabled);
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Direct access for callers that work in raw (non-UI) units.
    pub fn config_mut(&mut self) -> &mut SimConfig {
        &mut self.config
    }

    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn energy(&self) -> SystemEnergy {
        system_energy(
            &self.bodies.states(),
            self.config.gravity(),
            self.config.softening(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::BodyColor;

    fn quiet(width: f32, height: f32) -> Simulation {
        Simulation::create_seeded(width, height, 0, false, 1)
    }

    #[test]
    fn create_seeds_requested_bodies() {
        let sim = Simulation::create(800.0, 600.0, 1000, false);
        let reduced = Simulation::create(800.0, 600.0, 1000, true);
        assert_eq!(sim.len(), 1000);
        assert!(reduced.len() < sim.len());
        assert_eq!(sim.config(), &SimConfig::default());
    }

    #[test]
    fn completed_drag_spawns_one_body() {
        let mut sim = quiet(800.0, 600.0);
        sim.set_spawn_speed(100.0).unwrap();

        sim.on_click(0.0, 0.0);
        sim.update_mouse_position(5.0, 0.0);
        assert_eq!(sim.drag_arrow(), Some((vec2(0.0, 0.0), vec2(5.0, 0.0))));
        sim.off_click(10.0, 0.0);

        assert_eq!(sim.len(), 1);
        assert_eq!(sim.drag_arrow(), None);
        let state = sim.bodies().states()[0];
        assert_eq!(state.position, vec2(0.0, 0.0));
        assert!((state.velocity - vec2(-10.0, 0.0)).length() < 1e-5);
        assert_eq!(sim.snapshot()[0].color, BodyColor::SPAWNED);
    }

    #[test]
    fn release_without_press_spawns_nothing() {
        let mut sim = Simulation::create_seeded(800.0, 600.0, 10, false, 1);
        sim.off_click(10.0, 10.0);
        assert_eq!(sim.len(), 10);
    }

    #[test]
    fn touch_toggles_spawn_on_second_touch() {
        let mut sim = quiet(800.0, 600.0);
        sim.on_toggle(100.0, 100.0);
        assert_eq!(sim.len(), 0);
        sim.on_toggle(120.0, 100.0);
        assert_eq!(sim.len(), 1);
        sim.on_toggle(50.0, 50.0);
        assert_eq!(sim.len(), 1);
    }

    #[test]
    fn invalid_setter_input_is_reported_and_ignored() {
        let mut sim = quiet(800.0, 600.0);
        sim.set_dt(2.0).unwrap();
        let before = sim.config().time_step();

        assert!(matches!(sim.set_dt(f32::NAN), Err(SimError::InvalidParameter { .. })));
        assert!(sim.set_gravity(f32::INFINITY).is_err());
        assert!(sim.set_scale_multiplier(0.0).is_err());
        assert_eq!(sim.config().time_step(), before);
        assert!((before - 0.2).abs() < 1e-6);
    }

    #[test]
    fn refused_spawn_leaves_bodies_untouched() {
        let mut sim = quiet(800.0, 600.0);
        sim.set_spawn_radius(-5.0).unwrap();
        sim.on_click(1.0, 1.0);
        sim.off_click(2.0, 2.0);
        assert!(sim.is_empty());
        sim.tick();
    }

    #[test]
    fn zoom_maps_pointer_back_to_simulation_space() {
        let mut sim = quiet(800.0, 600.0);
        sim.set_scale_multiplier(2.0).unwrap();
        sim.on_click(600.0, 300.0);
        sim.off_click(600.0, 300.0);

        assert_eq!(sim.bodies().states()[0].position, vec2(500.0, 300.0));
        assert_eq!(sim.snapshot()[0].position, vec2(600.0, 300.0));
    }

    #[test]
    fn tick_steps_and_returns_every_body() {
        let mut sim = Simulation::create_seeded(400.0, 400.0, 30, false, 9);
        let before = sim.bodies().states();
        let frame = sim.tick();
        assert_eq!(frame.len(), 30);
        assert_ne!(sim.bodies().states(), before);
    }

    #[test]
    fn reset_restores_seeded_state() {
        let mut sim = Simulation::create_seeded(400.0, 400.0, 20, false, 4);
        let seeded = sim.bodies().states();
        sim.set_gravity(5.0).unwrap();
        sim.on_click(0.0, 0.0);
        sim.off_click(1.0, 1.0);
        sim.tick();

        sim.reset();
        assert_eq!(sim.bodies().states(), seeded);
        assert_eq!(sim.config(), &SimConfig::default());
        assert_eq!(sim.drag_arrow(), None);

        let frame = sim.tick();
        assert_eq!(frame.len(), 20);
        assert_ne!(sim.bodies().states(), seeded);
    }

    #[test]
    fn ticks_keep_running_across_resets() {
        let mut sim = Simulation::create_seeded(400.0, 400.0, 20, false, 4);
        sim.tick();
        sim.reset();
        sim.tick();
        sim.set_solver(ForceSolver::DirectSum);
        sim.reset();
        sim.tick();
        sim.tick();
        assert_eq!(sim.len(), 20);
    }

    #[test]
    fn follow_mode_centres_the_frame() {
        let mut sim = quiet(100.0, 100.0);
        sim.on_click(10.0, 10.0);
        sim.off_click(10.0, 10.0);
        sim.set_follow_center_of_mass(true);
        sim.set_dt(0.0).unwrap();

        let frame = sim.tick();
        assert_eq!(frame[0].position, vec2(50.0, 50.0));
    }
}
