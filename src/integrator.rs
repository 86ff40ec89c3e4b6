use bevy::ecs::schedule::ExecutorKind;
use bevy::ecs::world::WorldId;
use bevy::log::debug;
use bevy::prelude::*;

use crate::body_set::BodySet;
use crate::quadtree::QuadTreeResource;
use crate::resources::SimConfig;
use crate::systems::*;

/// Advances a `BodySet` by one time step.
///
/// Wraps a single-threaded schedule: optional quadtree rebuild, force
/// evaluation with the selected solver, then a semi-implicit Euler update.
/// The Barnes-Hut force pass may fan out over the compute pool, but it
/// only reads positions and writes each body's own acceleration.
///
/// Schedule systems are bound to the world they first ran on, so the
/// schedule is rebuilt whenever `step` is handed a different `BodySet`.
pub struct Integrator {
    schedule: Schedule,
    world: Option<WorldId>,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new()
    }
}

fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (
            reset_and_build_tree.run_if(uses_barnes_hut),
            calculate_forces_barnes_hut.run_if(uses_barnes_hut),
            calculate_forces_direct.run_if(uses_direct_sum),
            integrate_motion,
        )
            .chain(),
    );
    schedule
}

impl Integrator {
    pub fn new() -> Self {
        Self {
            schedule: build_schedule(),
            world: None,
        }
    }

    pub fn step(&mut self, bodies: &mut BodySet, config: &SimConfig) {
        let world = bodies.world_mut();
        if self.world.is_some_and(|id| id != world.id()) {
            debug!("integrator moved to a new body set, rebuilding schedule");
            self.schedule = build_schedule();
        }
        self.world = Some(world.id());

        world.insert_resource(config.clone());
        world.init_resource::<QuadTreeResource>();
        self.schedule.run(world);
    }
}
