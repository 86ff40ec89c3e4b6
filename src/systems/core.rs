use bevy::prelude::*;

use crate::components::*;
use crate::forces::accumulate_pairwise;
use crate::quadtree::{QuadTreeResource, Rect};
use crate::resources::{ForceSolver, SimConfig};

/// Run condition: the quadtree solver is selected.
pub fn uses_barnes_hut(config: Res<SimConfig>) -> bool {
    config.solver() == ForceSolver::BarnesHut
}

/// Run condition: the exact pairwise solver is selected.
pub fn uses_direct_sum(config: Res<SimConfig>) -> bool {
    config.solver() == ForceSolver::DirectSum
}

/// Recomputes quadtree bounds and inserts all bodies with finite positions.
pub fn reset_and_build_tree(
    mut quadtree: ResMut<QuadTreeResource>,
    query: Query<(Entity, &Position, &Mass)>,
) {
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);

    for (_, pos, _) in query.iter() {
        if pos.is_finite() {
            min = min.min(**pos);
            max = max.max(**pos);
        }
    }

    if !min.x.is_finite() {
        quadtree.reset(Rect::default());
        return;
    }

    quadtree.reset(Rect::covering(min, max));

    for (entity, pos, mass) in query.iter() {
        if pos.is_finite() {
            quadtree.insert(entity, **pos, **mass);
        }
    }
}

/// Approximates gravitational acceleration for every body from the quadtree.
pub fn calculate_forces_barnes_hut(
    mut query: Query<(Entity, &Position, &mut Acceleration)>,
    quadtree: Res<QuadTreeResource>,
    config: Res<SimConfig>,
) {
    let (gravity, softening, theta) = (config.gravity(), config.softening(), config.theta());
    query.par_iter_mut().for_each(|(entity, pos, mut acc)| {
        acc.0 = quadtree.calculate_acceleration(entity, **pos, gravity, softening, theta);
    });
}

/// Buffers reused across direct-sum steps.
#[derive(Default)]
pub struct PairScratch {
    positions: Vec<Vec2>,
    masses: Vec<f32>,
    accelerations: Vec<Vec2>,
}

/// Exact O(n^2) acceleration for every body.
pub fn calculate_forces_direct(
    mut query: Query<(&Position, &Mass, &mut Acceleration)>,
    config: Res<SimConfig>,
    mut scratch: Local<PairScratch>,
) {
    let scratch = &mut *scratch;
    scratch.positions.clear();
    scratch.masses.clear();
    for (pos, mass, _) in query.iter() {
        scratch.positions.push(**pos);
        scratch.masses.push(**mass);
    }
    scratch.accelerations.clear();
    scratch.accelerations.resize(scratch.positions.len(), Vec2::ZERO);

    accumulate_pairwise(
        &scratch.positions,
        &scratch.masses,
        config.gravity(),
        config.softening(),
        &mut scratch.accelerations,
    );

    for ((_, _, mut acc), a) in query.iter_mut().zip(&scratch.accelerations) {
        acc.0 = *a;
    }
}

/// Semi-implicit Euler: kick velocities with the fresh accelerations, then
/// drift positions with the new velocities.
pub fn integrate_motion(
    mut query: Query<(&mut Position, &mut Velocity, &Acceleration)>,
    config: Res<SimConfig>,
) {
    let dt = config.time_step();
    if dt == 0.0 {
        return;
    }
    let max_speed = config.max_speed();

    for (mut pos, mut vel, acc) in query.iter_mut() {
        vel.0 += acc.0 * dt;
        if let Some(limit) = max_speed
            && vel.length_squared() > limit * limit
        {
            vel.0 = vel.0.normalize_or_zero() * limit;
        }
        pos.0 += vel.0 * dt;
    }
}
