use bevy::log::debug;
use bevy::prelude::*;
use bevy::tasks::{ComputeTaskPool, TaskPoolBuilder};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::components::*;
use crate::resources::REDUCED_COUNT_DIVISOR;

/// Half-range of the uniform random velocity given to seeded bodies.
pub const SEED_SPEED: f32 = 0.5;
/// Mass of every seeded body.
pub const SEED_MASS: f32 = 1.0;
/// Rendered size of a unit-mass body, in pixels.
pub const BODY_DRAW_SIZE: f32 = 2.0;
/// Larger draw size for reduced (touch) viewports.
pub const BODY_DRAW_SIZE_REDUCED: f32 = 3.0;

pub const STAR_COLOURS: [BodyColor; 15] = [
    BodyColor([155, 176, 255]),
    BodyColor([170, 191, 255]),
    BodyColor([202, 215, 255]),
    BodyColor([248, 247, 255]),
    BodyColor([248, 247, 255]),
    BodyColor([248, 247, 255]),
    BodyColor([255, 255, 255]),
    BodyColor([248, 247, 255]),
    BodyColor([255, 255, 255]),
    BodyColor([255, 255, 255]),
    BodyColor([255, 255, 255]),
    BodyColor([255, 244, 234]),
    BodyColor([255, 244, 234]),
    BodyColor([255, 210, 161]),
    BodyColor([255, 204, 111]),
];

/// Count actually seeded for a requested `count`.
pub fn effective_count(count: usize, reduced: bool) -> usize {
    if reduced && count > 1 {
        (count / REDUCED_COUNT_DIVISOR).max(1)
    } else {
        count
    }
}

/// Read-only copy of one body's dynamic state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
}

/// Rendering view of one body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySnapshot {
    pub position: Vec2,
    pub color: BodyColor,
    pub size: f32,
}

/// Exclusive owner of every simulated body.
///
/// Bodies live as entities in a private ECS `World`; the same world holds
/// the resources the integrator schedule runs against. Iteration follows
/// insertion order.
pub struct BodySet {
    world: World,
    next_index: u64,
    reduced: bool,
}

impl Default for BodySet {
    fn default() -> Self {
        Self::new(false)
    }
}

impl BodySet {
    pub fn new(reduced: bool) -> Self {
        ComputeTaskPool::get_or_init(|| TaskPoolBuilder::default().build());
        Self {
            world: World::new(),
            next_index: 0,
            reduced,
        }
    }

    /// Uniformly scatters bodies over `[0, width) x [0, height)` with unit
    /// mass, a small random velocity and a star colour picked by index.
    ///
    /// The same `seed` always produces the same bodies. `reduced` shrinks the
    /// count by `REDUCED_COUNT_DIVISOR` and nothing else.
    pub fn seed(count: usize, width: f32, height: f32, reduced: bool, seed: u64) -> Self {
        let mut set = Self::new(reduced);
        let mut rng = StdRng::seed_from_u64(seed);
        let count = effective_count(count, reduced);
        let span = vec2(width.max(0.0), height.max(0.0));

        for i in 0..count {
            let position = vec2(rng.random::<f32>(), rng.random::<f32>()) * span;
            let velocity = vec2(
                rng.random_range(-SEED_SPEED..SEED_SPEED),
                rng.random_range(-SEED_SPEED..SEED_SPEED),
            );
            let color = STAR_COLOURS[i % STAR_COLOURS.len()];
            match Body::new(position, velocity, SEED_MASS, color) {
                Ok(body) => {
                    set.insert(body);
                }
                Err(err) => debug!("skipping seeded body: {err}"),
            }
        }
        set
    }

    /// Appends a body. Mass was validated when `body` was built.
    pub fn insert(&mut self, body: Body) -> Entity {
        let index = SpawnIndex(self.next_index);
        self.next_index += 1;
        self.world.spawn((body, index)).id()
    }

    /// Bodies are never removed, so the next spawn index doubles as the
    /// body count.
    pub fn len(&self) -> usize {
        self.next_index as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }

    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    /// Body states in insertion order.
    pub fn states(&self) -> Vec<BodyState> {
        let Some(mut query) = self
            .world
            .try_query::<(&SpawnIndex, &Position, &Velocity, &Mass)>()
        else {
            return Vec::new();
        };
        let mut states: Vec<_> = query
            .iter(&self.world)
            .map(|(index, pos, vel, mass)| {
                (
                    *index,
                    BodyState {
                        position: **pos,
                        velocity: **vel,
                        mass: **mass,
                    },
                )
            })
            .collect();
        states.sort_unstable_by_key(|(index, _)| *index);
        states.into_iter().map(|(_, state)| state).collect()
    }

    /// Positions, colours and draw sizes in insertion order, in simulation
    /// space.
    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        let Some(mut query) = self
            .world
            .try_query::<(&SpawnIndex, &Position, &Mass, &BodyColor)>()
        else {
            return Vec::new();
        };
        let base = if self.reduced {
            BODY_DRAW_SIZE_REDUCED
        } else {
            BODY_DRAW_SIZE
        };
        let mut snapshot: Vec<_> = query
            .iter(&self.world)
            .map(|(index, pos, mass, color)| {
                (
                    *index,
                    BodySnapshot {
                        position: **pos,
                        color: *color,
                        size: base * mass.sqrt(),
                    },
                )
            })
            .collect();
        snapshot.sort_unstable_by_key(|(index, _)| *index);
        snapshot.into_iter().map(|(_, body)| body).collect()
    }

    pub fn total_momentum(&self) -> Vec2 {
        self.states().iter().map(|b| b.velocity * b.mass).sum()
    }

    /// Mass-weighted centre, or `None` for an empty set.
    pub fn center_of_mass(&self) -> Option<Vec2> {
        let (weighted, total) = self
            .states()
            .iter()
            .fold((Vec2::ZERO, 0.0), |(weighted, total), b| {
                (weighted + b.position * b.mass, total + b.mass)
            });
        (total > 0.0).then(|| weighted / total)
    }

    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
