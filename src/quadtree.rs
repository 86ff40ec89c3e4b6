use bevy::prelude::*;

use crate::forces::point_acceleration;

/// Squared distance under which two bodies share one leaf.
const COINCIDENT_DIST_SQ: f32 = 1.0e-4;
/// Depth past which bodies share a leaf instead of subdividing further.
const MAX_DEPTH: usize = 48;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Smallest square (with a 10% margin) covering `min..=max`.
    pub fn covering(min: Vec2, max: Vec2) -> Rect {
        let size = (max - min).max(Vec2::splat(1.0));
        Rect {
            center: (min + max) / 2.0,
            size: Vec2::splat(size.x.max(size.y) * 1.1),
        }
    }

    pub fn get_quadrant_index(&self, point: Vec2) -> usize {
        let right = point.x > self.center.x;
        let top = point.y > self.center.y;
        match (right, top) {
            (false, true) => 0,
            (true, true) => 1,
            (false, false) => 2,
            (true, false) => 3,
        }
    }

    pub fn sub_quadrant(&self, index: usize) -> Rect {
        let quarter_size = self.size / 2.0;
        let offset = quarter_size / 2.0;
        let center = match index {
            0 => self.center + vec2(-offset.x, offset.y),
            1 => self.center + vec2(offset.x, offset.y),
            2 => self.center + vec2(-offset.x, -offset.y),
            3 => self.center + vec2(offset.x, -offset.y),
            _ => self.center,
        };
        Rect {
            center,
            size: quarter_size,
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect {
            center: Vec2::ZERO,
            size: Vec2::splat(1.0),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum NodeKind {
    Empty,
    Leaf { body: Entity, position: Vec2 },
    Internal { children: [usize; 4] },
}

#[derive(Debug)]
pub struct Node {
    pub bounds: Rect,
    pub center_of_mass: Vec2,
    pub mass: f32,
    pub kind: NodeKind,
}

impl Node {
    pub fn empty(bounds: Rect) -> Self {
        Self {
            bounds,
            center_of_mass: Vec2::ZERO,
            mass: 0.0,
            kind: NodeKind::Empty,
        }
    }
}

/// Barnes-Hut quadtree over the current body positions.
///
/// Rebuilt from scratch every step; `nodes` keeps its allocation between
/// rebuilds. The root is always node 0 once `reset` has run.
#[derive(Resource, Default, Debug)]
pub struct QuadTreeResource {
    pub nodes: Vec<Node>,
}

impl QuadTreeResource {
    pub fn reset(&mut self, bounds: Rect) {
        self.nodes.clear();
        self.nodes.push(Node::empty(bounds));
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn insert(&mut self, body: Entity, position: Vec2, mass: f32) {
        if self.nodes.is_empty() {
            return;
        }
        self.insert_recursive(0, 0, body, position, mass);
    }

    fn insert_recursive(&mut self, index: usize, depth: usize, body: Entity, position: Vec2, mass: f32) {
        let bounds = self.nodes[index].bounds;
        match self.nodes[index].kind {
            NodeKind::Empty => {
                let node = &mut self.nodes[index];
                node.kind = NodeKind::Leaf { body, position };
                node.mass = mass;
                node.center_of_mass = position;
            }
            NodeKind::Leaf {
                body: existing_body,
                position: existing_position,
            } => {
                let existing_mass = self.nodes[index].mass;
                let total_mass = existing_mass + mass;
                let com = (existing_position * existing_mass + position * mass) / total_mass;

                if depth >= MAX_DEPTH
                    || (existing_position - position).length_squared() < COINCIDENT_DIST_SQ
                {
                    let node = &mut self.nodes[index];
                    node.mass = total_mass;
                    node.center_of_mass = com;
                    return;
                }

                let children = self.subdivide(index);
                self.insert_recursive(
                    children[bounds.get_quadrant_index(existing_position)],
                    depth + 1,
                    existing_body,
                    existing_position,
                    existing_mass,
                );
                self.insert_recursive(
                    children[bounds.get_quadrant_index(position)],
                    depth + 1,
                    body,
                    position,
                    mass,
                );

                let node = &mut self.nodes[index];
                node.kind = NodeKind::Internal { children };
                node.mass = total_mass;
                node.center_of_mass = com;
            }
            NodeKind::Internal { children } => {
                self.insert_recursive(
                    children[bounds.get_quadrant_index(position)],
                    depth + 1,
                    body,
                    position,
                    mass,
                );

                let node = &mut self.nodes[index];
                let total_mass = node.mass + mass;
                node.center_of_mass = (node.center_of_mass * node.mass + position * mass) / total_mass;
                node.mass = total_mass;
            }
        }
    }

    fn subdivide(&mut self, index: usize) -> [usize; 4] {
        let mut children = [0; 4];
        for (quadrant, child) in children.iter_mut().enumerate() {
            let child_bounds = self.nodes[index].bounds.sub_quadrant(quadrant);
            *child = self.nodes.len();
            self.nodes.push(Node::empty(child_bounds));
        }
        children
    }

    /// Approximate gravitational acceleration on `target` at `position`.
    ///
    /// Cells whose `width / distance` falls below `theta` are treated as a
    /// single mass at their centre of mass; `theta = 0` opens every cell.
    pub fn calculate_acceleration(
        &self,
        target: Entity,
        position: Vec2,
        gravity: f32,
        softening: f32,
        theta: f32,
    ) -> Vec2 {
        if self.nodes.is_empty() {
            return Vec2::ZERO;
        }
        self.acceleration_recursive(0, target, position, gravity, softening, theta)
    }

    fn acceleration_recursive(
        &self,
        index: usize,
        target: Entity,
        position: Vec2,
        gravity: f32,
        softening: f32,
        theta: f32,
    ) -> Vec2 {
        let node = &self.nodes[index];
        match node.kind {
            NodeKind::Empty => Vec2::ZERO,
            NodeKind::Leaf { body, .. } => {
                if body == target {
                    return Vec2::ZERO;
                }
                point_acceleration(node.center_of_mass - position, node.mass, gravity, softening)
            }
            NodeKind::Internal { children } => {
                let delta = node.center_of_mass - position;
                if node.bounds.size.x < theta * delta.length() {
                    point_acceleration(delta, node.mass, gravity, softening)
                } else {
                    children
                        .iter()
                        .map(|child| {
                            self.acceleration_recursive(*child, target, position, gravity, softening, theta)
                        })
                        .sum()
                }
            }
        }
    }
}
