use crate::body_set::BodyState;

/// Energy budget of a body set, for drift diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SystemEnergy {
    pub kinetic: f32,
    pub potential: f32,
    pub total: f32,
}

/// Kinetic energy `sum(m v^2 / 2)` plus softened pair potential
/// `-sum_{i<j} G m_i m_j / (r + eps)`. O(n^2); not run per frame.
pub fn system_energy(bodies: &[BodyState], gravity: f32, softening: f32) -> SystemEnergy {
    let kinetic: f32 = bodies
        .iter()
        .map(|b| 0.5 * b.mass * b.velocity.length_squared())
        .sum();

    let mut potential = 0.0;
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            let r = a.position.distance(b.position);
            potential -= gravity * a.mass * b.mass / (r + softening);
        }
    }

    SystemEnergy {
        kinetic,
        potential,
        total: kinetic + potential,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::{Vec2, vec2};

    #[test]
    fn splits_kinetic_and_potential() {
        let bodies = [
            BodyState {
                position: vec2(0.0, 0.0),
                velocity: vec2(2.0, 0.0),
                mass: 1.0,
            },
            BodyState {
                position: vec2(3.0, 4.0),
                velocity: Vec2::ZERO,
                mass: 2.0,
            },
        ];
        let energy = system_energy(&bodies, 1.0, 0.0);
        assert!((energy.kinetic - 2.0).abs() < 1e-6);
        assert!((energy.potential + 0.4).abs() < 1e-6);
        assert!((energy.total - 1.6).abs() < 1e-6);
    }

    #[test]
    fn empty_set_has_no_energy() {
        assert_eq!(system_energy(&[], 1.0, 0.1), SystemEnergy::default());
    }
}
