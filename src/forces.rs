//! Softened Newtonian gravity shared by both solvers.
//!
//! The pull on a body from a mass `m` at offset `d` is
//! `G * m * d / (|d|^3 + eps)`. The softening term keeps the result finite
//! as `|d| -> 0`, where the pull fades to zero instead of diverging.

use bevy::math::Vec2;

/// Acceleration towards a point mass `mass` sitting at `delta` from the body.
#[inline]
pub fn point_acceleration(delta: Vec2, mass: f32, gravity: f32, softening: f32) -> Vec2 {
    let dist = delta.length();
    delta * (gravity * mass / (dist * dist * dist + softening))
}

/// Exact pairwise sum over every unordered pair `(i, j)`, `i < j`.
///
/// Both sides of a pair get their share from the same coefficient, so
/// `sum(m_i * a_i)` cancels and momentum is conserved up to rounding.
/// `out` is overwritten and must be as long as `positions`.
pub fn accumulate_pairwise(
    positions: &[Vec2],
    masses: &[f32],
    gravity: f32,
    softening: f32,
    out: &mut [Vec2],
) {
    debug_assert_eq!(positions.len(), masses.len());
    debug_assert_eq!(positions.len(), out.len());

    out.fill(Vec2::ZERO);
    let n = positions.len();
    for i in 0..n {
        let xi = positions[i];
        let mi = masses[i];
        for j in (i + 1)..n {
            let r = positions[j] - xi;
            let dist = r.length();
            let coef = gravity / (dist * dist * dist + softening);
            out[i] += r * (coef * masses[j]);
            out[j] -= r * (coef * mi);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::vec2;

    #[test]
    fn coincident_bodies_stay_finite() {
        for gap in [0.0, 1e-12, 1e-6, 1e-3] {
            let acc = point_acceleration(vec2(gap, 0.0), 1.0e6, 1.0, 0.1);
            assert!(acc.is_finite(), "gap {gap} produced {acc:?}");
        }
        let positions = [vec2(3.0, 3.0), vec2(3.0, 3.0)];
        let mut out = [Vec2::ZERO; 2];
        accumulate_pairwise(&positions, &[1.0, 1.0], 1.0, 0.1, &mut out);
        assert_eq!(out, [Vec2::ZERO; 2]);
    }

    #[test]
    fn pull_points_at_the_other_body() {
        let acc = point_acceleration(vec2(0.0, 5.0), 2.0, 1.0, 0.1);
        assert_eq!(acc.x, 0.0);
        assert!(acc.y > 0.0);

        let repulsive = point_acceleration(vec2(0.0, 5.0), 2.0, -1.0, 0.1);
        assert!(repulsive.y < 0.0);
    }

    #[test]
    fn pairwise_obeys_third_law() {
        let positions = [vec2(-1.0, 0.0), vec2(2.0, 0.5), vec2(0.3, -4.0)];
        let masses = [2.0, 3.0, 0.5];
        let mut out = [Vec2::ZERO; 3];
        accumulate_pairwise(&positions, &masses, 1.0, 0.1, &mut out);

        let net: Vec2 = out.iter().zip(masses).map(|(a, m)| *a * m).sum();
        assert!(net.length() < 1e-5, "net force {net:?}");
    }

    #[test]
    fn pairwise_matches_point_law() {
        let positions = [vec2(0.0, 0.0), vec2(3.0, 0.0)];
        let masses = [1.0, 2.0];
        let mut out = [Vec2::ZERO; 2];
        accumulate_pairwise(&positions, &masses, 1.5, 0.1, &mut out);

        let expected = point_acceleration(vec2(3.0, 0.0), 2.0, 1.5, 0.1);
        assert!((out[0] - expected).length() < 1e-6);
        assert!((out[0].x - 1.5 * 2.0 * 3.0 / 27.1).abs() < 1e-6);
    }
}
