use bevy::prelude::*;

use crate::body_set::BodyState;

/// Share of bodies kept on screen by auto-scaling.
pub const AUTO_SCALE_PERCENTILE: f32 = 0.98;

/// Maps simulation space to canvas space and back.
///
/// `canvas = (p - center) * scale * zoom + canvas_center`. With the default
/// center (the canvas centre), `scale = 1` and `zoom = 1` the mapping is the
/// identity, so canvas and simulation coordinates coincide.
#[derive(Clone, Debug)]
pub struct Viewport {
    width: f32,
    height: f32,
    center: Vec2,
    scale: f32,
    follow_center_of_mass: bool,
    auto_scale: bool,
    distances: Vec<f32>,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            center: vec2(width, height) / 2.0,
            scale: 1.0,
            follow_center_of_mass: false,
            auto_scale: false,
            distances: Vec::new(),
        }
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn follows_center_of_mass(&self) -> bool {
        self.follow_center_of_mass
    }

    pub fn auto_scales(&self) -> bool {
        self.auto_scale
    }

    pub fn set_follow_center_of_mass(&mut self, enabled: bool) {
        self.follow_center_of_mass = enabled;
    }

    pub fn set_auto_scale(&mut self, enabled: bool) {
        self.auto_scale = enabled;
    }

    fn canvas_center(&self) -> Vec2 {
        self.size() / 2.0
    }

    pub fn to_canvas(&self, point: Vec2, zoom: f32) -> Vec2 {
        (point - self.center) * (self.scale * zoom) + self.canvas_center()
    }

    /// Inverse of [`Viewport::to_canvas`]; `zoom` must be positive.
    pub fn to_simulation(&self, point: Vec2, zoom: f32) -> Vec2 {
        (point - self.canvas_center()) / (self.scale * zoom) + self.center
    }

    /// Recentres on the mass-weighted centre and/or rescales so that the
    /// `AUTO_SCALE_PERCENTILE` closest bodies fit within half the canvas
    /// width. Degenerate inputs leave the previous framing in place.
    pub fn update(&mut self, bodies: &[BodyState]) {
        if bodies.is_empty() || !(self.follow_center_of_mass || self.auto_scale) {
            return;
        }

        if self.follow_center_of_mass {
            let (weighted, total) = bodies.iter().fold((Vec2::ZERO, 0.0), |(w, t), b| {
                (w + b.position * b.mass, t + b.mass)
            });
            let com = weighted / total;
            if com.is_finite() {
                self.center = com;
            }
        }

        if self.auto_scale {
            self.distances.clear();
            self.distances.extend(
                bodies
                    .iter()
                    .map(|b| b.position.distance(self.center))
                    .filter(|d| d.is_finite()),
            );
            if self.distances.is_empty() {
                return;
            }
            let rank = ((self.distances.len() as f32 * AUTO_SCALE_PERCENTILE) as usize)
                .min(self.distances.len() - 1);
            let (_, radius, _) = self.distances.select_nth_unstable_by(rank, f32::total_cmp);
            let radius = *radius;
            if radius > 0.0 {
                self.scale = self.width / (2.0 * radius);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> BodyState {
        BodyState {
            position: vec2(x, y),
            velocity: Vec2::ZERO,
            mass: 1.0,
        }
    }

    #[test]
    fn default_mapping_is_identity() {
        let viewport = Viewport::new(800.0, 600.0);
        let p = vec2(123.0, 45.0);
        assert_eq!(viewport.to_canvas(p, 1.0), p);
        assert_eq!(viewport.to_simulation(p, 1.0), p);
    }

    #[test]
    fn zoom_scales_about_the_canvas_centre() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.to_canvas(vec2(500.0, 300.0), 2.0), vec2(600.0, 300.0));
        let round_trip = viewport.to_simulation(viewport.to_canvas(vec2(17.0, -3.0), 2.5), 2.5);
        assert!((round_trip - vec2(17.0, -3.0)).length() < 1e-3);
    }

    #[test]
    fn follow_recentres_on_center_of_mass() {
        let mut viewport = Viewport::new(100.0, 100.0);
        viewport.set_follow_center_of_mass(true);
        viewport.update(&[at(1000.0, 0.0), at(1002.0, 4.0)]);
        assert_eq!(viewport.center(), vec2(1001.0, 2.0));
        assert_eq!(viewport.to_canvas(vec2(1001.0, 2.0), 1.0), vec2(50.0, 50.0));
    }

    #[test]
    fn auto_scale_fits_the_spread() {
        let mut viewport = Viewport::new(100.0, 100.0);
        viewport.set_follow_center_of_mass(true);
        viewport.set_auto_scale(true);
        viewport.update(&[at(-10.0, 0.0), at(10.0, 0.0)]);
        assert_eq!(viewport.center(), Vec2::ZERO);
        assert!((viewport.scale() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn disabled_framing_ignores_bodies() {
        let mut viewport = Viewport::new(100.0, 100.0);
        viewport.update(&[at(1000.0, 1000.0)]);
        assert_eq!(viewport.center(), vec2(50.0, 50.0));
        assert_eq!(viewport.scale(), 1.0);
    }
}
