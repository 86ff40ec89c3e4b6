//! Browser boundary.
//!
//! The page's bootstrap script owns one `WebSimulation`, forwards canvas
//! pointer events to it and calls `render_bodies` once per animation frame.
//! Drawing happens on the JavaScript side.

use wasm_bindgen::prelude::*;

use crate::error::SimError;
use crate::simulation::Simulation;

/// Floats per body in `render_bodies`: x, y, size, r, g, b.
pub const RENDER_STRIDE: usize = 6;

fn to_js(result: Result<(), SimError>) -> Result<(), JsError> {
    result.map_err(|err| JsError::new(&err.to_string()))
}

#[wasm_bindgen]
pub struct WebSimulation {
    inner: Simulation,
}

#[wasm_bindgen]
impl WebSimulation {
    #[wasm_bindgen(constructor)]
    pub fn create_bodies(width: f32, height: f32, count: usize, reduced: bool) -> WebSimulation {
        WebSimulation {
            inner: Simulation::create(width, height, count, reduced),
        }
    }

    /// Same as the constructor with an explicit random seed, so reloads can
    /// differ (`Date.now()`) or repeat.
    pub fn create_seeded(width: f32, height: f32, count: usize, reduced: bool, seed: u64) -> WebSimulation {
        WebSimulation {
            inner: Simulation::create_seeded(width, height, count, reduced, seed),
        }
    }

    pub fn render_stride() -> usize {
        RENDER_STRIDE
    }

    /// Steps once and returns the frame as a flat array, `RENDER_STRIDE`
    /// floats per body, in canvas coordinates.
    pub fn render_bodies(&mut self) -> Vec<f32> {
        let frame = self.inner.tick();
        let mut out = Vec::with_capacity(frame.len() * RENDER_STRIDE);
        for body in frame {
            let [r, g, b] = body.color.0;
            out.extend_from_slice(&[
                body.position.x,
                body.position.y,
                body.size,
                f32::from(r),
                f32::from(g),
                f32::from(b),
            ]);
        }
        out
    }

    /// `[origin_x, origin_y, current_x, current_y]` of the active drag.
    pub fn drag_arrow(&self) -> Option<Vec<f32>> {
        self.inner
            .drag_arrow()
            .map(|(origin, current)| vec![origin.x, origin.y, current.x, current.y])
    }

    pub fn body_count(&self) -> usize {
        self.inner.len()
    }

    pub fn on_click(&mut self, x: f32, y: f32) {
        self.inner.on_click(x, y);
    }

    pub fn off_click(&mut self, x: f32, y: f32) {
        self.inner.off_click(x, y);
    }

    pub fn on_touch(&mut self, x: f32, y: f32) {
        self.inner.on_toggle(x, y);
    }

    pub fn update_mouse_position(&mut self, x: f32, y: f32) {
        self.inner.update_mouse_position(x, y);
    }

    pub fn set_dt(&mut self, value: f32) -> Result<(), JsError> {
        to_js(self.inner.set_dt(value))
    }

    pub fn set_gravity(&mut self, value: f32) -> Result<(), JsError> {
        to_js(self.inner.set_gravity(value))
    }

    pub fn set_spawn_radius(&mut self, value: f32) -> Result<(), JsError> {
        to_js(self.inner.set_spawn_radius(value))
    }

    pub fn set_spawn_speed(&mut self, value: f32) -> Result<(), JsError> {
        to_js(self.inner.set_spawn_speed(value))
    }

    pub fn set_scale_multiplier(&mut self, value: f32) -> Result<(), JsError> {
        to_js(self.inner.set_scale_multiplier(value))
    }

    pub fn set_follow_center_of_mass(&mut self, enabled: bool) {
        self.inner.set_follow_center_of_mass(enabled);
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
