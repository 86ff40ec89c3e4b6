//! Interactive 2D N-body gravity sandbox.
//!
//! Bodies attract each other under softened Newtonian gravity and new ones
//! are launched by dragging on the canvas. [`Simulation`] is the entry point;
//! [`web::WebSimulation`] exposes it to a browser page.

pub mod body_set;
pub mod components;
pub mod energy;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod interaction;
pub mod quadtree;
pub mod resources;
pub mod simulation;
pub mod systems;
pub mod viewport;
pub mod web;

pub use body_set::{BodySet, BodySnapshot, BodyState};
pub use components::{Body, BodyColor};
pub use energy::SystemEnergy;
pub use error::SimError;
pub use integrator::Integrator;
pub use interaction::{DragGesture, DragState, InteractionController, SpawnRequest};
pub use resources::{ForceSolver, SimConfig};
pub use simulation::Simulation;
pub use viewport::Viewport;
