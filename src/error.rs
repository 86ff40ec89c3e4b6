use thiserror::Error;

/// Rejected mutations. Simulation state is left untouched when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid value {value} for parameter `{name}`")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("body mass must be positive, got {0}")]
    InvalidMass(f32),
}
