/*
 * Error Module
 *
 * Error types for parameter edits and flock stepping. Degenerate vectors
 * (zero-length normalization) are never errors; they are handled where
 * they occur by substituting a zero vector.
 */

use thiserror::Error;

use crate::params::ParamField;

/// Errors raised when editing or validating simulation parameters.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParamError {
    /// The name does not match any tunable field.
    #[error("unknown simulation parameter `{0}`")]
    UnknownParameter(String),
    /// NaN or infinite values are never accepted.
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: ParamField, value: f32 },
    /// A value that breaks one of the core's preconditions.
    #[error("{field} = {value} violates precondition: {requirement}")]
    Precondition {
        field: &'static str,
        value: f32,
        requirement: &'static str,
    },
}

/// Errors raised while advancing the flock.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FlockError {
    /// An agent produced NaN or infinity; the step was not committed.
    #[error("boid {index} produced a non-finite {quantity}")]
    NonFinite { index: usize, quantity: &'static str },
}
