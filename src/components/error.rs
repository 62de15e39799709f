//! Component errors.

use thiserror::Error;

/// Errors raised by component effectors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ComponentError {
    #[error("Component type '{0}' not found")]
    UnknownType(String),

    #[error("Component '{0}' not found")]
    UnknownComponent(String),

    #[error("Action {method} not callable on {kind}")]
    UnknownMethod { kind: String, method: String },

    #[error("{kind}.{method} takes {expected} argument(s), {given} given")]
    Arity {
        kind: String,
        method: String,
        expected: usize,
        given: usize,
    },

    #[error("Invalid argument '{value}' for {method}: expected {expected}")]
    BadArgument {
        method: String,
        value: String,
        expected: &'static str,
    },

    #[error("Missing simulation option '{0}'")]
    MissingOption(&'static str),

    #[error("Invalid garden: {0}")]
    InvalidGarden(String),

    #[error("{method} overflowed the integer range")]
    Overflow { method: String },

    #[error("Crash: {0}")]
    Crash(&'static str),
}
