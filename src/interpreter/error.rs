//! Errors raised while running guards and actions.

use crate::components::ComponentError;
use crate::core::HandlerId;
use thiserror::Error;

/// Failures surfaced at the moment an action executes.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InterpretError {
    #[error("Invalid action format: {line}")]
    MalformedAction { line: String },

    #[error("{component}.{method}: {source}")]
    Component {
        component: String,
        method: String,
        #[source]
        source: ComponentError,
    },

    #[error("No element registered as {0}")]
    DanglingHandler(HandlerId),
}
