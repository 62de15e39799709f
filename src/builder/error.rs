//! Build errors for machines.

use crate::components::ComponentError;
use thiserror::Error;

/// Errors that stop a machine from being built. Nothing has been
/// dispatched when one of these is returned.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Component type {kind} not found (component '{id}')")]
    UnknownComponentType { id: String, kind: String },

    #[error("Component '{id}' could not be configured: {source}")]
    ComponentConfig {
        id: String,
        #[source]
        source: ComponentError,
    },

    #[error("Invalid simulation parameters: {0}")]
    Parameters(#[source] ComponentError),

    #[error("No initial state found in the state machine")]
    MissingRootInitial,

    #[error("Initial states '{first}' and '{second}' both sit at the top level")]
    MultipleRootInitials { first: String, second: String },

    #[error("Target state '{target}' not found for transition from '{from}'")]
    UnresolvedTarget { from: String, target: String },

    #[error("Element '{id}' has unknown parent '{parent}'")]
    UnknownParent { id: String, parent: String },

    #[error("Element '{id}' is nested deeper than {max} levels")]
    NestingTooDeep { id: String, max: usize },

    #[error("Element id '{0}' is declared twice")]
    DuplicateId(String),
}
