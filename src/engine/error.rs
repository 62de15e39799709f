//! Dispatch errors.

use thiserror::Error;

/// Errors raised while dispatching a signal or executing a transition.
#[derive(Debug, Error)]
pub enum DispatchError<E: std::error::Error + 'static> {
    /// A state handler failed while handling a signal
    #[error("State handler failed on '{signal}': {source}")]
    Handler {
        signal: String,
        #[source]
        source: E,
    },

    /// The ancestor chain is longer than the engine supports
    #[error("Hierarchy deeper than {max} levels while handling '{signal}'")]
    HierarchyTooDeep { signal: String, max: usize },
}
