//! Run errors.

use crate::builder::BuildError;
use crate::engine::DispatchError;
use crate::interpreter::InterpretError;
use thiserror::Error;

/// Everything that can abort a run. A timeout is not an error; see
/// [`RunResult::timeout`](super::RunResult::timeout).
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Machine could not be built: {0}")]
    Build(#[from] BuildError),

    #[error("Run aborted: {0}")]
    Dispatch(#[from] DispatchError<InterpretError>),
}

impl RunError {
    /// The interpretation error behind a failed dispatch, if any.
    pub fn interpret_error(&self) -> Option<&InterpretError> {
        match self {
            Self::Dispatch(DispatchError::Handler { source, .. }) => Some(source),
            _ => None,
        }
    }
}
