//! The calling contract shared by every state handler.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable reference to a state handler owned by a machine.
///
/// Handlers are stored in one table per machine; the id is the slot index.
/// Ids are only meaningful for the machine that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandlerId(usize);

impl HandlerId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a handler reports after receiving a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Not handled here; ask the given superstate.
    Super(HandlerId),

    /// Not handled and no superstate to delegate to.
    Unhandled,

    /// Handled without changing state.
    Handled,

    /// Deliberately ignored (top of the hierarchy).
    Ignored,

    /// Handled; the machine must move to the given target.
    Transition(HandlerId),
}

impl Outcome {
    /// The superstate carried by a `Super` outcome.
    pub fn superstate(self) -> Option<HandlerId> {
        match self {
            Self::Super(parent) => Some(parent),
            _ => None,
        }
    }
}

/// A table of state handlers addressable by [`HandlerId`].
///
/// The dispatch engine knows nothing about what a handler is; it only calls
/// `handle` and interprets the returned [`Outcome`]. Implementations must
/// answer [`PROBE`](super::signal::PROBE) with `Super(parent)` or, for a
/// top-level handler, any non-`Super` outcome, and must do so without side
/// effects.
pub trait StateHandlers {
    type Error: std::error::Error + 'static;

    fn handle(&mut self, handler: HandlerId, signal: &str) -> Result<Outcome, Self::Error>;
}
