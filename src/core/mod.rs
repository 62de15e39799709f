//! Runtime primitives shared by every layer of the simulator.
//!
//! - The handler contract (`HandlerId`, `Outcome`, `StateHandlers`)
//! - The cooperative event queue
//! - Reserved signal names
//! - Transition history

mod handler;
mod history;
mod queue;
pub mod signal;

pub use handler::{HandlerId, Outcome, StateHandlers};
pub use history::{TransitionHistory, TransitionRecord};
pub use queue::EventQueue;
