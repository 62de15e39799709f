//! Guard and action interpreter.
//!
//! Guards and actions are kept as text on the machine and interpreted each
//! time they fire. Parsing errors in an action therefore surface when the
//! action runs, not when the machine is built.

mod action;
mod condition;
mod error;
mod reaction;

pub use action::{execute, parse_actions, Action};
pub use condition::{evaluate, resolve, Comparison, Operator};
pub use error::InterpretError;
pub use reaction::{parse_choice_branch, parse_reactions, parse_transition, Trigger};
