//! Signal names with a fixed meaning inside the simulator.
//!
//! Signals are plain strings: anything a model declares as an event name is
//! a valid signal. The names below are produced or interpreted by the
//! runtime itself.

/// Sent to a state when it becomes part of the active configuration.
pub const ENTRY: &str = "entry";

/// Sent to a state when it leaves the active configuration.
pub const EXIT: &str = "exit";

/// Engine probe used to discover a handler's superstate.
///
/// Every element answers it with `Super(parent)` or, at the top of the
/// hierarchy, with `Unhandled`. It never reaches reactions or actions.
pub const PROBE: &str = "QEP_EMPTY_SIG";

/// Queued by initial and choice pseudostates on entry so that they fire
/// without waiting for external input.
pub const AUTO_TRANSITION: &str = "noconditionTransition";

/// Queued by a final pseudostate on entry; the run loop stops when it pops it.
pub const TERMINATE: &str = "break";

/// Sentinel guard text marking the fallback reaction of a list.
pub const ELSE: &str = "else";

/// Maximum number of handlers on one ancestor chain, the handler itself
/// included.
pub const MAX_DEPTH: usize = 8;
