//! Generic hierarchical dispatch engine.
//!
//! The engine is parameterized only by a [`StateHandlers`](crate::core::StateHandlers)
//! table. It implements superstate bubbling, least-common-ancestor
//! transitions and entry/exit ordering; what a handler does with a signal
//! is entirely up to the table.

mod dispatch;
mod error;

pub use dispatch::Hsm;
pub use error::DispatchError;
