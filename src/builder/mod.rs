//! Two-phase construction of runnable machines from parsed models.
//!
//! Phase one declares every element and gives it a [`HandlerId`]; phase two
//! binds parent links and transition targets, which may point at elements
//! declared later in the document.
//!
//! [`HandlerId`]: crate::core::HandlerId

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::{Machine, MachineBuilder};
