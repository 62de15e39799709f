//! hsm-sim: a hierarchical state machine simulator
//!
//! Runs statechart designs (plain states nested to any depth, plus initial,
//! choice and final pseudostates) against a set of simulated components,
//! and reports every signal that was processed so that a run can be graded.
//!
//! # Core Concepts
//!
//! - **Event queue**: signals produced while a signal is being handled are
//!   processed before anything that was already waiting
//! - **Dispatch engine**: superstate bubbling and least-common-ancestor
//!   transitions over an opaque table of handlers
//! - **Elements**: plain states and pseudostates sharing one handler
//!   contract
//! - **Interpreter**: guards like `counter.value > 0` and actions like
//!   `reader.read()` kept as text and evaluated when they fire
//! - **Components**: the effectors actions drive
//!
//! # Example
//!
//! ```rust
//! use hsm_sim::config::{RunConfig, SimParameters};
//! use hsm_sim::model::MachineModel;
//! use hsm_sim::runtime::run;
//!
//! let model = MachineModel::new()
//!     .initial("init", None)
//!     .state("reading", "Reading", "entry/\nreader.read()\n\nreader.char_accepted/\nreader.read()", None)
//!     .final_state("done", None)
//!     .component("reader", "Reader")
//!     .transition("init", "reading", "")
//!     .transition("reading", "done", "reader.line_finished/");
//!
//! let params = SimParameters::new().with_message("hi");
//! let result = run(&model, Vec::<String>::new(), params, &RunConfig::default()).unwrap();
//!
//! assert_eq!(
//!     result.signals,
//!     [
//!         "noconditionTransition",
//!         "reader.char_accepted",
//!         "reader.char_accepted",
//!         "reader.line_finished",
//!         "break",
//!     ]
//! );
//! ```

pub mod builder;
pub mod components;
pub mod config;
pub mod core;
pub mod elements;
pub mod engine;
pub mod interpreter;
pub mod model;
pub mod runtime;

// Re-export commonly used types
pub use builder::{BuildError, Machine, MachineBuilder};
pub use config::{RunConfig, SimParameters};
pub use crate::core::{EventQueue, HandlerId, Outcome, StateHandlers};
pub use engine::Hsm;
pub use model::MachineModel;
pub use runtime::{run, RunError, RunResult};
