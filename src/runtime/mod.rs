//! Run driver.
//!
//! A run owns a built machine, a fresh event queue and the machine's
//! components. It enters the root initial pseudostate, queues the seed
//! signals behind whatever that entry produced, then pops and dispatches
//! one signal at a time until the terminate signal, an empty queue, or the
//! timeout.

mod error;

pub use error::RunError;

use crate::builder::{Machine, MachineBuilder};
use crate::components::{Component, Components};
use crate::config::{RunConfig, SimParameters};
use crate::core::signal::TERMINATE;
use crate::core::{EventQueue, HandlerId, Outcome, TransitionHistory};
use crate::elements::{Element, ElementTable, Scope};
use crate::engine::Hsm;
use crate::model::MachineModel;
use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;

/// Outcome of a finished run.
#[derive(Clone, Debug, Serialize)]
pub struct RunResult {
    pub run_id: Uuid,
    /// The run was stopped by the clock rather than by reaching a final
    /// pseudostate or draining the queue.
    pub timeout: bool,
    /// Every signal popped from the queue, in order, including
    /// auto-transition and terminate markers.
    pub signals: Vec<String>,
    /// The signals components raised as called events.
    pub called_signals: Vec<String>,
    pub components: Components,
    pub history: TransitionHistory,
    /// Model id of the element active when the run stopped.
    pub final_state: String,
}

impl RunResult {
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    /// Whether the run stopped on a final pseudostate's terminate signal.
    pub fn terminated(&self) -> bool {
        self.signals.last().map(String::as_str) == Some(TERMINATE)
    }
}

/// What one [`Run::step`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// A signal was routed through the machine.
    Dispatched { signal: String, outcome: Outcome },

    /// The terminate signal was popped.
    Terminated,

    /// Nothing left to process.
    Drained,
}

/// A machine being run.
pub struct Run {
    id: Uuid,
    elements: Vec<Element>,
    components: Components,
    queue: EventQueue,
    hsm: Hsm,
}

impl Run {
    /// Enter the root initial pseudostate.
    pub fn start(machine: Machine) -> Result<Self, RunError> {
        let (elements, components, root) = machine.into_parts();
        let mut run = Self {
            id: Uuid::new_v4(),
            elements,
            components,
            queue: EventQueue::new(),
            hsm: Hsm::new(root),
        };
        let mut table = ElementTable::new(
            &run.elements,
            Scope::new(&mut run.components, &mut run.queue),
        );
        run.hsm.start(&mut table)?;
        Ok(run)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Queue a signal as if it had been produced by the current step.
    pub fn push(&mut self, signal: impl Into<String>) {
        self.queue.push(signal);
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    pub fn current(&self) -> HandlerId {
        self.hsm.current()
    }

    /// Model id of the active element.
    pub fn current_id(&self) -> &str {
        self.elements
            .get(self.hsm.current().index())
            .map_or("", Element::id)
    }

    /// Pop and dispatch the next signal.
    pub fn step(&mut self) -> Result<StepResult, RunError> {
        let Some(signal) = self.queue.pop() else {
            return Ok(StepResult::Drained);
        };
        if signal == TERMINATE {
            return Ok(StepResult::Terminated);
        }

        log::debug!("run {}: dispatching '{}'", self.id, signal);
        let mut table = ElementTable::new(
            &self.elements,
            Scope::new(&mut self.components, &mut self.queue),
        );
        let outcome = self.hsm.dispatch(&mut table, &signal)?;
        Ok(StepResult::Dispatched { signal, outcome })
    }

    /// Stop the run and collect its logs.
    pub fn finish(self, timeout: bool) -> RunResult {
        let final_state = self.current_id().to_string();
        let (signals, called_signals) = self.queue.into_logs();
        RunResult {
            run_id: self.id,
            timeout,
            signals,
            called_signals,
            components: self.components,
            history: self.hsm.into_history(),
            final_state,
        }
    }
}

impl Machine {
    /// Run the machine on the given seed signals.
    ///
    /// The timeout is checked before each signal is popped.
    pub fn run<I, S>(self, seeds: I, config: &RunConfig) -> Result<RunResult, RunError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let started = Instant::now();
        let mut run = Run::start(self)?;
        let mut seeded = 0;
        for seed in seeds {
            run.push(seed);
            seeded += 1;
        }
        log::info!("run {}: started with {} seed signals", run.id(), seeded);

        let mut timeout = false;
        loop {
            if started.elapsed() > config.timeout {
                log::warn!("run {}: timed out after {:?}", run.id(), config.timeout);
                timeout = true;
                break;
            }
            match run.step()? {
                StepResult::Dispatched { .. } => {}
                StepResult::Terminated | StepResult::Drained => break,
            }
        }

        let result = run.finish(timeout);
        log::info!(
            "run {}: finished in '{}' after {} signals (timeout: {})",
            result.run_id,
            result.final_state,
            result.signals.len(),
            result.timeout
        );
        Ok(result)
    }
}

/// Build `model` and run it on `seeds`.
///
/// # Example
///
/// ```rust
/// use hsm_sim::config::{RunConfig, SimParameters};
/// use hsm_sim::model::MachineModel;
/// use hsm_sim::runtime::run;
///
/// let model = MachineModel::new()
///     .initial("init", None)
///     .state("idle", "Idle", "", None)
///     .final_state("end", None)
///     .component("button", "UserSignal")
///     .transition("init", "idle", "")
///     .transition("idle", "end", "button.call/");
///
/// let result = run(&model, ["button.call"], SimParameters::new(), &RunConfig::default()).unwrap();
///
/// assert!(!result.timeout);
/// assert_eq!(result.signals, ["noconditionTransition", "button.call", "break"]);
/// assert_eq!(result.final_state, "end");
/// ```
pub fn run<I, S>(
    model: &MachineModel,
    seeds: I,
    parameters: SimParameters,
    config: &RunConfig,
) -> Result<RunResult, RunError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    MachineBuilder::new(model)
        .parameters(parameters)
        .build()?
        .run(seeds, config)
}
