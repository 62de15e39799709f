//! Runtime state elements.
//!
//! Every node of a built machine is an [`Element`]: a plain state or one of
//! the initial, choice and final pseudostates. They share one calling
//! contract, `handle(signal) -> Outcome`, and are addressed by
//! [`HandlerId`] through an [`ElementTable`], which is what the dispatch
//! engine drives.

mod reaction;

pub use reaction::{Reaction, Resolution};

use crate::components::Components;
use crate::core::signal::{AUTO_TRANSITION, ENTRY, EXIT, PROBE, TERMINATE};
use crate::core::{EventQueue, HandlerId, Outcome, StateHandlers};
use crate::interpreter::InterpretError;
use std::collections::BTreeMap;
use std::fmt;

/// Mutable run state an element may touch while handling a signal.
pub struct Scope<'a> {
    pub components: &'a mut Components,
    pub queue: &'a mut EventQueue,
}

impl<'a> Scope<'a> {
    pub fn new(components: &'a mut Components, queue: &'a mut EventQueue) -> Self {
        Self { components, queue }
    }
}

/// A state with reactions keyed by signal name.
#[derive(Clone, Debug, PartialEq)]
pub struct PlainState {
    pub id: String,
    pub name: String,
    pub parent: Option<HandlerId>,
    pub reactions: BTreeMap<String, Vec<Reaction>>,
}

impl PlainState {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent: Option<HandlerId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent,
            reactions: BTreeMap::new(),
        }
    }

    /// Append a reaction for `signal` after those already declared.
    pub fn on(&mut self, signal: impl Into<String>, reaction: Reaction) {
        self.reactions.entry(signal.into()).or_default().push(reaction);
    }

    fn handle(&self, signal: &str, scope: &mut Scope<'_>) -> Result<Outcome, InterpretError> {
        if let Some(reactions) = self.reactions.get(signal) {
            if let Some(outcome) = reaction::react(reactions, scope)? {
                return Ok(outcome);
            }
        }
        Ok(delegate(self.parent))
    }
}

/// Moves to its target on the first signal after entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitialPseudostate {
    pub id: String,
    pub parent: Option<HandlerId>,
    pub target: HandlerId,
}

/// Picks the first branch whose guard holds.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoicePseudostate {
    pub id: String,
    pub parent: Option<HandlerId>,
    pub branches: Vec<Reaction>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalPseudostate {
    pub id: String,
    pub parent: Option<HandlerId>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    State(PlainState),
    Initial(InitialPseudostate),
    Choice(ChoicePseudostate),
    Final(FinalPseudostate),
}

impl Element {
    pub fn id(&self) -> &str {
        match self {
            Self::State(state) => &state.id,
            Self::Initial(initial) => &initial.id,
            Self::Choice(choice) => &choice.id,
            Self::Final(last) => &last.id,
        }
    }

    pub fn parent(&self) -> Option<HandlerId> {
        match self {
            Self::State(state) => state.parent,
            Self::Initial(initial) => initial.parent,
            Self::Choice(choice) => choice.parent,
            Self::Final(last) => last.parent,
        }
    }

    pub fn is_pseudostate(&self) -> bool {
        !matches!(self, Self::State(_))
    }

    /// Handle one signal.
    ///
    /// The probe signal is answered from the parent link alone, and
    /// pseudostates leave without side effects.
    pub fn handle(&self, signal: &str, scope: &mut Scope<'_>) -> Result<Outcome, InterpretError> {
        if signal == PROBE {
            return Ok(delegate(self.parent()));
        }
        match self {
            Self::State(state) => state.handle(signal, scope),
            Self::Initial(initial) => Ok(match signal {
                ENTRY => {
                    scope.queue.push(AUTO_TRANSITION);
                    Outcome::Handled
                }
                EXIT => Outcome::Handled,
                _ => Outcome::Transition(initial.target),
            }),
            Self::Choice(choice) => match signal {
                ENTRY => {
                    scope.queue.push(AUTO_TRANSITION);
                    Ok(Outcome::Handled)
                }
                EXIT => Ok(Outcome::Handled),
                _ => Ok(reaction::react(&choice.branches, scope)?.unwrap_or(Outcome::Unhandled)),
            },
            Self::Final(_) => Ok(match signal {
                ENTRY => {
                    scope.queue.push(TERMINATE);
                    Outcome::Handled
                }
                EXIT => Outcome::Handled,
                _ => Outcome::Unhandled,
            }),
        }
    }
}

fn delegate(parent: Option<HandlerId>) -> Outcome {
    parent.map_or(Outcome::Unhandled, Outcome::Super)
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State(state) => {
                write!(f, "State '{}' ({})", state.name, state.id)?;
                if let Some(parent) = state.parent {
                    write!(f, " parent={}", parent)?;
                }
                for (signal, reactions) in &state.reactions {
                    for reaction in reactions {
                        write!(f, "\n  {}{}", signal, reaction)?;
                    }
                }
                Ok(())
            }
            Self::Initial(initial) => write!(f, "Initial ({}) -> {}", initial.id, initial.target),
            Self::Choice(choice) => {
                write!(f, "Choice ({})", choice.id)?;
                for branch in &choice.branches {
                    write!(f, "\n  {}", branch)?;
                }
                Ok(())
            }
            Self::Final(last) => write!(f, "Final ({})", last.id),
        }
    }
}

/// Elements of one machine viewed as the engine's handler table.
pub struct ElementTable<'a> {
    elements: &'a [Element],
    scope: Scope<'a>,
}

impl<'a> ElementTable<'a> {
    pub fn new(elements: &'a [Element], scope: Scope<'a>) -> Self {
        Self { elements, scope }
    }
}

impl StateHandlers for ElementTable<'_> {
    type Error = InterpretError;

    fn handle(&mut self, handler: HandlerId, signal: &str) -> Result<Outcome, InterpretError> {
        let element = self
            .elements
            .get(handler.index())
            .ok_or(InterpretError::DanglingHandler(handler))?;
        element.handle(signal, &mut self.scope)
    }
}
