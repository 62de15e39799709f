//! Guarded reactions shared by plain states and choices.

use super::Scope;
use crate::core::signal::ELSE;
use crate::core::{HandlerId, Outcome};
use crate::interpreter::{self, InterpretError};
use std::fmt;

/// What a reaction reports once its action has run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Handled,
    Transition(HandlerId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reaction {
    pub condition: String,
    pub action: String,
    pub resolution: Resolution,
}

impl Reaction {
    pub fn new(
        condition: impl Into<String>,
        action: impl Into<String>,
        resolution: Resolution,
    ) -> Self {
        Self {
            condition: condition.into(),
            action: action.into(),
            resolution,
        }
    }

    /// Whether this is the fallback branch.
    pub fn is_else(&self) -> bool {
        self.condition == ELSE
    }

    /// Run the action and report the resolution.
    pub fn fire(&self, scope: &mut Scope<'_>) -> Result<Outcome, InterpretError> {
        interpreter::execute(&self.action, scope.components, scope.queue)?;
        Ok(match self.resolution {
            Resolution::Handled => Outcome::Handled,
            Resolution::Transition(target) => Outcome::Transition(target),
        })
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.condition.is_empty() {
            write!(f, "[{}]", self.condition)?;
        }
        write!(f, "/")?;
        if !self.action.is_empty() {
            write!(f, " {}", self.action.replace('\n', "; "))?;
        }
        match self.resolution {
            Resolution::Handled => Ok(()),
            Resolution::Transition(target) => write!(f, " -> {}", target),
        }
    }
}

/// The first reaction whose guard holds, else the last `else` branch.
///
/// Fires the chosen reaction, or returns `None` if nothing matched.
pub(crate) fn react(
    reactions: &[Reaction],
    scope: &mut Scope<'_>,
) -> Result<Option<Outcome>, InterpretError> {
    let mut fallback = None;
    for reaction in reactions {
        if reaction.is_else() {
            fallback = Some(reaction);
            continue;
        }
        if interpreter::evaluate(&reaction.condition, scope.components) {
            return reaction.fire(scope).map(Some);
        }
    }
    fallback.map(|reaction| reaction.fire(scope)).transpose()
}
