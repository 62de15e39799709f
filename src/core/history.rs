//! Transition history of a run.
//!
//! Records every completed transition in order. The history is written by
//! the dispatch engine and read by tests and diagnostics; it never feeds
//! back into control flow.

use super::handler::HandlerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single completed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The active handler when the transition was requested
    pub from: HandlerId,
    /// The handler that became active
    pub to: HandlerId,
    /// The signal whose handling requested the transition
    pub signal: String,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of transitions.
///
/// # Example
///
/// ```rust
/// use hsm_sim::core::{HandlerId, TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = TransitionHistory::new();
/// history.record(TransitionRecord {
///     from: HandlerId::new(0),
///     to: HandlerId::new(2),
///     signal: "noconditionTransition".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.path(), vec![HandlerId::new(0), HandlerId::new(2)]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionHistory {
    transitions: Vec<TransitionRecord>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed transition.
    pub fn record(&mut self, transition: TransitionRecord) {
        self.transitions.push(transition);
    }

    /// Handlers visited: the first source, then the target of each
    /// transition.
    pub fn path(&self) -> Vec<HandlerId> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the first and the last transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
