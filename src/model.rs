//! Parsed machine documents.
//!
//! These types are the input boundary of the simulator: a graph parser
//! produces a [`MachineModel`], the builder turns it into a runnable
//! machine. Declaration order is preserved because it decides the order in
//! which guarded reactions are tried.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineModel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub states: Vec<StateModel>,
    #[serde(default)]
    pub transitions: Vec<TransitionModel>,
    #[serde(default)]
    pub components: Vec<ComponentModel>,
    #[serde(default)]
    pub initials: Vec<VertexModel>,
    #[serde(default)]
    pub choices: Vec<VertexModel>,
    #[serde(default)]
    pub finals: Vec<VertexModel>,
}

/// A plain state and its reaction block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateModel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Reaction block text, see [`parse_reactions`](crate::interpreter::parse_reactions).
    #[serde(default)]
    pub actions: String,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionModel {
    pub id: String,
    pub source: String,
    pub target: String,
    /// `event[condition]/action`
    #[serde(default, alias = "actions")]
    pub trigger: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentModel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

/// An initial, choice or final pseudostate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexModel {
    pub id: String,
    #[serde(default)]
    pub parent: Option<String>,
}

impl VertexModel {
    pub fn new(id: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            id: id.into(),
            parent: parent.map(str::to_string),
        }
    }
}

/// Fluent construction, mostly for tests and small drivers.
///
/// ```rust
/// use hsm_sim::model::MachineModel;
///
/// let model = MachineModel::new()
///     .initial("init", None)
///     .state("idle", "Idle", "entry/\nled.on()", None)
///     .final_state("end", None)
///     .component("led", "LED")
///     .transition("init", "idle", "")
///     .transition("idle", "end", "button.call/");
///
/// assert_eq!(model.outgoing("idle").count(), 1);
/// assert_eq!(model.transitions[1].id, "t1");
/// ```
impl MachineModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn state(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        actions: impl Into<String>,
        parent: Option<&str>,
    ) -> Self {
        self.states.push(StateModel {
            id: id.into(),
            name: name.into(),
            actions: actions.into(),
            parent: parent.map(str::to_string),
        });
        self
    }

    pub fn initial(mut self, id: impl Into<String>, parent: Option<&str>) -> Self {
        self.initials.push(VertexModel::new(id, parent));
        self
    }

    pub fn choice(mut self, id: impl Into<String>, parent: Option<&str>) -> Self {
        self.choices.push(VertexModel::new(id, parent));
        self
    }

    pub fn final_state(mut self, id: impl Into<String>, parent: Option<&str>) -> Self {
        self.finals.push(VertexModel::new(id, parent));
        self
    }

    /// Add a transition with a generated id (`t0`, `t1`, ...).
    pub fn transition(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        trigger: impl Into<String>,
    ) -> Self {
        let id = format!("t{}", self.transitions.len());
        self.transitions.push(TransitionModel {
            id,
            source: source.into(),
            target: target.into(),
            trigger: trigger.into(),
        });
        self
    }

    pub fn component(self, id: impl Into<String>, kind: impl Into<String>) -> Self {
        self.component_with(id, kind, BTreeMap::new())
    }

    pub fn component_with(
        mut self,
        id: impl Into<String>,
        kind: impl Into<String>,
        parameters: BTreeMap<String, String>,
    ) -> Self {
        self.components.push(ComponentModel {
            id: id.into(),
            kind: kind.into(),
            parameters,
        });
        self
    }

    /// Transitions leaving `source`, in declaration order.
    pub fn outgoing<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a TransitionModel> {
        self.transitions.iter().filter(move |t| t.source == source)
    }
}
