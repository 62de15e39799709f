//! Builder for constructing machines from parsed models.

use crate::builder::error::BuildError;
use crate::components::{ComponentError, Components};
use crate::config::SimParameters;
use crate::core::signal::MAX_DEPTH;
use crate::core::HandlerId;
use crate::elements::{
    ChoicePseudostate, Element, FinalPseudostate, InitialPseudostate, PlainState, Reaction,
    Resolution,
};
use crate::interpreter::{parse_choice_branch, parse_reactions, parse_transition, Trigger};
use crate::model::{MachineModel, StateModel, TransitionModel, VertexModel};
use std::collections::HashMap;
use std::fmt;

/// A runnable machine: its elements, its components and the root initial
/// pseudostate the run starts from.
#[derive(Clone, Debug)]
pub struct Machine {
    name: Option<String>,
    elements: Vec<Element>,
    ids: HashMap<String, HandlerId>,
    components: Components,
    root: HandlerId,
}

impl Machine {
    pub fn builder(model: &MachineModel) -> MachineBuilder<'_> {
        MachineBuilder::new(model)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The top-level initial pseudostate.
    pub fn root(&self) -> HandlerId {
        self.root
    }

    pub fn element(&self, id: HandlerId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    /// Handler of the element declared with the given model id.
    pub fn element_id(&self, id: &str) -> Option<HandlerId> {
        self.ids.get(id).copied()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    pub(crate) fn into_parts(self) -> (Vec<Element>, Components, HandlerId) {
        (self.elements, self.components, self.root)
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Machine {}", self.name.as_deref().unwrap_or("<unnamed>"))?;
        for (index, element) in self.elements.iter().enumerate() {
            writeln!(f, "{} {}", HandlerId::new(index), element)?;
        }
        Ok(())
    }
}

/// An element declared in phase one, with its references still by name.
enum Slot<'m> {
    Final(&'m VertexModel),
    Initial {
        vertex: &'m VertexModel,
        target: &'m str,
    },
    Choice {
        vertex: &'m VertexModel,
        branches: Vec<(Trigger, &'m str)>,
    },
    State {
        model: &'m StateModel,
        reactions: Vec<Trigger>,
        transitions: Vec<(Trigger, &'m str)>,
    },
}

impl<'m> Slot<'m> {
    fn id(&self) -> &'m str {
        match self {
            Self::Final(vertex) => &vertex.id,
            Self::Initial { vertex, .. } | Self::Choice { vertex, .. } => &vertex.id,
            Self::State { model, .. } => &model.id,
        }
    }

    fn parent(&self) -> Option<&'m str> {
        match self {
            Self::Final(vertex) => vertex.parent.as_deref(),
            Self::Initial { vertex, .. } | Self::Choice { vertex, .. } => vertex.parent.as_deref(),
            Self::State { model, .. } => model.parent.as_deref(),
        }
    }
}

/// Declared ids per element kind.
#[derive(Default)]
struct Names<'m> {
    states: HashMap<&'m str, HandlerId>,
    initials: HashMap<&'m str, HandlerId>,
    finals: HashMap<&'m str, HandlerId>,
    choices: HashMap<&'m str, HandlerId>,
}

impl<'m> Names<'m> {
    /// Look a reference up in plain states, then initials, finals and
    /// choices.
    fn resolve(&self, id: &str) -> Option<HandlerId> {
        self.states
            .get(id)
            .or_else(|| self.initials.get(id))
            .or_else(|| self.finals.get(id))
            .or_else(|| self.choices.get(id))
            .copied()
    }

    fn into_ids(self) -> HashMap<String, HandlerId> {
        let mut ids = HashMap::new();
        for map in [self.states, self.initials, self.finals, self.choices] {
            for (id, handler) in map {
                ids.entry(id.to_string()).or_insert(handler);
            }
        }
        ids
    }
}

fn register<'m>(
    map: &mut HashMap<&'m str, HandlerId>,
    id: &'m str,
    index: usize,
) -> Result<(), BuildError> {
    if map.insert(id, HandlerId::new(index)).is_some() {
        return Err(BuildError::DuplicateId(id.to_string()));
    }
    Ok(())
}

/// Builds a [`Machine`] from a [`MachineModel`].
///
/// # Example
///
/// ```rust
/// use hsm_sim::builder::MachineBuilder;
/// use hsm_sim::model::MachineModel;
///
/// let model = MachineModel::new()
///     .initial("init", None)
///     .state("idle", "Idle", "", None)
///     .transition("init", "idle", "");
///
/// let machine = MachineBuilder::new(&model).build().unwrap();
/// assert_eq!(machine.root(), machine.element_id("init").unwrap());
/// ```
pub struct MachineBuilder<'m> {
    model: &'m MachineModel,
    parameters: SimParameters,
}

impl<'m> MachineBuilder<'m> {
    pub fn new(model: &'m MachineModel) -> Self {
        Self {
            model,
            parameters: SimParameters::default(),
        }
    }

    /// Options passed to components on construction.
    pub fn parameters(mut self, parameters: SimParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Build the machine.
    ///
    /// Returns an error for unknown component types, dangling references,
    /// over-deep nesting, or a missing root initial pseudostate.
    pub fn build(self) -> Result<Machine, BuildError> {
        let components = self.components()?;
        let (slots, names) = self.declare()?;
        let elements = bind(&slots, &names)?;
        validate_depth(&elements)?;
        let root = find_root(&elements)?;

        log::debug!(
            "built machine {:?}: {} elements, {} components",
            self.model.name,
            elements.len(),
            components.len()
        );
        Ok(Machine {
            name: self.model.name.clone(),
            elements,
            ids: names.into_ids(),
            components,
            root,
        })
    }

    fn components(&self) -> Result<Components, BuildError> {
        let mut components =
            Components::from_parameters(&self.parameters).map_err(BuildError::Parameters)?;
        for component in &self.model.components {
            components
                .add(&component.id, &component.kind, &component.parameters)
                .map_err(|source| match source {
                    ComponentError::UnknownType(kind) => BuildError::UnknownComponentType {
                        id: component.id.clone(),
                        kind,
                    },
                    source => BuildError::ComponentConfig {
                        id: component.id.clone(),
                        source,
                    },
                })?;
        }
        Ok(components)
    }

    /// Phase one: give every element a slot, keeping references by name.
    fn declare(&self) -> Result<(Vec<Slot<'m>>, Names<'m>), BuildError> {
        let model = self.model;
        let mut slots = Vec::new();
        let mut names = Names::default();

        for vertex in &model.finals {
            register(&mut names.finals, &vertex.id, slots.len())?;
            slots.push(Slot::Final(vertex));
        }

        for vertex in &model.initials {
            let outgoing: Vec<&'m TransitionModel> = model.outgoing(&vertex.id).collect();
            if outgoing.len() != 1 {
                log::warn!(
                    "dropping initial '{}': {} outgoing transitions",
                    vertex.id,
                    outgoing.len()
                );
                continue;
            }
            let transition: &'m TransitionModel = outgoing[0];
            register(&mut names.initials, &vertex.id, slots.len())?;
            slots.push(Slot::Initial {
                vertex,
                target: &transition.target,
            });
        }

        for vertex in &model.choices {
            let branches = model
                .outgoing(&vertex.id)
                .map(|t| (parse_choice_branch(&t.trigger), t.target.as_str()))
                .collect();
            register(&mut names.choices, &vertex.id, slots.len())?;
            slots.push(Slot::Choice { vertex, branches });
        }

        for state in &model.states {
            let transitions = model
                .outgoing(&state.id)
                .map(|t| (parse_transition(&t.trigger), t.target.as_str()))
                .collect();
            register(&mut names.states, &state.id, slots.len())?;
            slots.push(Slot::State {
                model: state,
                reactions: parse_reactions(&state.actions),
                transitions,
            });
        }

        Ok((slots, names))
    }
}

/// Phase two: resolve parents and transition targets into handler ids.
fn bind(slots: &[Slot<'_>], names: &Names<'_>) -> Result<Vec<Element>, BuildError> {
    slots
        .iter()
        .map(|slot| {
            let id = slot.id();
            let parent = match slot.parent() {
                Some(parent) => Some(names.resolve(parent).ok_or_else(|| {
                    BuildError::UnknownParent {
                        id: id.to_string(),
                        parent: parent.to_string(),
                    }
                })?),
                None => None,
            };
            let resolve_target = |target: &str| {
                names
                    .resolve(target)
                    .ok_or_else(|| BuildError::UnresolvedTarget {
                        from: id.to_string(),
                        target: target.to_string(),
                    })
            };

            let element = match slot {
                Slot::Final(_) => Element::Final(FinalPseudostate {
                    id: id.to_string(),
                    parent,
                }),
                Slot::Initial { target, .. } => Element::Initial(InitialPseudostate {
                    id: id.to_string(),
                    parent,
                    target: resolve_target(*target)?,
                }),
                Slot::Choice { branches, .. } => {
                    let branches = branches
                        .iter()
                        .map(|(trigger, target)| {
                            Ok(Reaction::new(
                                trigger.condition.as_str(),
                                trigger.action.as_str(),
                                Resolution::Transition(resolve_target(*target)?),
                            ))
                        })
                        .collect::<Result<Vec<_>, BuildError>>()?;
                    Element::Choice(ChoicePseudostate {
                        id: id.to_string(),
                        parent,
                        branches,
                    })
                }
                Slot::State {
                    model,
                    reactions,
                    transitions,
                } => {
                    let mut state = PlainState::new(id, model.name.as_str(), parent);
                    for trigger in reactions {
                        state.on(
                            trigger.event.as_str(),
                            Reaction::new(
                                trigger.condition.as_str(),
                                trigger.action.as_str(),
                                Resolution::Handled,
                            ),
                        );
                    }
                    for (trigger, target) in transitions {
                        let Some(target_id) = names.resolve(target) else {
                            log::warn!("ignoring transition '{}' -> '{}': no such target", id, target);
                            continue;
                        };
                        state.on(
                            trigger.event.as_str(),
                            Reaction::new(
                                trigger.condition.as_str(),
                                trigger.action.as_str(),
                                Resolution::Transition(target_id),
                            ),
                        );
                    }
                    Element::State(state)
                }
            };
            Ok(element)
        })
        .collect()
}

/// Every ancestor chain, the element itself included, must fit within
/// `MAX_DEPTH`. A parent cycle never does.
fn validate_depth(elements: &[Element]) -> Result<(), BuildError> {
    for element in elements {
        let mut depth = 1;
        let mut parent = element.parent();
        while let Some(id) = parent {
            depth += 1;
            if depth > MAX_DEPTH {
                return Err(BuildError::NestingTooDeep {
                    id: element.id().to_string(),
                    max: MAX_DEPTH,
                });
            }
            parent = elements.get(id.index()).and_then(Element::parent);
        }
    }
    Ok(())
}

fn find_root(elements: &[Element]) -> Result<HandlerId, BuildError> {
    let mut roots = elements
        .iter()
        .enumerate()
        .filter(|(_, element)| matches!(element, Element::Initial(initial) if initial.parent.is_none()));

    let (index, first) = roots.next().ok_or(BuildError::MissingRootInitial)?;
    if let Some((_, second)) = roots.next() {
        return Err(BuildError::MultipleRootInitials {
            first: first.id().to_string(),
            second: second.id().to_string(),
        });
    }
    Ok(HandlerId::new(index))
}
