//! Component instances of one machine.

use super::{
    Compass, CompassAttribute, ComponentError, Counter, CounterAttribute, CounterMethod, Effects,
    Flower, FlowerMethod, Garden, Impulse, ImpulseMethod, Led, LedAttribute, LedMethod, Mover,
    MoverMethod, Reader, ReaderAttribute, ReaderMethod, Sensor, SensorAttribute, SensorMethod,
    Timer, TimerAttribute, TimerMethod, UserSignal, UserSignalMethod, Value,
};
use crate::config::SimParameters;
use crate::core::EventQueue;
use serde::Serialize;
use std::collections::BTreeMap;

lookup_table! {
    /// Component type names as they appear in machine documents.
    pub enum ComponentKind {
        Reader => "Reader",
        Impulse => "Impulse",
        Counter => "Counter",
        UserSignal => "UserSignal",
        Timer => "Timer",
        Led => "LED",
        Sensor => "Sensor",
        Flower => "Flower",
        Mover => "Mover",
        Compass => "Compass",
    }
}

impl ComponentKind {
    /// Whether instances act on the shared garden.
    pub fn needs_garden(self) -> bool {
        matches!(
            self,
            Self::Sensor | Self::Flower | Self::Mover | Self::Compass
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "state")]
pub enum Component {
    Reader(Reader),
    Impulse(Impulse),
    Counter(Counter),
    UserSignal(UserSignal),
    Timer(Timer),
    #[serde(rename = "LED")]
    Led(Led),
    Sensor(Sensor),
    Flower(Flower),
    Mover(Mover),
    Compass(Compass),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Reader(_) => ComponentKind::Reader,
            Self::Impulse(_) => ComponentKind::Impulse,
            Self::Counter(_) => ComponentKind::Counter,
            Self::UserSignal(_) => ComponentKind::UserSignal,
            Self::Timer(_) => ComponentKind::Timer,
            Self::Led(_) => ComponentKind::Led,
            Self::Sensor(_) => ComponentKind::Sensor,
            Self::Flower(_) => ComponentKind::Flower,
            Self::Mover(_) => ComponentKind::Mover,
            Self::Compass(_) => ComponentKind::Compass,
        }
    }

    /// Call `method` by name with already split textual arguments.
    pub fn invoke(
        &mut self,
        method: &str,
        args: &[String],
        fx: &mut Effects<'_>,
    ) -> Result<(), ComponentError> {
        let kind = self.kind();
        match self {
            Self::Reader(reader) => {
                let m = resolve(kind, method, args, ReaderMethod::lookup, ReaderMethod::arity)?;
                reader.call(m, fx);
            }
            Self::Impulse(impulse) => {
                let m = resolve(kind, method, args, ImpulseMethod::lookup, ImpulseMethod::arity)?;
                impulse.call(m, fx);
            }
            Self::Counter(counter) => {
                let m = resolve(kind, method, args, CounterMethod::lookup, CounterMethod::arity)?;
                counter.call(m, args)?;
            }
            Self::UserSignal(signal) => {
                let m = resolve(
                    kind,
                    method,
                    args,
                    UserSignalMethod::lookup,
                    UserSignalMethod::arity,
                )?;
                signal.call(m, fx);
            }
            Self::Timer(timer) => {
                let m = resolve(kind, method, args, TimerMethod::lookup, TimerMethod::arity)?;
                timer.call(m, args, fx)?;
            }
            Self::Led(led) => {
                let m = resolve(kind, method, args, LedMethod::lookup, LedMethod::arity)?;
                led.call(m);
            }
            Self::Sensor(sensor) => {
                let m = resolve(kind, method, args, SensorMethod::lookup, SensorMethod::arity)?;
                sensor.call(m, fx)?;
            }
            Self::Flower(flower) => {
                let m = resolve(kind, method, args, FlowerMethod::lookup, FlowerMethod::arity)?;
                flower.call(m, args, fx)?;
            }
            Self::Mover(mover) => {
                let m = resolve(kind, method, args, MoverMethod::lookup, MoverMethod::arity)?;
                mover.call(m, fx)?;
            }
            Self::Compass(_) => {
                return Err(ComponentError::UnknownMethod {
                    kind: kind.to_string(),
                    method: method.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Read an attribute by name. `None` when the type has no such attribute.
    pub fn attribute(&self, name: &str, garden: Option<&Garden>) -> Option<Value> {
        match self {
            Self::Reader(reader) => ReaderAttribute::lookup(name).map(|a| reader.get(a)),
            Self::Counter(counter) => CounterAttribute::lookup(name).map(|a| counter.get(a)),
            Self::Timer(timer) => TimerAttribute::lookup(name).map(|a| timer.get(a)),
            Self::Led(led) => LedAttribute::lookup(name).map(|a| led.get(a)),
            Self::Sensor(sensor) => SensorAttribute::lookup(name).map(|a| sensor.get(a)),
            Self::Compass(compass) => {
                let attribute = CompassAttribute::lookup(name)?;
                garden.map(|garden| compass.get(attribute, garden))
            }
            Self::Impulse(_) | Self::UserSignal(_) | Self::Flower(_) | Self::Mover(_) => None,
        }
    }
}

fn resolve<M: Copy>(
    kind: ComponentKind,
    method: &str,
    args: &[String],
    lookup: fn(&str) -> Option<M>,
    arity: fn(M) -> usize,
) -> Result<M, ComponentError> {
    let resolved = lookup(method).ok_or_else(|| ComponentError::UnknownMethod {
        kind: kind.to_string(),
        method: method.to_string(),
    })?;
    let expected = arity(resolved);
    if args.len() != expected {
        return Err(ComponentError::Arity {
            kind: kind.to_string(),
            method: method.to_string(),
            expected,
            given: args.len(),
        });
    }
    Ok(resolved)
}

/// Named component instances plus the optional garden they share.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Components {
    instances: BTreeMap<String, Component>,
    garden: Option<Garden>,
    #[serde(skip)]
    message: Option<String>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry carrying the simulation options components may need.
    pub fn from_parameters(parameters: &SimParameters) -> Result<Self, ComponentError> {
        let garden = parameters.garden.as_ref().map(Garden::new).transpose()?;
        Ok(Self {
            instances: BTreeMap::new(),
            garden,
            message: parameters.message.clone(),
        })
    }

    /// Instantiate a component of the named type.
    ///
    /// A `Reader` takes its message from its own `message` parameter,
    /// falling back to the simulation message. A `Counter` may start from
    /// a `value` parameter.
    pub fn add(
        &mut self,
        name: &str,
        kind: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<(), ComponentError> {
        let kind =
            ComponentKind::lookup(kind).ok_or_else(|| ComponentError::UnknownType(kind.to_string()))?;
        if kind.needs_garden() && self.garden.is_none() {
            return Err(ComponentError::MissingOption("gardener"));
        }

        let component = match kind {
            ComponentKind::Reader => {
                let message = parameters
                    .get("message")
                    .or(self.message.as_ref())
                    .ok_or(ComponentError::MissingOption("message"))?;
                Component::Reader(Reader::new(message.as_str()))
            }
            ComponentKind::Impulse => Component::Impulse(Impulse::new()),
            ComponentKind::Counter => match parameters.get("value") {
                Some(value) => Component::Counter(Counter::with_value(super::parse_int(
                    "value", value,
                )?)),
                None => Component::Counter(Counter::new()),
            },
            ComponentKind::UserSignal => Component::UserSignal(UserSignal::new()),
            ComponentKind::Timer => Component::Timer(Timer::new()),
            ComponentKind::Led => Component::Led(Led::new()),
            ComponentKind::Sensor => match &self.garden {
                Some(garden) => Component::Sensor(Sensor::new(garden)),
                None => return Err(ComponentError::MissingOption("gardener")),
            },
            ComponentKind::Flower => Component::Flower(Flower::new()),
            ComponentKind::Mover => Component::Mover(Mover::new()),
            ComponentKind::Compass => Component::Compass(Compass::new()),
        };
        self.insert(name, component);
        Ok(())
    }

    /// Register a ready-made instance, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, component: Component) {
        let name = name.into();
        log::debug!("component '{}' of type {}", name, component.kind());
        self.instances.insert(name, component);
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.instances.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn garden(&self) -> Option<&Garden> {
        self.garden.as_ref()
    }

    /// Run `name.method(args)`. Events the method raises go to `queue`.
    pub fn invoke(
        &mut self,
        name: &str,
        method: &str,
        args: &[String],
        queue: &mut EventQueue,
    ) -> Result<(), ComponentError> {
        let component = self
            .instances
            .get_mut(name)
            .ok_or_else(|| ComponentError::UnknownComponent(name.to_string()))?;
        let mut fx = Effects::new(name, queue, self.garden.as_mut());
        component.invoke(method, args, &mut fx)
    }

    /// Value of `name.attribute`, if both exist.
    pub fn attribute(&self, name: &str, attribute: &str) -> Option<Value> {
        self.instances
            .get(name)?
            .attribute(attribute, self.garden.as_ref())
    }
}
