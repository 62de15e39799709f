//! Component effectors driven by state machine actions and guards.
//!
//! A component is a named instance of one of a closed set of types. Each type
//! exposes a lookup table of methods (called from action scripts such as
//! `reader.read()`) and of attributes (read from guards such as
//! `counter.value > 0`). Names are resolved through these tables, never by
//! reflection.
//!
//! Methods may push events onto the run's event queue, either as ordinary
//! internal events or as *called* events that are also logged for grading.

/// Declares a `Copy` enum whose variants map one-to-one onto names.
macro_rules! lookup_table {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn lookup(name: &str) -> Option<Self> {
                match name {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

mod counter;
mod error;
pub mod garden;
mod gardener;
mod led;
mod reader;
mod registry;
mod signals;
mod timer;
mod value;

pub use counter::{Counter, CounterAttribute, CounterMethod};
pub use error::ComponentError;
pub use garden::{Garden, GardenConfig, Orientation};
pub use gardener::{
    Compass, CompassAttribute, Flower, FlowerMethod, Mover, MoverMethod, Sensor, SensorAttribute,
    SensorMethod,
};
pub use led::{Led, LedAttribute, LedMethod};
pub use reader::{Reader, ReaderAttribute, ReaderMethod};
pub use registry::{Component, ComponentKind, Components};
pub use signals::{Impulse, ImpulseMethod, UserSignal, UserSignalMethod};
pub use timer::{Timer, TimerAttribute, TimerMethod};
pub use value::Value;

use crate::core::EventQueue;

/// What a component method may touch besides its own state.
pub struct Effects<'a> {
    name: &'a str,
    queue: &'a mut EventQueue,
    garden: Option<&'a mut Garden>,
}

impl<'a> Effects<'a> {
    pub fn new(name: &'a str, queue: &'a mut EventQueue, garden: Option<&'a mut Garden>) -> Self {
        Self {
            name,
            queue,
            garden,
        }
    }

    /// Name of the component instance being invoked.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Queue `<name>.<event>` as an internal event.
    pub fn emit(&mut self, event: &str) {
        self.queue.push(format!("{}.{}", self.name, event));
    }

    /// Queue an event as component-triggered, exactly as given.
    pub fn emit_called(&mut self, event: impl Into<String>) {
        self.queue.push_called(event);
    }

    pub fn garden(&mut self) -> Result<&mut Garden, ComponentError> {
        self.garden
            .as_deref_mut()
            .ok_or(ComponentError::MissingOption("gardener"))
    }
}

/// The one argument of a unary method.
fn single_arg<'a>(kind: &str, method: &str, args: &'a [String]) -> Result<&'a str, ComponentError> {
    match args {
        [arg] => Ok(arg),
        _ => Err(ComponentError::Arity {
            kind: kind.to_string(),
            method: method.to_string(),
            expected: 1,
            given: args.len(),
        }),
    }
}

fn parse_int(method: &str, value: &str) -> Result<i64, ComponentError> {
    value.trim().parse().map_err(|_| ComponentError::BadArgument {
        method: method.to_string(),
        value: value.to_string(),
        expected: "an integer",
    })
}
