//! Components whose only effect is to raise graded events.

use super::Effects;
use serde::Serialize;

lookup_table! {
    pub enum ImpulseMethod {
        ImpulseA => "impulseA",
        ImpulseB => "impulseB",
        ImpulseC => "impulseC",
    }
}

impl ImpulseMethod {
    pub fn arity(self) -> usize {
        0
    }
}

/// Raises `impulseA`, `impulseB` or `impulseC` as called events.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Impulse {
    fired: usize,
}

impl Impulse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call(&mut self, method: ImpulseMethod, fx: &mut Effects<'_>) {
        self.fired += 1;
        fx.emit_called(method.as_str());
    }

    /// Number of impulses raised so far.
    pub fn fired(&self) -> usize {
        self.fired
    }
}

lookup_table! {
    pub enum UserSignalMethod {
        Call => "call",
    }
}

impl UserSignalMethod {
    pub fn arity(self) -> usize {
        0
    }
}

/// User-defined event: `call()` raises `<name>.call` as a called event.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserSignal {
    calls: usize,
}

impl UserSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call(&mut self, method: UserSignalMethod, fx: &mut Effects<'_>) {
        match method {
            UserSignalMethod::Call => {
                self.calls += 1;
                let event = format!("{}.call", fx.name());
                fx.emit_called(event);
            }
        }
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}
