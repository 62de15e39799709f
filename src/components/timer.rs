//! Countdown timer driven by explicit ticks.

use super::{parse_int, single_arg, ComponentError, Effects, Value};
use serde::Serialize;

lookup_table! {
    pub enum TimerMethod {
        Start => "start",
        Stop => "stop",
        Tick => "tick",
    }
}

impl TimerMethod {
    pub fn arity(self) -> usize {
        match self {
            Self::Start => 1,
            Self::Stop | Self::Tick => 0,
        }
    }
}

lookup_table! {
    pub enum TimerAttribute {
        Difference => "difference",
        Interval => "interval",
        Elapsed => "elapsed",
        Running => "running",
    }
}

/// A timer armed with `start(n)` fires `<name>.timeout` on its n-th tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Timer {
    interval: i64,
    elapsed: i64,
    running: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call(
        &mut self,
        method: TimerMethod,
        args: &[String],
        fx: &mut Effects<'_>,
    ) -> Result<(), ComponentError> {
        match method {
            TimerMethod::Start => {
                let arg = single_arg("Timer", method.as_str(), args)?;
                let interval = parse_int(method.as_str(), arg)?;
                if interval < 0 {
                    return Err(ComponentError::BadArgument {
                        method: method.to_string(),
                        value: arg.to_string(),
                        expected: "a non-negative tick count",
                    });
                }
                self.interval = interval;
                self.elapsed = 0;
                self.running = true;
                log::debug!("timer '{}' started for {}", fx.name(), self.interval);
            }
            TimerMethod::Stop => self.running = false,
            TimerMethod::Tick => {
                if self.running {
                    self.elapsed = self.elapsed.checked_add(1).ok_or_else(|| {
                        ComponentError::Overflow {
                            method: method.to_string(),
                        }
                    })?;
                    if self.elapsed >= self.interval {
                        self.running = false;
                        fx.emit("timeout");
                    }
                }
            }
        }
        Ok(())
    }

    /// Ticks left before the timeout.
    pub fn difference(&self) -> i64 {
        self.interval.saturating_sub(self.elapsed)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn get(&self, attribute: TimerAttribute) -> Value {
        match attribute {
            TimerAttribute::Difference => Value::Int(self.difference()),
            TimerAttribute::Interval => Value::Int(self.interval),
            TimerAttribute::Elapsed => Value::Int(self.elapsed),
            TimerAttribute::Running => Value::Bool(self.running),
        }
    }
}
