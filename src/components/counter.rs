//! Integer counter.

use super::{parse_int, single_arg, ComponentError, Value};
use serde::Serialize;

lookup_table! {
    pub enum CounterMethod {
        Set => "set",
        Add => "add",
        Sub => "sub",
        Clear => "clear",
    }
}

impl CounterMethod {
    pub fn arity(self) -> usize {
        match self {
            Self::Set => 1,
            Self::Add | Self::Sub | Self::Clear => 0,
        }
    }
}

lookup_table! {
    pub enum CounterAttribute {
        Value => "value",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Counter {
    value: i64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: i64) -> Self {
        Self { value }
    }

    pub fn call(&mut self, method: CounterMethod, args: &[String]) -> Result<(), ComponentError> {
        match method {
            CounterMethod::Set => {
                let arg = single_arg("Counter", method.as_str(), args)?;
                self.value = parse_int(method.as_str(), arg)?;
            }
            CounterMethod::Add => {
                self.value = self.value.checked_add(1).ok_or_else(|| overflow(method))?
            }
            CounterMethod::Sub => {
                self.value = self.value.checked_sub(1).ok_or_else(|| overflow(method))?
            }
            CounterMethod::Clear => self.value = 0,
        }
        Ok(())
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn get(&self, attribute: CounterAttribute) -> Value {
        match attribute {
            CounterAttribute::Value => Value::Int(self.value),
        }
    }
}

fn overflow(method: CounterMethod) -> ComponentError {
    ComponentError::Overflow {
        method: method.to_string(),
    }
}
