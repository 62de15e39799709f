//! Single on/off light.

use super::Value;
use serde::Serialize;

lookup_table! {
    pub enum LedMethod {
        On => "on",
        Off => "off",
    }
}

impl LedMethod {
    pub fn arity(self) -> usize {
        0
    }
}

lookup_table! {
    pub enum LedAttribute {
        Value => "value",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Led {
    lit: bool,
}

impl Led {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call(&mut self, method: LedMethod) {
        self.lit = method == LedMethod::On;
    }

    pub fn is_on(&self) -> bool {
        self.lit
    }

    pub fn get(&self, attribute: LedAttribute) -> Value {
        match attribute {
            LedAttribute::Value => Value::Int(i64::from(self.lit)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switches_on_and_off() {
        let mut led = Led::new();
        led.call(LedMethod::On);
        assert!(led.is_on());
        assert_eq!(led.get(LedAttribute::Value), Value::Int(1));
        led.call(LedMethod::Off);
        assert!(!led.is_on());
    }
}
