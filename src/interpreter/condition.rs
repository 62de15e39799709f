//! Guard evaluation.
//!
//! A guard is a single comparison `left <op> right` where each operand is a
//! number literal, a `component.attribute` reference, or bare text. Blank
//! guards are always true. Evaluation never changes component state.

use crate::components::{Components, Value};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Ge,
    Le,
    Eq,
    Ne,
    Gt,
    Lt,
}

/// Operators in the order they are searched for. Two-character symbols
/// come first so that `>=` is never read as `>`.
const OPERATORS: [(&str, Operator); 6] = [
    (">=", Operator::Ge),
    ("<=", Operator::Le),
    ("==", Operator::Eq),
    ("!=", Operator::Ne),
    (">", Operator::Gt),
    ("<", Operator::Lt),
];

impl Operator {
    pub fn symbol(self) -> &'static str {
        OPERATORS
            .iter()
            .find(|(_, op)| *op == self)
            .map_or("", |(symbol, _)| symbol)
    }

    /// Values that cannot be ordered against each other are unequal, and
    /// every ordering test on them is false.
    pub fn apply(self, left: &Value, right: &Value) -> bool {
        let ordering = left.compare(right);
        match self {
            Self::Eq => ordering == Some(Ordering::Equal),
            Self::Ne => ordering != Some(Ordering::Equal),
            Self::Gt => ordering == Some(Ordering::Greater),
            Self::Lt => ordering == Some(Ordering::Less),
            Self::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            Self::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        }
    }
}

/// A guard split into its operator and operand texts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison<'a> {
    pub left: &'a str,
    pub operator: Operator,
    pub right: &'a str,
}

impl<'a> Comparison<'a> {
    /// Split on the first operator, by priority, present anywhere in the
    /// text. `None` if the text contains no operator.
    pub fn parse(condition: &'a str) -> Option<Self> {
        OPERATORS.iter().find_map(|&(symbol, operator)| {
            let (left, right) = condition.split_once(symbol)?;
            Some(Self {
                left: left.trim(),
                operator,
                right: right.trim(),
            })
        })
    }
}

/// Evaluate a guard against the current component state.
pub fn evaluate(condition: &str, components: &Components) -> bool {
    let condition = condition.trim();
    if condition.is_empty() {
        return true;
    }
    let Some(comparison) = Comparison::parse(condition) else {
        // no operator: any non-blank text holds
        return true;
    };

    let left = resolve(comparison.left, components);
    let right = resolve(comparison.right, components);
    let result = comparison.operator.apply(&left, &right);
    log::trace!(
        "guard '{}': {} {} {} -> {}",
        condition,
        left,
        comparison.operator.symbol(),
        right,
        result
    );
    result
}

/// Resolve an operand to a value.
///
/// An attribute reference that names no known component or attribute
/// falls back to its literal text.
pub fn resolve(operand: &str, components: &Components) -> Value {
    if let Some(number) = Value::parse_number(operand) {
        return number;
    }
    if let Some((component, attribute)) = operand.split_once('.') {
        match components.attribute(component, attribute) {
            Some(value) => return value,
            None => log::warn!("unresolved operand '{}', using it as text", operand),
        }
    }
    Value::from(operand)
}
