//! Action scripts: one `component.method(args)` call per line.

use super::InterpretError;
use crate::components::Components;
use crate::core::EventQueue;
use regex::Regex;
use std::sync::OnceLock;

fn action_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<component>\w+)\.(?P<method>\w+)\((?P<args>.*)\)$")
            .expect("action pattern is a valid regex")
    })
}

/// One parsed call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    pub component: String,
    pub method: String,
    pub args: Vec<String>,
}

impl Action {
    /// Parse a single trimmed, non-blank line.
    pub fn parse(line: &str) -> Result<Self, InterpretError> {
        let captures = action_pattern()
            .captures(line)
            .ok_or_else(|| InterpretError::MalformedAction {
                line: line.to_string(),
            })?;
        let args = captures["args"].trim();
        let args = if args.is_empty() {
            Vec::new()
        } else {
            args.split(',').map(|arg| arg.trim().to_string()).collect()
        };
        Ok(Self {
            component: captures["component"].to_string(),
            method: captures["method"].to_string(),
            args,
        })
    }
}

/// Parse every non-blank line of an action block.
pub fn parse_actions(text: &str) -> Result<Vec<Action>, InterpretError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Action::parse)
        .collect()
}

/// Run an action block in textual order.
///
/// The whole block is parsed before anything runs, so a malformed line
/// means no call in the block happens. Calls to components that do not
/// exist are skipped.
pub fn execute(
    text: &str,
    components: &mut Components,
    queue: &mut EventQueue,
) -> Result<(), InterpretError> {
    for action in parse_actions(text)? {
        if !components.contains(&action.component) {
            log::warn!(
                "skipping {}.{}(): no component '{}'",
                action.component,
                action.method,
                action.component
            );
            continue;
        }
        log::trace!(
            "{}.{}({})",
            action.component,
            action.method,
            action.args.join(", ")
        );
        components
            .invoke(&action.component, &action.method, &action.args, queue)
            .map_err(|source| InterpretError::Component {
                component: action.component.clone(),
                method: action.method.clone(),
                source,
            })?;
    }
    Ok(())
}
