//! Trigger and reaction-block text.
//!
//! A state's reaction block is a series of paragraphs separated by blank
//! lines:
//!
//! ```text
//! entry/
//! reader.read()
//!
//! reader.char_accepted[reader.index < 3]/
//! reader.read()
//! counter.add()
//! ```
//!
//! The first line of a paragraph is the header `event[condition]/`; the
//! remaining lines are the action. Text on the header after `/` is dropped.
//! Transition labels use the one-line form `event[condition]/action`.

/// Event name, guard and action text of one reaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trigger {
    pub event: String,
    pub condition: String,
    pub action: String,
}

/// Split `event[condition]` into trimmed event and condition.
fn event_and_condition(text: &str) -> (String, String) {
    match text.split_once('[') {
        Some((event, rest)) if text.contains(']') => {
            let condition = rest.split(']').next().unwrap_or_default();
            (event.trim().to_string(), condition.trim().to_string())
        }
        _ => (text.trim().to_string(), String::new()),
    }
}

/// Parse the reaction block declared on a state.
pub fn parse_reactions(block: &str) -> Vec<Trigger> {
    block
        .trim()
        .split("\n\n")
        .filter_map(|paragraph| {
            let mut lines = paragraph.lines().filter(|line| !line.trim().is_empty());
            let header = lines.next()?;
            let (event, condition) = match header.split_once('/') {
                Some((head, _)) => event_and_condition(head),
                None => (header.trim().to_string(), String::new()),
            };
            Some(Trigger {
                event,
                condition,
                action: lines.collect::<Vec<_>>().join("\n"),
            })
        })
        .collect()
}

/// Parse a transition label leaving a plain state.
///
/// A label without `/` is taken whole as the event name.
pub fn parse_transition(label: &str) -> Trigger {
    match label.split_once('/') {
        Some((head, action)) => {
            let (event, condition) = event_and_condition(head);
            Trigger {
                event,
                condition,
                action: action.trim().to_string(),
            }
        }
        None => Trigger {
            event: label.trim().to_string(),
            ..Trigger::default()
        },
    }
}

/// Parse a transition label leaving a choice. Choices have no event, so
/// only the bracketed guard and the action matter. A label without `/`
/// yields an unguarded, action-less branch.
pub fn parse_choice_branch(label: &str) -> Trigger {
    match label.split_once('/') {
        Some((head, action)) => {
            let condition = match head.split_once('[') {
                Some((_, rest)) if head.contains(']') => {
                    rest.split(']').next().unwrap_or_default().trim().to_string()
                }
                _ => String::new(),
            };
            Trigger {
                event: String::new(),
                condition,
                action: action.trim().to_string(),
            }
        }
        None => Trigger::default(),
    }
}
