//! Hierarchical dispatch and least-common-ancestor transitions.

use super::error::DispatchError;
use crate::core::signal::{ENTRY, EXIT, MAX_DEPTH, PROBE};
use crate::core::{HandlerId, Outcome, StateHandlers, TransitionHistory, TransitionRecord};
use chrono::Utc;

type DispatchResult<T, E> = Result<T, DispatchError<E>>;

/// Dispatch engine over an opaque table of state handlers.
///
/// The hierarchy is never stored here. It is discovered while running by
/// asking handlers for their superstate, either through a `Super` outcome
/// during normal dispatch or through the [`PROBE`] signal during a
/// transition.
#[derive(Clone, Debug)]
pub struct Hsm {
    current: HandlerId,
    effective: HandlerId,
    target: Option<HandlerId>,
    history: TransitionHistory,
}

impl Hsm {
    /// Create an engine whose active handler is `initial`.
    pub fn new(initial: HandlerId) -> Self {
        Self {
            current: initial,
            effective: initial,
            target: None,
            history: TransitionHistory::new(),
        }
    }

    /// The handler that currently holds the machine.
    pub fn current(&self) -> HandlerId {
        self.current
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    pub fn into_history(self) -> TransitionHistory {
        self.history
    }

    /// Enter the initial handler directly, outside the event queue.
    ///
    /// If the entry reaction requests a transition it is executed at once.
    pub fn start<H: StateHandlers>(&mut self, handlers: &mut H) -> DispatchResult<Outcome, H::Error> {
        self.effective = self.current;
        let outcome = call(handlers, self.current, ENTRY)?;
        if let Outcome::Transition(target) = outcome {
            self.target = Some(target);
            self.transition(handlers, ENTRY)?;
        }
        Ok(outcome)
    }

    /// Route one signal through the active handler and its ancestors.
    ///
    /// `Super` outcomes bubble the signal upward until some handler
    /// handles it, ignores it, reports it unhandled or requests a
    /// transition. A transition is carried out before returning.
    pub fn dispatch<H: StateHandlers>(
        &mut self,
        handlers: &mut H,
        signal: &str,
    ) -> DispatchResult<Outcome, H::Error> {
        self.effective = self.current;
        let mut outcome = call(handlers, self.current, signal)?;
        let mut depth = 1;
        while let Outcome::Super(parent) = outcome {
            depth += 1;
            if depth > MAX_DEPTH {
                return Err(too_deep(signal));
            }
            self.effective = parent;
            outcome = call(handlers, parent, signal)?;
        }

        match outcome {
            Outcome::Transition(target) => {
                self.target = Some(target);
                self.transition(handlers, signal)?;
            }
            _ => self.effective = self.current,
        }
        log::trace!("'{}' -> {:?}", signal, outcome);
        Ok(outcome)
    }

    fn transition<H: StateHandlers>(
        &mut self,
        handlers: &mut H,
        signal: &str,
    ) -> DispatchResult<(), H::Error> {
        let Some(target) = self.target.take() else {
            return Ok(());
        };
        let from = self.current;
        let mut source = self.current;

        // A superstate answered the signal: leave everything below it first.
        let mut steps = 0;
        while source != self.effective {
            call(handlers, source, EXIT)?;
            match superstate(handlers, source)? {
                Some(parent) => source = parent,
                None => break,
            }
            steps += 1;
            if steps > MAX_DEPTH {
                return Err(too_deep(signal));
            }
        }

        if source == target {
            call(handlers, source, EXIT)?;
            call(handlers, target, ENTRY)?;
            self.complete(from, target, signal);
            return Ok(());
        }

        // path[0] is the target, followed by its ancestors up to the source
        // or the top of the hierarchy.
        let mut path = vec![target];
        let mut lca = None;
        let mut node = target;
        while let Some(parent) = superstate(handlers, node)? {
            path.push(parent);
            if path.len() > MAX_DEPTH {
                return Err(too_deep(signal));
            }
            if parent == source {
                lca = Some(path.len() - 1);
                break;
            }
            node = parent;
        }

        let lca = match lca {
            Some(index) => index,
            None => {
                let mut found = path.len();
                for _ in 0..MAX_DEPTH {
                    call(handlers, source, EXIT)?;
                    let Some(parent) = superstate(handlers, source)? else {
                        break;
                    };
                    source = parent;
                    if let Some(index) = path.iter().position(|&n| n == source) {
                        found = index;
                        break;
                    }
                }
                found
            }
        };

        // The target is its own LCA when moving up to an ancestor; it is
        // re-entered without having been exited.
        if lca == 0 {
            call(handlers, target, ENTRY)?;
        }
        for &node in path[..lca].iter().rev() {
            call(handlers, node, ENTRY)?;
        }

        self.complete(from, target, signal);
        Ok(())
    }

    fn complete(&mut self, from: HandlerId, to: HandlerId, signal: &str) {
        self.current = to;
        self.effective = to;
        self.target = None;
        log::debug!("transition {} -> {} on '{}'", from, to, signal);
        self.history.record(TransitionRecord {
            from,
            to,
            signal: signal.to_string(),
            timestamp: Utc::now(),
        });
    }
}

fn call<H: StateHandlers>(
    handlers: &mut H,
    handler: HandlerId,
    signal: &str,
) -> DispatchResult<Outcome, H::Error> {
    handlers
        .handle(handler, signal)
        .map_err(|source| DispatchError::Handler {
            signal: signal.to_string(),
            source,
        })
}

fn superstate<H: StateHandlers>(
    handlers: &mut H,
    handler: HandlerId,
) -> DispatchResult<Option<HandlerId>, H::Error> {
    Ok(call(handlers, handler, PROBE)?.superstate())
}

fn too_deep<E: std::error::Error + 'static>(signal: &str) -> DispatchError<E> {
    DispatchError::HierarchyTooDeep {
        signal: signal.to_string(),
        max: MAX_DEPTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::convert::Infallible;

    // 0 A
    //   1 A1
    //   2 A2
    //     3 A21
    // 4 B
    //   5 B1
    struct Tree {
        parents: Vec<Option<usize>>,
        reactions: HashMap<(usize, String), Outcome>,
        log: Vec<String>,
    }

    impl Tree {
        fn new() -> Self {
            Self {
                parents: vec![None, Some(0), Some(0), Some(2), None, Some(4)],
                reactions: HashMap::new(),
                log: Vec::new(),
            }
        }

        fn on(mut self, state: usize, signal: &'static str, outcome: Outcome) -> Self {
            self.reactions.insert((state, signal.to_string()), outcome);
            self
        }
    }

    impl StateHandlers for Tree {
        type Error = Infallible;

        fn handle(&mut self, handler: HandlerId, signal: &str) -> Result<Outcome, Infallible> {
            let parent = self.parents[handler.index()].map(HandlerId::new);
            if signal == PROBE {
                return Ok(parent.map_or(Outcome::Unhandled, Outcome::Super));
            }
            if signal == ENTRY || signal == EXIT {
                self.log.push(format!("{} {}", signal, handler.index()));
            }
            if let Some(outcome) = self.reactions.get(&(handler.index(), signal.to_string())) {
                return Ok(*outcome);
            }
            Ok(parent.map_or(Outcome::Unhandled, Outcome::Super))
        }
    }

    fn id(index: usize) -> HandlerId {
        HandlerId::new(index)
    }

    #[test]
    fn sibling_transition_exits_source_and_enters_target() {
        let mut tree = Tree::new().on(1, "go", Outcome::Transition(id(2)));
        let mut hsm = Hsm::new(id(1));

        let outcome = hsm.dispatch(&mut tree, "go").unwrap();

        assert_eq!(outcome, Outcome::Transition(id(2)));
        assert_eq!(hsm.current(), id(2));
        assert_eq!(tree.log, vec!["exit 1", "entry 2"]);
    }

    #[test]
    fn cross_hierarchy_transition_goes_through_the_top() {
        let mut tree = Tree::new().on(3, "jump", Outcome::Transition(id(5)));
        let mut hsm = Hsm::new(id(3));

        hsm.dispatch(&mut tree, "jump").unwrap();

        assert_eq!(hsm.current(), id(5));
        assert_eq!(
            tree.log,
            vec!["exit 3", "exit 2", "exit 0", "entry 4", "entry 5"]
        );
    }

    #[test]
    fn self_transition_exits_then_enters() {
        let mut tree = Tree::new().on(1, "again", Outcome::Transition(id(1)));
        let mut hsm = Hsm::new(id(1));

        hsm.dispatch(&mut tree, "again").unwrap();

        assert_eq!(hsm.current(), id(1));
        assert_eq!(tree.log, vec!["exit 1", "entry 1"]);
    }

    #[test]
    fn ancestor_transition_exits_up_to_the_handling_superstate() {
        let mut tree = Tree::new().on(0, "reset", Outcome::Transition(id(1)));
        let mut hsm = Hsm::new(id(3));

        let outcome = hsm.dispatch(&mut tree, "reset").unwrap();

        assert_eq!(outcome, Outcome::Transition(id(1)));
        assert_eq!(hsm.current(), id(1));
        assert_eq!(tree.log, vec!["exit 3", "exit 2", "entry 1"]);
    }

    #[test]
    fn transition_to_ancestor_reenters_it() {
        let mut tree = Tree::new().on(3, "up", Outcome::Transition(id(2)));
        let mut hsm = Hsm::new(id(3));

        hsm.dispatch(&mut tree, "up").unwrap();

        assert_eq!(hsm.current(), id(2));
        assert_eq!(tree.log, vec!["exit 3", "entry 2"]);
    }

    #[test]
    fn transition_to_descendant_only_enters() {
        let mut tree = Tree::new().on(2, "down", Outcome::Transition(id(3)));
        let mut hsm = Hsm::new(id(2));

        hsm.dispatch(&mut tree, "down").unwrap();

        assert_eq!(hsm.current(), id(3));
        assert_eq!(tree.log, vec!["entry 3"]);
    }

    #[test]
    fn signal_handled_by_ancestor_keeps_current() {
        let mut tree = Tree::new().on(0, "tick", Outcome::Handled);
        let mut hsm = Hsm::new(id(3));

        let outcome = hsm.dispatch(&mut tree, "tick").unwrap();

        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(hsm.current(), id(3));
        assert!(tree.log.is_empty());
    }

    #[test]
    fn unknown_signal_bubbles_to_unhandled() {
        let mut tree = Tree::new();
        let mut hsm = Hsm::new(id(3));

        let outcome = hsm.dispatch(&mut tree, "nobody").unwrap();

        assert_eq!(outcome, Outcome::Unhandled);
        assert_eq!(hsm.current(), id(3));
        assert!(hsm.history().is_empty());
    }

    #[test]
    fn start_enters_initial_handler() {
        let mut tree = Tree::new();
        let mut hsm = Hsm::new(id(4));

        let outcome = hsm.start(&mut tree).unwrap();

        assert_eq!(outcome, Outcome::Unhandled);
        assert_eq!(tree.log, vec!["entry 4"]);
        assert_eq!(hsm.current(), id(4));
    }

    #[test]
    fn start_runs_transition_requested_on_entry() {
        let mut tree = Tree::new().on(4, ENTRY, Outcome::Transition(id(5)));
        let mut hsm = Hsm::new(id(4));

        hsm.start(&mut tree).unwrap();

        assert_eq!(hsm.current(), id(5));
        assert_eq!(tree.log, vec!["entry 4", "entry 5"]);
    }

    #[test]
    fn transitions_are_recorded_in_history() {
        let mut tree = Tree::new()
            .on(1, "go", Outcome::Transition(id(2)))
            .on(2, "back", Outcome::Transition(id(1)));
        let mut hsm = Hsm::new(id(1));

        hsm.dispatch(&mut tree, "go").unwrap();
        hsm.dispatch(&mut tree, "back").unwrap();

        assert_eq!(hsm.history().path(), vec![id(1), id(2), id(1)]);
        let signals: Vec<&str> = hsm
            .history()
            .transitions()
            .iter()
            .map(|t| t.signal.as_str())
            .collect();
        assert_eq!(signals, vec!["go", "back"]);
    }

    #[test]
    fn parent_cycle_is_reported_as_too_deep() {
        let mut tree = Tree::new();
        tree.parents[0] = Some(1);
        let mut hsm = Hsm::new(id(1));

        let err = hsm.dispatch(&mut tree, "spin").unwrap_err();

        assert!(matches!(
            err,
            DispatchError::HierarchyTooDeep { max: MAX_DEPTH, .. }
        ));
    }
}
