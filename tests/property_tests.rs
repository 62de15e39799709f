//! Property-based tests for the queue, the guard interpreter and the
//! dispatch engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use hsm_sim::components::{Component, Components, Counter, Value};
use hsm_sim::core::{EventQueue, HandlerId, Outcome};
use hsm_sim::elements::{Element, ElementTable, PlainState, Reaction, Resolution, Scope};
use hsm_sim::engine::Hsm;
use hsm_sim::interpreter::evaluate;
use proptest::prelude::*;

prop_compose! {
    fn event_name()(name in "[a-z]{1,6}(\\.[a-z_]{1,8})?") -> String {
        name
    }
}

prop_compose! {
    fn events(max: usize)(events in prop::collection::vec(event_name(), 0..max)) -> Vec<String> {
        events
    }
}

prop_compose! {
    fn guard()(
        left in prop_oneof![Just("counter.value".to_string()), (-5i64..5).prop_map(|n| n.to_string())],
        op in prop_oneof![Just(">="), Just("<="), Just("=="), Just("!="), Just(">"), Just("<")],
        right in prop_oneof![Just("counter.value".to_string()), (-5i64..5).prop_map(|n| n.to_string())],
    ) -> String {
        format!("{left} {op} {right}")
    }
}

fn with_counter(value: i64) -> Components {
    let mut components = Components::new();
    components.insert("counter", Component::Counter(Counter::with_value(value)));
    components
}

proptest! {
    #[test]
    fn produced_events_run_before_waiting_ones(
        queued in events(8),
        consumed in 0usize..8,
        produced in events(5),
    ) {
        let mut queue = EventQueue::new();
        for event in &queued {
            queue.push(event.as_str());
        }
        let consumed = consumed.min(queued.len());
        for _ in 0..consumed {
            queue.pop();
        }
        for event in &produced {
            queue.push(event.as_str());
        }

        // before the first pop nothing is being handled, so pushes append
        let expected: Vec<String> = if consumed == 0 {
            queued.iter().chain(&produced).cloned().collect()
        } else {
            produced.iter().chain(&queued[consumed..]).cloned().collect()
        };
        prop_assert_eq!(queue.pending(), expected.as_slice());
        prop_assert_eq!(queue.processed(), &queued[..consumed]);
    }

    #[test]
    fn every_pushed_event_pops_exactly_once(
        batches in prop::collection::vec(events(4), 1..6),
    ) {
        let mut queue = EventQueue::new();
        let mut pushed = Vec::new();
        let mut popped = Vec::new();

        for batch in &batches {
            for event in batch {
                queue.push(event.as_str());
                pushed.push(event.clone());
            }
            if let Some(event) = queue.pop() {
                popped.push(event);
            }
        }
        while let Some(event) = queue.pop() {
            popped.push(event);
        }

        pushed.sort();
        popped.sort();
        prop_assert_eq!(pushed, popped);
        prop_assert!(queue.is_empty());
    }

    #[test]
    fn guard_evaluation_is_idempotent(value in -5i64..5, condition in guard()) {
        let components = with_counter(value);
        let before = components.clone();

        let first = evaluate(&condition, &components);
        let second = evaluate(&condition, &components);

        prop_assert_eq!(first, second);
        prop_assert_eq!(components, before);
    }

    #[test]
    fn counter_guards_compare_numerically(value in -5i64..5, bound in -5i64..5) {
        let components = with_counter(value);
        prop_assert_eq!(evaluate(&format!("counter.value > {bound}"), &components), value > bound);
        prop_assert_eq!(evaluate(&format!("{bound} == counter.value"), &components), value == bound);
        prop_assert_eq!(evaluate(&format!("counter.value <= {bound}"), &components), value <= bound);
    }

    #[test]
    fn child_delegates_to_parent(value in -3i64..3, threshold in -3i64..3) {
        // 0 parent, 1 child, 2 target
        let mut parent = PlainState::new("p", "P", None);
        parent.on("go", Reaction::new(
            format!("counter.value > {threshold}"),
            "counter.add()",
            Resolution::Transition(HandlerId::new(2)),
        ));
        parent.on("go", Reaction::new("else", "counter.sub()", Resolution::Handled));
        let elements = vec![
            Element::State(parent),
            Element::State(PlainState::new("c", "C", Some(HandlerId::new(0)))),
            Element::State(PlainState::new("t", "T", None)),
        ];

        let dispatch_from = |start: usize| {
            let mut components = with_counter(value);
            let mut queue = EventQueue::new();
            let mut hsm = Hsm::new(HandlerId::new(start));
            let outcome = {
                let mut table = ElementTable::new(&elements, Scope::new(&mut components, &mut queue));
                hsm.dispatch(&mut table, "go").unwrap()
            };
            (outcome, hsm.current(), components.attribute("counter", "value"))
        };

        let (child_outcome, child_current, child_value) = dispatch_from(1);
        let (parent_outcome, parent_current, parent_value) = dispatch_from(0);

        prop_assert_eq!(child_outcome, parent_outcome);
        prop_assert_eq!(child_value.clone(), parent_value);
        prop_assert_eq!(child_current == HandlerId::new(2), parent_current == HandlerId::new(2));
        if value > threshold {
            prop_assert_eq!(child_outcome, Outcome::Transition(HandlerId::new(2)));
            prop_assert_eq!(child_value, Some(Value::Int(value + 1)));
        } else {
            prop_assert_eq!(child_outcome, Outcome::Handled);
        }
    }
}
