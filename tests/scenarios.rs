//! End-to-end runs of small machines.

use hsm_sim::components::{
    garden::{EMPTY, MINT},
    Component, ComponentError, Components, GardenConfig, Value,
};
use hsm_sim::config::{RunConfig, SimParameters};
use hsm_sim::core::signal::{AUTO_TRANSITION, TERMINATE};
use hsm_sim::interpreter::{evaluate, InterpretError};
use hsm_sim::model::MachineModel;
use hsm_sim::runtime::{run, RunError, RunResult};
use std::collections::BTreeMap;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn no_seeds() -> Vec<String> {
    Vec::new()
}

fn run_model(model: &MachineModel, seeds: &[&str], params: SimParameters) -> RunResult {
    init_logging();
    run(model, seeds.iter().copied(), params, &RunConfig::default()).unwrap()
}

#[test]
fn initial_state_final_without_external_input() {
    let model = MachineModel::new()
        .initial("init", None)
        .state("s1", "S1", "entry/\nsignal.call()", None)
        .final_state("end", None)
        .component("signal", "UserSignal")
        .transition("init", "s1", "")
        .transition("s1", "end", "signal.call/");

    let result = run_model(&model, &[], SimParameters::new());

    assert!(!result.timeout);
    assert!(result.terminated());
    assert_eq!(result.signals, [AUTO_TRANSITION, "signal.call", TERMINATE]);
    assert_eq!(result.called_signals, ["signal.call"]);
    assert_eq!(result.final_state, "end");
}

#[test]
fn choice_on_the_way_to_final_adds_an_auto_transition() {
    let model = MachineModel::new()
        .initial("init", None)
        .state("s1", "S1", "entry/", None)
        .choice("c", None)
        .final_state("end", None)
        .component("signal", "UserSignal")
        .transition("init", "s1", "")
        .transition("s1", "c", "go")
        .transition("c", "end", "[else]/");

    let result = run_model(&model, &["go"], SimParameters::new());

    assert!(!result.timeout);
    assert_eq!(
        result.signals,
        [AUTO_TRANSITION, "go", AUTO_TRANSITION, TERMINATE]
    );
    assert_eq!(result.history.len(), 3);
}

fn counter_choice(start: &str) -> MachineModel {
    MachineModel::new()
        .initial("init", None)
        .choice("c", None)
        .state("s_pos", "Positive", "", None)
        .state("s_zero", "Zero", "", None)
        .component_with(
            "counter",
            "Counter",
            BTreeMap::from([("value".to_string(), start.to_string())]),
        )
        .transition("init", "c", "")
        .transition("c", "s_pos", "[counter.value > 0]/")
        .transition("c", "s_zero", "[else]/")
}

#[test]
fn choice_falls_back_to_else() {
    let result = run_model(&counter_choice("0"), &[], SimParameters::new());
    assert_eq!(result.final_state, "s_zero");
    assert_eq!(result.signals, [AUTO_TRANSITION, AUTO_TRANSITION]);

    let result = run_model(&counter_choice("1"), &[], SimParameters::new());
    assert_eq!(result.final_state, "s_pos");
}

#[test]
fn entry_actions_run_in_order() {
    let model = MachineModel::new()
        .initial("init", None)
        .state("s1", "S1", "entry/\nreader.read()\nimpulse.impulseA()", None)
        .component("reader", "Reader")
        .component("impulse", "Impulse")
        .transition("init", "s1", "");

    let result = run_model(&model, &[], SimParameters::new().with_message("xy"));

    assert_eq!(
        result.signals,
        [AUTO_TRANSITION, "reader.char_accepted", "impulseA"]
    );
    assert_eq!(result.called_signals, ["impulseA"]);
    let reader = result.components.attribute("reader", "index");
    assert_eq!(reader, Some(Value::Int(1)));
    assert!(matches!(
        result.component("impulse"),
        Some(Component::Impulse(impulse)) if impulse.fired() == 1
    ));
}

#[test]
fn guard_reads_timer_without_side_effects() {
    let mut components = Components::new();
    components.add("timer", "Timer", &BTreeMap::new()).unwrap();
    let mut queue = hsm_sim::EventQueue::new();
    components
        .invoke("timer", "start", &["3".to_string()], &mut queue)
        .unwrap();

    let before = components.clone();
    assert!(evaluate("3 == timer.difference", &components));
    assert!(evaluate("3 == timer.difference", &components));
    assert_eq!(components, before);

    components
        .invoke("timer", "start", &["4".to_string()], &mut queue)
        .unwrap();
    assert!(!evaluate("3 == timer.difference", &components));
}

#[test]
fn transitions_exit_and_enter_through_the_hierarchy() {
    let model = MachineModel::new()
        .initial("init", None)
        .state("a", "A", "exit/\nsignal.impulseB()\n\ntick/\ncounter.add()", None)
        .state("a1", "A1", "exit/\nsignal.impulseA()", Some("a"))
        .state("b", "B", "entry/\nsignal.impulseC()", None)
        .component("signal", "Impulse")
        .component("counter", "Counter")
        .transition("init", "a1", "")
        .transition("a1", "b", "go");

    let result = run_model(&model, &["tick", "tick", "go"], SimParameters::new());

    assert_eq!(result.final_state, "b");
    assert_eq!(
        result.components.attribute("counter", "value"),
        Some(Value::Int(2))
    );
    assert_eq!(result.called_signals, ["impulseA", "impulseB", "impulseC"]);
    assert_eq!(
        result.signals,
        [
            AUTO_TRANSITION,
            "tick",
            "tick",
            "go",
            "impulseA",
            "impulseB",
            "impulseC"
        ]
    );
}

#[test]
fn impulses_drive_transitions() {
    let model = MachineModel::new()
        .initial("init", None)
        .state("idle", "Idle", "entry/\nled.off()", None)
        .state("lit", "Lit", "entry/\nled.on()\nsignal.impulseB()", None)
        .final_state("end", None)
        .component("signal", "Impulse")
        .component("led", "LED")
        .transition("init", "idle", "")
        .transition("idle", "lit", "impulseA")
        .transition("lit", "end", "impulseB[led.value == 1]/");

    let result = run_model(&model, &["impulseA"], SimParameters::new());

    assert!(result.terminated());
    assert_eq!(
        result.signals,
        [AUTO_TRANSITION, "impulseA", "impulseB", TERMINATE]
    );
    assert_eq!(
        result.components.attribute("led", "value"),
        Some(Value::Int(1))
    );
}

fn gardener_params() -> SimParameters {
    SimParameters::new().with_garden(GardenConfig::new(3, 3).wall(2, 2))
}

#[test]
fn gardener_plants_and_moves() {
    let model = MachineModel::new()
        .initial("init", None)
        .state("look", "Look", "entry/\nsensor.search_flowers()", None)
        .state("step", "Step", "entry/\nmover.move_forward()\nsensor.search_walls()", None)
        .final_state("end", None)
        .component("sensor", "Sensor")
        .component("flower", "Flower")
        .component("mover", "Mover")
        .component("compass", "Compass")
        .transition("init", "look", "")
        .transition(
            "look",
            "step",
            "sensor.isDataRecieved[sensor.flower == sensor.empty]/flower.plant(2)",
        )
        .transition("step", "end", "sensor.wall_right");

    let result = run_model(&model, &[], gardener_params());

    assert!(result.terminated());
    assert_eq!(
        result.signals,
        [
            AUTO_TRANSITION,
            "sensor.isDataRecieved",
            "sensor.wall_right",
            TERMINATE
        ]
    );
    let garden = result.components.garden().unwrap();
    assert_eq!(garden.cell(0, 0), Some(MINT));
    assert_eq!(garden.cell(0, 1), Some(EMPTY));
    assert_eq!(
        result.components.attribute("compass", "y"),
        Some(Value::Int(1))
    );
}

#[test]
fn gardener_crash_aborts_the_run() {
    let model = MachineModel::new()
        .initial("init", None)
        .state("back", "Back", "entry/\nmover.move_backward()", None)
        .component("mover", "Mover")
        .transition("init", "back", "");

    init_logging();
    let err = run(&model, no_seeds(), gardener_params(), &RunConfig::default()).unwrap_err();

    assert_eq!(
        err.interpret_error(),
        Some(&InterpretError::Component {
            component: "mover".to_string(),
            method: "move_backward".to_string(),
            source: ComponentError::Crash("out of bounds!"),
        })
    );
    assert!(err.to_string().contains("Crash: out of bounds!"));
}

#[test]
fn malformed_action_fails_only_when_fired() {
    let model = MachineModel::new()
        .initial("init", None)
        .state("s1", "S1", "", None)
        .state("s2", "S2", "entry/\nthis is not an action", None)
        .transition("init", "s1", "")
        .transition("s1", "s2", "go");

    let result = run_model(&model, &[], SimParameters::new());
    assert_eq!(result.final_state, "s1");

    let err = run(&model, ["go"], SimParameters::new(), &RunConfig::default()).unwrap_err();
    assert_eq!(
        err.interpret_error(),
        Some(&InterpretError::MalformedAction {
            line: "this is not an action".to_string()
        })
    );
}

#[test]
fn garden_components_need_a_garden() {
    let model = MachineModel::new()
        .initial("init", None)
        .state("s1", "S1", "", None)
        .component("sensor", "Sensor")
        .transition("init", "s1", "");

    let err = run(&model, no_seeds(), SimParameters::new(), &RunConfig::default()).unwrap_err();
    assert!(matches!(err, RunError::Build(_)));
}

#[test]
fn runs_model_loaded_from_json() {
    let model: MachineModel = serde_json::from_str(
        r#"{
            "name": "counter",
            "states": [
                {"id": "n0", "name": "Counting", "actions": "entry/\nled.on()"},
                {"id": "n1", "name": "Done"}
            ],
            "transitions": [
                {"id": "e0", "source": "i0", "target": "n0", "trigger": ""},
                {"id": "e1", "source": "n0", "target": "n0", "trigger": "step[counter.value > 0]/counter.sub()"},
                {"id": "e2", "source": "n0", "target": "n1", "trigger": "step[else]/"}
            ],
            "components": [
                {"id": "counter", "type": "Counter", "parameters": {"value": "2"}},
                {"id": "led", "type": "LED"}
            ],
            "initials": [{"id": "i0"}]
        }"#,
    )
    .unwrap();
    let params: SimParameters = serde_json::from_str("{}").unwrap();

    let result = run_model(&model, &["step", "step", "step"], params);

    assert_eq!(result.final_state, "n1");
    assert_eq!(
        result.components.attribute("counter", "value"),
        Some(Value::Int(0))
    );
    assert_eq!(result.history.len(), 4);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["final_state"], "n1");
    assert_eq!(json["components"]["instances"]["counter"]["type"], "Counter");
}

#[test]
fn counter_overflow_aborts_the_run() {
    let model = MachineModel::new()
        .initial("init", None)
        .state(
            "s1",
            "S1",
            "entry/\ncounter.set(9223372036854775807)\ncounter.add()",
            None,
        )
        .component("counter", "Counter")
        .transition("init", "s1", "");

    init_logging();
    let err = run(&model, no_seeds(), SimParameters::new(), &RunConfig::default()).unwrap_err();

    assert_eq!(
        err.interpret_error(),
        Some(&InterpretError::Component {
            component: "counter".to_string(),
            method: "add".to_string(),
            source: ComponentError::Overflow {
                method: "add".to_string()
            },
        })
    );
}
