use num_rational::Ratio;
use pddlstream_core::{Evaluations, Fact, Object, ObjectTable, Value};
use pddlstream_driver::{solve_focused, Config, SolveInput, Statistics};
use pddlstream_external::{from_list_fn, External, FactPattern, StreamDef, Term};
use pddlstream_instantiate::{InstanceTable, Outcome};
use pddlstream_search::Action;
use pddlstream_skeleton::{process_stream_plan, Skeleton, StepOutcome};
use std::sync::Arc;
use std::time::Duration;

fn tile(objects: &mut ObjectTable, index: u32) -> Object {
    objects.from_value(Value::symbol(format!("tile{index}")))
}

/// A corridor of `length` unit moves: `tile0`, ..., `tile{length}`, a
/// `move-east` action per adjacent pair, goal `at(tile{length})`. No
/// streams; every action is eager and known from the start.
fn corridor(objects: &mut ObjectTable, length: u32) -> (Evaluations, Vec<Fact>, Vec<Action>) {
    let mut initial = Evaluations::new();
    initial.add_atom(Fact::new("at", [tile(objects, 0)]));
    let goal = vec![Fact::new("at", [tile(objects, length)])];
    let actions = (0..length)
        .map(|i| Action {
            name: Arc::from(format!("move-east-{i}")),
            preconditions: vec![Fact::new("at", [tile(objects, i)])],
            effects: vec![Fact::new("at", [tile(objects, i + 1)])],
            cost: Ratio::from_integer(1),
        })
        .collect();
    (initial, goal, actions)
}

/// A six-move corridor with `unit_costs` solves in exactly 6 moves.
#[test]
fn corridor_length_five_eager_only_plan() {
    let mut objects = ObjectTable::new();
    let (initial, goal, domain_actions) = corridor(&mut objects, 6);
    let input = SolveInput {
        externals: vec![],
        initial,
        goal,
        domain_actions,
    };
    let config = Config {
        unit_costs: true,
        max_time: Duration::from_secs(5),
        ..Config::default()
    };
    let mut statistics = Statistics::new();
    let store = solve_focused(input, &config, &mut statistics);
    let best = store.best().expect("corridor is always solvable");
    assert_eq!(best.action_names.len(), 6);
    assert_eq!(best.cost, Ratio::from_integer(6));
}

/// A much longer corridor still completes purely through eager grounding —
/// no external ever goes through the skeleton queue, so the search alone
/// carries the whole plan.
#[test]
fn corridor_length_1000_stays_eager_only() {
    let mut objects = ObjectTable::new();
    let (initial, goal, domain_actions) = corridor(&mut objects, 1001);
    let input = SolveInput {
        externals: vec![],
        initial,
        goal,
        domain_actions,
    };
    let config = Config {
        unit_costs: true,
        max_time: Duration::from_secs(30),
        ..Config::default()
    };
    let mut statistics = Statistics::new();
    let store = solve_focused(input, &config, &mut statistics);
    let best = store.best().expect("long corridor is still solvable");
    assert_eq!(best.action_names.len(), 1001);
}

/// One lazy stream must reify before the goal (a fact only it certifies) is
/// reachable: the first search round commits to an optimistic plan, and a
/// single skeleton pop closes it.
#[test]
fn single_stream_discovers_the_goal_tile() {
    let mut objects = ObjectTable::new();
    let start = tile(&mut objects, 0);

    let mut initial = Evaluations::new();
    initial.add_atom(Fact::new("at", [start]));
    initial.add_atom(Fact::new("tile", [start]));

    let find_far_east = StreamDef::new(
        "find-far-east",
        vec![Arc::from("?t")],
        vec![FactPattern::new("tile", [Term::param("?t")])],
        vec![Arc::from("?f")],
        vec![FactPattern::new("far-east", [Term::param("?t")])],
        from_list_fn(|_| vec![vec![Value::symbol("far_tile")]]),
        None,
        false,
    )
    .unwrap();

    let domain_actions = vec![Action {
        name: Arc::from("walk-to-far-east"),
        preconditions: vec![Fact::new("tile", [start]), Fact::new("far-east", [start])],
        effects: vec![Fact::new("at", [start]), Fact::new("goal-reached", [start])],
        cost: Ratio::from_integer(1),
    }];
    let goal = vec![Fact::new("goal-reached", [start])];

    let input = SolveInput {
        externals: vec![External::Stream(Arc::new(find_far_east))],
        initial,
        goal,
        domain_actions,
    };
    let config = Config {
        max_time: Duration::from_secs(5),
        ..Config::default()
    };
    let mut statistics = Statistics::new();
    let store = solve_focused(input, &config, &mut statistics);
    assert!(store.best().is_some(), "the goal tile stream should reify and close the plan");
}

/// An optimistic predicate assumes true; its real test always returns
/// false. The skeleton that depended on it is dropped every attempt, so the
/// driver ends with no committed plan at all.
#[test]
fn disagreeing_predicate_drops_the_skeleton() {
    let mut objects = ObjectTable::new();
    let door = tile(&mut objects, 0);

    let is_open = StreamDef::new(
        "is-open",
        vec![Arc::from("?d")],
        vec![FactPattern::new("door", [Term::param("?d")])],
        vec![Arc::from("?x")],
        vec![FactPattern::new("door-open", [Term::param("?d")])],
        from_list_fn(|_| Vec::<Vec<Value>>::new()),
        None,
        false,
    )
    .unwrap();

    let domain_actions = vec![Action {
        name: Arc::from("walk-through"),
        preconditions: vec![Fact::new("door-open", [door])],
        effects: vec![Fact::new("through", [door])],
        cost: Ratio::from_integer(1),
    }];
    let mut initial = Evaluations::new();
    initial.add_atom(Fact::new("door", [door]));
    let goal = vec![Fact::new("through", [door])];

    let input = SolveInput {
        externals: vec![External::Stream(Arc::new(is_open))],
        initial,
        goal,
        domain_actions,
    };
    let config = Config {
        max_time: Duration::from_millis(500),
        max_skeleton_attempts: 3,
        ..Config::default()
    };
    let mut statistics = Statistics::new();
    let store = solve_focused(input, &config, &mut statistics);
    assert!(store.best().is_none(), "a stream that never produces a real result should never close the plan");
}

/// Two independently-hypothesized outputs turn out, once reified, to name
/// the same concrete object — the skeleton must flag this as a double
/// binding rather than silently accepting the second claim. Exercised
/// directly against [`process_stream_plan`] since engineering two
/// classical-plan steps to race for the same concrete value needs no
/// help from the search or reorder stages.
#[test]
fn double_binding_from_two_streams_sharing_a_value() {
    let mut objects = ObjectTable::new();
    let mut instances = InstanceTable::new();
    let mut evaluations = Evaluations::new();

    let paint_a = StreamDef::new("paint-a", vec![], vec![], vec![Arc::from("?c")], vec![], from_list_fn(|_| vec![vec![Value::symbol("red")]]), None, false).unwrap();
    let paint_b = StreamDef::new("paint-b", vec![], vec![], vec![Arc::from("?c")], vec![], from_list_fn(|_| vec![vec![Value::symbol("red")]]), None, false).unwrap();

    let external_a = External::Stream(Arc::new(paint_a));
    let external_b = External::Stream(Arc::new(paint_b));
    let instance_a = instances.get_instance(&external_a, Default::default(), 1);
    let instance_b = instances.get_instance(&external_b, Default::default(), 1);
    let optimistic_a = instances.get_mut(instance_a).next_optimistic(&mut objects);
    let optimistic_b = instances.get_mut(instance_b).next_optimistic(&mut objects);
    match (&optimistic_a.outcome, &optimistic_b.outcome) {
        (Outcome::Stream(oa), Outcome::Stream(ob)) => assert_ne!(oa[0], ob[0], "distinct externals must hypothesize distinct placeholders"),
        _ => panic!("expected stream outcomes"),
    }

    let mut skeleton = Skeleton::new(vec![optimistic_a, optimistic_b], vec![]);
    let (first, _) = process_stream_plan(&mut skeleton, &mut instances, &mut evaluations, &mut objects);
    assert!(matches!(first, StepOutcome::Advanced));
    let (second, _) = process_stream_plan(&mut skeleton, &mut instances, &mut evaluations, &mut objects);
    match second {
        StepOutcome::DoubleBinding { instance, .. } => {
            assert_eq!(instances.get(instance).opt_index(), 0, "the offending instance's opt_index must decay on detection");
        }
        _ => panic!("both streams reify to the same concrete colour"),
    }
}

/// The same six-move corridor, but `max_cost` is tighter than the only
/// plan's cost — the driver must report no plan rather than a
/// budget-violating one.
#[test]
fn cost_budget_rejects_the_only_plan() {
    let mut objects = ObjectTable::new();
    let (initial, goal, domain_actions) = corridor(&mut objects, 6);
    let input = SolveInput {
        externals: vec![],
        initial,
        goal,
        domain_actions,
    };
    let config = Config {
        unit_costs: true,
        max_cost: 3.0,
        max_time: Duration::from_secs(5),
        ..Config::default()
    };
    let mut statistics = Statistics::new();
    let store = solve_focused(input, &config, &mut statistics);
    assert!(store.best().is_none(), "cost 6 exceeds the max_cost=3 budget");
}
