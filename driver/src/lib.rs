//! Ties the focused planning loop together: grounding, classical search,
//! reordering, and skeleton reification (the other workspace crates), plus
//! the ambient concerns a runnable solve needs — configuration, statistics
//! persistence, and the running best-solution store.

mod compile;
mod config;
mod error;
mod solution;
mod solve;
mod statistics;

pub use compile::compile_stream_action;
pub use config::Config;
pub use error::DriverError;
pub use solution::{Solution, SolutionStore};
pub use solve::{solve_focused, SolveInput};
pub use statistics::{ExternalStat, Statistics};

#[cfg(test)]
mod tests {
    use super::*;
    use num_rational::Ratio;
    use pddlstream_core::{Evaluations, Fact, Object, ObjectTable, Value};
    use pddlstream_external::{from_list_fn, External, FactPattern, StreamDef, Term};
    use pddlstream_search::Action;
    use std::sync::Arc;
    use std::time::Duration;

    fn obj(objects: &mut ObjectTable, name: &str) -> Object {
        objects.from_value(Value::symbol(name))
    }

    /// A single door that must be "measured" (a stream whose output is
    /// never referenced by any precondition) before it can be opened,
    /// exercising the full grounding → search → reorder → skeleton
    /// pipeline end to end without the goal depending on a hypothesized
    /// object's identity.
    #[test]
    fn a_solve_needing_one_stream_result_finds_a_plan() {
        let mut objects = ObjectTable::new();
        let door = obj(&mut objects, "door");

        let mut initial = Evaluations::new();
        initial.add_atom(Fact::new("door", [door]));

        let measure = StreamDef::new(
            "measure",
            vec![Arc::from("?d")],
            vec![FactPattern::new("door", [Term::param("?d")])],
            vec![Arc::from("?w")],
            vec![FactPattern::new("measured", [Term::param("?d")])],
            from_list_fn(|_| vec![vec![Value::symbol("width")]]),
            None,
            false,
        )
        .unwrap();

        let domain_actions = vec![Action {
            name: Arc::from("open-door"),
            preconditions: vec![Fact::new("door", [door]), Fact::new("measured", [door])],
            effects: vec![Fact::new("open", [door])],
            cost: Ratio::from_integer(1),
        }];
        let goal = vec![Fact::new("open", [door])];

        let input = SolveInput {
            externals: vec![External::Stream(Arc::new(measure))],
            initial,
            goal,
            domain_actions,
        };
        let config = Config {
            max_time: Duration::from_secs(2),
            ..Config::default()
        };
        let mut statistics = Statistics::new();
        let store = solve_focused(input, &config, &mut statistics);
        assert!(store.best().is_some(), "expected a plan once the scan stream reifies the goal tile");
    }
}
