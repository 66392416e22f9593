use num_rational::Ratio;
use pddlstream_core::{Evaluations, Fact};
use std::sync::Arc;

/// A single ground action: either a real domain action, or the surrogate
/// action a stream result is compiled into so the classical planner can
/// "apply" certifying a fact, at the stream's cost (spec §4.4).
#[derive(Clone)]
pub struct Action {
    pub name: Arc<str>,
    pub preconditions: Vec<Fact>,
    pub effects: Vec<Fact>,
    pub cost: Ratio<i64>,
}

/// A grounded classical planning problem: an initial state, a goal
/// condition, and the full set of applicable ground actions (domain actions
/// plus stream-result surrogates).
pub struct PlanningTask {
    pub initial: Evaluations,
    pub goal: Vec<Fact>,
    pub actions: Vec<Action>,
}

impl PlanningTask {
    pub fn new(initial: Evaluations, goal: Vec<Fact>, actions: Vec<Action>) -> PlanningTask {
        PlanningTask { initial, goal, actions }
    }

    pub fn is_goal(&self, state: &Evaluations) -> bool {
        state.entails_all(self.goal.iter())
    }
}
