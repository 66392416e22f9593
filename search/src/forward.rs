use crate::planner::Planner;
use crate::task::{Action, PlanningTask};
use num_rational::Ratio;
use pddlstream_core::{Evaluations, Fact};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::rc::Rc;
use tracing::debug;

/// A node in the forward search tree. Ordering is by accumulated cost only
/// (break ties by plan length), making the `BinaryHeap` a min-heap over
/// cost: `Ratio<i64>` is totally ordered, so unlike a float-heuristic search
/// there is no `partial_cmp` fallback to reason about.
struct Node {
    state: Evaluations,
    parent: Option<Rc<Node>>,
    action: Option<usize>,
    cost: Ratio<i64>,
    plan_length: u32,
}

impl Node {
    fn extract_plan(&self) -> Vec<usize> {
        let mut plan = Vec::with_capacity(self.plan_length as usize);
        let mut current = self;
        while let Some(action) = current.action {
            plan.push(action);
            match &current.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        plan.reverse();
        plan
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.plan_length == other.plan_length
    }
}
impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reversed so `BinaryHeap` (a max-heap) pops the cheapest node first.
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost).then_with(|| other.plan_length.cmp(&self.plan_length))
    }
}

/// Canonical form of a state used to deduplicate the closed list. Two
/// states with the same fact set, regardless of insertion order, collapse
/// to the same key.
#[derive(Clone, Eq, PartialEq, Hash)]
struct StateKey(Vec<Fact>);

fn state_key(state: &Evaluations) -> StateKey {
    let mut facts: Vec<Fact> = state.iter().cloned().collect();
    facts.sort_by(|a, b| (a.predicate.as_ref(), &a.args[..]).cmp(&(b.predicate.as_ref(), &b.args[..])));
    StateKey(facts)
}

/// Uniform-cost forward search: the reference `Planner` this workspace ships
/// with. It is deliberately not a heuristic search (no h^add, no lookahead
/// plans) — grounding the stream-augmented task is the interesting part of
/// this system, not the classical search backing it.
pub struct ForwardUniformCostPlanner {
    pub max_expansions: usize,
}

impl Default for ForwardUniformCostPlanner {
    fn default() -> Self {
        ForwardUniformCostPlanner { max_expansions: 100_000 }
    }
}

impl Planner for ForwardUniformCostPlanner {
    fn solve_from_task(&self, task: &PlanningTask) -> Option<Vec<usize>> {
        let mut heap: BinaryHeap<Rc<Node>> = BinaryHeap::new();
        let mut closed: HashSet<StateKey> = HashSet::new();

        let root = Rc::new(Node {
            state: task.initial.snapshot(),
            parent: None,
            action: None,
            cost: Ratio::from_integer(0),
            plan_length: 0,
        });
        if task.is_goal(&root.state) {
            return Some(root.extract_plan());
        }
        heap.push(root);

        let mut expansions = 0;
        while let Some(node) = heap.pop() {
            let key = state_key(&node.state);
            if !closed.insert(key) {
                continue;
            }
            expansions += 1;
            if expansions > self.max_expansions {
                debug!(expansions, "forward search exhausted its expansion budget");
                return None;
            }
            for (index, action) in task.actions.iter().enumerate() {
                if !node.state.entails_all(action.preconditions.iter()) {
                    continue;
                }
                let mut next_state = node.state.snapshot();
                for effect in &action.effects {
                    next_state.add_atom(effect.clone());
                }
                let child = Rc::new(Node {
                    cost: node.cost + action.cost,
                    plan_length: node.plan_length + 1,
                    action: Some(index),
                    parent: Some(node.clone()),
                    state: next_state,
                });
                if task.is_goal(&child.state) {
                    return Some(child.extract_plan());
                }
                heap.push(child);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pddlstream_core::{Object, ObjectTable, Value};
    use std::sync::Arc;

    fn obj(objects: &mut ObjectTable, name: &str) -> Object {
        objects.from_value(Value::symbol(name))
    }

    #[test]
    fn finds_a_two_step_corridor_plan() {
        let mut objects = ObjectTable::new();
        let a = obj(&mut objects, "a");
        let b = obj(&mut objects, "b");
        let c = obj(&mut objects, "c");

        let mut initial = Evaluations::new();
        initial.add_atom(Fact::new("at", [a]));

        let goal = vec![Fact::new("at", [c])];
        let actions = vec![
            Action {
                name: Arc::from("move-a-b"),
                preconditions: vec![Fact::new("at", [a])],
                effects: vec![Fact::new("at", [b])],
                cost: Ratio::from_integer(1),
            },
            Action {
                name: Arc::from("move-b-c"),
                preconditions: vec![Fact::new("at", [b])],
                effects: vec![Fact::new("at", [c])],
                cost: Ratio::from_integer(1),
            },
        ];
        let task = PlanningTask::new(initial, goal, actions);
        let planner = ForwardUniformCostPlanner::default();
        let plan = planner.solve_from_task(&task).expect("corridor is solvable");
        assert_eq!(plan, vec![0, 1]);
    }

    #[test]
    fn unsolvable_task_returns_none() {
        let mut objects = ObjectTable::new();
        let a = obj(&mut objects, "a");
        let mut initial = Evaluations::new();
        initial.add_atom(Fact::new("at", [a]));
        let goal = vec![Fact::new("at", [obj(&mut objects, "unreachable")])];
        let task = PlanningTask::new(initial, goal, vec![]);
        let planner = ForwardUniformCostPlanner::default();
        assert!(planner.solve_from_task(&task).is_none());
    }
}
