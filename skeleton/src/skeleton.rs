use pddlstream_core::Object;
use pddlstream_instantiate::EvalResult;
use std::collections::HashMap;

/// A hypothesized stream plan bound to the classical action plan the
/// search found assuming those streams succeed. The skeleton queue reifies
/// `stream_plan` one result at a time, left to right, substituting concrete
/// objects for the optimistic ones the plan's actions were grounded
/// against.
pub struct Skeleton {
    pub stream_plan: Vec<EvalResult>,
    pub action_plan: Vec<usize>,
    index: usize,
    pub(crate) attempts: u32,
    bindings: HashMap<Object, Object>,
    reverse_bindings: HashMap<Object, Object>,
}

impl Skeleton {
    pub fn new(stream_plan: Vec<EvalResult>, action_plan: Vec<usize>) -> Skeleton {
        Skeleton {
            stream_plan,
            action_plan,
            index: 0,
            attempts: 0,
            bindings: HashMap::new(),
            reverse_bindings: HashMap::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.stream_plan.len()
    }

    pub fn remaining(&self) -> usize {
        self.stream_plan.len() - self.index
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub(crate) fn frontier(&self) -> &EvalResult {
        &self.stream_plan[self.index]
    }

    pub(crate) fn advance(&mut self) {
        self.index += 1;
    }

    /// Records `optimistic -> concrete`, returning the previous optimistic
    /// claimant of `concrete` if one disagrees — the signature of a double
    /// binding: two distinct placeholders the plan treated as independent
    /// turned out, once reified, to denote the same real object.
    pub(crate) fn bind(&mut self, optimistic: Object, concrete: Object) -> Option<Object> {
        self.bindings.insert(optimistic, concrete);
        match self.reverse_bindings.get(&concrete).copied() {
            Some(existing) if existing != optimistic => Some(existing),
            Some(_) => None,
            None => {
                self.reverse_bindings.insert(concrete, optimistic);
                None
            }
        }
    }

    pub fn resolve(&self, object: Object) -> Object {
        self.bindings.get(&object).copied().unwrap_or(object)
    }
}
