use crate::object::Object;
use smallvec::SmallVec;
use std::sync::Arc;

/// A ground fact: a predicate applied to a tuple of ground objects.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Fact {
    pub predicate: Arc<str>,
    pub args: SmallVec<[Object; 4]>,
}

impl Fact {
    pub fn new(predicate: impl Into<Arc<str>>, args: impl IntoIterator<Item = Object>) -> Fact {
        Fact {
            predicate: predicate.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// The monotonically-growing set of facts known to be true within one solve.
///
/// The only mutator is [`Evaluations::add_atom`], which is idempotent. There
/// is deliberately no removal method: Testable Property 1 (monotonic
/// evaluations) is an invariant of the API, not something callers must
/// remember to uphold.
#[derive(Clone, Default)]
pub struct Evaluations {
    facts: im::HashSet<Fact>,
}

impl Evaluations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_facts(facts: impl IntoIterator<Item = Fact>) -> Self {
        Evaluations {
            facts: facts.into_iter().collect(),
        }
    }

    /// Adds `fact` if not already present. Returns `true` iff it was new.
    pub fn add_atom(&mut self, fact: Fact) -> bool {
        if self.facts.contains(&fact) {
            false
        } else {
            self.facts.insert(fact);
            true
        }
    }

    pub fn contains(&self, fact: &Fact) -> bool {
        self.facts.contains(fact)
    }

    pub fn entails_all<'a>(&self, facts: impl IntoIterator<Item = &'a Fact>) -> bool {
        facts.into_iter().all(|f| self.contains(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// A structurally-shared snapshot, cheap to branch off of for optimistic
    /// exploration (mirrors `set(evaluations)` in the Python original).
    pub fn snapshot(&self) -> Evaluations {
        self.clone()
    }
}

impl FromIterator<Fact> for Evaluations {
    fn from_iter<T: IntoIterator<Item = Fact>>(iter: T) -> Self {
        Evaluations::from_facts(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectTable;
    use crate::value::Value;

    #[test]
    fn add_atom_is_idempotent() {
        let mut objects = ObjectTable::new();
        let t0 = objects.from_value(Value::symbol("t0"));
        let fact = Fact::new("empty", [t0]);
        let mut evaluations = Evaluations::new();
        assert!(evaluations.add_atom(fact.clone()));
        assert!(!evaluations.add_atom(fact.clone()));
        assert_eq!(evaluations.len(), 1);
    }

    #[test]
    fn snapshot_does_not_alias_mutations() {
        let mut objects = ObjectTable::new();
        let t0 = objects.from_value(Value::symbol("t0"));
        let mut evaluations = Evaluations::new();
        evaluations.add_atom(Fact::new("empty", [t0]));
        let snapshot = evaluations.snapshot();
        evaluations.add_atom(Fact::new("person", [t0]));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(evaluations.len(), 2);
    }
}
