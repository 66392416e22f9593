use pddlstream_core::Fact;

/// Hook for expanding derived predicates (PDDL axioms) over a fact set
/// before it is handed to the planner. The focused loop itself has no
/// notion of axioms; a planner binding that supports them implements this
/// trait and the driver threads it through instead of assuming the no-op.
pub trait AxiomExpander {
    fn expand(&self, facts: Vec<Fact>) -> Vec<Fact>;
}

/// Default binding: this workspace's reference planner has no axiom
/// layer, so derived-predicate expansion is the identity.
pub struct NoAxioms;

impl AxiomExpander for NoAxioms {
    fn expand(&self, facts: Vec<Fact>) -> Vec<Fact> {
        facts
    }
}
