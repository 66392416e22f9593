use pddlstream_core::{Fact, Object, Value};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// A single argument slot in a domain/certified schema: either a reference to
/// one of the external's parameters, or a literal constant baked into the
/// schema itself.
#[derive(Clone, Debug)]
pub enum Term {
    Param(Arc<str>),
    Constant(Value),
}

impl Term {
    pub fn param(name: impl Into<Arc<str>>) -> Term {
        Term::Param(name.into())
    }
}

/// An unground fact schema, as it appears in a stream's `domain` or
/// `certified` list.
#[derive(Clone, Debug)]
pub struct FactPattern {
    pub predicate: Arc<str>,
    pub args: SmallVec<[Term; 4]>,
}

impl FactPattern {
    pub fn new(predicate: impl Into<Arc<str>>, args: impl IntoIterator<Item = Term>) -> FactPattern {
        FactPattern {
            predicate: predicate.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn params(&self) -> impl Iterator<Item = &Arc<str>> {
        self.args.iter().filter_map(|t| match t {
            Term::Param(p) => Some(p),
            Term::Constant(_) => None,
        })
    }

    /// Grounds this pattern under `mapping`, producing the concrete [`Fact`]
    /// it denotes. `objects` is used to intern any bare constants.
    ///
    /// Panics if a parameter is unbound: every certified/domain parameter is
    /// required (by `StreamDef::new`'s validation) to be covered by the
    /// external's inputs and outputs, so an unbound parameter here would
    /// indicate a bug in that validation, not malformed user input.
    pub fn substitute(
        &self,
        mapping: &HashMap<Arc<str>, Object>,
        objects: &mut pddlstream_core::ObjectTable,
    ) -> Fact {
        let args = self.args.iter().map(|t| match t {
            Term::Param(p) => *mapping
                .get(p)
                .unwrap_or_else(|| panic!("unbound parameter `{p}` in fact pattern `{}`", self.predicate)),
            Term::Constant(v) => objects.from_value(v.clone()),
        });
        Fact::new(self.predicate.clone(), args)
    }
}
