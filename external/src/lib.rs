//! Declarative external schemas (streams, functions, predicates) and the
//! registry that owns them for the duration of a solve.

mod error;
mod function;
mod generator;
mod pattern;
mod predicate;
pub mod registry;
mod stream;

pub use error::ExternalError;
pub use function::FunctionDef;
pub use generator::{from_fn, from_gen_fn, from_list_fn, from_test, BoundedGenerator, GenFn, GenIterator};
pub use pattern::{FactPattern, Term};
pub use predicate::PredicateDef;
pub use registry::{DebugCounters, ExternalRegistry};
pub use stream::{debug_stream, StreamDef};

use std::sync::Arc;

/// Tagged union over the three kinds of external (spec §3): a stream
/// certifies new facts, a function contributes a cost term, a predicate
/// tests an existing fact. All three share the instance/evaluation
/// machinery in `pddlstream-instantiate`.
#[derive(Clone)]
pub enum External {
    Stream(Arc<StreamDef>),
    Function(Arc<FunctionDef>),
    Predicate(Arc<PredicateDef>),
}

impl External {
    pub fn name(&self) -> Arc<str> {
        match self {
            External::Stream(s) => s.name.clone(),
            External::Function(f) => f.name.clone(),
            External::Predicate(p) => p.name.clone(),
        }
    }

    pub fn inputs(&self) -> &[Arc<str>] {
        match self {
            External::Stream(s) => &s.inputs,
            External::Function(f) => &f.inputs,
            External::Predicate(p) => &p.inputs,
        }
    }

    pub fn domain(&self) -> &[FactPattern] {
        match self {
            External::Stream(s) => &s.domain,
            External::Function(f) => &f.domain,
            External::Predicate(p) => &p.domain,
        }
    }

    /// Facts an instance of this external certifies once it produces a
    /// result. Functions and predicates certify nothing directly: their
    /// value feeds cost/truth evaluation instead of the fact set.
    pub fn certified(&self) -> &[FactPattern] {
        match self {
            External::Stream(s) => &s.certified,
            External::Function(_) | External::Predicate(_) => &[],
        }
    }

    pub fn gen_fn(&self) -> &GenFn {
        match self {
            External::Stream(s) => &s.gen_fn,
            External::Function(f) => &f.gen_fn,
            External::Predicate(p) => &p.gen_fn,
        }
    }

    /// Optimistic generator, used by the grounder to hypothesize output
    /// objects before the real generator has run. Functions and predicates
    /// have no outputs to hypothesize, so they fall back to their real
    /// generator (deterministic and side-effect-free by construction).
    pub fn opt_gen_fn(&self) -> &GenFn {
        match self {
            External::Stream(s) => &s.opt_gen_fn,
            External::Function(f) => &f.gen_fn,
            External::Predicate(p) => &p.gen_fn,
        }
    }

    pub fn outputs(&self) -> &[Arc<str>] {
        match self {
            External::Stream(s) => &s.outputs,
            External::Function(_) | External::Predicate(_) => &[],
        }
    }

    pub fn is_eager(&self) -> bool {
        match self {
            External::Stream(s) => s.eager,
            External::Function(_) | External::Predicate(_) => true,
        }
    }
}
