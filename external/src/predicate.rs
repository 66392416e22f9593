use crate::error::ExternalError;
use crate::generator::{from_fn, GenFn};
use crate::pattern::FactPattern;
use pddlstream_core::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// A boolean test external. Unlike a stream's implicit "presence of a
/// result" semantics, a predicate result always carries an explicit
/// `Value::Bool` (spec §3) so the planner can distinguish "tested false"
/// from "not yet tested".
pub struct PredicateDef {
    pub name: Arc<str>,
    pub inputs: Vec<Arc<str>>,
    pub domain: Vec<FactPattern>,
    pub gen_fn: GenFn,
}

impl PredicateDef {
    pub fn new(
        name: impl Into<Arc<str>>,
        inputs: Vec<Arc<str>>,
        domain: Vec<FactPattern>,
        test_fn: impl Fn(&[Value]) -> bool + Send + Sync + 'static,
    ) -> Result<PredicateDef, ExternalError> {
        let name = name.into();
        let input_set: HashSet<&Arc<str>> = inputs.iter().collect();
        for pattern in &domain {
            for param in pattern.params() {
                if !input_set.contains(param) {
                    return Err(ExternalError::UnboundDomainParam {
                        external: name.clone(),
                        param: param.clone(),
                    });
                }
            }
        }
        let gen_fn = from_fn(move |inputs| Some(vec![Value::Bool(test_fn(inputs))]));
        Ok(PredicateDef {
            name,
            inputs,
            domain,
            gen_fn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenIterator;

    #[test]
    fn evaluating_a_predicate_always_yields_a_batch() {
        let is_east = PredicateDef::new("is-east", vec![Arc::from("?t")], vec![], |inputs| {
            matches!(&inputs[0], Value::Symbol(s) if s.ends_with("east"))
        })
        .unwrap();
        let mut gen = (is_east.gen_fn)(&[Value::symbol("far_east")]);
        assert_eq!(gen.next_batch(), Some(vec![vec![Value::Bool(true)]]));
        let mut gen = (is_east.gen_fn)(&[Value::symbol("far_west")]);
        assert_eq!(gen.next_batch(), Some(vec![vec![Value::Bool(false)]]));
    }
}
