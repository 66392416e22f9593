use crate::error::ExternalError;
use crate::generator::{from_fn, GenFn};
use crate::pattern::FactPattern;
use num_rational::Ratio;
use pddlstream_core::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Denominator used to quantize a `f64` cost into the exact `Ratio<i64>`
/// that `Value::Real` requires. Six decimal digits is ample precision for
/// the unit-cost and distance-style heuristics spec §3's functions model.
const COST_PRECISION: i64 = 1_000_000;

/// A deterministic numeric function used in cost terms. `outputs = ∅` by
/// construction: a function contributes to plan cost, never to the fact set.
pub struct FunctionDef {
    pub name: Arc<str>,
    pub inputs: Vec<Arc<str>>,
    pub domain: Vec<FactPattern>,
    pub gen_fn: GenFn,
}

impl FunctionDef {
    pub fn new(
        name: impl Into<Arc<str>>,
        inputs: Vec<Arc<str>>,
        domain: Vec<FactPattern>,
        value_fn: impl Fn(&[Value]) -> f64 + Send + Sync + 'static,
    ) -> Result<FunctionDef, ExternalError> {
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
        let gen_fn = from_fn(move |inputs| {
            let numerator = (value_fn(inputs) * COST_PRECISION as f64).round() as i64;
            Some(vec![Value::Real(Ratio::new(numerator, COST_PRECISION))])
        });
        Ok(FunctionDef {
            name,
            inputs,
            domain,
            gen_fn,
        })
    }
}
