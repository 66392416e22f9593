use num_rational::Ratio;
use pddlstream_core::{Object, ObjectTable};
use pddlstream_external::External;
use pddlstream_instantiate::{EvalResult, Outcome};
use pddlstream_search::Action;
use std::collections::HashMap;
use std::sync::Arc;

/// Compiles a hypothesized (or concrete) stream result into the surrogate
/// action the classical planner applies to "acquire" its certified facts:
/// preconditions are the instance's ground domain facts, effects are what
/// it certifies, cost reflects the external's sampling effort (spec §4.4).
pub fn compile_stream_action(result: &EvalResult, effort_weight: f64, objects: &mut ObjectTable) -> Action {
    let mapping = binding_for(result);
    let preconditions = result.external.domain().iter().map(|pattern| pattern.substitute(&mapping, objects)).collect();
    let effects = result.get_certified(objects);
    let cost = if result.is_optimistic() {
        Ratio::from_integer((effort_weight.max(0.0) * 1000.0).round() as i64) / Ratio::from_integer(1000)
    } else {
        Ratio::from_integer(0)
    };
    Action {
        name: result.external.name(),
        preconditions,
        effects,
        cost,
    }
}

fn binding_for(result: &EvalResult) -> HashMap<Arc<str>, Object> {
    let mut mapping = HashMap::new();
    mapping.extend(result.external.inputs().iter().cloned().zip(result.input_objects.iter().copied()));
    if let (External::Stream(def), Outcome::Stream(outputs)) = (&result.external, &result.outcome) {
        mapping.extend(def.outputs.iter().cloned().zip(outputs.iter().copied()));
    }
    mapping
}
