//! Optimistic grounding: hypothesizes stream outputs so the search sees a
//! classical planning problem over a state that includes facts no external
//! has actually certified yet.

use pddlstream_core::{Evaluations, ObjectTable};
use pddlstream_instantiate::{EvalResult, InstanceTable, Instantiator};
use tracing::trace;

/// An ordered sequence of hypothesized (or, once refined, concrete) results.
///
/// Order carries the recursive-provenance invariant: every result's input
/// objects are either in the initial evaluation set or were certified by an
/// earlier result in the same plan. Both functions below preserve this by
/// construction — `optimistic_process_streams` only ever enqueues a
/// grounding after its domain facts (certified by earlier results) are
/// already in `evaluations`, and `optimistic_process_stream_plan` walks the
/// plan strictly in that same order.
pub type StreamPlan = Vec<EvalResult>;

/// Runs lazy (non-eager) externals to a fixed point, hypothesizing one
/// optimistic result per grounding instead of calling their real
/// generators. Eager externals are assumed already exhausted by
/// [`pddlstream_instantiate::layered_process`]; this function skips them.
///
/// `max_depth` bounds the number of BFS layers processed, preventing an
/// unbounded recursive chain of hypothesized streams from stalling the
/// search (spec §4.3).
pub fn optimistic_process_streams(
    instantiator: &mut Instantiator,
    instances: &mut InstanceTable,
    evaluations: &mut Evaluations,
    objects: &mut ObjectTable,
    initial_opt_index: u32,
    max_depth: u32,
) -> StreamPlan {
    instantiator.promote_deferred();
    let mut plan = Vec::new();
    let mut depth = 0;
    loop {
        if instantiator.current_is_empty() {
            if instantiator.next_is_empty() || depth >= max_depth {
                break;
            }
            instantiator.swap_layers();
            depth += 1;
            trace!(depth, "optimistic grounding layer");
        }
        let Some((index, input_objects)) = instantiator.pop_current() else {
            continue;
        };
        let external = instantiator.externals()[index].clone();
        if external.is_eager() {
            continue;
        }
        let instance_id = instances.get_instance(&external, input_objects, initial_opt_index);
        let instance = instances.get_mut(instance_id);
        let result = instance.next_optimistic(objects);
        for fact in result.get_certified(objects) {
            if evaluations.add_atom(fact.clone()) {
                instantiator.add_atom(&fact, evaluations, objects);
            }
        }
        plan.push(result);
    }
    plan
}

/// Re-derives a previously hypothesized stream plan against real
/// generators, in plan order. Stops at the first instance whose generator
/// is exhausted without producing a result, returning the concrete prefix
/// obtained so far — the caller (the focused driver) re-grounds from there
/// rather than assuming the whole plan refined cleanly.
pub fn optimistic_process_stream_plan(stream_plan: &StreamPlan, instances: &mut InstanceTable, evaluations: &mut Evaluations, objects: &mut ObjectTable) -> StreamPlan {
    let mut refined = Vec::with_capacity(stream_plan.len());
    for optimistic in stream_plan {
        let instance = instances.get_mut(optimistic.instance);
        let Some(result) = instance.next_results(objects).into_iter().next() else {
            break;
        };
        for fact in result.get_certified(objects) {
            evaluations.add_atom(fact);
        }
        refined.push(result);
    }
    refined
}

#[cfg(test)]
mod tests {
    use super::*;
    use pddlstream_core::{Fact, Value};
    use pddlstream_external::{from_list_fn, External, FactPattern, StreamDef, Term};
    use std::sync::Arc;

    #[test]
    fn optimistic_grounding_hypothesizes_lazy_stream_outputs() {
        let mut objects = ObjectTable::new();
        let domain = vec![FactPattern::new("at", [Term::param("?t")])];
        let certified = vec![FactPattern::new("connected", [Term::param("?t"), Term::param("?t2")])];
        let stream = StreamDef::new(
            "move",
            vec![Arc::from("?t")],
            domain,
            vec![Arc::from("?t2")],
            certified,
            from_list_fn(|_| vec![vec![Value::symbol("t1")]]),
            None,
            false,
        )
        .unwrap();
        let external = External::Stream(Arc::new(stream));
        let mut instantiator = Instantiator::new(vec![external]);
        let mut instances = InstanceTable::new();
        let mut evaluations = Evaluations::new();

        let t0 = objects.from_value(Value::symbol("t0"));
        let fact = Fact::new("at", [t0]);
        evaluations.add_atom(fact.clone());
        instantiator.add_atom(&fact, &evaluations, &mut objects);
        instantiator.swap_layers();

        let plan = optimistic_process_streams(&mut instantiator, &mut instances, &mut evaluations, &mut objects, 1, 10);
        assert_eq!(plan.len(), 1);
        assert!(plan[0].is_optimistic());
        assert!(evaluations.len() > 1);
    }
}
