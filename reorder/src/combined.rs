use crate::dp::Stat;
use crate::stream_plan::reorder_stream_plan;
use pddlstream_core::{Evaluations, ObjectTable};
use pddlstream_instantiate::EvalResult;
use pddlstream_search::Action;
use std::collections::VecDeque;

/// One step of a combined plan: either a stream result being committed
/// (certifying its facts) or a real domain action being applied.
pub enum CombinedStep {
    Stream(EvalResult),
    Action(usize),
}

/// Interleaves an optimized stream order with a fixed action order: streams
/// are pulled in (cheapest/most-reliable first, per [`reorder_stream_plan`])
/// immediately before the first action whose preconditions need them,
/// mirroring how the focused driver will actually execute the plan.
pub fn reorder_combined_plan(
    stream_plan: Vec<EvalResult>,
    action_plan: Vec<usize>,
    actions: &[Action],
    initial: &Evaluations,
    objects: &mut ObjectTable,
    stat_fn: impl Fn(&EvalResult) -> Stat,
) -> Vec<CombinedStep> {
    let ordered = reorder_stream_plan(stream_plan, stat_fn);
    let mut remaining: VecDeque<(EvalResult, Vec<pddlstream_core::Fact>)> = ordered
        .into_iter()
        .map(|result| {
            let facts = result.get_certified(objects);
            (result, facts)
        })
        .collect();

    let mut known = initial.snapshot();
    let mut combined = Vec::new();
    for action_index in action_plan {
        let action = &actions[action_index];
        while !known.entails_all(action.preconditions.iter()) {
            let Some((result, facts)) = remaining.pop_front() else {
                // No remaining stream can satisfy this precondition; the
                // caller's classical plan outran what grounding actually
                // certified. Emit the action anyway so the driver's
                // post-hoc check surfaces the mismatch explicitly.
                break;
            };
            for fact in &facts {
                known.add_atom(fact.clone());
            }
            combined.push(CombinedStep::Stream(result));
        }
        for effect in &action.effects {
            known.add_atom(effect.clone());
        }
        combined.push(CombinedStep::Action(action_index));
    }
    for (result, _) in remaining {
        combined.push(CombinedStep::Stream(result));
    }
    combined
}
