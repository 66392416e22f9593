use crate::instance::EvalResult;
use crate::instantiator::Instantiator;
use crate::table::InstanceTable;
use pddlstream_core::{Evaluations, ObjectTable};
use smallvec::SmallVec;
use tracing::debug;

/// Drains the instantiator breadth-first: every eager external grounded in
/// the current layer is run to exhaustion, its certified facts folded back
/// into `evaluations` (which may enqueue further groundings into the next
/// layer), before the next layer starts. Non-eager externals are set aside
/// via [`Instantiator::defer`] rather than driven to exhaustion here — their
/// instance is left uncreated so the optimistic grounder's own
/// `get_instance` call is the one that registers it, under the nonzero
/// `opt_index` it actually hypothesizes with; registering it here under
/// `opt_index=0` first would make that later call a no-op (instances are
/// canonicalized on first registration only) and silently force every lazy
/// stream's optimistic objects down the unique-placeholder path instead of
/// the shared one.
///
/// Returns every concrete result produced, in discovery order.
pub fn layered_process(instantiator: &mut Instantiator, instances: &mut InstanceTable, evaluations: &mut Evaluations, objects: &mut ObjectTable) -> Vec<EvalResult> {
    let mut produced = Vec::new();
    let mut layer = 0;
    loop {
        if instantiator.current_is_empty() {
            if instantiator.next_is_empty() {
                break;
            }
            instantiator.swap_layers();
            layer += 1;
            debug!(layer, "advancing eager instantiation layer");
        }
        let Some((external_index, input_objects)) = instantiator.pop_current() else {
            continue;
        };
        let external = instantiator.externals()[external_index].clone();
        let input_objects: SmallVec<[_; 4]> = input_objects;
        if !external.is_eager() {
            instantiator.defer((external_index, input_objects));
            continue;
        }
        let instance_id = instances.get_instance(&external, input_objects, 0);
        let instance = instances.get_mut(instance_id);
        loop {
            let results = instance.next_results(objects);
            if results.is_empty() {
                break;
            }
            for result in results {
                for fact in result.get_certified(objects) {
                    if evaluations.add_atom(fact.clone()) {
                        instantiator.add_atom(&fact, evaluations, objects);
                    }
                }
                produced.push(result);
            }
            if instance.is_enumerated() {
                break;
            }
        }
    }
    produced
}
