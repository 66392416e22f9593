use crate::skeleton::Skeleton;
use pddlstream_core::{Evaluations, Object, ObjectTable};
use pddlstream_instantiate::{InstanceId, InstanceTable, Outcome};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Result of attempting to advance a skeleton by one stream result.
pub enum StepOutcome {
    /// The frontier result was reified; the skeleton moved on.
    Advanced,
    /// The frontier instance's generator produced nothing this call. The
    /// skeleton stays at the same index; the caller decides whether to
    /// retry later or give up.
    Exhausted,
    /// Two optimistic objects the plan treated as independent turned out to
    /// denote the same concrete object once reified. The offending
    /// instance's `opt_index` has already been decayed by the time this is
    /// returned, so the caller's next optimistic grounding pass mints it a
    /// fresh, unshared placeholder instead of repeating the collision.
    DoubleBinding { instance: InstanceId, claimed: Object, conflicting: Object },
    /// Every stream result in the plan has been reified.
    Complete,
}

/// One (external, success, wall-clock) data point from a single frontier
/// call, for the caller to fold into its statistics table. `None` when the
/// skeleton was already complete and no call was made at all.
pub struct Attempt {
    pub external: Arc<str>,
    pub success: bool,
    pub elapsed_seconds: f64,
}

/// Advances `skeleton` by drawing one real result from its frontier
/// instance and folding the resulting bindings and certified facts in.
pub fn process_stream_plan(skeleton: &mut Skeleton, instances: &mut InstanceTable, evaluations: &mut Evaluations, objects: &mut ObjectTable) -> (StepOutcome, Option<Attempt>) {
    if skeleton.is_complete() {
        return (StepOutcome::Complete, None);
    }
    let optimistic = skeleton.frontier().clone();
    skeleton.attempts += 1;
    let external = optimistic.external.name();

    let instance = instances.get_mut(optimistic.instance);
    let started = Instant::now();
    let next = instance.next_results(objects).into_iter().next();
    let elapsed_seconds = started.elapsed().as_secs_f64();
    let result = match next {
        Some(result) => result,
        None => {
            debug!(instance = ?optimistic.instance, "frontier instance produced nothing this attempt");
            return (StepOutcome::Exhausted, Some(Attempt { external, success: false, elapsed_seconds }));
        }
    };

    if let (Outcome::Stream(opt_outputs), Outcome::Stream(real_outputs)) = (&optimistic.outcome, &result.outcome) {
        for (&opt_obj, &real_obj) in opt_outputs.iter().zip(real_outputs.iter()) {
            if let Some(conflicting) = skeleton.bind(opt_obj, real_obj) {
                instances.get_mut(optimistic.instance).decay_opt_index();
                return (
                    StepOutcome::DoubleBinding {
                        instance: optimistic.instance,
                        claimed: real_obj,
                        conflicting,
                    },
                    Some(Attempt { external, success: false, elapsed_seconds }),
                );
            }
        }
    }

    for fact in result.get_certified(objects) {
        evaluations.add_atom(fact);
    }
    skeleton.advance();
    (StepOutcome::Advanced, Some(Attempt { external, success: true, elapsed_seconds }))
}
