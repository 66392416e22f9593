//! The skeleton queue: hypothesized stream plans waiting to be reified
//! against their real generators, ordered so cheap, low-attempt skeletons
//! get tried first.

mod process;
mod queue;
mod skeleton;

pub use process::{process_stream_plan, Attempt, StepOutcome};
pub use queue::{DrainOutcome, SkeletonQueue};
pub use skeleton::Skeleton;

#[cfg(test)]
mod tests {
    use super::*;
    use pddlstream_core::{Evaluations, ObjectTable, Value};
    use pddlstream_external::{from_list_fn, External, StreamDef};
    use pddlstream_instantiate::{InstanceTable, Outcome};
    use smallvec::smallvec;
    use std::sync::Arc;

    #[test]
    fn a_skeleton_completes_once_its_only_result_reifies() {
        let mut objects = ObjectTable::new();
        let mut instances = InstanceTable::new();
        let mut evaluations = Evaluations::new();

        let stream = StreamDef::new("find-tile", vec![], vec![], vec![Arc::from("?t")], vec![], from_list_fn(|_| vec![vec![Value::symbol("tile")]]), None, false).unwrap();
        let external = External::Stream(Arc::new(stream));
        let instance_id = instances.get_instance(&external, smallvec![], 1);
        let optimistic = instances.get_mut(instance_id).next_optimistic(&mut objects);
        assert!(matches!(optimistic.outcome, Outcome::Stream(_)));

        let mut skeleton = Skeleton::new(vec![optimistic], vec![]);
        assert!(!skeleton.is_complete());

        let mut queue = SkeletonQueue::new();
        let (outcome, attempt) = process_stream_plan(&mut skeleton, &mut instances, &mut evaluations, &mut objects);
        assert!(matches!(outcome, StepOutcome::Advanced));
        assert!(attempt.is_some_and(|a| a.success));
        assert!(skeleton.is_complete());
        let _ = queue.len();
    }
}
