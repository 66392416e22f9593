use crate::process::{process_stream_plan, Attempt, StepOutcome};
use crate::skeleton::Skeleton;
use pddlstream_core::{Evaluations, ObjectTable};
use pddlstream_instantiate::{InstanceId, InstanceTable};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Priority key for a queued skeleton: fewer attempts so far, then fewer
/// remaining stream results, sort first — a skeleton that hasn't failed yet
/// and is closer to a complete plan gets tried before one that has already
/// burned attempts or has a long tail left (spec §4.6).
#[derive(Copy, Clone, Eq, PartialEq)]
struct SkeletonKey {
    attempts: u32,
    remaining: usize,
}

impl SkeletonKey {
    fn of(skeleton: &Skeleton) -> SkeletonKey {
        SkeletonKey {
            attempts: skeleton.attempts(),
            remaining: skeleton.remaining(),
        }
    }
}

impl Ord for SkeletonKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other.attempts.cmp(&self.attempts).then_with(|| other.remaining.cmp(&self.remaining))
    }
}
impl PartialOrd for SkeletonKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct QueueEntry {
    key: SkeletonKey,
    skeleton: Skeleton,
}

impl QueueEntry {
    fn new(skeleton: Skeleton) -> QueueEntry {
        QueueEntry {
            key: SkeletonKey::of(&skeleton),
            skeleton,
        }
    }
}
impl Eq for QueueEntry {}
impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of draining the queue for one round.
pub enum DrainOutcome {
    /// A skeleton reified completely.
    Found(Skeleton),
    /// Nothing completed, but a double binding was detected and its
    /// instance's `opt_index` decayed — the caller's next optimistic
    /// grounding pass should re-hypothesize that instance under a fresh,
    /// unshared placeholder rather than treating this round as a dead end.
    DoubleBinding(InstanceId),
    /// Nothing completed and no double binding occurred either: every
    /// frontier instance genuinely produced nothing this round.
    Exhausted,
}

/// The skeleton priority queue: every unfinished partial-order-reified plan
/// still being attempted.
#[derive(Default)]
pub struct SkeletonQueue {
    heap: BinaryHeap<QueueEntry>,
}

impl SkeletonQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, skeleton: Skeleton) {
        self.heap.push(QueueEntry::new(skeleton));
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Drains the top-priority skeleton to exhaustion before considering
    /// any other: each `Advanced` step loops immediately instead of
    /// yielding the queue, so one promising skeleton can run all the way
    /// to completion in a single call.
    ///
    /// Also returns every [`Attempt`] made along the way, so the caller can
    /// fold per-external success/timing data into its statistics table.
    pub fn greedily_process(&mut self, instances: &mut InstanceTable, evaluations: &mut Evaluations, objects: &mut ObjectTable, max_attempts: u32) -> (DrainOutcome, Vec<Attempt>) {
        let mut double_bound = None;
        let mut attempts = Vec::new();
        while let Some(QueueEntry { mut skeleton, .. }) = self.heap.pop() {
            loop {
                let (outcome, attempt) = process_stream_plan(&mut skeleton, instances, evaluations, objects);
                if let Some(attempt) = attempt {
                    attempts.push(attempt);
                }
                match outcome {
                    StepOutcome::Complete => return (DrainOutcome::Found(skeleton), attempts),
                    StepOutcome::Advanced => continue,
                    StepOutcome::Exhausted => break,
                    StepOutcome::DoubleBinding { instance, .. } => {
                        double_bound = Some(instance);
                        break;
                    }
                }
            }
            if skeleton.attempts() < max_attempts {
                self.push(skeleton);
            }
        }
        (double_bound.map(DrainOutcome::DoubleBinding).unwrap_or(DrainOutcome::Exhausted), attempts)
    }

    /// Gives every skeleton currently queued exactly one attempt, in
    /// priority order, before any of them gets a second — round-robin
    /// fairness instead of the greedy policy's depth-first bias toward the
    /// single best skeleton.
    pub fn fairly_process(&mut self, instances: &mut InstanceTable, evaluations: &mut Evaluations, objects: &mut ObjectTable, max_attempts: u32) -> (DrainOutcome, Vec<Attempt>) {
        let round: Vec<Skeleton> = std::mem::take(&mut self.heap).into_sorted_vec().into_iter().rev().map(|entry| entry.skeleton).collect();
        let mut double_bound = None;
        let mut attempts = Vec::new();
        for mut skeleton in round {
            let (outcome, attempt) = process_stream_plan(&mut skeleton, instances, evaluations, objects);
            if let Some(attempt) = attempt {
                attempts.push(attempt);
            }
            match outcome {
                StepOutcome::Complete => return (DrainOutcome::Found(skeleton), attempts),
                StepOutcome::Advanced => {
                    if skeleton.attempts() < max_attempts {
                        self.push(skeleton);
                    }
                }
                StepOutcome::DoubleBinding { instance, .. } => {
                    double_bound = Some(instance);
                    if skeleton.attempts() < max_attempts {
                        self.push(skeleton);
                    }
                }
                StepOutcome::Exhausted => {}
            }
        }
        (double_bound.map(DrainOutcome::DoubleBinding).unwrap_or(DrainOutcome::Exhausted), attempts)
    }
}
