use crate::compile::compile_stream_action;
use crate::config::Config;
use crate::solution::{Solution, SolutionStore};
use crate::statistics::Statistics;
use num_rational::Ratio;
use pddlstream_core::{Evaluations, Fact, ObjectTable};
use pddlstream_external::External;
use pddlstream_ground::optimistic_process_streams;
use pddlstream_instantiate::{layered_process, EvalResult, InstanceTable, Instantiator};
use pddlstream_reorder::{reorder_combined_plan, AxiomExpander, CombinedStep, NoAxioms};
use pddlstream_search::{Action, ForwardUniformCostPlanner, Planner, PlanningTask};
use pddlstream_skeleton::{DrainOutcome, Skeleton, SkeletonQueue};
use smallvec::SmallVec;
use std::time::Instant;
use tracing::{debug, info};

/// Everything the focused loop needs to attempt a solve: the externals it
/// may call, the problem's initial facts and goal, and the domain actions
/// available without any sampling at all.
pub struct SolveInput {
    pub externals: Vec<External>,
    pub initial: Evaluations,
    pub goal: Vec<Fact>,
    pub domain_actions: Vec<Action>,
}

/// Runs the focused planning loop to completion (time budget, or an
/// exhausted skeleton queue with no domain-only plan left to try), and
/// returns the best [`Solution`] found, if any (spec §4.8).
///
/// Two evaluation sets are carried side by side. `grounding_state` is the
/// one the instantiator and optimistic grounder read and write: it
/// accumulates both real and hypothesized facts, since a lazy stream two
/// layers deep may need to chain off a fact only a shallower stream has
/// hypothesized so far. `concrete_state` holds only facts some instance has
/// actually certified (never a hypothesis), and is what the classical
/// planner's task is built against — so a plan can only use a stream's
/// certified facts by including that stream's surrogate action, never by
/// finding them already sitting in the initial state.
pub fn solve_focused(input: SolveInput, config: &Config, statistics: &mut Statistics) -> SolutionStore {
    let mut objects = ObjectTable::new();
    let mut grounding_state = input.initial.snapshot();
    let mut concrete_state = input.initial.snapshot();
    let mut instantiator = Instantiator::new(input.externals.clone());
    let mut instances = InstanceTable::new();
    let mut queue = SkeletonQueue::new();
    let planner = ForwardUniformCostPlanner::default();
    let axioms = NoAxioms;
    let mut store = SolutionStore::new(config.max_time, config.max_cost, config.verbose);

    let seeds: Vec<Fact> = grounding_state.iter().cloned().collect();
    for fact in &seeds {
        instantiator.add_atom(fact, &grounding_state, &mut objects);
    }

    let domain_action_count = input.domain_actions.len();
    while !store.is_timed_out() {
        let grounded = layered_process(&mut instantiator, &mut instances, &mut grounding_state, &mut objects);
        for result in &grounded {
            for fact in result.get_certified(&mut objects) {
                concrete_state.add_atom(fact);
            }
        }
        let stream_plan = optimistic_process_streams(&mut instantiator, &mut instances, &mut grounding_state, &mut objects, 1, config.eager_layers);
        debug!(grounded = grounded.len(), hypothesized = stream_plan.len(), "grounding round complete");

        let mut actions = input.domain_actions.clone();
        actions.extend(stream_plan.iter().map(|result| compile_stream_action(result, config.effort_weight, &mut objects)));
        if config.unit_costs {
            for action in &mut actions {
                action.cost = Ratio::from_integer(1);
            }
        }

        let derived: Vec<Fact> = axioms.expand(concrete_state.iter().cloned().collect());
        let mut task_state = Evaluations::new();
        for fact in derived {
            task_state.add_atom(fact);
        }
        let task = PlanningTask::new(task_state, input.goal.clone(), actions);
        let Some(plan) = planner.solve_from_task(&task) else {
            if !drain_skeleton_queue(&mut queue, &mut instances, &mut concrete_state, &mut objects, &mut instantiator, &mut store, statistics, &task.actions, config) {
                info!("no plan against the current state and no skeleton left to retry");
                break;
            }
            sync_concrete_facts(&mut concrete_state, &mut grounding_state, &mut instantiator, &mut objects);
            continue;
        };

        let action_indices: Vec<usize> = plan.iter().copied().filter(|&i| i < domain_action_count).collect();
        let stream_indices: Vec<usize> = plan.iter().copied().filter(|&i| i >= domain_action_count).map(|i| i - domain_action_count).collect();

        if stream_indices.is_empty() {
            record_plan(&mut store, &action_indices, &task.actions);
            if !config.postprocess {
                break;
            }
            continue;
        }

        let used_stream_plan: Vec<EvalResult> = stream_indices.into_iter().map(|i| stream_plan[i].clone()).collect();
        let combined = reorder_combined_plan(used_stream_plan, action_indices.clone(), &task.actions, &concrete_state, &mut objects, |r| statistics.stat_for(&r.external.name()));
        let ordered_stream_plan: Vec<EvalResult> = combined
            .into_iter()
            .filter_map(|step| match step {
                CombinedStep::Stream(result) => Some(result),
                CombinedStep::Action(_) => None,
            })
            .collect();
        queue.push(Skeleton::new(ordered_stream_plan, action_indices));

        let made_progress = drain_skeleton_queue(&mut queue, &mut instances, &mut concrete_state, &mut objects, &mut instantiator, &mut store, statistics, &task.actions, config);
        sync_concrete_facts(&mut concrete_state, &mut grounding_state, &mut instantiator, &mut objects);
        if store.best().is_some() && !config.postprocess {
            break;
        }
        if !made_progress && store.best().is_none() {
            break;
        }
    }
    store
}

/// Drains the skeleton queue greedily once, recording any reified plan into
/// `store`, folding every attempt's success/timing into `statistics`, and
/// re-queuing a detected double binding's grounding (spec §4.5) so the next
/// optimistic grounding pass re-hypothesizes it under its decayed
/// `opt_index` instead of never revisiting it. Returns whether the caller
/// should keep looping: either a skeleton completed, a double binding was
/// detected and requeued, or the queue still holds unfinished work.
fn drain_skeleton_queue(
    queue: &mut SkeletonQueue,
    instances: &mut InstanceTable,
    concrete_state: &mut Evaluations,
    objects: &mut ObjectTable,
    instantiator: &mut Instantiator,
    store: &mut SolutionStore,
    statistics: &mut Statistics,
    actions: &[Action],
    config: &Config,
) -> bool {
    if queue.is_empty() {
        return false;
    }
    let (outcome, attempts) = queue.greedily_process(instances, concrete_state, objects, config.max_skeleton_attempts);
    for attempt in attempts {
        statistics.record(attempt.external, attempt.success, attempt.elapsed_seconds);
    }
    match outcome {
        DrainOutcome::Found(skeleton) => {
            record_plan(store, &skeleton.action_plan, actions);
            true
        }
        DrainOutcome::DoubleBinding(instance_id) => {
            requeue_decayed_instance(instances, instantiator, instance_id);
            true
        }
        DrainOutcome::Exhausted => !queue.is_empty(),
    }
}

/// Re-derives the [`pddlstream_instantiate::Grounding`] behind a decayed
/// instance and pushes it back into the instantiator's deferred queue,
/// bypassing the `seen` dedup that would otherwise keep it from ever being
/// re-examined by a future optimistic grounding pass.
fn requeue_decayed_instance(instances: &InstanceTable, instantiator: &mut Instantiator, instance_id: pddlstream_instantiate::InstanceId) {
    let instance = instances.get(instance_id);
    let Some(external_index) = instantiator.external_index(&instance.external().name()) else {
        return;
    };
    let input_objects: SmallVec<[_; 4]> = instance.input_objects().iter().copied().collect();
    instantiator.force_requeue((external_index, input_objects));
}

/// Folds every fact a skeleton has since confirmed concrete back into the
/// grounding state, so the next round's instantiator can chain further
/// streams off of it.
fn sync_concrete_facts(concrete_state: &mut Evaluations, grounding_state: &mut Evaluations, instantiator: &mut Instantiator, objects: &mut ObjectTable) {
    let facts: Vec<Fact> = concrete_state.iter().cloned().collect();
    for fact in facts {
        if grounding_state.add_atom(fact.clone()) {
            instantiator.add_atom(&fact, grounding_state, objects);
        }
    }
}

fn record_plan(store: &mut SolutionStore, action_indices: &[usize], actions: &[Action]) {
    let cost = action_indices.iter().fold(Ratio::from_integer(0), |acc, &i| acc + actions[i].cost);
    let action_names = action_indices.iter().map(|&i| actions[i].name.to_string()).collect();
    store.record(Solution { action_names, cost });
}
