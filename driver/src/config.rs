use std::time::Duration;

/// Knobs for [`crate::solve_focused`] (spec §6). Mirrors the keyword
/// arguments `solve_focused` takes in the original, minus the ones this
/// workspace's Non-goals explicitly drop (`visualize` is kept as a no-op
/// field so callers porting a config over don't have to strip it out).
#[derive(Clone, Debug)]
pub struct Config {
    /// Wall-clock budget for the whole solve.
    pub max_time: Duration,
    /// Reject any plan whose cost exceeds this.
    pub max_cost: f64,
    /// Treat every action and stream result as cost 1 rather than using
    /// declared costs.
    pub unit_costs: bool,
    /// Wall-clock budget spent reifying a single skeleton before moving on.
    pub sampling_time: Duration,
    /// Weight given to a stream's declared effort when compiling it into a
    /// surrogate action's cost.
    pub effort_weight: f64,
    /// BFS layer cap for eager instantiation and optimistic grounding.
    pub eager_layers: u32,
    /// No-op: this workspace has no plan visualizer.
    pub visualize: bool,
    pub verbose: bool,
    /// Re-run the cheapest found skeleton's stream plan once more after
    /// success, in case a later, cheaper binding is available.
    pub postprocess: bool,
    /// Cap on attempts per skeleton before the queue gives up on it.
    pub max_skeleton_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_time: Duration::from_secs(30),
            max_cost: f64::INFINITY,
            unit_costs: false,
            sampling_time: Duration::from_secs(10),
            effort_weight: 1.0,
            eager_layers: 16,
            visualize: false,
            verbose: false,
            postprocess: false,
            max_skeleton_attempts: 10,
        }
    }
}
