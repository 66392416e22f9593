use num_rational::Ratio;
use std::time::{Duration, Instant};

/// One concrete, fully-reified plan: the domain actions to apply, in order,
/// and the total cost the reference planner assigned it.
#[derive(Clone, Debug)]
pub struct Solution {
    pub action_names: Vec<String>,
    pub cost: Ratio<i64>,
}

/// Tracks the best plan found so far and the solve's time/cost budget.
/// `record` is the only mutator and enforces Testable Property monotonicity:
/// cost only ever decreases.
pub struct SolutionStore {
    best: Option<Solution>,
    start_time: Instant,
    max_time: Duration,
    max_cost: f64,
    verbose: bool,
}

impl SolutionStore {
    pub fn new(max_time: Duration, max_cost: f64, verbose: bool) -> SolutionStore {
        SolutionStore {
            best: None,
            start_time: Instant::now(),
            max_time,
            max_cost,
            verbose,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn is_timed_out(&self) -> bool {
        self.elapsed() >= self.max_time
    }

    pub fn best(&self) -> Option<&Solution> {
        self.best.as_ref()
    }

    pub fn best_cost(&self) -> Ratio<i64> {
        self.best.as_ref().map(|s| s.cost).unwrap_or_else(|| Ratio::from_integer(i64::MAX))
    }

    /// Accepts `candidate` only if it is cheaper than the current best and
    /// within `max_cost`. Returns whether it was accepted.
    pub fn record(&mut self, candidate: Solution) -> bool {
        let cost_as_f64 = *candidate.cost.numer() as f64 / *candidate.cost.denom() as f64;
        if cost_as_f64 > self.max_cost {
            return false;
        }
        if candidate.cost >= self.best_cost() {
            return false;
        }
        if self.verbose {
            tracing::info!(cost = %candidate.cost, elapsed = ?self.elapsed(), "new best plan");
        }
        self.best = Some(candidate);
        true
    }
}
