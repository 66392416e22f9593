use crate::task::PlanningTask;

/// A black-box able to solve a [`PlanningTask`]. The focused driver only
/// ever calls this one method; which search algorithm backs it is an
/// implementation detail the rest of the crate doesn't depend on.
pub trait Planner {
    /// Returns the indices into `task.actions` forming a plan, in
    /// application order, or `None` if the task is unsolvable (within
    /// whatever bound the implementation enforces).
    fn solve_from_task(&self, task: &PlanningTask) -> Option<Vec<usize>>;
}
