//! The classical search side of the loop: a grounded [`PlanningTask`], the
//! [`Planner`] seam the driver calls through, and a reference
//! uniform-cost implementation.

mod forward;
mod planner;
mod task;

pub use forward::ForwardUniformCostPlanner;
pub use planner::Planner;
pub use task::{Action, PlanningTask};
