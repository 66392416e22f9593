use crate::dp::{dynamic_programming, Stat};
use crate::partial_order::get_partial_orders;
use pddlstream_instantiate::EvalResult;

/// Reorders a stream plan to front-load cheap, reliable streams while
/// respecting the dependency order `get_partial_orders` derives from the
/// plan's own object flow.
pub fn reorder_stream_plan(stream_plan: Vec<EvalResult>, stat_fn: impl Fn(&EvalResult) -> Stat) -> Vec<EvalResult> {
    if stream_plan.len() < 2 {
        return stream_plan;
    }
    let orders = get_partial_orders(&stream_plan);
    let stats: Vec<Stat> = stream_plan.iter().map(&stat_fn).collect();
    let order = dynamic_programming(stream_plan.len(), &orders, &stats);
    let mut slots: Vec<Option<EvalResult>> = stream_plan.into_iter().map(Some).collect();
    order.into_iter().map(|i| slots[i].take().expect("dp visits each index once")).collect()
}
