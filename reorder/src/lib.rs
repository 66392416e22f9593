//! Turns an unordered stream plan (and, combined with a classical plan, an
//! unordered mix of stream results and domain actions) into an order that
//! respects object-flow dependencies and front-loads cheap, reliable
//! streams.

mod axiom;
mod combined;
mod dp;
mod partial_order;
mod stream_plan;

pub use axiom::{AxiomExpander, NoAxioms};
pub use combined::{reorder_combined_plan, CombinedStep};
pub use dp::{dynamic_programming, Stat, MAX_DP_VERTICES};
pub use partial_order::get_partial_orders;
pub use stream_plan::reorder_stream_plan;
