//! Grounds externals against the current evaluation set: the instance
//! table (canonical `(external, inputs)` identity), the instantiator (BFS
//! layered discovery of new groundings as facts appear), and the eager
//! layered-processing driver that ties the two together.

mod binding;
mod instance;
mod instantiator;
mod layered;
mod table;

pub use instance::{EvalResult, Instance, InstanceId, Outcome};
pub use instantiator::{Grounding, Instantiator};
pub use layered::layered_process;
pub use table::InstanceTable;
