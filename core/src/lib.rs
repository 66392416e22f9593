//! Ground-object and evaluation-set primitives shared by every stage of the
//! focused planning loop: interned objects, facts, and the monotonically
//! growing evaluation set.

mod fact;
mod object;
mod value;

pub use fact::{Evaluations, Fact};
pub use object::{Object, ObjectTable, OptKey};
pub use value::Value;
