use num_rational::Ratio;
use std::fmt;
use std::sync::Arc;

/// A ground value produced or consumed by an external.
///
/// Streams, functions and predicates only ever exchange values of these four
/// shapes; unlike the Python original (where any hashable object works) we
/// close the type so that [`Value`] can be interned without resorting to
/// dynamic typing.
#[derive(Clone, Eq, PartialEq, Hash)]
pub enum Value {
    Symbol(Arc<str>),
    Int(i64),
    Real(Ratio<i64>),
    Bool(bool),
}

impl Value {
    pub fn symbol(s: impl Into<Arc<str>>) -> Value {
        Value::Symbol(s.into())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Symbol(Arc::from(s))
    }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
