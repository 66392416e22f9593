use pddlstream_core::Value;
use std::sync::Arc;

/// Per-instance handle to a stream/function/predicate's underlying
/// generator. Each call to `next_batch` corresponds to one `next()` of the
/// Python `gen_fn`; `None` marks enumeration complete (`StopIteration`).
pub trait GenIterator: Send {
    fn next_batch(&mut self) -> Option<Vec<Vec<Value>>>;
}

/// Caps a generator to at most `max_calls` non-exhausted calls, ported from
/// `stream.py`'s `BoundedGenerator`.
pub struct BoundedGenerator<I> {
    inner: I,
    max_calls: u32,
    calls: u32,
}

impl<I: GenIterator> BoundedGenerator<I> {
    pub fn new(inner: I, max_calls: u32) -> Self {
        BoundedGenerator {
            inner,
            max_calls,
            calls: 0,
        }
    }

    pub fn enumerated(&self) -> bool {
        self.calls >= self.max_calls
    }
}

impl<I: GenIterator> GenIterator for BoundedGenerator<I> {
    fn next_batch(&mut self) -> Option<Vec<Vec<Value>>> {
        if self.enumerated() {
            return None;
        }
        self.calls += 1;
        self.inner.next_batch()
    }
}

/// Factory producing a fresh generator for a given input tuple. Each
/// [`crate::Instance`] owns exactly one generator, lazily created from its
/// external's `GenFn` on first use.
pub type GenFn = Arc<dyn Fn(&[Value]) -> Box<dyn GenIterator> + Send + Sync>;

struct OneShot(Option<Vec<Vec<Value>>>);
impl GenIterator for OneShot {
    fn next_batch(&mut self) -> Option<Vec<Vec<Value>>> {
        self.0.take()
    }
}

struct UnboundedGenerator {
    iter: Box<dyn Iterator<Item = Option<Vec<Value>>> + Send>,
}
impl GenIterator for UnboundedGenerator {
    fn next_batch(&mut self) -> Option<Vec<Vec<Value>>> {
        match self.iter.next() {
            Some(Some(values)) => Some(vec![values]),
            Some(None) => Some(vec![]),
            None => None,
        }
    }
}

/// Wraps a single call producing the whole output list at once; the
/// generator is enumerated after its first (possibly empty) batch.
pub fn from_list_fn(list_fn: impl Fn(&[Value]) -> Vec<Vec<Value>> + Send + Sync + 'static) -> GenFn {
    let list_fn = Arc::new(list_fn);
    Arc::new(move |inputs: &[Value]| -> Box<dyn GenIterator> {
        let batch = (list_fn)(inputs);
        Box::new(BoundedGenerator::new(OneShot(Some(batch)), 1))
    })
}

/// Wraps a deterministic function producing at most one output tuple.
pub fn from_fn(f: impl Fn(&[Value]) -> Option<Vec<Value>> + Send + Sync + 'static) -> GenFn {
    from_list_fn(move |inputs| match f(inputs) {
        Some(outputs) => vec![outputs],
        None => vec![],
    })
}

/// Wraps a boolean test as a zero-output generator (presence of a batch
/// means the test held).
pub fn from_test(test: impl Fn(&[Value]) -> bool + Send + Sync + 'static) -> GenFn {
    from_fn(move |inputs| if test(inputs) { Some(vec![]) } else { None })
}

/// Wraps a user iterator that yields output tuples (or `None` for an empty
/// round) one at a time; enumeration ends when the iterator itself ends.
pub fn from_gen_fn(
    gen_fn: impl Fn(&[Value]) -> Box<dyn Iterator<Item = Option<Vec<Value>>> + Send> + Send + Sync + 'static,
) -> GenFn {
    Arc::new(move |inputs: &[Value]| -> Box<dyn GenIterator> {
        Box::new(UnboundedGenerator { iter: gen_fn(inputs) })
    })
}
