use crate::error::ExternalError;
use crate::External;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Per-solve replacement for the Python implementation's module-level
/// `defaultdict(count)` that numbers `DebugValue` placeholders. Cheaply
/// cloneable: every `debug_stream` generator closure holds its own handle
/// onto the same shared table.
#[derive(Clone, Default)]
pub struct DebugCounters {
    inner: Arc<Mutex<HashMap<(Arc<str>, Arc<str>), u32>>>,
}

impl DebugCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next (0-based) index for `(stream, param)` and advances it.
    pub fn next(&self, stream: Arc<str>, param: Arc<str>) -> u32 {
        let mut counters = self.inner.lock().unwrap();
        let counter = counters.entry((stream, param)).or_insert(0);
        let index = *counter;
        *counter += 1;
        index
    }
}

/// The full set of externals available to a solve, plus the shared debug
/// counter table (spec §3's "External registry").
#[derive(Default)]
pub struct ExternalRegistry {
    externals: HashMap<Arc<str>, External>,
    debug_counters: DebugCounters,
}

impl ExternalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug_counters(&self) -> DebugCounters {
        self.debug_counters.clone()
    }

    pub fn register(&mut self, external: External) -> Result<(), ExternalError> {
        let name = external.name();
        if self.externals.contains_key(&name) {
            return Err(ExternalError::DuplicateName(name));
        }
        self.externals.insert(name, external);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&External> {
        self.externals.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &External> {
        self.externals.values()
    }
}
