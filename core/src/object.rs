use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// An interned ground object.
///
/// Equality is by identity (the interned index), not by the wrapped value:
/// two optimistic objects produced by different calls are distinct even if
/// they happen to share a hint value, unless they were interned under the
/// same [`OptKey`]. This mirrors the `VarRef`/`Lit` index-based identity used
/// throughout the teacher's constraint model instead of pointer identity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub struct Object(u32);

impl Object {
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug)]
enum ObjectData {
    Concrete(Value),
    Optimistic { opt_index: u32, hint: Value },
}

/// Key under which a freshly hypothesized optimistic object is interned.
///
/// `Unique` gives each call its own fresh placeholder (used once an
/// instance's `opt_index` has decayed to zero, i.e. "strong uniqueness");
/// `Shared` lets several calls agree on the same placeholder for as long as
/// they pass the same hint value, which is the default policy for streams
/// that haven't been re-grounded yet.
#[derive(Clone, Eq, PartialEq, Hash)]
pub enum OptKey {
    Unique { instance: u64, batch: u32, slot: u32 },
    /// Shared across every instance of the same external at the same output
    /// position, until that external's `opt_index` decays to zero.
    Shared { external: Arc<str>, output_index: u32 },
}

/// Per-solve pool of interned [`Object`]s.
///
/// Replaces the Python implementation's module-level counters (see the
/// `DebugValue` design note): every component that needs fresh identities is
/// handed a `&mut ObjectTable` rather than reaching for global state.
#[derive(Default)]
pub struct ObjectTable {
    data: Vec<ObjectData>,
    concrete_index: HashMap<ValueKey, Object>,
    optimistic_index: HashMap<OptKey, Object>,
}

/// `Value` does not implement `Eq`/`Hash` directly through its `Ratio` field
/// in a way we want to re-derive here; it actually does (Ratio<i64>: Hash),
/// so this is a thin newtype only to keep the map keys self-documenting.
#[derive(Clone, Eq, PartialEq, Hash)]
struct ValueKey(Value);

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns (or retrieves) the concrete object wrapping `value`.
    ///
    /// Two calls with an equal value return the same [`Object`], matching
    /// `Object.from_value` in the original: concrete identity is by value.
    pub fn from_value(&mut self, value: Value) -> Object {
        let key = ValueKey(value.clone());
        if let Some(&obj) = self.concrete_index.get(&key) {
            return obj;
        }
        let obj = Object(self.data.len() as u32);
        self.data.push(ObjectData::Concrete(value));
        self.concrete_index.insert(key, obj);
        obj
    }

    /// Interns (or retrieves) an optimistic placeholder under `key`.
    pub fn optimistic(&mut self, key: OptKey, hint: Value, opt_index: u32) -> Object {
        if let Some(&obj) = self.optimistic_index.get(&key) {
            return obj;
        }
        let obj = Object(self.data.len() as u32);
        self.data.push(ObjectData::Optimistic { opt_index, hint });
        self.optimistic_index.insert(key, obj);
        obj
    }

    pub fn is_optimistic(&self, obj: Object) -> bool {
        matches!(self.data[obj.0 as usize], ObjectData::Optimistic { .. })
    }

    /// Remaining optimism depth; `0` for concrete objects.
    pub fn opt_index(&self, obj: Object) -> u32 {
        match &self.data[obj.0 as usize] {
            ObjectData::Concrete(_) => 0,
            ObjectData::Optimistic { opt_index, .. } => *opt_index,
        }
    }

    pub fn value(&self, obj: Object) -> &Value {
        match &self.data[obj.0 as usize] {
            ObjectData::Concrete(v) => v,
            ObjectData::Optimistic { hint, .. } => hint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_objects_are_value_interned() {
        let mut objects = ObjectTable::new();
        let a = objects.from_value(Value::symbol("tile0"));
        let b = objects.from_value(Value::symbol("tile0"));
        let c = objects.from_value(Value::symbol("tile1"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(objects.opt_index(a), 0);
        assert!(!objects.is_optimistic(a));
    }

    #[test]
    fn unique_optimistic_objects_are_always_fresh() {
        let mut objects = ObjectTable::new();
        let key1 = OptKey::Unique {
            instance: 1,
            batch: 0,
            slot: 0,
        };
        let key2 = OptKey::Unique {
            instance: 1,
            batch: 0,
            slot: 1,
        };
        let a = objects.optimistic(key1.clone(), Value::symbol("far_tile"), 0);
        let b = objects.optimistic(key1, Value::symbol("far_tile"), 0);
        let c = objects.optimistic(key2, Value::symbol("far_tile"), 0);
        assert_eq!(a, b, "same key interns to the same object");
        assert_ne!(a, c, "different slot is a different object");
        assert!(objects.is_optimistic(a));
        assert_eq!(objects.opt_index(a), 0);
    }

    #[test]
    fn shared_optimistic_objects_merge_by_external_and_slot() {
        let mut objects = ObjectTable::new();
        let key = OptKey::Shared {
            external: Arc::from("find-far-east"),
            output_index: 0,
        };
        let a = objects.optimistic(key.clone(), Value::symbol("far_tile"), 1);
        let b = objects.optimistic(key, Value::symbol("far_tile"), 1);
        assert_eq!(a, b);
    }
}
