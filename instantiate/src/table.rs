use crate::instance::{Instance, InstanceId};
use pddlstream_core::Object;
use pddlstream_external::External;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Canonicalizes `(external, input_objects)` to a single [`Instance`],
/// owning every instance created during a solve.
///
/// This is Testable Property 2: requesting the same grounding twice always
/// returns the same [`InstanceId`], so the skeleton queue and the
/// instantiator never duplicate work or disagree about an instance's
/// `opt_index`.
#[derive(Default)]
pub struct InstanceTable {
    instances: Vec<Instance>,
    index: HashMap<(Arc<str>, SmallVec<[Object; 4]>), InstanceId>,
}

impl InstanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the canonical instance for `(external, input_objects)`,
    /// creating it with `initial_opt_index` if this is the first request.
    pub fn get_instance(&mut self, external: &External, input_objects: SmallVec<[Object; 4]>, initial_opt_index: u32) -> InstanceId {
        let key = (external.name(), input_objects.clone());
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = InstanceId::new(self.instances.len() as u32);
        self.instances.push(Instance::new(id, external.clone(), input_objects, initial_opt_index));
        self.index.insert(key, id);
        id
    }

    pub fn get(&self, id: InstanceId) -> &Instance {
        &self.instances[id.index()]
    }

    pub fn get_mut(&mut self, id: InstanceId) -> &mut Instance {
        &mut self.instances[id.index()]
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pddlstream_core::ObjectTable;
    use pddlstream_core::Value;
    use pddlstream_external::from_list_fn;
    use pddlstream_external::StreamDef;

    #[test]
    fn requesting_the_same_grounding_twice_canonicalizes() {
        let mut objects = ObjectTable::new();
        let stream = StreamDef::new(
            "move",
            vec![Arc::from("?t")],
            vec![],
            vec![Arc::from("?t2")],
            vec![],
            from_list_fn(|_| vec![]),
            None,
            true,
        )
        .unwrap();
        let external = External::Stream(Arc::new(stream));
        let tile = objects.from_value(Value::symbol("t0"));
        let mut table = InstanceTable::new();
        let a = table.get_instance(&external, SmallVec::from_slice(&[tile]), 0);
        let b = table.get_instance(&external, SmallVec::from_slice(&[tile]), 0);
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }
}
