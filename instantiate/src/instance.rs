use pddlstream_core::{Fact, Object, ObjectTable, OptKey, Value};
use pddlstream_external::{External, GenIterator};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Opaque handle into an [`crate::InstanceTable`]. Two calls to
/// `InstanceTable::get` with the same `(external, input_objects)` return the
/// same id, never two distinct instances for the same grounding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub struct InstanceId(u32);

impl InstanceId {
    pub(crate) fn new(index: u32) -> InstanceId {
        InstanceId(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a single call to an instance's generator produced.
#[derive(Clone, Debug)]
pub enum Outcome {
    Stream(SmallVec<[Object; 4]>),
    Function(Value),
    Predicate(bool),
}

/// A single evaluation of an instance: either a real result pulled from its
/// generator, or a hypothesized optimistic one. `opt_index == 0` iff this
/// result is concrete.
#[derive(Clone)]
pub struct EvalResult {
    pub instance: InstanceId,
    pub external: External,
    pub input_objects: SmallVec<[Object; 4]>,
    pub outcome: Outcome,
    pub opt_index: u32,
}

impl EvalResult {
    pub fn is_optimistic(&self) -> bool {
        self.opt_index > 0
    }

    /// Facts this result certifies, grounded under its input/output binding.
    /// A stream substitutes its `certified` patterns; a predicate that
    /// tested true certifies its own call fact (`name(inputs)`), false
    /// certifies nothing; a function never certifies anything — its value
    /// feeds cost, not the fact set.
    pub fn get_certified(&self, objects: &mut ObjectTable) -> Vec<Fact> {
        match (&self.external, &self.outcome) {
            (External::Stream(def), Outcome::Stream(outputs)) => {
                let mut mapping: HashMap<Arc<str>, Object> = HashMap::with_capacity(def.inputs.len() + def.outputs.len());
                mapping.extend(def.inputs.iter().cloned().zip(self.input_objects.iter().copied()));
                mapping.extend(def.outputs.iter().cloned().zip(outputs.iter().copied()));
                def.certified.iter().map(|pattern| pattern.substitute(&mapping, objects)).collect()
            }
            (External::Predicate(def), Outcome::Predicate(true)) => {
                vec![Fact::new(def.name.clone(), self.input_objects.iter().copied())]
            }
            _ => Vec::new(),
        }
    }

    /// The numeric cost term a function result contributes, if any.
    pub fn function_value(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Function(v) => Some(v),
            _ => None,
        }
    }

    /// Whether a predicate result tested true. `None` for non-predicate
    /// results.
    pub fn predicate_value(&self) -> Option<bool> {
        match &self.outcome {
            Outcome::Predicate(b) => Some(*b),
            _ => None,
        }
    }
}

/// One grounding of an external against a specific tuple of input objects.
///
/// Mirrors `instantiate.py`'s `Instance`: it owns a lazily-created generator
/// and remembers how many times it has been called so the driver can bound
/// repeated sampling (spec §6 `sampling_time`).
pub struct Instance {
    id: InstanceId,
    external: External,
    input_objects: SmallVec<[Object; 4]>,
    generator: Option<Box<dyn GenIterator>>,
    num_calls: u32,
    opt_index: u32,
    enumerated: bool,
    /// An optimistic result has already been produced at the current
    /// `opt_index`; re-grounding (double-binding detection) bumps
    /// `opt_index` down and clears this so a fresh placeholder is minted.
    opt_produced_at: Option<u32>,
    cached_optimistic: Option<EvalResult>,
}

impl Instance {
    pub(crate) fn new(id: InstanceId, external: External, input_objects: SmallVec<[Object; 4]>, initial_opt_index: u32) -> Instance {
        Instance {
            id,
            external,
            input_objects,
            generator: None,
            num_calls: 0,
            opt_index: initial_opt_index,
            enumerated: false,
            opt_produced_at: None,
            cached_optimistic: None,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn external(&self) -> &External {
        &self.external
    }

    pub fn input_objects(&self) -> &[Object] {
        &self.input_objects
    }

    pub fn num_calls(&self) -> u32 {
        self.num_calls
    }

    pub fn opt_index(&self) -> u32 {
        self.opt_index
    }

    pub fn is_enumerated(&self) -> bool {
        self.enumerated
    }

    /// Lowers this instance's remaining optimism by one, forcing its next
    /// optimistic result to be minted under a fresh [`OptKey::Unique`] rather
    /// than shared with siblings. Called when the skeleton queue detects a
    /// double binding that this instance participated in.
    pub fn decay_opt_index(&mut self) {
        self.opt_index = self.opt_index.saturating_sub(1);
        self.opt_produced_at = None;
    }

    fn input_values<'a>(&self, objects: &'a ObjectTable) -> SmallVec<[Value; 4]> {
        self.input_objects.iter().map(|&o| objects.value(o).clone()).collect()
    }

    /// Draws the next batch of real results from the underlying generator.
    /// Returns an empty vec once enumerated; never panics on repeated calls
    /// after exhaustion (mirrors Python's tolerant re-querying).
    pub fn next_results(&mut self, objects: &mut ObjectTable) -> Vec<EvalResult> {
        if self.enumerated {
            return Vec::new();
        }
        if self.generator.is_none() {
            let inputs = self.input_values(objects);
            self.generator = Some((self.external.gen_fn())(&inputs));
        }
        self.num_calls += 1;
        let gen = self.generator.as_mut().unwrap();
        let batch = match gen.next_batch() {
            Some(batch) => batch,
            None => {
                self.enumerated = true;
                return Vec::new();
            }
        };
        batch
            .into_iter()
            .map(|tuple| self.build_result(tuple, objects, 0))
            .collect()
    }

    /// Produces this instance's single hypothesized optimistic result,
    /// memoized at the current `opt_index` so repeated grounding passes
    /// within one layer don't mint distinct placeholders for the same
    /// instance.
    pub fn next_optimistic(&mut self, objects: &mut ObjectTable) -> EvalResult {
        if self.opt_produced_at != Some(self.opt_index) {
            let inputs = self.input_values(objects);
            let mut gen = (self.external.opt_gen_fn())(&inputs);
            let tuple = gen.next_batch().and_then(|b| b.into_iter().next()).unwrap_or_default();
            self.opt_produced_at = Some(self.opt_index);
            self.cached_optimistic = Some(self.build_result(tuple, objects, self.opt_index.max(1)));
        }
        self.cached_optimistic.clone().expect("memoized above")
    }

    fn build_result(&self, tuple: Vec<Value>, objects: &mut ObjectTable, opt_index: u32) -> EvalResult {
        let outcome = match &self.external {
            External::Stream(def) => {
                let output_objects = def
                    .outputs
                    .iter()
                    .enumerate()
                    .zip(tuple.into_iter())
                    .map(|((slot, _name), value)| {
                        if opt_index == 0 {
                            objects.from_value(value)
                        } else if self.opt_index == 0 {
                            let key = OptKey::Unique {
                                instance: self.id.0 as u64,
                                batch: self.num_calls,
                                slot: slot as u32,
                            };
                            objects.optimistic(key, value, opt_index)
                        } else {
                            let key = OptKey::Shared {
                                external: def.name.clone(),
                                output_index: slot as u32,
                            };
                            objects.optimistic(key, value, opt_index)
                        }
                    })
                    .collect();
                Outcome::Stream(output_objects)
            }
            External::Function(_) => Outcome::Function(tuple.into_iter().next().expect("function always yields a value")),
            External::Predicate(_) => Outcome::Predicate(matches!(tuple.into_iter().next(), Some(Value::Bool(true)))),
        };
        EvalResult {
            instance: self.id,
            external: self.external.clone(),
            input_objects: self.input_objects.clone(),
            outcome,
            opt_index,
        }
    }
}
