use crate::binding::find_bindings;
use pddlstream_core::{Evaluations, Fact, Object, ObjectTable};
use pddlstream_external::External;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// A candidate grounding discovered by the instantiator: which external,
/// bound to which input objects.
pub type Grounding = (usize, SmallVec<[Object; 4]>);

/// Finds new external groundings as facts are added, in BFS layers: a
/// grounding discovered while draining the current layer is held in the
/// next layer rather than processed immediately, so eager streams chain
/// breadth-first instead of depth-first (spec §4.2).
pub struct Instantiator {
    externals: Vec<External>,
    predicate_index: HashMap<Arc<str>, Vec<usize>>,
    seen: HashSet<Grounding>,
    current: VecDeque<Grounding>,
    next: VecDeque<Grounding>,
    /// Non-eager groundings [`crate::layered_process`] discovers but does
    /// not drive to exhaustion, set aside for the optimistic grounder to
    /// pick up instead of being silently dropped once popped.
    deferred: VecDeque<Grounding>,
}

impl Instantiator {
    pub fn new(externals: Vec<External>) -> Instantiator {
        let mut predicate_index: HashMap<Arc<str>, Vec<usize>> = HashMap::new();
        let mut current = VecDeque::new();
        let mut seen = HashSet::new();
        for (index, external) in externals.iter().enumerate() {
            let domain = external.domain();
            if domain.is_empty() {
                let grounding = (index, SmallVec::new());
                seen.insert(grounding.clone());
                current.push_back(grounding);
                continue;
            }
            for pattern in domain {
                predicate_index.entry(pattern.predicate.clone()).or_default().push(index);
            }
        }
        Instantiator {
            externals,
            predicate_index,
            seen,
            current,
            next: VecDeque::new(),
            deferred: VecDeque::new(),
        }
    }

    pub fn externals(&self) -> &[External] {
        &self.externals
    }

    /// Finds a registered external's index by name. Used to re-locate the
    /// grounding behind an [`crate::Instance`] after the fact, since an
    /// instance only remembers the external itself, not its index.
    pub fn external_index(&self, name: &str) -> Option<usize> {
        self.externals.iter().position(|external| &*external.name() == name)
    }

    /// Re-enqueues a grounding for optimistic processing even though it has
    /// already been seen once — used after a double binding decays an
    /// instance's `opt_index`, so the next optimistic grounding pass
    /// re-hypothesizes it under the lowered index instead of never visiting
    /// it again.
    pub fn force_requeue(&mut self, grounding: Grounding) {
        self.deferred.push_back(grounding);
    }

    /// Re-derives groundings for every external whose domain mentions
    /// `fact.predicate`, enqueueing ones not seen before into the next
    /// layer.
    pub fn add_atom(&mut self, fact: &Fact, evaluations: &Evaluations, objects: &mut ObjectTable) {
        let Some(candidates) = self.predicate_index.get(&fact.predicate).cloned() else {
            return;
        };
        for index in candidates {
            let external = &self.externals[index];
            let domain = external.domain();
            for binding in find_bindings(domain, evaluations, objects) {
                let input_objects: SmallVec<[Object; 4]> = external
                    .inputs()
                    .iter()
                    .map(|name| *binding.get(name).expect("domain binds every input"))
                    .collect();
                let grounding = (index, input_objects);
                if self.seen.insert(grounding.clone()) {
                    self.next.push_back(grounding);
                }
            }
        }
    }

    /// Pops the next grounding from the current layer, if any.
    pub fn pop_current(&mut self) -> Option<Grounding> {
        self.current.pop_front()
    }

    /// Sets a non-eager grounding aside for the optimistic grounder.
    pub fn defer(&mut self, grounding: Grounding) {
        self.deferred.push_back(grounding);
    }

    /// Pops the next deferred (non-eager) grounding, if any.
    pub fn pop_deferred(&mut self) -> Option<Grounding> {
        self.deferred.pop_front()
    }

    pub fn deferred_is_empty(&self) -> bool {
        self.deferred.is_empty()
    }

    /// Moves every deferred grounding into the current layer, so the
    /// optimistic grounder's own BFS loop picks them up on its first pass.
    pub fn promote_deferred(&mut self) {
        while let Some(grounding) = self.deferred.pop_front() {
            self.current.push_back(grounding);
        }
    }

    pub fn current_is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn next_is_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Advances to the next BFS layer: everything discovered while draining
    /// `current` becomes the new `current`.
    pub fn swap_layers(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }
}
