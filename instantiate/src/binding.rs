use pddlstream_core::{Evaluations, Object, ObjectTable};
use pddlstream_external::{FactPattern, Term};
use std::collections::HashMap;
use std::sync::Arc;

/// Finds every way to bind `domain`'s parameters against facts currently
/// known in `evaluations`, via straightforward backtracking join over the
/// pattern list. Domains in this system are small (a handful of atoms), so
/// this is not worth indexing further than the per-predicate fact scan the
/// caller already does.
pub fn find_bindings(domain: &[FactPattern], evaluations: &Evaluations, objects: &mut ObjectTable) -> Vec<HashMap<Arc<str>, Object>> {
    let mut results = Vec::new();
    extend(domain, 0, HashMap::new(), evaluations, objects, &mut results);
    results
}

fn extend(
    domain: &[FactPattern],
    index: usize,
    bound: HashMap<Arc<str>, Object>,
    evaluations: &Evaluations,
    objects: &mut ObjectTable,
    results: &mut Vec<HashMap<Arc<str>, Object>>,
) {
    let Some(pattern) = domain.get(index) else {
        results.push(bound);
        return;
    };
    for fact in evaluations.iter() {
        if fact.predicate != pattern.predicate || fact.args.len() != pattern.args.len() {
            continue;
        }
        let mut candidate = bound.clone();
        let mut ok = true;
        for (term, &arg) in pattern.args.iter().zip(fact.args.iter()) {
            match term {
                Term::Param(name) => match candidate.get(name) {
                    Some(&existing) if existing != arg => {
                        ok = false;
                        break;
                    }
                    Some(_) => {}
                    None => {
                        candidate.insert(name.clone(), arg);
                    }
                },
                Term::Constant(value) => {
                    if objects.from_value(value.clone()) != arg {
                        ok = false;
                        break;
                    }
                }
            }
        }
        if ok {
            extend(domain, index + 1, candidate, evaluations, objects, results);
        }
    }
}
