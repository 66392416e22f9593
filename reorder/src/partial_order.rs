use pddlstream_instantiate::{EvalResult, Outcome};
use std::collections::HashSet;

/// Computes the set of `(i, j)` precedence pairs a stream plan must respect:
/// `i` precedes `j` whenever `j` consumes an output object that `i`
/// produced. Both indices are positions in `stream_plan`.
pub fn get_partial_orders(stream_plan: &[EvalResult]) -> HashSet<(usize, usize)> {
    let mut orders = HashSet::new();
    for j in 0..stream_plan.len() {
        for i in 0..j {
            if depends_on(&stream_plan[i], &stream_plan[j]) {
                orders.insert((i, j));
            }
        }
    }
    orders
}

fn depends_on(earlier: &EvalResult, later: &EvalResult) -> bool {
    let Outcome::Stream(produced) = &earlier.outcome else {
        return false;
    };
    later.input_objects.iter().any(|obj| produced.contains(obj))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pddlstream_core::{Evaluations, ObjectTable, Value};
    use pddlstream_external::{from_list_fn, External, FactPattern, StreamDef, Term};
    use pddlstream_instantiate::{InstanceTable, Instantiator};
    use std::sync::Arc;

    #[test]
    fn a_result_that_consumes_an_earlier_ones_output_is_ordered_after_it() {
        let mut objects = ObjectTable::new();
        let find = StreamDef::new(
            "find-tile",
            vec![],
            vec![],
            vec![Arc::from("?t")],
            vec![FactPattern::new("placeable", [Term::param("?t")])],
            from_list_fn(|_| vec![vec![Value::symbol("tile")]]),
            None,
            false,
        )
        .unwrap();
        let verify = StreamDef::new(
            "verify-tile",
            vec![Arc::from("?t")],
            vec![FactPattern::new("placeable", [Term::param("?t")])],
            vec![],
            vec![],
            from_list_fn(|_| vec![vec![]]),
            None,
            false,
        )
        .unwrap();
        let externals = vec![External::Stream(Arc::new(find)), External::Stream(Arc::new(verify))];
        let mut instantiator = Instantiator::new(externals);
        let mut instances = InstanceTable::new();
        let mut evaluations = Evaluations::new();

        let (index, inputs) = instantiator.pop_current().unwrap();
        let external = instantiator.externals()[index].clone();
        let instance_id = instances.get_instance(&external, inputs, 1);
        let producer = instances.get_mut(instance_id).next_optimistic(&mut objects);
        for fact in producer.get_certified(&mut objects) {
            if evaluations.add_atom(fact.clone()) {
                instantiator.add_atom(&fact, &evaluations, &mut objects);
            }
        }
        instantiator.swap_layers();
        let (index, inputs) = instantiator.pop_current().unwrap();
        let external = instantiator.externals()[index].clone();
        let instance_id = instances.get_instance(&external, inputs, 1);
        let consumer = instances.get_mut(instance_id).next_optimistic(&mut objects);

        let stream_plan = vec![producer, consumer];
        let orders = get_partial_orders(&stream_plan);
        assert!(orders.contains(&(0, 1)));
    }
}
