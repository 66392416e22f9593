use crate::error::ExternalError;
use crate::generator::{from_list_fn, GenFn};
use crate::pattern::FactPattern;
use pddlstream_core::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Declarative schema of a stream: `inputs, domain, outputs, certified,
/// gen_fn, opt_gen_fn` (spec §3).
pub struct StreamDef {
    pub name: Arc<str>,
    pub inputs: Vec<Arc<str>>,
    pub domain: Vec<FactPattern>,
    pub outputs: Vec<Arc<str>>,
    pub certified: Vec<FactPattern>,
    pub gen_fn: GenFn,
    pub opt_gen_fn: GenFn,
    pub eager: bool,
}

impl StreamDef {
    /// Builds a stream, validating the three invariants spec §3 attaches to
    /// streams:
    ///  - output parameter names are unique,
    ///  - they are disjoint from the inputs,
    ///  - every parameter appearing in `certified` is bound by inputs ∪ outputs.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<Arc<str>>,
        inputs: Vec<Arc<str>>,
        domain: Vec<FactPattern>,
        outputs: Vec<Arc<str>>,
        certified: Vec<FactPattern>,
        gen_fn: GenFn,
        opt_gen_fn: Option<GenFn>,
        eager: bool,
    ) -> Result<StreamDef, ExternalError> {
        let name = name.into();
        let mut seen = HashSet::new();
        for output in &outputs {
            if !seen.insert(output.clone()) {
                return Err(ExternalError::DuplicateOutput {
                    stream: name.clone(),
                    param: output.clone(),
                });
            }
        }
        for input in &inputs {
            if outputs.contains(input) {
                return Err(ExternalError::InputOutputOverlap {
                    stream: name.clone(),
                    param: input.clone(),
                });
            }
        }
        let bound: HashSet<&Arc<str>> = inputs.iter().chain(outputs.iter()).collect();
        for pattern in &certified {
            for param in pattern.params() {
                if !bound.contains(param) {
                    return Err(ExternalError::UnboundCertifiedParam {
                        stream: name.clone(),
                        param: param.clone(),
                    });
                }
            }
        }
        let input_set: HashSet<&Arc<str>> = inputs.iter().collect();
        for pattern in &domain {
            for param in pattern.params() {
                if !input_set.contains(param) {
                    return Err(ExternalError::UnboundDomainParam {
                        external: name.clone(),
                        param: param.clone(),
                    });
                }
            }
        }
        let opt_gen_fn = opt_gen_fn.unwrap_or_else(|| default_opt_gen_fn(outputs.clone()));
        Ok(StreamDef {
            name,
            inputs,
            domain,
            outputs,
            certified,
            gen_fn,
            opt_gen_fn,
            eager,
        })
    }
}

/// Default optimistic generator: a single batch containing one tuple of
/// placeholder hint values, one per output parameter. The actual object
/// produced from each hint is interned by `Instance::next_optimistic`, which
/// decides between a per-call-unique or an across-instance-shared identity
/// based on the owning instance's `opt_index` — this function only needs to
/// supply *a* representative value. Ported from `stream.py`'s
/// `get_shared_gen_fn`.
fn default_opt_gen_fn(outputs: Vec<Arc<str>>) -> GenFn {
    from_list_fn(move |_inputs| vec![outputs.iter().map(|o| Value::symbol(format!("${o}"))).collect()])
}

/// Builds a stream whose `gen_fn` invents a fresh placeholder value per
/// output parameter per call, without requiring a user-supplied generator —
/// handy for sketching a problem before the real samplers exist. Ported from
/// `stream.py`'s `DEBUG`/`DebugValue` sentinel, with the output counter owned
/// by the caller (see [`crate::registry::DebugCounters`]) instead of a
/// process-wide `defaultdict(count)`.
pub fn debug_stream(
    name: impl Into<Arc<str>>,
    inputs: Vec<Arc<str>>,
    domain: Vec<FactPattern>,
    outputs: Vec<Arc<str>>,
    certified: Vec<FactPattern>,
    counters: crate::registry::DebugCounters,
) -> Result<StreamDef, ExternalError> {
    let name = name.into();
    let stream_name = name.clone();
    let gen_outputs = outputs.clone();
    let gen_fn = from_list_fn(move |_inputs| {
        let tuple = gen_outputs
            .iter()
            .map(|param| {
                let index = counters.next(stream_name.clone(), param.clone());
                Value::symbol(format!("debug-{param}-{index}"))
            })
            .collect();
        vec![tuple]
    });
    StreamDef::new(name, inputs, domain, outputs, certified, gen_fn, None, false)
}
