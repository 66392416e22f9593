use std::sync::Arc;
use thiserror::Error;

/// A malformed external declaration. Fatal: raised while building the
/// registry, before a solve is ever attempted (spec §7).
#[derive(Error, Debug)]
pub enum ExternalError {
    #[error("output parameter `{param}` for stream `{stream}` is not unique")]
    DuplicateOutput { stream: Arc<str>, param: Arc<str> },
    #[error("parameter `{param}` for stream `{stream}` is both an input and an output")]
    InputOutputOverlap { stream: Arc<str>, param: Arc<str> },
    #[error("parameter `{param}` in the certified facts of `{stream}` is not bound by any input or output")]
    UnboundCertifiedParam { stream: Arc<str>, param: Arc<str> },
    #[error("parameter `{param}` in the domain of `{external}` is not bound by any input")]
    UnboundDomainParam { external: Arc<str>, param: Arc<str> },
    #[error("external name `{0}` is already registered")]
    DuplicateName(Arc<str>),
}
