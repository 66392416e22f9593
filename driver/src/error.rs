use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("external registration failed: {0}")]
    External(#[from] pddlstream_external::ExternalError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
