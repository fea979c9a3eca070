use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unknown run: {0}")]
    UnknownRun(String),
    #[error("run already open: {0}")]
    RunAlreadyOpen(String),
    #[error("delivery failed: {0}")]
    Delivery(String),
    #[error("event order violated: {0}")]
    Invariant(String),
    #[error("storage failed: {0}")]
    Storage(String),
}
