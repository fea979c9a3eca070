use protoweave_api::{ApiError, CompilationError};
use protoweave_ingest::{IngestError, RunId};
use protoweave_plugin::{RenderError, TypeSystemError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed code generator request: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("invalid descriptor set: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),
    #[error("request names unknown file to generate: {0}")]
    UnknownFile(String),
    #[error("invalid pipeline parameters: {0}")]
    InvalidParams(String),
    #[error(
        "plugin `{plugin}` is registered with run {registered} and cannot join run {requested}"
    )]
    ConflictingRegistration {
        plugin: String,
        registered: RunId,
        requested: RunId,
    },
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    TypeSystem(#[from] TypeSystemError),
    #[error(transparent)]
    Compilation(#[from] CompilationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
