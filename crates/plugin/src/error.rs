use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file `{0}` is not valid UTF-8")]
    NotUtf8(PathBuf),
    #[error("file `{0}` already exists in the source set")]
    AlreadyExists(PathBuf),
    #[error("file `{0}` is not found in the source set")]
    FileNotFound(PathBuf),
    #[error("indentation level must not be negative, got {0}")]
    NegativeIndent(i32),
    #[error("inline code must be a single line, got {0:?}")]
    MultilineCode(String),
    #[error("renderer `{renderer}` failed: {message}")]
    Renderer { renderer: String, message: String },
    #[error(transparent)]
    TypeSystem(#[from] TypeSystemError),
    #[error(transparent)]
    Compilation(#[from] protoweave_api::CompilationError),
}

impl RenderError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeSystemError {
    #[error("{kind} `{name}` not found in the type system")]
    NotFound { kind: &'static str, name: String },
    #[error("message `{message}` has no field `{field}`")]
    NoSuchField { message: String, field: String },
    #[error(
        "cannot resolve the field path `{path}`: `{field}` does not denote a message field"
    )]
    NotAMessageField { path: String, field: String },
    #[error("`{0}` was not found in the passed proto files or their dependencies")]
    UnknownType(String),
    #[error("`{0}` is neither a message nor an enum")]
    NotAMessageOrEnum(String),
}
