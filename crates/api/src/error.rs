#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Blank diagnostic prefix: {0}")]
    BlankPrefix(String),
    #[error(transparent)]
    Compilation(#[from] crate::diagnostics::CompilationError),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
