pub mod diagnostics;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use diagnostics::{Compilation, CompilationError, DiagnosticMode, ERROR_EXIT_CODE};
pub use error::{ApiError, ApiResult};
pub use models::*;
