//! Compiler diagnostics reported against proto declarations.
//!
//! An error either terminates the process or, under tests, becomes a [`CompilationError`]
//! value that the caller propagates. Which one happens is decided once, from
//! [`DiagnosticMode`], and never by inspecting the caller.

use crate::error::{ApiError, ApiResult};
use crate::models::{File, Span};
use std::path::Path;
use url::Url;

/// Exit code of the process terminated by a compilation error.
pub const ERROR_EXIT_CODE: i32 = -1;

pub const ERROR_PREFIX: &str = "e:";
pub const WARNING_PREFIX: &str = "w:";

/// Environment variable which switches diagnostics to the testing mode.
pub const TESTS_ENV_VAR: &str = "PROTOWEAVE_TESTS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticMode {
    /// Errors are printed to stderr and the process exits with [`ERROR_EXIT_CODE`].
    #[default]
    Production,
    /// Errors are printed to stderr and returned as [`CompilationError`].
    Testing,
}

impl DiagnosticMode {
    pub fn from_env() -> Self {
        match std::env::var(TESTS_ENV_VAR) {
            Ok(value) if matches!(value.trim(), "1" | "true" | "yes") => DiagnosticMode::Testing,
            _ => DiagnosticMode::Production,
        }
    }
}

/// A compilation error reported in the testing mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CompilationError {
    /// The formatted diagnostic, exactly as printed.
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Compilation {
    mode: DiagnosticMode,
}

impl Compilation {
    pub fn new(mode: DiagnosticMode) -> Self {
        Self { mode }
    }

    pub fn from_env() -> Self {
        Self::new(DiagnosticMode::from_env())
    }

    pub fn mode(&self) -> DiagnosticMode {
        self.mode
    }

    /// Reports an error at the given one-based line and column of the file.
    ///
    /// In the production mode this function does not return.
    pub fn error(&self, file: &Path, line: u32, column: u32, message: &str) -> CompilationError {
        let output = error_message(file, line, column, message);
        eprintln!("{output}");
        match self.mode {
            DiagnosticMode::Production => std::process::exit(ERROR_EXIT_CODE),
            DiagnosticMode::Testing => {
                tracing::error!("{}", output);
                CompilationError { message: output }
            }
        }
    }

    pub fn error_at(&self, file: &File, span: Span, message: &str) -> CompilationError {
        self.error(file.as_path(), span.start_line, span.start_column, message)
    }

    /// Reports an error unless the condition holds.
    pub fn check(
        &self,
        condition: bool,
        file: &File,
        span: Span,
        message: impl FnOnce() -> String,
    ) -> Result<(), CompilationError> {
        if condition {
            Ok(())
        } else {
            Err(self.error_at(file, span, &message()))
        }
    }

    /// Prints a warning to stdout and returns the printed text.
    pub fn warning(&self, file: &Path, line: u32, column: u32, message: &str) -> String {
        let output = warning_message(file, line, column, message);
        println!("{output}");
        output
    }

    pub fn warning_at(&self, file: &File, span: Span, message: &str) -> String {
        self.warning(file.as_path(), span.start_line, span.start_column, message)
    }
}

pub fn error_message(file: &Path, line: u32, column: u32, message: &str) -> String {
    indented_message(ERROR_PREFIX, file, line, column, message)
        .unwrap_or_else(|_| message.to_string())
}

pub fn warning_message(file: &Path, line: u32, column: u32, message: &str) -> String {
    indented_message(WARNING_PREFIX, file, line, column, message)
        .unwrap_or_else(|_| message.to_string())
}

/// Formats a diagnostic message.
///
/// The first line of the message follows the location. Every other line is indented
/// by the length of the prefix plus one space so that it lines up under the location.
pub fn indented_message(
    prefix: &str,
    file: &Path,
    line: u32,
    column: u32,
    message: &str,
) -> ApiResult<String> {
    if prefix.trim().is_empty() {
        return Err(ApiError::BlankPrefix(format!(
            "the message about {} needs a prefix",
            file_locator(file)
        )));
    }
    let mut lines = message.lines();
    let header = lines.next().unwrap_or_default();
    let indent = " ".repeat(prefix.chars().count() + 1);

    let mut output = format!("{prefix} {}:{line}:{column}: {header}", file_locator(file));
    for body_line in lines {
        output.push('\n');
        output.push_str(&indent);
        output.push_str(body_line);
    }
    Ok(output)
}

/// Renders an absolute path as a `file:///` URI and leaves a relative one as is.
pub fn file_locator(file: &Path) -> String {
    if file.is_absolute() {
        if let Ok(url) = Url::from_file_path(file) {
            return url.to_string();
        }
    }
    file.display().to_string()
}
