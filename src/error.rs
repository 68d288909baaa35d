//! Error types for the search MCP server
//!
//! Tool-level failures never leave the dispatcher (see
//! [`ToolError`](crate::tools::ToolError)); this module covers startup and
//! transport failures plus message sanitization for anything shown to callers.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximum length in bytes of an error message returned to callers
pub const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Main error type for server operations
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),

    #[error("Tool error: {0}")]
    ToolError(#[from] crate::tools::ToolError),

    #[error("Client error: {0}")]
    ClientError(#[from] crate::client::ClientError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl ServerError {
    /// Create internal error
    pub fn internal_error<S: Into<String>>(message: S) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

static SECRET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\b(?:password|token|api[_-]?key|client[_-]?secret|secret)\s*[=:]\s*)\S+")
        .expect("secret pattern is valid")
});

static SENSITIVE_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+")
        .expect("path pattern is valid")
});

/// Sanitize error messages before they reach a caller
///
/// Redacts credential-looking `name=value` and `name: value` pairs and sensitive paths, then
/// caps the length at [`MAX_ERROR_MESSAGE_LEN`] bytes on a char boundary.
pub fn sanitize_error_message(message: &str) -> String {
    let sanitized = SECRET_PATTERN.replace_all(message, "${1}***");
    let mut sanitized = SENSITIVE_PATH_PATTERN
        .replace_all(&sanitized, "/***REDACTED***/")
        .to_string();

    if sanitized.len() > MAX_ERROR_MESSAGE_LEN {
        let truncate_suffix = "...[truncated]";
        let mut cut = MAX_ERROR_MESSAGE_LEN - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str(truncate_suffix);
    }

    sanitized
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;
