//! Error types for `webfm-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

use std::path::PathBuf;

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for the caller to display
/// a meaningful message. No variant is fatal: every error leaves the
/// previously-settled model state untouched.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The server answered with a non-200 status. The message comes from
    /// the return-error header when present, or a generic status line.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The server answered 200 but the body was not a well-formed listing
    /// or file response. Distinct from [`CoreError::RequestFailed`] so
    /// callers can render a different fallback.
    #[error("corrupt response: {0}")]
    CorruptResponse(String),

    /// Paste was requested but no clipboard record exists.
    #[error("the clipboard is empty")]
    EmptyClipboard,

    /// A version-control transfer was requested against a destination
    /// directory that is not under version control.
    #[error("not under version control: {0}")]
    NotVersioned(String),

    /// An entry name is invalid (empty, contains a path separator, or a
    /// batch target could not be decoded back into names).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A configuration file does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `webfm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
