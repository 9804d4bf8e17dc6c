//! Core error types for the tie-rs engine.
//!
//! All engine failures are local and non-fatal: a bad binding is skipped, an
//! invalid field is marked, a failed remote load becomes a form-level message.
//! [`TieError`] exists so those local failures carry a typed cause instead of
//! a bare string.

use thiserror::Error;

/// The primary error type for the tie-rs engine.
///
/// None of these variants abort form processing; they are reported by the
/// operation that hit them and the rest of the form carries on.
#[derive(Error, Debug)]
pub enum TieError {
    /// A dotted property path could not be resolved against the bound source.
    ///
    /// Raised when a path prefix does not evaluate to an existing object.
    /// The engine never auto-creates intermediate objects.
    #[error("binding path {path:?} failed to resolve at segment {segment:?}")]
    BindingResolution {
        /// The full property path that was being resolved.
        path: String,
        /// The segment at which resolution stopped.
        segment: String,
    },

    /// A remote option fetch or upload failed (network error or timeout).
    #[error("remote load failed: {0}")]
    RemoteLoad(String),

    /// A field declared a custom validation pattern that is not a valid regex.
    #[error("invalid validation pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The offending pattern string.
        pattern: String,
        /// Why it failed to compile.
        reason: String,
    },

    /// A configuration value is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An error occurred during serialization or deserialization.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred (e.g. reading a settings file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience type alias for `Result<T, TieError>`.
pub type TieResult<T> = Result<T, TieError>;
