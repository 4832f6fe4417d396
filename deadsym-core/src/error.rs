//! Typed error handling for deadsym.
//!
//! Every variant here is fatal: the run aborts before any report is printed.
//! Recoverable findings (negative sizes, unresolved references, ambiguous
//! names) are not errors, see [`crate::diagnostics`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deadsym operations.
#[derive(Error, Debug)]
pub enum DeadsymError {
    /// The dynamic symbol dump lists the same exported name twice.
    #[error("Exported symbol listed twice: {name} (corrupt export table?)")]
    DuplicateExport { name: String },

    /// A curated root is already visible as an export.
    #[error("Curated root {name} is already exported; the curated list is stale")]
    StaleCuratedRoot { name: String },

    /// Debug line info attributes one symbol to two different files.
    #[error("Symbol {symbol} attributed to {conflicting} but already belongs to {existing}")]
    ConflictingAttribution {
        symbol: String,
        existing: String,
        conflicting: String,
    },

    /// I/O error when reading input files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// An external inspection tool could not be run or exited with failure.
    #[error("{program} failed ({status}): {stderr}")]
    Tool {
        program: String,
        status: String,
        stderr: String,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl DeadsymError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a duplicate export error.
    pub fn duplicate_export(name: impl Into<String>) -> Self {
        Self::DuplicateExport { name: name.into() }
    }

    /// Create a stale curated root error.
    pub fn stale_curated_root(name: impl Into<String>) -> Self {
        Self::StaleCuratedRoot { name: name.into() }
    }

    /// Create a conflicting attribution error.
    pub fn conflicting_attribution(
        symbol: impl Into<String>,
        existing: impl Into<String>,
        conflicting: impl Into<String>,
    ) -> Self {
        Self::ConflictingAttribution {
            symbol: symbol.into(),
            existing: existing.into(),
            conflicting: conflicting.into(),
        }
    }

    /// Create a tool failure error.
    pub fn tool(
        program: impl Into<String>,
        status: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Tool {
            program: program.into(),
            status: status.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error comes from inconsistent dump contents rather than
    /// the environment (missing file, broken toolchain).
    pub fn is_consistency_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateExport { .. }
                | Self::StaleCuratedRoot { .. }
                | Self::ConflictingAttribution { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for deadsym results.
pub type DeadsymResult<T> = Result<T, DeadsymError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> DeadsymResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> DeadsymResult<T> {
        self.map_err(|e| DeadsymError::io(path, e))
    }
}
