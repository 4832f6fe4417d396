//! Recoverable findings reported during a run.
//!
//! A diagnostic never stops the analysis. Each one is logged at `warn` as it
//! is produced and kept in the run's [`crate::AnalysisResult`].

use std::fmt;

use tracing::warn;

/// A non-fatal finding for human review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Dump order went backwards; the size of `symbol` was clamped to zero.
    NegativeSize {
        symbol: String,
        address: u64,
        next_address: u64,
    },
    /// A reference names a symbol absent from the table.
    /// `from` is `None` when the missing name is a root.
    Unresolved { from: Option<String>, target: String },
    /// A name with several definitions was reached; all of them were marked.
    Ambiguous { name: String, candidates: usize },
}

impl Diagnostic {
    /// Log this diagnostic through tracing.
    pub fn emit(&self) {
        match self {
            Diagnostic::NegativeSize {
                symbol,
                address,
                next_address,
            } => warn!(
                symbol = %symbol,
                address = %format!("{:#x}", address),
                next_address = %format!("{:#x}", next_address),
                "negative size, clamped to 0"
            ),
            Diagnostic::Unresolved { from, target } => warn!(
                from = from.as_deref().unwrap_or("<root>"),
                callee = %target,
                "unresolved reference"
            ),
            Diagnostic::Ambiguous { name, candidates } => warn!(
                symbol = %name,
                candidates = *candidates,
                "ambiguous symbol, marking every candidate reached"
            ),
        }
    }

    /// The symbol name this diagnostic is about.
    pub fn symbol(&self) -> &str {
        match self {
            Diagnostic::NegativeSize { symbol, .. } => symbol,
            Diagnostic::Unresolved { target, .. } => target,
            Diagnostic::Ambiguous { name, .. } => name,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NegativeSize {
                symbol,
                address,
                next_address,
            } => write!(
                f,
                "negative size for {} ({:#x} followed by {:#x}), clamped to 0",
                symbol, address, next_address
            ),
            Diagnostic::Unresolved { from: Some(from), target } => {
                write!(f, "unresolved reference {} -> {}", from, target)
            }
            Diagnostic::Unresolved { from: None, target } => {
                write!(f, "root {} not found in disassembly", target)
            }
            Diagnostic::Ambiguous { name, candidates } => write!(
                f,
                "ambiguous symbol {} ({} definitions), all marked reached",
                name, candidates
            ),
        }
    }
}
