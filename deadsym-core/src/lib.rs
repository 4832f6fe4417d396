//! deadsym-core: dead symbol detection for shared libraries
//!
//! Finds compiled symbols that cannot be reached from a library's public API
//! by walking call references in its disassembly, starting from the exported
//! dynamic symbols plus a curated list of callback handlers.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use deadsym_core::prelude::*;
//!
//! let result = Deadsym::new("libsflphone.so").analyze()?;
//! print_plain(&result.report);
//! ```
//!
//! # Module Organization
//!
//! - [`extract`]: line matchers turning dump text into events
//! - [`symbol`]: symbol table construction (candidates, edges, sizes, files)
//! - [`root`]: root set from exports and curated handlers
//! - [`graph`]: reachability marking
//! - [`backlinks`]: reverse reference index
//! - [`report`]: grouping, size totals and text rendering
//! - [`tools`]: running `objdump` / `nm`
//! - [`builder`]: fluent builder and the pure pipeline
//! - [`error`]: typed fatal errors
//! - [`diagnostics`]: recoverable findings

pub mod backlinks;
pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod graph;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod root;
pub mod symbol;
pub mod tools;

// ============================================================================
// Explicit Re-exports
// ============================================================================

// Error types
pub use error::{DeadsymError, DeadsymResult, IoResultExt};

// Diagnostics
pub use diagnostics::Diagnostic;

// Builder API
pub use builder::{
    analyze_dumps, analyze_dumps_with_roots, AnalysisOptions, AnalysisResult, AnalysisStats,
    Deadsym,
};

// Configuration
pub use config::{load_config, DeadsymConfig, CONFIG_FILE};

// Text extraction
pub use extract::{
    extract_disassembly, extract_exports, parse_disassembly_line, parse_export_line,
    strip_offset, DumpEvent,
};

// Symbol table
pub use symbol::{
    build_symbol_table, is_internal_label, Symbol, SymbolId, SymbolTable, SymbolTableBuilder,
    DEFAULT_SYSTEM_INCLUDE_PREFIXES,
};

// Roots
pub use root::{resolve_roots, RootSet, CURATED_ROOTS};

// Reachability
pub use graph::{mark_reachable, MarkOutcome};
pub use backlinks::index_backlinks;

// Reporting
pub use report::{
    format_size, generate_report, print_plain, render_plain, FileGroup, Report, ReportEntry,
};

// Logging
pub use logging::{init_structured_logging, LogFormat};

// External tools
pub use tools::{capture_dumps, run_tool, Dumps, ToolSet};

#[cfg(test)]
mod tests;
