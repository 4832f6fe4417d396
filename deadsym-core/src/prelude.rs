//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use deadsym_core::prelude::*;
//! ```

// Builder API
pub use crate::builder::{analyze_dumps, AnalysisOptions, AnalysisResult, Deadsym};

// Error types
pub use crate::error::{DeadsymError, DeadsymResult};

// Configuration
pub use crate::config::{load_config, DeadsymConfig};

// Stages
pub use crate::graph::mark_reachable;
pub use crate::root::{resolve_roots, RootSet};
pub use crate::symbol::{SymbolTable, SymbolTableBuilder};

// Reporting
pub use crate::report::{print_plain, render_plain, Report};
