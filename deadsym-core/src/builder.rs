//! Builder pattern API for deadsym analysis.
//!
//! Provides a fluent interface for configuring and running one analysis:
//!
//! ```rust,ignore
//! use deadsym_core::prelude::*;
//!
//! let result = Deadsym::new("/path/to/libfoo.so")
//!     .with_config(&config)
//!     .analyze()?;
//!
//! print_plain(&result.report);
//! ```
//!
//! A run owns its symbol table and root set; every stage borrows them in
//! turn and nothing outlives the returned [`AnalysisResult`].

use std::path::PathBuf;

use tracing::info;

use crate::backlinks::index_backlinks;
use crate::config::DeadsymConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{DeadsymError, DeadsymResult};
use crate::extract::{extract_disassembly, extract_exports};
use crate::graph::mark_reachable;
use crate::report::{generate_report, Report};
use crate::root::{resolve_roots, RootSet, CURATED_ROOTS};
use crate::symbol::{build_symbol_table, SymbolTable, DEFAULT_SYSTEM_INCLUDE_PREFIXES};
use crate::tools::{capture_dumps, ToolSet};

/// Settings for the pure pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Attributions under these prefixes are ignored.
    pub system_include_prefixes: Vec<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            system_include_prefixes: DEFAULT_SYSTEM_INCLUDE_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Summary counters of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    pub total_symbols: usize,
    pub distinct_names: usize,
    pub edges: usize,
    pub exported_roots: usize,
    pub curated_roots: usize,
    pub reached: usize,
    pub unreached: usize,
    pub unresolved_references: usize,
    pub ambiguous_names: usize,
}

/// Everything one run produced.
#[derive(Debug)]
pub struct AnalysisResult {
    pub table: SymbolTable,
    pub roots: RootSet,
    pub report: Report,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: AnalysisStats,
}

/// Run every stage on already captured dump text.
///
/// Stages run strictly in order: extract, build table, resolve roots, mark,
/// index backlinks, report. Any fatal error aborts before the report exists.
pub fn analyze_dumps(
    disassembly: &str,
    exports: &str,
    options: &AnalysisOptions,
) -> DeadsymResult<AnalysisResult> {
    analyze_dumps_with_roots(disassembly, exports, options, CURATED_ROOTS)
}

/// Same as [`analyze_dumps`] with an explicit curated root list.
pub fn analyze_dumps_with_roots(
    disassembly: &str,
    exports: &str,
    options: &AnalysisOptions,
    curated: &[&str],
) -> DeadsymResult<AnalysisResult> {
    let disasm_events = extract_disassembly(disassembly);
    let export_events = extract_exports(exports);

    let (mut table, mut diagnostics) = build_symbol_table(
        &disasm_events,
        options.system_include_prefixes.iter().cloned(),
    )?;
    let roots = resolve_roots(&export_events, curated)?;

    let outcome = mark_reachable(&mut table, &roots);
    diagnostics.extend(outcome.diagnostics);

    index_backlinks(&mut table);
    let report = generate_report(&table);

    let reached = table.symbols().iter().filter(|s| s.reached).count();
    let stats = AnalysisStats {
        total_symbols: table.len(),
        distinct_names: table.name_count(),
        edges: table.edge_count(),
        exported_roots: roots.exported_count(),
        curated_roots: roots.curated_count(),
        reached,
        unreached: table.len() - reached,
        unresolved_references: diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::Unresolved { .. }))
            .count(),
        ambiguous_names: diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::Ambiguous { .. }))
            .count(),
    };

    info!(
        symbols = stats.total_symbols,
        reached = stats.reached,
        unreached = stats.unreached,
        "analysis complete"
    );

    Ok(AnalysisResult {
        table,
        roots,
        report,
        diagnostics,
        stats,
    })
}

/// Builder for configuring dead symbol analysis of one library.
#[derive(Debug, Clone)]
pub struct Deadsym {
    /// Shared library or object file to analyze
    library: PathBuf,

    /// Dump producing programs
    tools: ToolSet,

    /// Pipeline settings
    options: AnalysisOptions,
}

impl Deadsym {
    /// Create a new analysis builder for the given library.
    pub fn new(library: impl Into<PathBuf>) -> Self {
        Self {
            library: library.into(),
            tools: ToolSet::default(),
            options: AnalysisOptions::default(),
        }
    }

    /// Apply tool overrides and attribution prefixes from a config file.
    pub fn with_config(mut self, config: &DeadsymConfig) -> Self {
        self.tools = config.tool_set();
        self.options.system_include_prefixes = config.system_include_prefixes();
        self
    }

    /// Override the dump programs.
    pub fn with_tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    /// Add a path prefix whose line info is ignored.
    pub fn system_include_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.system_include_prefixes.push(prefix.into());
        self
    }

    /// Capture both dumps and run the pipeline.
    pub fn analyze(&self) -> DeadsymResult<AnalysisResult> {
        if !self.library.is_file() {
            return Err(DeadsymError::io(
                self.library.clone(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "library not found"),
            ));
        }

        info!(library = %self.library.display(), "analyzing");
        let dumps = capture_dumps(&self.tools, &self.library)?;
        analyze_dumps(&dumps.disassembly, &dumps.exports, &self.options)
    }
}
