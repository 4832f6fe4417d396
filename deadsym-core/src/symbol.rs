//! Symbol table construction from disassembly events.
//!
//! Names are not unique: the table maps every name to the ordered list of
//! candidate definitions carrying it (dump order). Symbols live in one arena
//! and are addressed by [`SymbolId`].
//!
//! Performance characteristics:
//! - Build: O(|events|), one pass, single cursor
//! - Lookup by name: O(1) average

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::error::{DeadsymError, DeadsymResult};
use crate::extract::{strip_offset, DumpEvent};

/// Line info under these prefixes belongs to toolchain headers, not to the
/// library's own sources.
pub const DEFAULT_SYSTEM_INCLUDE_PREFIXES: &[&str] =
    &["/usr/include/", "/usr/lib/gcc/", "/usr/lib/llvm"];

/// Symbols whose line info points into runtime or toolchain sources.
/// Attributions are never recorded for them.
pub const DEBUG_METADATA_PREFIXES: &[&str] = &["__aeabi_", "__gnu_", "__cxa_", "_GLOBAL__sub_I_"];

fn internal_label_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // .L local labels, ARM/AArch64 mapping symbols ($a, $d, $t, $x, $d.1)
    REGEX.get_or_init(|| Regex::new(r"^(\.L|\$[a-z](\.|$))").expect("Hardcoded regex pattern is valid"))
}

/// Whether `name` is a compiler/assembler generated label.
///
/// Such names legitimately repeat and are never reported as dead.
pub fn is_internal_label(name: &str) -> bool {
    internal_label_regex().is_match(name)
}

fn has_debug_metadata_prefix(name: &str) -> bool {
    DEBUG_METADATA_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Index of a symbol in the table's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

/// One definition found in the disassembly dump.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub address: u64,
    /// Call targets in body order; never contains `name` itself.
    pub references: Vec<String>,
    /// Set at most once.
    pub source_file: Option<String>,
    /// Monotonic; only the marker sets it.
    pub reached: bool,
    /// Filled by the backlink indexer once the table is complete.
    pub referenced_by: BTreeSet<String>,
    /// Distance to the next definition in dump order; 0 for the last one.
    pub approx_size: u64,
}

impl Symbol {
    fn new(name: String, address: u64) -> Self {
        Self {
            name,
            address,
            references: Vec::new(),
            source_file: None,
            reached: false,
            referenced_by: BTreeSet::new(),
            approx_size: 0,
        }
    }
}

/// All symbols of one run, indexed by name.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_name: HashMap<String, Vec<SymbolId>>,
}

impl SymbolTable {
    /// Candidate definitions for `name`, in dump order. Empty if unknown.
    pub fn candidates(&self, name: &str) -> &[SymbolId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0]
    }

    /// All symbols in dump order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Iterate `(id, symbol)` pairs in dump order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(i, s)| (SymbolId(i), s))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of distinct names.
    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    /// Names with more than one candidate.
    pub fn ambiguous_names(&self) -> impl Iterator<Item = &str> {
        self.by_name
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(name, _)| name.as_str())
    }

    /// Total number of recorded reference edges.
    pub fn edge_count(&self) -> usize {
        self.symbols.iter().map(|s| s.references.len()).sum()
    }

    fn push(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        self.by_name.entry(symbol.name.clone()).or_default().push(id);
        self.symbols.push(symbol);
        id
    }
}

/// Builds a [`SymbolTable`] from disassembly events.
///
/// Keeps a single cursor on the most recent `DefineSymbol`; references and
/// attributions apply to it.
#[derive(Debug)]
pub struct SymbolTableBuilder {
    table: SymbolTable,
    current: Option<SymbolId>,
    system_prefixes: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl SymbolTableBuilder {
    /// Create a builder ignoring attributions under `system_prefixes`.
    pub fn new<I, S>(system_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: SymbolTable::default(),
            current: None,
            system_prefixes: system_prefixes.into_iter().map(Into::into).collect(),
            diagnostics: Vec::new(),
        }
    }

    /// Builder with [`DEFAULT_SYSTEM_INCLUDE_PREFIXES`].
    pub fn with_default_prefixes() -> Self {
        Self::new(DEFAULT_SYSTEM_INCLUDE_PREFIXES.iter().copied())
    }

    /// Apply one event. Fails only on conflicting file attribution.
    pub fn apply(&mut self, event: &DumpEvent) -> DeadsymResult<()> {
        match event {
            DumpEvent::DefineSymbol { address, name } => {
                self.define(*address, name);
                Ok(())
            }
            DumpEvent::Reference { target } => {
                self.reference(target);
                Ok(())
            }
            DumpEvent::Attribution { path } => self.attribute(path),
            // Exports belong to the root resolver.
            DumpEvent::Export { .. } => Ok(()),
        }
    }

    fn define(&mut self, address: u64, name: &str) {
        if let Some(prev) = self.current {
            let prev = self.table.symbol_mut(prev);
            match address.checked_sub(prev.address) {
                Some(delta) => prev.approx_size = delta,
                None => {
                    prev.approx_size = 0;
                    let diag = Diagnostic::NegativeSize {
                        symbol: prev.name.clone(),
                        address: prev.address,
                        next_address: address,
                    };
                    diag.emit();
                    self.diagnostics.push(diag);
                }
            }
        }
        self.current = Some(self.table.push(Symbol::new(name.to_string(), address)));
    }

    fn reference(&mut self, target: &str) {
        let Some(cur) = self.current else {
            debug!(callee = %target, "reference before any symbol, ignored");
            return;
        };
        let target = strip_offset(target);
        let sym = self.table.symbol_mut(cur);
        if sym.name != target {
            sym.references.push(target.to_string());
        }
    }

    fn attribute(&mut self, path: &str) -> DeadsymResult<()> {
        let Some(cur) = self.current else {
            return Ok(());
        };
        if self.system_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            return Ok(());
        }
        let sym = self.table.symbol_mut(cur);
        if has_debug_metadata_prefix(&sym.name) {
            return Ok(());
        }
        match &sym.source_file {
            None => {
                sym.source_file = Some(path.to_string());
                Ok(())
            }
            Some(existing) if existing == path => Ok(()),
            Some(existing) => Err(DeadsymError::conflicting_attribution(
                sym.name.clone(),
                existing.clone(),
                path,
            )),
        }
    }

    /// Consume the builder, returning the table and the diagnostics raised.
    pub fn finish(self) -> (SymbolTable, Vec<Diagnostic>) {
        debug!(
            symbols = self.table.len(),
            names = self.table.name_count(),
            edges = self.table.edge_count(),
            "symbol table built"
        );
        (self.table, self.diagnostics)
    }
}

/// Build a symbol table from disassembly events in one go.
pub fn build_symbol_table<'a, I, P, S>(
    events: I,
    system_prefixes: P,
) -> DeadsymResult<(SymbolTable, Vec<Diagnostic>)>
where
    I: IntoIterator<Item = &'a DumpEvent>,
    P: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut builder = SymbolTableBuilder::new(system_prefixes);
    for event in events {
        builder.apply(event)?;
    }
    Ok(builder.finish())
}
