//! Reachability marking over the symbol call graph.
//!
//! Performance characteristics:
//! - Multi-source DFS: O(|V| + |E|), each symbol expanded at most once
//! - Explicit work stack, no native recursion, safe on deep call chains
//!
//! The `reached` flag is the only visited guard. Marking an already reached
//! symbol ends that branch, which also makes a second run a no-op.

use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::root::RootSet;
use crate::symbol::{is_internal_label, SymbolId, SymbolTable};

/// What a marking pass did.
#[derive(Debug, Clone, Default)]
pub struct MarkOutcome {
    /// Symbols newly marked reached by this pass.
    pub marked: usize,
    /// Unresolved references and ambiguous names met on the way.
    pub diagnostics: Vec<Diagnostic>,
}

/// Mark every symbol transitively reachable from `roots`.
///
/// A name with several candidates marks all of them (over-approximation,
/// never under-reports reachable code). Names absent from the table are
/// reported and treated as dead ends.
pub fn mark_reachable(table: &mut SymbolTable, roots: &RootSet) -> MarkOutcome {
    let mut outcome = MarkOutcome::default();
    let mut stack: Vec<SymbolId> = Vec::new();

    for root in roots.iter() {
        visit_name(table, None, root, &mut stack, &mut outcome);
    }

    while let Some(id) = stack.pop() {
        // References of a reached symbol never change; clone to release the
        // borrow while marking callees.
        let from = table.symbol(id).name.clone();
        let callees = table.symbol(id).references.clone();
        for callee in &callees {
            visit_name(table, Some(from.as_str()), callee, &mut stack, &mut outcome);
        }
    }

    debug!(
        marked = outcome.marked,
        diagnostics = outcome.diagnostics.len(),
        "reachability marking finished"
    );
    outcome
}

/// Resolve `name` and mark its candidates, pushing the newly marked ones.
fn visit_name(
    table: &mut SymbolTable,
    from: Option<&str>,
    name: &str,
    stack: &mut Vec<SymbolId>,
    outcome: &mut MarkOutcome,
) {
    let candidates = table.candidates(name).to_vec();

    if candidates.is_empty() {
        let diag = Diagnostic::Unresolved {
            from: from.map(str::to_string),
            target: name.to_string(),
        };
        diag.emit();
        outcome.diagnostics.push(diag);
        return;
    }

    // Candidates of one name are marked together, so the first one tells
    // whether this name was already expanded.
    if table.symbol(candidates[0]).reached {
        return;
    }

    if candidates.len() > 1 && !is_internal_label(name) {
        let diag = Diagnostic::Ambiguous {
            name: name.to_string(),
            candidates: candidates.len(),
        };
        diag.emit();
        outcome.diagnostics.push(diag);
    }

    for id in candidates {
        let sym = table.symbol_mut(id);
        if !sym.reached {
            sym.reached = true;
            outcome.marked += 1;
            stack.push(id);
        }
    }
}
