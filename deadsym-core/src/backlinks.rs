//! Reverse reference index for the report.
//!
//! Must run on the complete table: it records every edge, not only the ones
//! the marker happened to follow.

use tracing::debug;

use crate::symbol::SymbolTable;

/// Fill `referenced_by` on every symbol. Returns the number of backlinks
/// inserted (duplicates not counted).
///
/// Unresolved targets are skipped; the marker already reported them.
pub fn index_backlinks(table: &mut SymbolTable) -> usize {
    let mut links = Vec::new();
    for (_, sym) in table.iter() {
        for target in &sym.references {
            for id in table.candidates(target) {
                links.push((*id, sym.name.clone()));
            }
        }
    }

    let mut inserted = 0;
    for (id, from) in links {
        if table.symbol_mut(id).referenced_by.insert(from) {
            inserted += 1;
        }
    }

    debug!(backlinks = inserted, "backlinks indexed");
    inserted
}
