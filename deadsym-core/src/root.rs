//! Root set resolution.
//!
//! Roots are the exported dynamic text symbols plus a curated list of
//! handlers that are only ever called through function-pointer tables
//! (pjsip module and session callbacks). The reference extraction pass
//! cannot see those calls, so without the list every handler and all of its
//! callees would be reported dead.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{DeadsymError, DeadsymResult};
use crate::extract::DumpEvent;

/// Handlers registered in callback tables and never called directly.
///
/// None of these may also be exported: a collision means the list is stale.
pub const CURATED_ROOTS: &[&str] = &[
    "invite_session_state_changed_cb",
    "outgoing_request_forked_cb",
    "transaction_state_changed_cb",
    "transaction_request_cb",
    "transfer_client_cb",
    "registration_cb",
    "sdp_request_offer_cb",
    "sdp_create_offer_cb",
    "sdp_media_update_cb",
    "on_rx_offer",
];

/// The entry points of one run.
#[derive(Debug, Clone, Default)]
pub struct RootSet {
    names: BTreeSet<String>,
    exported: usize,
    curated: usize,
}

impl RootSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Root names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn exported_count(&self) -> usize {
        self.exported
    }

    pub fn curated_count(&self) -> usize {
        self.curated
    }
}

/// Build the root set from `Export` events and a curated name list.
///
/// Fails if an export is listed twice, or if a curated name is already
/// exported. Non-export events are ignored.
pub fn resolve_roots<'a, I>(events: I, curated: &[&str]) -> DeadsymResult<RootSet>
where
    I: IntoIterator<Item = &'a DumpEvent>,
{
    let mut roots = RootSet::default();

    for event in events {
        if let DumpEvent::Export { name } = event {
            if !roots.names.insert(name.clone()) {
                return Err(DeadsymError::duplicate_export(name.as_str()));
            }
            roots.exported += 1;
        }
    }

    for name in curated {
        if !roots.names.insert((*name).to_string()) {
            return Err(DeadsymError::stale_curated_root(*name));
        }
        roots.curated += 1;
    }

    debug!(
        exported = roots.exported,
        curated = roots.curated,
        "root set resolved"
    );
    Ok(roots)
}
