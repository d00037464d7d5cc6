//! Capability matcher.
//!
//! Selects the registry entries whose capability is declared affirmatively by
//! an object. Pure function of its inputs; output keeps registration order.

use crate::model::capability::CapabilitySet;
use crate::registry::augmentation_registry::AugmentationRegistry;
use crate::registry::entry::AugmentationEntry;
use serde_json::Value;

/// One selected entry together with the capability value that selected it.
#[derive(Debug, Clone, Copy)]
pub struct MatchedEntry<'a> {
    pub position: usize,
    pub entry: &'a AugmentationEntry,
    pub value: &'a Value,
}

/// Returns the entries activated by `capabilities`, in registration order.
pub fn match_entries<'a>(
    capabilities: &'a CapabilitySet,
    registry: &'a AugmentationRegistry,
) -> Vec<MatchedEntry<'a>> {
    registry
        .entries()
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            let value = capabilities.get(entry.capability())?;
            entry.accepts(value).then_some(MatchedEntry {
                position,
                entry,
                value,
            })
        })
        .collect()
}
