//! Ordered augmentation registry.

use crate::model::descriptor::InterfaceDescriptor;
use crate::model::object::SharedObject;
use crate::registry::entry::{
    AugmentationEntry, CapabilityPredicate, EntryDescriptor, InterfaceImplementation,
    RegistrationError,
};
use log::info;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

/// In-process registry of augmentation entries.
///
/// Entries keep their registration order. When two active entries declare the
/// same operation, the earlier one handles it.
#[derive(Debug, Default, Clone)]
pub struct AugmentationRegistry {
    entries: Vec<AugmentationEntry>,
}

impl AugmentationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one capability -> interface rule.
    pub fn register<F>(
        &mut self,
        capability: impl Into<String>,
        interface: InterfaceDescriptor,
        factory: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&SharedObject, &Value) -> Arc<dyn InterfaceImplementation> + Send + Sync + 'static,
    {
        let entry = AugmentationEntry::new(capability, interface, factory)?;
        self.register_entry(entry)
    }

    /// Registers one rule gated by a custom capability predicate.
    pub fn register_with_predicate<F>(
        &mut self,
        capability: impl Into<String>,
        interface: InterfaceDescriptor,
        predicate: CapabilityPredicate,
        factory: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&SharedObject, &Value) -> Arc<dyn InterfaceImplementation> + Send + Sync + 'static,
    {
        let entry =
            AugmentationEntry::new(capability, interface, factory)?.with_predicate(predicate);
        self.register_entry(entry)
    }

    /// Registers a prebuilt entry after duplicate checks.
    pub fn register_entry(&mut self, entry: AugmentationEntry) -> Result<(), RegistrationError> {
        let duplicate = self.entries.iter().any(|existing| {
            existing.capability() == entry.capability()
                && existing.interface().name() == entry.interface().name()
        });
        if duplicate {
            return Err(RegistrationError::DuplicateEntry {
                capability: entry.capability().to_string(),
                interface: entry.interface().name().to_string(),
            });
        }

        info!(
            "event=augment_registered module=registry status=ok capability={} interface={} operations={} position={}",
            entry.capability(),
            entry.interface().name(),
            entry.interface().operations().len(),
            self.entries.len()
        );
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[AugmentationEntry] {
        &self.entries
    }

    /// Distinct capability names with at least one entry.
    pub fn capability_names(&self) -> BTreeSet<&str> {
        self.entries.iter().map(AugmentationEntry::capability).collect()
    }

    /// Entries for one capability, in registration order.
    pub fn list_by_capability(&self, capability: &str) -> Vec<&AugmentationEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.capability() == capability)
            .collect()
    }

    /// Serializable listing of every entry.
    pub fn descriptors(&self) -> Vec<EntryDescriptor> {
        self.entries
            .iter()
            .enumerate()
            .map(|(position, entry)| entry.describe(position))
            .collect()
    }
}
