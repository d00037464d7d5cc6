//! Lock-guarded registry handle shared across augmenters and threads.
//!
//! # Invariants
//! - Registration takes the write lock; augmentation copies its matched
//!   entries under the read lock, so one `augment` call never observes a
//!   half-applied registration.
//! - No caller-supplied factory runs while either lock is held.
//! - A poisoned lock is recovered: a panic elsewhere can never leave a
//!   partially pushed entry behind.

use crate::model::descriptor::InterfaceDescriptor;
use crate::model::object::SharedObject;
use crate::registry::augmentation_registry::AugmentationRegistry;
use crate::registry::entry::{
    AugmentationEntry, CapabilityPredicate, InterfaceImplementation, RegistrationError,
};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, PoisonError, RwLock};

static GLOBAL_REGISTRY: Lazy<SharedRegistry> = Lazy::new(SharedRegistry::new);

/// Returns the process-wide registry handle.
pub fn global_registry() -> SharedRegistry {
    GLOBAL_REGISTRY.clone()
}

/// Cloneable handle to one registry behind a coarse `RwLock`.
#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<AugmentationRegistry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_registry(registry: AugmentationRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn register<F>(
        &self,
        capability: impl Into<String>,
        interface: InterfaceDescriptor,
        factory: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&SharedObject, &Value) -> Arc<dyn InterfaceImplementation> + Send + Sync + 'static,
    {
        self.write(|registry| registry.register(capability, interface, factory))
    }

    pub fn register_with_predicate<F>(
        &self,
        capability: impl Into<String>,
        interface: InterfaceDescriptor,
        predicate: CapabilityPredicate,
        factory: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&SharedObject, &Value) -> Arc<dyn InterfaceImplementation> + Send + Sync + 'static,
    {
        self.write(|registry| {
            registry.register_with_predicate(capability, interface, predicate, factory)
        })
    }

    pub fn register_entry(&self, entry: AugmentationEntry) -> Result<(), RegistrationError> {
        self.write(|registry| registry.register_entry(entry))
    }

    /// Runs `f` against the registry under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&AugmentationRegistry) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut AugmentationRegistry) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    /// Detached copy of the current entries.
    pub fn snapshot(&self) -> AugmentationRegistry {
        self.read(|registry| registry.clone())
    }

    pub fn len(&self) -> usize {
        self.read(AugmentationRegistry::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(AugmentationRegistry::is_empty)
    }

    /// Returns true when both handles share one registry.
    pub fn ptr_eq(&self, other: &SharedRegistry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for SharedRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRegistry")
            .field("entries", &self.len())
            .finish()
    }
}
