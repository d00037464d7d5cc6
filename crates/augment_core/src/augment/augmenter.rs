//! Augmenter entry point.
//!
//! # Responsibility
//! - Expose `register` and `augment` over one registry scope.
//! - Run guard -> matcher -> builder in that order for every `augment` call.
//!
//! # Invariants
//! - `augment` never fails: refused or unmatched objects come back as the
//!   same `Arc` that was passed in.
//! - The registry is read under one read lock per `augment` call, and the
//!   object's capabilities are read once.
//! - Factories run after that lock is released, so a factory may register
//!   into or augment through the same registry.

use crate::augment::builder::compose;
use crate::augment::guard::{inspect_type, TypeVerdict};
use crate::augment::matcher::match_entries;
use crate::augment::proxy::ProxyId;
use crate::model::descriptor::{InterfaceDescriptor, TypeDescriptor};
use crate::model::object::SharedObject;
use crate::registry::entry::{
    AugmentationEntry, CapabilityPredicate, InterfaceImplementation, RegistrationError,
};
use crate::registry::shared::{global_registry, SharedRegistry};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Why `augment` handed the object back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnchangedReason {
    /// The object's type is not exactly the recognized base type.
    UnsupportedTarget,
    /// No registered entry matched the declared capabilities.
    NoMatchingCapabilities,
}

impl UnchangedReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedTarget => "unsupported_target",
            Self::NoMatchingCapabilities => "no_matching_capabilities",
        }
    }
}

/// Outcome of one `augment` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AugmentOutcome {
    Augmented {
        proxy_id: ProxyId,
        /// Active interface names in registration order.
        interfaces: Vec<String>,
    },
    Unchanged {
        reason: UnchangedReason,
    },
}

/// Returned object plus how it was produced.
#[derive(Clone)]
pub struct AugmentReport {
    pub object: SharedObject,
    pub outcome: AugmentOutcome,
}

impl AugmentReport {
    pub fn is_augmented(&self) -> bool {
        matches!(self.outcome, AugmentOutcome::Augmented { .. })
    }

    pub fn into_object(self) -> SharedObject {
        self.object
    }
}

/// Capability-driven augmenter for one recognized base type.
#[derive(Debug, Clone)]
pub struct Augmenter {
    recognized: TypeDescriptor,
    registry: SharedRegistry,
}

impl Augmenter {
    /// Creates an augmenter with its own, initially empty registry.
    pub fn new(recognized: TypeDescriptor) -> Self {
        Self::with_registry(recognized, SharedRegistry::new())
    }

    /// Creates an augmenter over an existing registry scope.
    pub fn with_registry(recognized: TypeDescriptor, registry: SharedRegistry) -> Self {
        Self {
            recognized,
            registry,
        }
    }

    /// Creates an augmenter over the process-wide registry.
    pub fn global(recognized: TypeDescriptor) -> Self {
        Self::with_registry(recognized, global_registry())
    }

    pub fn recognized_type(&self) -> &TypeDescriptor {
        &self.recognized
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Registers one capability -> interface rule.
    ///
    /// # Errors
    /// - Returns `RegistrationError` when the capability name or interface
    ///   descriptor is unusable, or the pair is already registered.
    pub fn register<F>(
        &self,
        capability: impl Into<String>,
        interface: InterfaceDescriptor,
        factory: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&SharedObject, &Value) -> Arc<dyn InterfaceImplementation> + Send + Sync + 'static,
    {
        self.registry.register(capability, interface, factory)
    }

    /// Registers one rule gated by a custom capability predicate.
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
        self.registry
            .register_with_predicate(capability, interface, predicate, factory)
    }

    /// Returns whether `object` passes the type guard.
    pub fn is_augmentable(&self, object: &SharedObject) -> bool {
        inspect_type(object.as_ref(), &self.recognized) == TypeVerdict::Exact
    }

    /// Returns `object` itself or a new augmented object wrapping it.
    pub fn augment(&self, object: SharedObject) -> SharedObject {
        self.augment_with_report(object).into_object()
    }

    /// Same as `augment`, also reporting the outcome.
    pub fn augment_with_report(&self, object: SharedObject) -> AugmentReport {
        let verdict = inspect_type(object.as_ref(), &self.recognized);
        if verdict != TypeVerdict::Exact {
            debug!(
                "event=augment_skipped module=augmenter status=ok reason={} type={} verdict={}",
                UnchangedReason::UnsupportedTarget.as_str(),
                object.type_descriptor().name(),
                verdict.as_str()
            );
            return unchanged(object, UnchangedReason::UnsupportedTarget);
        }

        let capabilities = object.capabilities();
        let selected: Vec<(AugmentationEntry, Value)> = self.registry.read(|registry| {
            match_entries(capabilities, registry)
                .into_iter()
                .map(|matched| (matched.entry.clone(), matched.value.clone()))
                .collect()
        });
        let composed = compose(&object, selected.iter().map(|(entry, value)| (entry, value)));

        let Some(proxy) = composed else {
            debug!(
                "event=augment_skipped module=augmenter status=ok reason={} type={}",
                UnchangedReason::NoMatchingCapabilities.as_str(),
                object.type_descriptor().name()
            );
            return unchanged(object, UnchangedReason::NoMatchingCapabilities);
        };

        let interfaces: Vec<String> = proxy
            .extensions()
            .iter()
            .map(|extension| extension.interface().name().to_string())
            .collect();
        debug!(
            "event=augment_applied module=augmenter status=ok proxy_id={} type={} active={}",
            proxy.id(),
            object.type_descriptor().name(),
            interfaces.len()
        );

        AugmentReport {
            outcome: AugmentOutcome::Augmented {
                proxy_id: proxy.id(),
                interfaces,
            },
            object: proxy,
        }
    }
}

fn unchanged(object: SharedObject, reason: UnchangedReason) -> AugmentReport {
    AugmentReport {
        object,
        outcome: AugmentOutcome::Unchanged { reason },
    }
}
