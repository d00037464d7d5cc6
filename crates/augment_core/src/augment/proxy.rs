//! Augmented object and its dispatcher.
//!
//! # Responsibility
//! - Own the delegate and the extensions activated for one `augment` call.
//! - Route every invocation through the routing table computed at build time.
//!
//! # Invariants
//! - The delegate is never mutated and is reachable unchanged via `delegate()`.
//! - Dispatch never caches results, translates errors, retries or adds
//!   timeouts: the chosen handler's `Result` is returned as is.
//! - Capabilities are read from the delegate; they are not re-evaluated when
//!   routing.

use crate::augment::builder::RoutingTable;
use crate::model::capability::CapabilitySet;
use crate::model::descriptor::{InterfaceDescriptor, TypeDescriptor};
use crate::model::object::{Augmentable, InvokeResult, SharedObject};
use crate::registry::entry::InterfaceImplementation;
use log::trace;
use serde_json::Value;
use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Type name reported by every augmented object, derived from its delegate.
pub const AUGMENTED_TYPE_NAME: &str = "augmented";

/// Stable identifier of one augmented object, for diagnostics.
pub type ProxyId = Uuid;

/// One extension instance activated for a specific base object.
#[derive(Clone)]
pub struct ActiveExtension {
    capability: String,
    interface: InterfaceDescriptor,
    implementation: Arc<dyn InterfaceImplementation>,
}

impl ActiveExtension {
    pub fn new(
        capability: impl Into<String>,
        interface: InterfaceDescriptor,
        implementation: Arc<dyn InterfaceImplementation>,
    ) -> Self {
        Self {
            capability: capability.into(),
            interface,
            implementation,
        }
    }

    pub fn capability(&self) -> &str {
        &self.capability
    }

    pub fn interface(&self) -> &InterfaceDescriptor {
        &self.interface
    }
}

impl Debug for ActiveExtension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveExtension")
            .field("capability", &self.capability)
            .field("interface", &self.interface.name())
            .finish_non_exhaustive()
    }
}

/// Where one operation goes when invoked on an augmented object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Extension {
        capability: &'a str,
        interface: &'a str,
    },
    Delegate,
}

/// Composite object: delegate plus the extensions active for it.
pub struct AugmentedObject {
    id: ProxyId,
    delegate: SharedObject,
    type_descriptor: TypeDescriptor,
    extensions: Vec<ActiveExtension>,
    routing: RoutingTable,
}

impl AugmentedObject {
    pub(crate) fn new(
        delegate: SharedObject,
        extensions: Vec<ActiveExtension>,
        routing: RoutingTable,
    ) -> Self {
        let type_descriptor =
            TypeDescriptor::derived(AUGMENTED_TYPE_NAME, delegate.type_descriptor());
        Self {
            id: Uuid::new_v4(),
            delegate,
            type_descriptor,
            extensions,
            routing,
        }
    }

    pub fn id(&self) -> ProxyId {
        self.id
    }

    /// The original, unmodified object.
    pub fn delegate(&self) -> &SharedObject {
        &self.delegate
    }

    /// Active extensions in registration order.
    pub fn extensions(&self) -> &[ActiveExtension] {
        &self.extensions
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    /// Resolves the handler for `operation` without invoking it.
    pub fn route(&self, operation: &str) -> Route<'_> {
        match self.routing.extension_for(operation) {
            Some(index) => {
                let extension = &self.extensions[index];
                Route::Extension {
                    capability: extension.capability(),
                    interface: extension.interface().name(),
                }
            }
            None => Route::Delegate,
        }
    }

    /// Downcasts a shared handle to an augmented object, if it is one.
    pub fn inspect(object: &SharedObject) -> Option<&AugmentedObject> {
        object.as_any().downcast_ref::<AugmentedObject>()
    }
}

impl Augmentable for AugmentedObject {
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.type_descriptor
    }

    fn capabilities(&self) -> &CapabilitySet {
        self.delegate.capabilities()
    }

    fn operations(&self) -> Vec<String> {
        self.routing.operations().to_vec()
    }

    fn invoke(&self, operation: &str, args: &[Value]) -> InvokeResult {
        match self.routing.extension_for(operation) {
            Some(index) => {
                let extension = &self.extensions[index];
                trace!(
                    "event=augment_dispatch module=proxy route=extension proxy_id={} operation={} interface={}",
                    self.id,
                    operation,
                    extension.interface().name()
                );
                extension
                    .implementation
                    .invoke(self.delegate.as_ref(), operation, args)
            }
            None => {
                trace!(
                    "event=augment_dispatch module=proxy route=delegate proxy_id={} operation={}",
                    self.id,
                    operation
                );
                self.delegate.invoke(operation, args)
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Debug for AugmentedObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AugmentedObject")
            .field("id", &self.id)
            .field("delegate", &self.delegate.type_descriptor().name())
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}
