//! Augmentation entry declaration and validation.

use crate::model::capability::is_affirmative;
use crate::model::descriptor::{is_valid_identifier, DescriptorError, InterfaceDescriptor};
use crate::model::object::{Augmentable, InvokeResult, SharedObject};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Extension behavior for the operations of one interface.
///
/// The base object is passed on every call so an implementation can forward,
/// suppress or substitute the original operation.
pub trait InterfaceImplementation: Send + Sync {
    fn invoke(&self, base: &dyn Augmentable, operation: &str, args: &[Value]) -> InvokeResult;
}

struct FnImplementation<F> {
    handler: F,
}

impl<F> InterfaceImplementation for FnImplementation<F>
where
    F: Fn(&dyn Augmentable, &str, &[Value]) -> InvokeResult + Send + Sync,
{
    fn invoke(&self, base: &dyn Augmentable, operation: &str, args: &[Value]) -> InvokeResult {
        (self.handler)(base, operation, args)
    }
}

/// Wraps a closure as an extension implementation.
pub fn implementation_fn<F>(handler: F) -> Arc<dyn InterfaceImplementation>
where
    F: Fn(&dyn Augmentable, &str, &[Value]) -> InvokeResult + Send + Sync + 'static,
{
    Arc::new(FnImplementation { handler })
}

/// Builds one extension instance for a base object and its capability value.
pub type ImplementationFactory =
    Arc<dyn Fn(&SharedObject, &Value) -> Arc<dyn InterfaceImplementation> + Send + Sync>;

/// Decides whether a declared capability value activates an entry.
#[derive(Clone, Default)]
pub enum CapabilityPredicate {
    /// `true` for booleans, presence for everything else.
    #[default]
    Affirmative,
    /// Any non-null value, including `false`.
    Present,
    Custom(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
}

impl CapabilityPredicate {
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(predicate))
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Affirmative => is_affirmative(value),
            Self::Present => !value.is_null(),
            Self::Custom(predicate) => !value.is_null() && predicate(value),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Affirmative => "affirmative",
            Self::Present => "present",
            Self::Custom(_) => "custom",
        }
    }
}

impl Debug for CapabilityPredicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registered rule: capability -> interface + implementation factory.
#[derive(Clone)]
pub struct AugmentationEntry {
    capability: String,
    interface: InterfaceDescriptor,
    predicate: CapabilityPredicate,
    factory: ImplementationFactory,
}

impl AugmentationEntry {
    /// Creates a validated entry with the default affirmative predicate.
    pub fn new<F>(
        capability: impl Into<String>,
        interface: InterfaceDescriptor,
        factory: F,
    ) -> Result<Self, RegistrationError>
    where
        F: Fn(&SharedObject, &Value) -> Arc<dyn InterfaceImplementation> + Send + Sync + 'static,
    {
        Self::from_parts(capability.into(), interface, Arc::new(factory))
    }

    /// Creates a validated entry from an already shared factory.
    pub fn from_parts(
        capability: String,
        interface: InterfaceDescriptor,
        factory: ImplementationFactory,
    ) -> Result<Self, RegistrationError> {
        if capability.trim().is_empty() {
            return Err(RegistrationError::EmptyCapability);
        }
        if !is_valid_identifier(&capability) {
            return Err(RegistrationError::InvalidCapability(capability));
        }
        interface
            .validate()
            .map_err(RegistrationError::InvalidInterface)?;

        Ok(Self {
            capability,
            interface,
            predicate: CapabilityPredicate::default(),
            factory,
        })
    }

    pub fn with_predicate(mut self, predicate: CapabilityPredicate) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn capability(&self) -> &str {
        &self.capability
    }

    pub fn interface(&self) -> &InterfaceDescriptor {
        &self.interface
    }

    pub fn predicate(&self) -> &CapabilityPredicate {
        &self.predicate
    }

    /// Returns whether `value` activates this entry.
    pub fn accepts(&self, value: &Value) -> bool {
        self.predicate.accepts(value)
    }

    /// Runs the factory for one base object.
    pub fn instantiate(
        &self,
        base: &SharedObject,
        value: &Value,
    ) -> Arc<dyn InterfaceImplementation> {
        (self.factory)(base, value)
    }

    pub fn describe(&self, position: usize) -> EntryDescriptor {
        EntryDescriptor {
            position,
            capability: self.capability.clone(),
            predicate: self.predicate.as_str(),
            interface: self.interface.clone(),
        }
    }
}

impl Debug for AugmentationEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AugmentationEntry")
            .field("capability", &self.capability)
            .field("interface", &self.interface)
            .field("predicate", &self.predicate)
            .finish_non_exhaustive()
    }
}

/// Serializable view of one registered entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDescriptor {
    /// Registration position; lower wins on shared operation names.
    pub position: usize,
    pub capability: String,
    pub predicate: &'static str,
    pub interface: InterfaceDescriptor,
}

/// Rejected registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    EmptyCapability,
    InvalidCapability(String),
    InvalidInterface(DescriptorError),
    DuplicateEntry { capability: String, interface: String },
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCapability => {
                write!(f, "invalid registration: capability must not be empty")
            }
            Self::InvalidCapability(value) => {
                write!(f, "invalid registration: capability name is invalid: `{value}`")
            }
            Self::InvalidInterface(err) => write!(f, "invalid registration: {err}"),
            Self::DuplicateEntry {
                capability,
                interface,
            } => write!(
                f,
                "invalid registration: `{interface}` is already registered for `{capability}`"
            ),
        }
    }
}

impl Error for RegistrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInterface(err) => Some(err),
            _ => None,
        }
    }
}
