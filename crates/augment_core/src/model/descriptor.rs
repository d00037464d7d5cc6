//! Type and interface descriptors.
//!
//! # Responsibility
//! - Describe the concrete type of an object without runtime reflection.
//! - Describe the closed operation set an extension interface declares.
//!
//! # Invariants
//! - `TypeDescriptor::ancestors` lists parents nearest-first.
//! - A validated `InterfaceDescriptor` declares at least one operation and no
//!   operation twice.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:[.:\-][A-Za-z0-9_]+)*$").expect("valid identifier regex")
});

/// Returns whether `value` is a usable capability, interface or operation id.
///
/// Accepts dotted/namespaced forms such as `goog:chromeOptions` or
/// `webdriver.find`.
pub fn is_valid_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}

/// Explicit type tag supplied by an object instead of language reflection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ancestors: Vec<String>,
}

impl TypeDescriptor {
    /// Describes a root type with no parents.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ancestors: Vec::new(),
        }
    }

    /// Describes a type that extends `parent`.
    pub fn derived(name: impl Into<String>, parent: &TypeDescriptor) -> Self {
        let mut ancestors = Vec::with_capacity(parent.ancestors.len() + 1);
        ancestors.push(parent.name.clone());
        ancestors.extend(parent.ancestors.iter().cloned());
        Self {
            name: name.into(),
            ancestors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Same concrete type, including its full parent chain.
    pub fn is_exactly(&self, other: &TypeDescriptor) -> bool {
        self == other
    }

    /// Returns true when `self` extends `other` (directly or transitively).
    pub fn is_strict_subtype_of(&self, other: &TypeDescriptor) -> bool {
        self.ancestors
            .iter()
            .enumerate()
            .any(|(index, name)| {
                name == &other.name && self.ancestors[index + 1..] == other.ancestors[..]
            })
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for ancestor in &self.ancestors {
            write!(f, " < {ancestor}")?;
        }
        Ok(())
    }
}

/// Named, closed set of operations an extension implements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    name: String,
    operations: Vec<String>,
}

impl InterfaceDescriptor {
    /// Creates a descriptor. Validation happens at registration time.
    pub fn new<I, S>(name: impl Into<String>, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            operations: operations.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared operations in declaration order.
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    pub fn declares(&self, operation: &str) -> bool {
        self.operations.iter().any(|declared| declared == operation)
    }

    /// Validates declaration-level invariants.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DescriptorError::EmptyName);
        }
        if !is_valid_identifier(name) || name != self.name {
            return Err(DescriptorError::InvalidName(self.name.clone()));
        }
        if self.operations.is_empty() {
            return Err(DescriptorError::MissingOperations(self.name.clone()));
        }

        let mut seen = BTreeSet::<&str>::new();
        for operation in &self.operations {
            if !is_valid_identifier(operation) {
                return Err(DescriptorError::InvalidOperation(operation.clone()));
            }
            if !seen.insert(operation.as_str()) {
                return Err(DescriptorError::DuplicateOperation(operation.clone()));
            }
        }
        Ok(())
    }
}

/// Interface descriptor validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    EmptyName,
    InvalidName(String),
    MissingOperations(String),
    InvalidOperation(String),
    DuplicateOperation(String),
}

impl Display for DescriptorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "interface name must not be empty"),
            Self::InvalidName(value) => write!(f, "interface name is invalid: `{value}`"),
            Self::MissingOperations(value) => {
                write!(f, "interface `{value}` must declare at least one operation")
            }
            Self::InvalidOperation(value) => write!(f, "operation id is invalid: `{value}`"),
            Self::DuplicateOperation(value) => {
                write!(f, "operation is declared twice: `{value}`")
            }
        }
    }
}

impl Error for DescriptorError {}

#[cfg(test)]
mod tests {
    use super::{is_valid_identifier, DescriptorError, InterfaceDescriptor, TypeDescriptor};

    #[test]
    fn identifiers_accept_namespaced_forms() {
        for value in ["quit", "find_element", "goog:chromeOptions", "webdriver.find", "x-1"] {
            assert!(is_valid_identifier(value), "{value} should be valid");
        }
        for value in ["", " quit", "1quit", "find element", "find..element", "quit:"] {
            assert!(!is_valid_identifier(value), "{value} should be invalid");
        }
    }

    #[test]
    fn derived_types_are_strict_subtypes() {
        let base = TypeDescriptor::new("RemoteWebDriver");
        let child = TypeDescriptor::derived("RemoteWebDriverSubclass", &base);
        let grandchild = TypeDescriptor::derived("Deeper", &child);

        assert!(child.is_strict_subtype_of(&base));
        assert!(grandchild.is_strict_subtype_of(&base));
        assert!(grandchild.is_strict_subtype_of(&child));
        assert!(!base.is_strict_subtype_of(&base));
        assert!(!base.is_strict_subtype_of(&child));
        assert!(base.is_exactly(&TypeDescriptor::new("RemoteWebDriver")));
        assert!(!child.is_exactly(&base));
    }

    #[test]
    fn same_name_with_different_parent_chain_is_not_a_subtype() {
        let base = TypeDescriptor::new("RemoteWebDriver");
        let other_root = TypeDescriptor::derived("RemoteWebDriver", &TypeDescriptor::new("Other"));
        let child = TypeDescriptor::derived("Child", &other_root);

        assert!(!child.is_strict_subtype_of(&base));
        assert!(!other_root.is_exactly(&base));
    }

    #[test]
    fn type_descriptor_displays_parent_chain() {
        let base = TypeDescriptor::new("RemoteWebDriver");
        let child = TypeDescriptor::derived("Child", &base);
        assert_eq!(child.to_string(), "Child < RemoteWebDriver");
    }

    #[test]
    fn validates_interface_descriptor() {
        let descriptor = InterfaceDescriptor::new("FindsByCss", ["find", "find_all"]);
        assert!(descriptor.validate().is_ok());
        assert!(descriptor.declares("find"));
        assert!(!descriptor.declares("quit"));
    }

    #[test]
    fn rejects_invalid_interface_descriptors() {
        let empty_ops = InterfaceDescriptor::new("Nothing", Vec::<String>::new());
        assert_eq!(
            empty_ops.validate().unwrap_err(),
            DescriptorError::MissingOperations("Nothing".to_string())
        );

        let blank = InterfaceDescriptor::new("  ", ["quit"]);
        assert_eq!(blank.validate().unwrap_err(), DescriptorError::EmptyName);

        let padded = InterfaceDescriptor::new(" Quit ", ["quit"]);
        assert!(matches!(
            padded.validate().unwrap_err(),
            DescriptorError::InvalidName(_)
        ));

        let duplicate = InterfaceDescriptor::new("Quit", ["quit", "quit"]);
        assert_eq!(
            duplicate.validate().unwrap_err(),
            DescriptorError::DuplicateOperation("quit".to_string())
        );

        let bad_op = InterfaceDescriptor::new("Quit", ["quit now"]);
        assert_eq!(
            bad_op.validate().unwrap_err(),
            DescriptorError::InvalidOperation("quit now".to_string())
        );
    }
}
