//! Collaborator contract for augmentable objects.
//!
//! # Responsibility
//! - Define what the augmenter needs from a base object: its type tag, its
//!   capability set, its declared operations and a string-keyed invoke entry.
//! - Define the result/error shape shared by base objects and extensions.
//!
//! # Invariants
//! - Object identity is `Arc` pointer identity (`same_object`).
//! - `InvokeError` values are passed through untouched by dispatch code, so
//!   callers can downcast to the concrete error the handler produced.

use crate::model::capability::CapabilitySet;
use crate::model::descriptor::TypeDescriptor;
use serde_json::Value;
use std::any::Any;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Failure raised by a base object or extension operation.
pub type InvokeError = Box<dyn Error + Send + Sync + 'static>;

/// Result of one operation invocation.
pub type InvokeResult = Result<Value, InvokeError>;

/// Shared handle to an augmentable object.
pub type SharedObject = Arc<dyn Augmentable>;

/// Object surface the augmenter can reason about and wrap.
pub trait Augmentable: Send + Sync + 'static {
    /// Concrete type tag, compared by the type guard.
    fn type_descriptor(&self) -> &TypeDescriptor;

    /// Capability set declared by this object.
    fn capabilities(&self) -> &CapabilitySet;

    /// Operation identifiers this object responds to.
    fn operations(&self) -> Vec<String>;

    /// Invokes one operation by identifier.
    fn invoke(&self, operation: &str, args: &[Value]) -> InvokeResult;

    /// Explicit type inspection hook.
    fn as_any(&self) -> &dyn Any;

    fn declares(&self, operation: &str) -> bool {
        self.operations().iter().any(|declared| declared == operation)
    }
}

/// Returns true when both handles point at the same object.
pub fn same_object(left: &SharedObject, right: &SharedObject) -> bool {
    std::ptr::eq(
        Arc::as_ptr(left) as *const (),
        Arc::as_ptr(right) as *const (),
    )
}

/// General-purpose operation error for collaborators.
///
/// Dispatch never produces this type itself; it only forwards what handlers
/// return.
#[derive(Debug)]
pub enum OperationError {
    Unsupported(String),
    InvalidArguments {
        operation: String,
        message: String,
    },
    Failed {
        operation: String,
        message: String,
        source: Option<InvokeError>,
    },
}

impl OperationError {
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported(operation.into())
    }

    pub fn invalid_arguments(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            operation: operation.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a cause to a `Failed` error. Other variants are returned as is.
    pub fn with_source(self, cause: impl Into<InvokeError>) -> Self {
        match self {
            Self::Failed {
                operation, message, ..
            } => Self::Failed {
                operation,
                message,
                source: Some(cause.into()),
            },
            other => other,
        }
    }
}

impl Display for OperationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported(operation) => write!(f, "operation is not supported: {operation}"),
            Self::InvalidArguments { operation, message } => {
                write!(f, "invalid arguments for `{operation}`: {message}")
            }
            Self::Failed {
                operation, message, ..
            } => write!(f, "operation `{operation}` failed: {message}"),
        }
    }
}

impl Error for OperationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Failed {
                source: Some(cause),
                ..
            } => Some(cause.as_ref() as &(dyn Error + 'static)),
            _ => None,
        }
    }
}
