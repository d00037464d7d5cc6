//! Capability-driven object augmentation.
//!
//! Given a shared object that declares capabilities, `Augmenter::augment`
//! returns either the same object or a composite that routes selected
//! operations to registered extensions and forwards everything else to the
//! original.

pub mod augment;
pub mod logging;
pub mod model;
pub mod registry;

pub use augment::augmenter::{AugmentOutcome, AugmentReport, Augmenter, UnchangedReason};
pub use augment::builder::{build, RoutingTable, ShadowedOperation};
pub use augment::guard::{inspect_type, is_augmentable, TypeVerdict};
pub use augment::matcher::{match_entries, MatchedEntry};
pub use augment::proxy::{ActiveExtension, AugmentedObject, ProxyId, Route, AUGMENTED_TYPE_NAME};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::capability::{is_affirmative, CapabilitySet};
pub use model::descriptor::{
    is_valid_identifier, DescriptorError, InterfaceDescriptor, TypeDescriptor,
};
pub use model::object::{
    same_object, Augmentable, InvokeError, InvokeResult, OperationError, SharedObject,
};
pub use registry::augmentation_registry::AugmentationRegistry;
pub use registry::entry::{
    implementation_fn, AugmentationEntry, CapabilityPredicate, EntryDescriptor,
    ImplementationFactory, InterfaceImplementation, RegistrationError,
};
pub use registry::shared::{global_registry, SharedRegistry};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
