//! Augmentation registry.
//!
//! This module owns the ordered capability -> extension rules consulted by
//! `augment`. Registration validates descriptors up front; augmentation only
//! ever reads the registry.

pub mod augmentation_registry;
pub mod entry;
pub mod shared;
