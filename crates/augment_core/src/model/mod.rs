//! Object-side model for augmentation.
//!
//! # Responsibility
//! - Define the contract a base object exposes to the augmenter.
//! - Define capability sets and the type/interface descriptors that replace
//!   runtime reflection.
//!
//! # Invariants
//! - Nothing in this module mutates a base object.

pub mod capability;
pub mod descriptor;
pub mod object;
