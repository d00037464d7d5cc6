//! Augmentation pipeline.
//!
//! # Responsibility
//! - Guard: refuse objects whose concrete type is not the recognized base type.
//! - Matcher: select registry entries activated by declared capabilities.
//! - Builder: instantiate extensions and compute the routing table.
//! - Proxy: dispatch every invocation to an extension or the delegate.
//!
//! # Invariants
//! - Unmatched or refused objects are returned as the same `Arc`.
//! - Base objects are never mutated.

pub mod augmenter;
pub mod builder;
pub mod guard;
pub mod matcher;
pub mod proxy;
