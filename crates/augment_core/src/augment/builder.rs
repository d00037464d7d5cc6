//! Proxy builder.
//!
//! # Responsibility
//! - Instantiate the matched extensions for one base object.
//! - Compute the operation routing table for the composite object.
//! - Return the base object itself when nothing matched.
//!
//! # Invariants
//! - An extension operation always routes to the extension, even when the
//!   base object declares the same operation.
//! - When two extensions declare the same operation, the one registered first
//!   handles it; later declarations are recorded as shadowed.
//! - `build` with no matches returns the same `Arc` it was given.

use crate::augment::matcher::MatchedEntry;
use crate::augment::proxy::{ActiveExtension, AugmentedObject};
use crate::model::object::SharedObject;
use crate::registry::entry::AugmentationEntry;
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Operation declared by a later extension and handled by an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShadowedOperation {
    pub operation: String,
    /// Interface that handles the operation.
    pub winner: String,
    /// Interface whose declaration was ignored.
    pub shadowed: String,
}

/// Operation -> extension index map, fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    routes: BTreeMap<String, usize>,
    operations: Vec<String>,
    shadowed: Vec<ShadowedOperation>,
}

impl RoutingTable {
    /// Computes routes for `extensions`, which must be in registration order.
    pub fn compute(base_operations: Vec<String>, extensions: &[ActiveExtension]) -> Self {
        let mut routes = BTreeMap::<String, usize>::new();
        let mut shadowed = Vec::new();

        for (index, extension) in extensions.iter().enumerate() {
            for operation in extension.interface().operations() {
                let existing = routes.get(operation.as_str()).copied();
                match existing {
                    Some(winner) if winner != index => shadowed.push(ShadowedOperation {
                        operation: operation.clone(),
                        winner: extensions[winner].interface().name().to_string(),
                        shadowed: extension.interface().name().to_string(),
                    }),
                    Some(_) => {}
                    None => {
                        routes.insert(operation.clone(), index);
                    }
                }
            }
        }

        let mut operations = base_operations;
        for operation in routes.keys() {
            if !operations.contains(operation) {
                operations.push(operation.clone());
            }
        }

        Self {
            routes,
            operations,
            shadowed,
        }
    }

    /// Index of the extension handling `operation`, if any.
    pub fn extension_for(&self, operation: &str) -> Option<usize> {
        self.routes.get(operation).copied()
    }

    /// Base operations followed by extension-only operations.
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    pub fn intercepted_operations(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn shadowed(&self) -> &[ShadowedOperation] {
        &self.shadowed
    }
}

/// Builds the augmented object, or returns `base` when nothing matched.
pub fn build(base: &SharedObject, matched: &[MatchedEntry<'_>]) -> SharedObject {
    let selected = matched.iter().map(|candidate| (candidate.entry, candidate.value));
    if let Some(proxy) = compose(base, selected) {
        return proxy;
    }
    Arc::clone(base)
}

/// Like `build`, but keeps the concrete proxy type for reporting.
///
/// Runs every factory and `base.operations()`; callers must not hold the
/// registry lock.
pub(crate) fn compose<'a>(
    base: &SharedObject,
    selected: impl IntoIterator<Item = (&'a AugmentationEntry, &'a Value)>,
) -> Option<Arc<AugmentedObject>> {
    let extensions: Vec<ActiveExtension> = selected
        .into_iter()
        .map(|(entry, value)| {
            ActiveExtension::new(
                entry.capability(),
                entry.interface().clone(),
                entry.instantiate(base, value),
            )
        })
        .collect();
    if extensions.is_empty() {
        return None;
    }

    let routing = RoutingTable::compute(base.operations(), &extensions);
    for shadow in routing.shadowed() {
        debug!(
            "event=augment_shadowed module=builder status=ok operation={} winner={} shadowed={}",
            shadow.operation, shadow.winner, shadow.shadowed
        );
    }

    Some(Arc::new(AugmentedObject::new(
        Arc::clone(base),
        extensions,
        routing,
    )))
}
