//! Type/identity guard.
//!
//! Only objects whose concrete type is exactly the recognized base type are
//! wrapped. Derived types may override operations the augmenter cannot see,
//! so they are handed back untouched.

use crate::model::descriptor::TypeDescriptor;
use crate::model::object::Augmentable;

/// Guard classification of an object's concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeVerdict {
    /// Exactly the recognized base type.
    Exact,
    /// Extends the recognized base type.
    StrictSubtype,
    /// Neither the base type nor one of its subtypes.
    Unrelated,
}

impl TypeVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::StrictSubtype => "strict_subtype",
            Self::Unrelated => "unrelated",
        }
    }
}

pub fn inspect_type(object: &dyn Augmentable, recognized: &TypeDescriptor) -> TypeVerdict {
    let descriptor = object.type_descriptor();
    if descriptor.is_exactly(recognized) {
        TypeVerdict::Exact
    } else if descriptor.is_strict_subtype_of(recognized) {
        TypeVerdict::StrictSubtype
    } else {
        TypeVerdict::Unrelated
    }
}

/// Returns true only for objects of exactly the recognized base type.
pub fn is_augmentable(object: &dyn Augmentable, recognized: &TypeDescriptor) -> bool {
    inspect_type(object, recognized) == TypeVerdict::Exact
}
