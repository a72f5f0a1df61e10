//! Resource type registry domain.
//!
//! Owns the mapping between domain types and resource type names, and the
//! memoized per-type descriptors (identifier field, wire field map,
//! collection shape) everything else in the engine consumes.

pub mod error;
pub mod model;
pub mod naming;
pub mod service;

pub use error::ConfigurationError;
pub use model::{
    CollectionShape, ErasedRecord, FieldGetter, FieldKind, FieldSetter, FieldSpec, RelatedGetter,
    ResourceModel, TypeKey,
};
pub use naming::{NamingService, dasherize, lower_camel};
pub use service::{FieldMap, ResourceTypeRegistry};
