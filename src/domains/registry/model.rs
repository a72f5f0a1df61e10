//! Type descriptors for the resource type registry.
//!
//! Rust has no runtime reflection, so every fact the registry needs about a
//! domain type is declared up front through the [`ResourceModel`] trait:
//! the ordered field list, the optional display title, the ancestor chain
//! used for name-resolution fallback, and whether the type is a collection.
//! The registry memoizes everything derived from these declarations.

use std::any::{Any, TypeId};
use std::fmt;

use serde_json::Value;

/// Stable identifier for a registered or introspected type.
///
/// All registry cache tables are keyed by `TypeKey`. The embedded type name
/// is carried for diagnostics only; equality and hashing go through the
/// underlying `TypeId`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Get the key for a concrete type.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The fully qualified type name.
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// The bare type name, without its module path.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

/// Whether a type is a single resource or a collection of resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionShape {
    /// The type represents one resource.
    Single,

    /// The type represents an ordered collection of `element` resources.
    Many {
        /// Key of the element type.
        element: TypeKey,
    },
}

/// How a field participates in the wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A plain serializable value.
    Attribute,

    /// A reference to zero or one related resource.
    ToOne,

    /// A reference to an ordered set of related resources.
    ToMany,
}

/// Reads a field value out of a type-erased record.
pub type FieldGetter = fn(&dyn Any) -> Option<Value>;

/// Writes a field value into a type-erased record.
///
/// Returns a human-readable reason when the value cannot be applied.
pub type FieldSetter = fn(&mut dyn Any, Value) -> Result<(), String>;

/// Resolves the related records behind a relationship field.
pub type RelatedGetter = fn(&dyn Any) -> Vec<Box<dyn ErasedRecord>>;

/// Descriptor for one public field of a domain type.
///
/// The `name` is the declared presentation name of the field; the wire key
/// is derived from it by lower-casing the first letter only.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Declared field name.
    pub name: &'static str,

    /// Marks this field as the record identifier.
    pub use_as_id: bool,

    /// Attribute or relationship.
    pub kind: FieldKind,

    /// Value accessor.
    pub get: FieldGetter,

    /// Optional value mutator. Fields without one are read-only.
    pub set: Option<FieldSetter>,

    /// Related-record accessor for relationship fields.
    pub related: Option<RelatedGetter>,
}

impl FieldSpec {
    /// Describe a plain attribute field.
    pub fn attribute(name: &'static str, get: FieldGetter) -> Self {
        Self {
            name,
            use_as_id: false,
            kind: FieldKind::Attribute,
            get,
            set: None,
            related: None,
        }
    }

    /// Describe a to-one relationship field.
    pub fn to_one(name: &'static str, get: FieldGetter, related: RelatedGetter) -> Self {
        Self {
            name,
            use_as_id: false,
            kind: FieldKind::ToOne,
            get,
            set: None,
            related: Some(related),
        }
    }

    /// Describe a to-many relationship field.
    pub fn to_many(name: &'static str, get: FieldGetter, related: RelatedGetter) -> Self {
        Self {
            name,
            use_as_id: false,
            kind: FieldKind::ToMany,
            get,
            set: None,
            related: Some(related),
        }
    }

    /// Mark this field as the record identifier.
    pub fn use_as_id(mut self) -> Self {
        self.use_as_id = true;
        self
    }

    /// Attach a mutator, making the field writable.
    pub fn writable(mut self, set: FieldSetter) -> Self {
        self.set = Some(set);
        self
    }

    /// Whether this field references other resources.
    pub fn is_relationship(&self) -> bool {
        matches!(self.kind, FieldKind::ToOne | FieldKind::ToMany)
    }
}

/// Declares how a domain type maps onto a resource.
///
/// Implementations describe their public fields in declaration order and
/// may override the display title (used when computing a default resource
/// type name) and the ancestor chain (used for name-resolution fallback,
/// nearest ancestor first).
pub trait ResourceModel: 'static {
    /// Ordered descriptors for every public field of the type.
    fn fields() -> Vec<FieldSpec>;

    /// Optional display title overriding the bare type name.
    fn resource_title() -> Option<&'static str> {
        None
    }

    /// Ordered ancestor keys, nearest first. Empty for root types.
    fn ancestors() -> Vec<TypeKey> {
        Vec::new()
    }

    /// Single resource or collection.
    fn collection_shape() -> CollectionShape {
        CollectionShape::Single
    }

    /// Keys to test against the registered-name table, in order.
    ///
    /// Collections substitute their element type; everything else starts
    /// with itself and continues through its ancestors.
    fn name_resolution_keys() -> Vec<TypeKey>
    where
        Self: Sized,
    {
        let mut keys = vec![TypeKey::of::<Self>()];
        keys.extend(Self::ancestors());
        keys
    }
}

impl<T: ResourceModel> ResourceModel for Vec<T> {
    fn fields() -> Vec<FieldSpec> {
        Vec::new()
    }

    fn collection_shape() -> CollectionShape {
        CollectionShape::Many {
            element: TypeKey::of::<T>(),
        }
    }

    fn name_resolution_keys() -> Vec<TypeKey> {
        T::name_resolution_keys()
    }
}

impl<T: ResourceModel, const N: usize> ResourceModel for [T; N] {
    fn fields() -> Vec<FieldSpec> {
        Vec::new()
    }

    fn collection_shape() -> CollectionShape {
        CollectionShape::Many {
            element: TypeKey::of::<T>(),
        }
    }

    fn name_resolution_keys() -> Vec<TypeKey> {
        T::name_resolution_keys()
    }
}

/// Object-safe facet of [`ResourceModel`].
///
/// Lets builders and data sources operate on records whose concrete type is
/// only known at runtime, such as heterogeneous relationship targets.
pub trait ErasedRecord: Any + Send + Sync {
    /// The record as `Any`, for field accessors.
    fn as_any(&self) -> &dyn Any;

    /// Key of the record's concrete type.
    fn type_key(&self) -> TypeKey;

    /// Keys to test against the registered-name table, in order.
    fn resolution_keys(&self) -> Vec<TypeKey>;

    /// Field descriptors of the record's concrete type.
    fn field_specs(&self) -> Vec<FieldSpec>;
}

impl<T: ResourceModel + Send + Sync> ErasedRecord for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn resolution_keys(&self) -> Vec<TypeKey> {
        T::name_resolution_keys()
    }

    fn field_specs(&self) -> Vec<FieldSpec> {
        T::fields()
    }
}
