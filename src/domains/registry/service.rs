//! Resource type registry implementation.
//!
//! The registry owns the bidirectional mapping between domain types and
//! resource type names, plus memoization tables for every fact derived from
//! a type's [`ResourceModel`] declaration: identifier field, wire field map,
//! and collection shape.
//!
//! Deriving a fact is done at most once per type. Each table is guarded by
//! its own lock so that populating, say, the identifier cache for one type
//! never blocks field-map reads for another; cached entries are served under
//! a read lock and never block each other.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::error::ConfigurationError;
use super::model::{CollectionShape, FieldSpec, ResourceModel, TypeKey};
use super::naming::{NamingService, dasherize, lower_camel};

/// Ordered mapping from wire field keys to field descriptors.
///
/// Wire keys lower-case the first letter of the declared field name; a
/// later field with the same wire key replaces the earlier one in place.
#[derive(Debug, Default, Clone)]
pub struct FieldMap {
    entries: Vec<(String, FieldSpec)>,
    index: HashMap<String, usize>,
}

impl FieldMap {
    /// Build a map from declared field descriptors.
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        let mut map = Self::default();
        for spec in fields {
            let key = lower_camel(spec.name);
            match map.index.get(&key) {
                Some(&at) => map.entries[at] = (key, spec),
                None => {
                    map.index.insert(key.clone(), map.entries.len());
                    map.entries.push((key, spec));
                }
            }
        }
        map
    }

    /// Look up a field by its wire key.
    pub fn get(&self, wire_key: &str) -> Option<&FieldSpec> {
        self.index.get(wire_key).map(|&at| &self.entries[at].1)
    }

    /// Iterate `(wire_key, field)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.entries.iter().map(|(key, spec)| (key.as_str(), spec))
    }

    /// Iterate the field descriptors in declaration order.
    pub fn specs(&self) -> impl Iterator<Item = &FieldSpec> {
        self.entries.iter().map(|(_, spec)| spec)
    }

    /// Number of mapped fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry of resource types and their derived descriptors.
///
/// Expected lifecycle: populated through [`register`](Self::register) during
/// process initialization, then read concurrently for the lifetime of the
/// process. Late registrations are tolerated and become visible to readers
/// once they complete.
pub struct ResourceTypeRegistry {
    naming: Arc<dyn NamingService>,

    // One lock per table. A writer populating one table must not block
    // readers or writers of the others.
    identifier_fields: RwLock<HashMap<TypeKey, FieldSpec>>,
    field_maps: RwLock<HashMap<TypeKey, Arc<FieldMap>>>,
    collection_shapes: RwLock<HashMap<TypeKey, CollectionShape>>,
    names_by_type: RwLock<HashMap<TypeKey, String>>,
    types_by_name: RwLock<HashMap<String, TypeKey>>,
}

impl ResourceTypeRegistry {
    /// Create an empty registry around the given naming service.
    pub fn new(naming: Arc<dyn NamingService>) -> Self {
        info!("Initializing ResourceTypeRegistry");
        Self {
            naming,
            identifier_fields: RwLock::new(HashMap::new()),
            field_maps: RwLock::new(HashMap::new()),
            collection_shapes: RwLock::new(HashMap::new()),
            names_by_type: RwLock::new(HashMap::new()),
            types_by_name: RwLock::new(HashMap::new()),
        }
    }

    // ========================================================================
    // Identifier field resolution
    // ========================================================================

    /// Resolve the identifier field of `T`.
    ///
    /// A field marked `use_as_id` wins; otherwise a field literally named
    /// `Id` is used. Types with neither cannot be served.
    pub fn identifier_field<T: ResourceModel>(&self) -> Result<FieldSpec, ConfigurationError> {
        self.identifier_field_for(TypeKey::of::<T>(), T::fields)
    }

    /// Resolve the identifier field for a runtime-typed record.
    ///
    /// `fields` is only invoked on a cache miss.
    pub fn identifier_field_for(
        &self,
        key: TypeKey,
        fields: impl FnOnce() -> Vec<FieldSpec>,
    ) -> Result<FieldSpec, ConfigurationError> {
        if let Some(spec) = self.identifier_fields.read().get(&key) {
            return Ok(spec.clone());
        }

        let mut cache = self.identifier_fields.write();
        if let Some(spec) = cache.get(&key) {
            return Ok(spec.clone());
        }

        let fields = fields();
        let spec = fields
            .iter()
            .find(|field| field.use_as_id)
            .or_else(|| fields.iter().find(|field| field.name == "Id"))
            .cloned()
            .ok_or(ConfigurationError::NoIdentifierField {
                type_name: key.type_name(),
            })?;

        cache.insert(key, spec.clone());
        Ok(spec)
    }

    // ========================================================================
    // Field maps
    // ========================================================================

    /// The wire field map of `T`, covering every declared field.
    pub fn field_map<T: ResourceModel>(&self) -> Arc<FieldMap> {
        self.field_map_for(TypeKey::of::<T>(), T::fields)
    }

    /// The wire field map for a runtime-typed record.
    ///
    /// `fields` is only invoked on a cache miss.
    pub fn field_map_for(
        &self,
        key: TypeKey,
        fields: impl FnOnce() -> Vec<FieldSpec>,
    ) -> Arc<FieldMap> {
        if let Some(map) = self.field_maps.read().get(&key) {
            return Arc::clone(map);
        }

        let mut cache = self.field_maps.write();
        if let Some(map) = cache.get(&key) {
            return Arc::clone(map);
        }

        debug!(type_name = key.type_name(), "building field map");
        let map = Arc::new(FieldMap::new(fields()));
        cache.insert(key, Arc::clone(&map));
        map
    }

    /// Look up a single field of `T` by its wire key.
    pub fn field_for_wire_key<T: ResourceModel>(&self, wire_key: &str) -> Option<FieldSpec> {
        self.field_map::<T>().get(wire_key).cloned()
    }

    // ========================================================================
    // Collection classification
    // ========================================================================

    fn collection_shape<T: ResourceModel>(&self) -> CollectionShape {
        let key = TypeKey::of::<T>();
        if let Some(shape) = self.collection_shapes.read().get(&key) {
            return *shape;
        }

        let mut cache = self.collection_shapes.write();
        *cache.entry(key).or_insert_with(T::collection_shape)
    }

    /// Whether `T` is serialized as a collection of resources.
    pub fn is_collection_type<T: ResourceModel>(&self) -> bool {
        matches!(self.collection_shape::<T>(), CollectionShape::Many { .. })
    }

    /// The element type of the collection type `T`.
    pub fn element_type<T: ResourceModel>(&self) -> Result<TypeKey, ConfigurationError> {
        match self.collection_shape::<T>() {
            CollectionShape::Many { element } => Ok(element),
            CollectionShape::Single => Err(ConfigurationError::NotACollection {
                type_name: TypeKey::of::<T>().type_name(),
            }),
        }
    }

    // ========================================================================
    // Resource type names
    // ========================================================================

    /// Resolve the resource type name for `T`.
    ///
    /// Collection types resolve through their element type. The type itself
    /// is tested first, then each declared ancestor in order, so a
    /// registered base type serves its unregistered descendants.
    pub fn resource_type_name<T: ResourceModel>(&self) -> Result<String, ConfigurationError> {
        self.resource_type_name_for_keys(
            &T::name_resolution_keys(),
            TypeKey::of::<T>().type_name(),
        )
    }

    /// Resolve a resource type name from an ordered key chain.
    pub fn resource_type_name_for_keys(
        &self,
        keys: &[TypeKey],
        requested: &'static str,
    ) -> Result<String, ConfigurationError> {
        let table = self.names_by_type.read();
        for key in keys {
            if let Some(name) = table.get(key) {
                return Ok(name.clone());
            }
        }
        Err(ConfigurationError::TypeNotRegistered {
            type_name: requested,
        })
    }

    /// Reverse lookup: the type registered under `name`.
    pub fn type_for_name(&self, name: &str) -> Result<TypeKey, ConfigurationError> {
        self.types_by_name
            .read()
            .get(name)
            .copied()
            .ok_or_else(|| ConfigurationError::name_not_registered(name))
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register `T` under a computed default name.
    ///
    /// The default is the display title (or the bare type name), pluralized
    /// through the naming service and dasherized.
    pub fn register<T: ResourceModel>(&self) -> Result<String, ConfigurationError> {
        let title = T::resource_title().unwrap_or_else(|| TypeKey::of::<T>().short_name());
        let name = dasherize(&self.naming.pluralize(title));
        self.register_named::<T>(&name)?;
        Ok(name)
    }

    /// Register `T` under an explicit resource type name.
    ///
    /// Both directional tables are checked before either is touched, so a
    /// rejected registration leaves no trace and a duplicate name collision
    /// is caught even when the type itself is new.
    pub fn register_named<T: ResourceModel>(&self, name: &str) -> Result<(), ConfigurationError> {
        let key = TypeKey::of::<T>();

        // Lock order: names-by-type, then types-by-name.
        let mut by_type = self.names_by_type.write();
        let mut by_name = self.types_by_name.write();

        if by_type.contains_key(&key) {
            return Err(ConfigurationError::DuplicateType {
                type_name: key.type_name(),
            });
        }
        if by_name.contains_key(name) {
            return Err(ConfigurationError::DuplicateName {
                name: name.to_string(),
            });
        }

        info!(resource_type = name, type_name = key.type_name(), "registering resource type");
        by_type.insert(key, name.to_string());
        by_name.insert(name.to_string(), key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Suffixing;

    impl NamingService for Suffixing {
        fn pluralize(&self, word: &str) -> String {
            format!("{word}s")
        }
    }

    fn registry() -> ResourceTypeRegistry {
        ResourceTypeRegistry::new(Arc::new(Suffixing))
    }

    #[derive(Debug, Clone)]
    struct Album {
        id: i64,
        title: String,
    }

    impl ResourceModel for Album {
        fn fields() -> Vec<FieldSpec> {
            vec![
                FieldSpec::attribute("Id", |r| {
                    r.downcast_ref::<Album>().map(|a| json!(a.id))
                }),
                FieldSpec::attribute("Title", |r| {
                    r.downcast_ref::<Album>().map(|a| json!(a.title))
                }),
            ]
        }
    }

    /// Same shape as Album but with an explicitly tagged identifier.
    struct Pressing;

    impl ResourceModel for Pressing {
        fn fields() -> Vec<FieldSpec> {
            vec![
                FieldSpec::attribute("CatalogNumber", |_| None).use_as_id(),
                FieldSpec::attribute("Id", |_| None),
            ]
        }
    }

    struct Untitled;

    impl ResourceModel for Untitled {
        fn fields() -> Vec<FieldSpec> {
            vec![FieldSpec::attribute("Label", |_| None)]
        }
    }

    /// Plays the unregistered-subclass role: resolves through Album.
    struct LiveAlbum;

    impl ResourceModel for LiveAlbum {
        fn fields() -> Vec<FieldSpec> {
            Album::fields()
        }

        fn ancestors() -> Vec<TypeKey> {
            vec![TypeKey::of::<Album>()]
        }
    }

    struct PhotoAlbum;

    impl ResourceModel for PhotoAlbum {
        fn fields() -> Vec<FieldSpec> {
            vec![FieldSpec::attribute("Id", |_| None)]
        }

        fn resource_title() -> Option<&'static str> {
            Some("Snapshot")
        }
    }

    #[test]
    fn test_identifier_field_prefers_tagged_field() {
        let spec = registry().identifier_field::<Pressing>().unwrap();
        assert_eq!(spec.name, "CatalogNumber");
    }

    #[test]
    fn test_identifier_field_falls_back_to_id() {
        let spec = registry().identifier_field::<Album>().unwrap();
        assert_eq!(spec.name, "Id");
    }

    #[test]
    fn test_identifier_field_missing_is_an_error() {
        let err = registry().identifier_field::<Untitled>().unwrap_err();
        assert!(matches!(err, ConfigurationError::NoIdentifierField { .. }));
    }

    #[test]
    fn test_field_map_covers_every_field_with_wire_keys() {
        let map = registry().field_map::<Album>();
        assert_eq!(map.len(), 2);
        assert!(map.get("id").is_some());
        assert!(map.get("title").is_some());
        assert!(map.get("Title").is_none());
    }

    #[test]
    fn test_field_for_wire_key() {
        let registry = registry();
        assert_eq!(
            registry.field_for_wire_key::<Album>("title").unwrap().name,
            "Title"
        );
        assert!(registry.field_for_wire_key::<Album>("missing").is_none());
    }

    #[test]
    fn test_field_map_is_cached() {
        let registry = registry();
        let first = registry.field_map::<Album>();
        let second = registry.field_map::<Album>();
        assert!(Arc::ptr_eq(&first, &second));
        let keys: Vec<_> = first.iter().map(|(k, _)| k.to_string()).collect();
        let again: Vec<_> = second.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, again);
    }

    #[test]
    fn test_field_map_concurrent_readers_agree() {
        let registry = Arc::new(registry());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let map = registry.field_map::<Album>();
                    map.iter().map(|(k, _)| k.to_string()).collect::<Vec<_>>()
                })
            })
            .collect();
        let mut results: Vec<Vec<String>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        let reference = results.pop().unwrap();
        for keys in results {
            assert_eq!(keys, reference);
        }
    }

    #[test]
    fn test_register_computes_default_name() {
        let registry = registry();
        let name = registry.register::<Album>().unwrap();
        assert_eq!(name, "albums");
        assert_eq!(registry.resource_type_name::<Album>().unwrap(), "albums");
    }

    #[test]
    fn test_register_uses_display_title() {
        let registry = registry();
        let name = registry.register::<PhotoAlbum>().unwrap();
        assert_eq!(name, "snapshots");
    }

    #[test]
    fn test_resource_type_name_is_stable() {
        let registry = registry();
        registry.register_named::<Album>("albums").unwrap();
        for _ in 0..3 {
            assert_eq!(registry.resource_type_name::<Album>().unwrap(), "albums");
        }
    }

    #[test]
    fn test_registering_same_type_twice_fails() {
        let registry = registry();
        registry.register_named::<Album>("albums").unwrap();
        let err = registry.register_named::<Album>("other").unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateType { .. }));
    }

    #[test]
    fn test_registering_two_types_under_one_name_fails() {
        let registry = registry();
        registry.register_named::<Album>("albums").unwrap();
        let err = registry.register_named::<Pressing>("albums").unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateName { .. }));
        // The rejected registration must leave no trace.
        assert!(registry.resource_type_name::<Pressing>().is_err());
    }

    #[test]
    fn test_unregistered_type_resolves_through_ancestor() {
        let registry = registry();
        registry.register_named::<Album>("albums").unwrap();
        assert_eq!(registry.resource_type_name::<LiveAlbum>().unwrap(), "albums");
    }

    #[test]
    fn test_collection_type_resolves_through_element() {
        let registry = registry();
        registry.register_named::<Album>("albums").unwrap();
        assert_eq!(
            registry.resource_type_name::<Vec<Album>>().unwrap(),
            "albums"
        );
    }

    #[test]
    fn test_unregistered_type_fails_resolution() {
        let err = registry().resource_type_name::<Album>().unwrap_err();
        assert!(matches!(err, ConfigurationError::TypeNotRegistered { .. }));
    }

    #[test]
    fn test_reverse_lookup() {
        let registry = registry();
        registry.register_named::<Album>("albums").unwrap();
        assert_eq!(
            registry.type_for_name("albums").unwrap(),
            TypeKey::of::<Album>()
        );
        assert!(matches!(
            registry.type_for_name("missing").unwrap_err(),
            ConfigurationError::NameNotRegistered { .. }
        ));
    }

    #[test]
    fn test_collection_classification() {
        let registry = registry();
        assert!(!registry.is_collection_type::<Album>());
        assert!(registry.is_collection_type::<Vec<Album>>());
        assert_eq!(
            registry.element_type::<Vec<Album>>().unwrap(),
            TypeKey::of::<Album>()
        );
        assert!(matches!(
            registry.element_type::<Album>().unwrap_err(),
            ConfigurationError::NotACollection { .. }
        ));
    }
}
