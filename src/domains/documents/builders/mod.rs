//! Document builders.
//!
//! Builders turn resolved records into response documents. The single and
//! collection builders are typed; the fallback builder accepts a record
//! whose concrete type is only discovered at call time. All three share
//! the resource-object assembly and include resolution below.
//!
//! Include paths are validated here, lazily, against the field map of the
//! record they are applied to; extraction never rejects them.

pub mod collection;
pub mod fallback;
pub mod single;

pub use collection::CollectionDocumentBuilder;
pub use fallback::FallbackDocumentBuilder;
pub use single::SingleResourceDocumentBuilder;

use std::collections::HashSet;

use super::error::DocumentError;
use super::types::{ResourceLinks, ResourceObject, wire_id_string};
use crate::domains::registry::{
    ConfigurationError, ErasedRecord, FieldKind, ResourceTypeRegistry,
};

/// Assemble the resource object for one record.
///
/// The resource type name resolves through the record's key chain, the
/// identifier through the registry's cached resolution, and every
/// non-identifier attribute field lands in the attributes map under its
/// wire key.
pub(crate) fn resource_object(
    registry: &ResourceTypeRegistry,
    record: &dyn ErasedRecord,
    base_url: &str,
) -> Result<ResourceObject, ConfigurationError> {
    let key = record.type_key();
    let resource_type =
        registry.resource_type_name_for_keys(&record.resolution_keys(), key.type_name())?;

    let id_field = registry.identifier_field_for(key, || record.field_specs())?;
    let id = (id_field.get)(record.as_any())
        .as_ref()
        .map(wire_id_string)
        .unwrap_or_default();

    let mut resource = ResourceObject::new(&resource_type).with_id(&id);
    let field_map = registry.field_map_for(key, || record.field_specs());
    for (wire_key, spec) in field_map.iter() {
        if spec.name == id_field.name || spec.kind != FieldKind::Attribute {
            continue;
        }
        if let Some(value) = (spec.get)(record.as_any()) {
            resource.attributes.insert(wire_key.to_string(), value);
        }
    }

    resource.links = Some(ResourceLinks {
        self_link: format!("{}/{}/{}", base_url.trim_end_matches('/'), resource_type, id),
    });
    Ok(resource)
}

/// Resolve every include path of a record into `included`, deduplicating
/// by `(type, id)` across the whole document.
pub(crate) fn resolve_includes(
    registry: &ResourceTypeRegistry,
    record: &dyn ErasedRecord,
    includes: &[String],
    base_url: &str,
    included: &mut Vec<ResourceObject>,
    seen: &mut HashSet<(String, String)>,
) -> Result<(), DocumentError> {
    for path in includes {
        let segments: Vec<&str> = path.split('.').collect();
        collect_path(registry, record, &segments, base_url, included, seen)?;
    }
    Ok(())
}

fn collect_path(
    registry: &ResourceTypeRegistry,
    record: &dyn ErasedRecord,
    segments: &[&str],
    base_url: &str,
    included: &mut Vec<ResourceObject>,
    seen: &mut HashSet<(String, String)>,
) -> Result<(), DocumentError> {
    let Some((head, rest)) = segments.split_first() else {
        return Ok(());
    };

    let key = record.type_key();
    let field_map = registry.field_map_for(key, || record.field_specs());
    let spec = field_map
        .get(head)
        .ok_or_else(|| ConfigurationError::unknown_field(*head, key.type_name()))?
        .clone();

    if !spec.is_relationship() {
        return Err(ConfigurationError::NotARelationship {
            field: head.to_string(),
            type_name: key.type_name(),
        }
        .into());
    }

    let related = spec
        .related
        .map(|fetch| fetch(record.as_any()))
        .unwrap_or_default();

    for related_record in &related {
        let resource = resource_object(registry, related_record.as_ref(), base_url)?;
        let identity = (resource.resource_type.clone(), resource.id.clone());
        if seen.insert(identity) {
            included.push(resource);
        }
        collect_path(registry, related_record.as_ref(), rest, base_url, included, seen)?;
    }
    Ok(())
}
