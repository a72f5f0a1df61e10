//! Single-resource document builder.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::{resolve_includes, resource_object};
use crate::domains::documents::error::DocumentError;
use crate::domains::documents::types::SingleResourceDocument;
use crate::domains::registry::{ErasedRecord, ResourceModel, ResourceTypeRegistry};

/// Builds documents wrapping zero or one resource.
pub struct SingleResourceDocumentBuilder {
    registry: Arc<ResourceTypeRegistry>,
}

impl SingleResourceDocumentBuilder {
    /// Create a builder over the given registry.
    pub fn new(registry: Arc<ResourceTypeRegistry>) -> Self {
        Self { registry }
    }

    /// Build a document for `record`.
    ///
    /// An absent record yields a document with no primary data, which is
    /// the correct shape for relationship lookups; callers resolving a
    /// primary resource treat absence as not-found before getting here.
    pub fn build<T>(
        &self,
        record: Option<&T>,
        base_url: &str,
        includes: &[String],
        meta: Option<Map<String, Value>>,
    ) -> Result<SingleResourceDocument, DocumentError>
    where
        T: ResourceModel + Send + Sync,
    {
        match record {
            Some(record) => self.build_erased(record, base_url, includes, meta),
            None => Ok(SingleResourceDocument {
                data: None,
                meta,
                ..SingleResourceDocument::default()
            }),
        }
    }

    /// Build a document for an already type-erased record.
    pub fn build_erased(
        &self,
        record: &dyn ErasedRecord,
        base_url: &str,
        includes: &[String],
        meta: Option<Map<String, Value>>,
    ) -> Result<SingleResourceDocument, DocumentError> {
        let resource = resource_object(&self.registry, record, base_url)?;

        let mut included = Vec::new();
        let mut seen = HashSet::new();
        seen.insert((resource.resource_type.clone(), resource.id.clone()));
        resolve_includes(
            &self.registry,
            record,
            includes,
            base_url,
            &mut included,
            &mut seen,
        )?;

        Ok(SingleResourceDocument {
            data: Some(resource),
            included,
            links: None,
            meta,
        })
    }
}
