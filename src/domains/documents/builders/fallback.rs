//! Fallback document builder.
//!
//! Used when the concrete type of a record is not known until runtime,
//! such as the target of a polymorphic relationship. The record's own
//! descriptors supply the fields; the registry supplies the resource type
//! name through the record's resolution-key chain.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::SingleResourceDocumentBuilder;
use crate::domains::documents::error::DocumentError;
use crate::domains::documents::types::SingleResourceDocument;
use crate::domains::registry::{ConfigurationError, ErasedRecord, ResourceTypeRegistry};

/// Builds single-resource documents from runtime-typed records.
pub struct FallbackDocumentBuilder {
    inner: SingleResourceDocumentBuilder,
}

impl FallbackDocumentBuilder {
    /// Create a builder over the given registry.
    pub fn new(registry: Arc<ResourceTypeRegistry>) -> Self {
        Self {
            inner: SingleResourceDocumentBuilder::new(registry),
        }
    }

    /// Build a document for a record discovered at runtime.
    ///
    /// A record whose type chain resolves to no registered resource type is
    /// a document-construction error, not a registry lookup failure: the
    /// caller handed the pipeline an object it cannot represent.
    pub fn build(
        &self,
        record: &dyn ErasedRecord,
        base_url: &str,
        includes: &[String],
        meta: Option<Map<String, Value>>,
    ) -> Result<SingleResourceDocument, DocumentError> {
        self.inner
            .build_erased(record, base_url, includes, meta)
            .map_err(|err| match err {
                DocumentError::Configuration(ConfigurationError::TypeNotRegistered {
                    type_name,
                }) => DocumentError::UnresolvableType { type_name },
                other => other,
            })
    }
}
