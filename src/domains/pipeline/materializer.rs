//! Document materializer.
//!
//! One materializer instance serves one resource type. Each call runs the
//! same pipeline: check cancellation, extract directives, resolve them
//! against the registry's field map, apply them to the data source,
//! await the fetch, and hand the resolved records to a document builder.
//! Nothing here retries; data-source failures pass through untouched.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::base_url::BaseUrlService;
use super::error::MaterializeError;
use super::request::MaterializationRequest;
use super::source::{DataSource, FieldOrdering, FieldPredicate};
use crate::core::config::{EngineConfig, PaginationConfig};
use crate::domains::documents::{
    AcknowledgementDocument, CollectionDocumentBuilder, Document, DocumentError, PageContext,
    ResourceCollectionDocument, ResourceObject, SingleResourceDocument,
    SingleResourceDocumentBuilder,
};
use crate::domains::query::{extract_include_directives, extract_sort_directives};
use crate::domains::registry::{
    ConfigurationError, FieldMap, ResourceModel, ResourceTypeRegistry, TypeKey,
};

/// Fail fast when the caller has cancelled the operation.
pub(crate) fn ensure_active(cancel: &CancellationToken) -> Result<(), MaterializeError> {
    if cancel.is_cancelled() {
        Err(MaterializeError::Cancelled)
    } else {
        Ok(())
    }
}

/// The five public operations of the materialization pipeline.
///
/// Implementations must observe the request's cancellation signal at the
/// start of every operation and before each suspend point, surfacing
/// [`MaterializeError::Cancelled`] rather than a partial document.
#[async_trait]
pub trait DocumentMaterializer: Send + Sync {
    /// Records filtered, sorted, and paginated per the request parameters.
    async fn get_records(
        &self,
        request: &MaterializationRequest,
    ) -> Result<ResourceCollectionDocument, MaterializeError>;

    /// The record with the given identifier.
    async fn get_record_by_id(
        &self,
        id: &str,
        request: &MaterializationRequest,
    ) -> Result<SingleResourceDocument, MaterializeError>;

    /// Create a record from the request document and return its document.
    async fn create_record(
        &self,
        document: SingleResourceDocument,
        request: &MaterializationRequest,
    ) -> Result<SingleResourceDocument, MaterializeError>;

    /// Update the identified record from the request document.
    async fn update_record(
        &self,
        id: &str,
        document: SingleResourceDocument,
        request: &MaterializationRequest,
    ) -> Result<SingleResourceDocument, MaterializeError>;

    /// Delete the identified record. Deleting an already absent record
    /// succeeds unless the data source objects.
    async fn delete_record(
        &self,
        id: &str,
        request: &MaterializationRequest,
    ) -> Result<Document, MaterializeError>;
}

/// Materializer over any [`DataSource`] of `T` records.
pub struct QueryableMaterializer<T> {
    registry: Arc<ResourceTypeRegistry>,
    source: Arc<dyn DataSource<T>>,
    base_urls: Arc<dyn BaseUrlService>,
    single_builder: SingleResourceDocumentBuilder,
    collection_builder: CollectionDocumentBuilder,
    pagination: PaginationConfig,
}

impl<T> QueryableMaterializer<T>
where
    T: ResourceModel + Default + Clone + Send + Sync,
{
    /// Create a materializer for `T` over the given collaborators.
    pub fn new(
        registry: Arc<ResourceTypeRegistry>,
        source: Arc<dyn DataSource<T>>,
        base_urls: Arc<dyn BaseUrlService>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            single_builder: SingleResourceDocumentBuilder::new(Arc::clone(&registry)),
            collection_builder: CollectionDocumentBuilder::new(Arc::clone(&registry)),
            registry,
            source,
            base_urls,
            pagination: config.pagination.clone(),
        }
    }

    fn type_name(&self) -> &'static str {
        TypeKey::of::<T>().type_name()
    }

    /// Resolve sort tokens against the field map, honoring the `-` prefix.
    fn resolve_orderings(
        &self,
        field_map: &FieldMap,
        directives: &[String],
    ) -> Result<Vec<FieldOrdering>, ConfigurationError> {
        directives
            .iter()
            .map(|token| {
                let (name, descending) = match token.strip_prefix('-') {
                    Some(rest) => (rest, true),
                    None => (token.as_str(), false),
                };
                let field = field_map
                    .get(name)
                    .ok_or_else(|| ConfigurationError::unknown_field(name, self.type_name()))?;
                Ok(FieldOrdering {
                    field: field.clone(),
                    descending,
                })
            })
            .collect()
    }

    fn id_predicate(&self, id: &str) -> Result<FieldPredicate, ConfigurationError> {
        let field = self.registry.identifier_field::<T>()?;
        Ok(FieldPredicate::equals(field, id))
    }

    async fn fetch_by_id(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<T>, MaterializeError> {
        let mut set = self.source.records();
        set.apply_predicate(self.id_predicate(id)?);
        ensure_active(cancel)?;
        let page = set.materialize(cancel).await?;
        ensure_active(cancel)?;
        Ok(page.records.into_iter().next())
    }

    /// Check the declared resource type of an inbound document and return
    /// the expected name.
    fn validate_declared_type(
        &self,
        resource: &ResourceObject,
    ) -> Result<String, MaterializeError> {
        let expected = self.registry.resource_type_name::<T>()?;
        if resource.resource_type != expected {
            return Err(MaterializeError::Conflict {
                declared: resource.resource_type.clone(),
                expected,
            });
        }
        Ok(expected)
    }

    /// Apply an inbound resource's attribute values through the field map.
    fn apply_attributes(
        &self,
        record: &mut T,
        resource: &ResourceObject,
    ) -> Result<(), MaterializeError> {
        let field_map = self.registry.field_map::<T>();
        for (key, value) in &resource.attributes {
            let spec = field_map
                .get(key)
                .ok_or_else(|| ConfigurationError::unknown_field(key, self.type_name()))?;
            let set = spec
                .set
                .ok_or_else(|| DocumentError::invalid_attribute(key, "field is read-only"))?;
            set(record, value.clone())
                .map_err(|reason| DocumentError::invalid_attribute(key, reason))?;
        }
        Ok(())
    }

    /// Assign the identifier a create document carries, if any.
    fn apply_document_id(
        &self,
        record: &mut T,
        resource: &ResourceObject,
    ) -> Result<(), MaterializeError> {
        if resource.id.is_empty() {
            return Ok(());
        }
        let id_field = self.registry.identifier_field::<T>()?;
        let set = id_field.set.ok_or_else(|| {
            DocumentError::invalid_attribute(id_field.name, "identifier is read-only")
        })?;
        set(record, serde_json::Value::String(resource.id.clone()))
            .map_err(|reason| DocumentError::invalid_attribute(id_field.name, reason))?;
        Ok(())
    }
}

#[async_trait]
impl<T> DocumentMaterializer for QueryableMaterializer<T>
where
    T: ResourceModel + Default + Clone + Send + Sync,
{
    #[instrument(skip_all)]
    async fn get_records(
        &self,
        request: &MaterializationRequest,
    ) -> Result<ResourceCollectionDocument, MaterializeError> {
        ensure_active(&request.cancel)?;

        let sort = extract_sort_directives(&request.params);
        let includes = extract_include_directives(&request.params);
        let field_map = self.registry.field_map::<T>();

        let mut set = self.source.records();
        for (key, value) in request.params.filter_pairs() {
            let field = field_map
                .get(key)
                .ok_or_else(|| ConfigurationError::unknown_field(key, self.type_name()))?;
            set.apply_predicate(FieldPredicate::equals(field.clone(), value));
        }

        let orderings = self.resolve_orderings(&field_map, &sort)?;
        if !orderings.is_empty() {
            set.apply_ordering(orderings);
        }

        let page = request.params.page_request(&self.pagination)?;
        if let Some(page) = page {
            set.apply_page(page);
        }

        ensure_active(&request.cancel)?;
        let resolved = set.materialize(&request.cancel).await?;
        ensure_active(&request.cancel)?;

        debug!(count = resolved.records.len(), "materialized record page");
        let base_url = self.base_urls.base_url(&request.uri);
        let context = page.map(|page| PageContext {
            page,
            total: resolved.total,
        });
        Ok(self
            .collection_builder
            .build(&resolved.records, &base_url, &includes, context)?)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn get_record_by_id(
        &self,
        id: &str,
        request: &MaterializationRequest,
    ) -> Result<SingleResourceDocument, MaterializeError> {
        ensure_active(&request.cancel)?;

        let includes = extract_include_directives(&request.params);
        let record = self.fetch_by_id(id, &request.cancel).await?;
        let Some(record) = record else {
            return Err(MaterializeError::not_found(
                self.registry.resource_type_name::<T>()?,
                id,
            ));
        };

        let base_url = self.base_urls.base_url(&request.uri);
        Ok(self
            .single_builder
            .build(Some(&record), &base_url, &includes, None)?)
    }

    #[instrument(skip_all)]
    async fn create_record(
        &self,
        document: SingleResourceDocument,
        request: &MaterializationRequest,
    ) -> Result<SingleResourceDocument, MaterializeError> {
        ensure_active(&request.cancel)?;

        let resource = document.data.ok_or(DocumentError::MissingPrimaryData)?;
        self.validate_declared_type(&resource)?;

        let mut record = T::default();
        self.apply_document_id(&mut record, &resource)?;
        self.apply_attributes(&mut record, &resource)?;

        ensure_active(&request.cancel)?;
        let record = self.source.insert(record, &request.cancel).await?;
        ensure_active(&request.cancel)?;
        self.source.commit(&request.cancel).await?;

        let base_url = self.base_urls.base_url(&request.uri);
        Ok(self.single_builder.build(Some(&record), &base_url, &[], None)?)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn update_record(
        &self,
        id: &str,
        document: SingleResourceDocument,
        request: &MaterializationRequest,
    ) -> Result<SingleResourceDocument, MaterializeError> {
        ensure_active(&request.cancel)?;

        let resource = document.data.ok_or(DocumentError::MissingPrimaryData)?;
        let expected = self.validate_declared_type(&resource)?;

        let record = self.fetch_by_id(id, &request.cancel).await?;
        let Some(mut record) = record else {
            return Err(MaterializeError::not_found(expected, id));
        };
        self.apply_attributes(&mut record, &resource)?;

        ensure_active(&request.cancel)?;
        let record = self
            .source
            .save(record, self.id_predicate(id)?, &request.cancel)
            .await?;
        ensure_active(&request.cancel)?;
        self.source.commit(&request.cancel).await?;

        let base_url = self.base_urls.base_url(&request.uri);
        Ok(self.single_builder.build(Some(&record), &base_url, &[], None)?)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn delete_record(
        &self,
        id: &str,
        request: &MaterializationRequest,
    ) -> Result<Document, MaterializeError> {
        ensure_active(&request.cancel)?;

        let predicate = self.id_predicate(id)?;
        ensure_active(&request.cancel)?;
        let removed = self.source.remove(predicate, &request.cancel).await?;
        ensure_active(&request.cancel)?;
        self.source.commit(&request.cancel).await?;

        debug!(removed, "delete completed");
        Ok(Document::Acknowledgement(AcknowledgementDocument::default()))
    }
}
