//! Related-resource materialization.
//!
//! Serves relationship URLs: given the identifier of a primary resource,
//! produce a document for the record(s) on the other side of one of its
//! relationships. Fetching the related record is delegated to an injected
//! resolver, so the same materializer works over any storage layout.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::base_url::BaseUrlService;
use super::error::{MaterializeError, PersistenceError};
use super::materializer::ensure_active;
use super::request::MaterializationRequest;
use crate::domains::documents::{Document, SingleResourceDocumentBuilder};
use crate::domains::registry::{ResourceModel, ResourceTypeRegistry};

/// Resolves the record behind a to-one relationship.
#[async_trait]
pub trait RelatedRecordFetcher<R>: Send + Sync {
    /// The related record for the given primary resource, if any.
    async fn fetch_related(
        &self,
        primary_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<R>, PersistenceError>;
}

/// Produces a document for a related-resource URL.
#[async_trait]
pub trait RelatedResourceMaterializer: Send + Sync {
    /// Build the document for the relationship of the identified primary
    /// resource.
    async fn related_document(
        &self,
        primary_id: &str,
        request: &MaterializationRequest,
    ) -> Result<Document, MaterializeError>;
}

/// Materializer for a to-one relationship target of type `R`.
pub struct ToOneRelatedResourceMaterializer<R> {
    fetcher: Arc<dyn RelatedRecordFetcher<R>>,
    builder: SingleResourceDocumentBuilder,
    base_urls: Arc<dyn BaseUrlService>,
}

impl<R> ToOneRelatedResourceMaterializer<R> {
    /// Create a materializer over the given fetcher.
    pub fn new(
        registry: Arc<ResourceTypeRegistry>,
        fetcher: Arc<dyn RelatedRecordFetcher<R>>,
        base_urls: Arc<dyn BaseUrlService>,
    ) -> Self {
        Self {
            fetcher,
            builder: SingleResourceDocumentBuilder::new(registry),
            base_urls,
        }
    }
}

#[async_trait]
impl<R> RelatedResourceMaterializer for ToOneRelatedResourceMaterializer<R>
where
    R: ResourceModel + Send + Sync,
{
    async fn related_document(
        &self,
        primary_id: &str,
        request: &MaterializationRequest,
    ) -> Result<Document, MaterializeError> {
        ensure_active(&request.cancel)?;
        let record = self
            .fetcher
            .fetch_related(primary_id, &request.cancel)
            .await?;
        ensure_active(&request.cancel)?;

        let base_url = self.base_urls.base_url(&request.uri);
        // An absent related record is a valid outcome here, not an error.
        let document = self
            .builder
            .build(record.as_ref(), &base_url, &[], None)?;
        Ok(Document::Single(document))
    }
}
