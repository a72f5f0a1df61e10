//! Collection document builder.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value, json};

use super::{resolve_includes, resource_object};
use crate::domains::documents::error::DocumentError;
use crate::domains::documents::types::{DocumentLinks, ResourceCollectionDocument};
use crate::domains::query::PageRequest;
use crate::domains::registry::{ResourceModel, ResourceTypeRegistry};

/// Pagination facts accompanying a resolved page of records.
#[derive(Debug, Clone, Copy)]
pub struct PageContext {
    /// The page that was applied.
    pub page: PageRequest,

    /// Total number of matching records, when the source reports it.
    pub total: Option<u64>,
}

/// Builds documents wrapping an ordered collection of resources.
pub struct CollectionDocumentBuilder {
    registry: Arc<ResourceTypeRegistry>,
}

impl CollectionDocumentBuilder {
    /// Create a builder over the given registry.
    pub fn new(registry: Arc<ResourceTypeRegistry>) -> Self {
        Self { registry }
    }

    /// Build a document for a resolved page of records.
    ///
    /// When `page` is present, pagination links are derived from it and the
    /// total count (when known) lands in the document metadata.
    pub fn build<T>(
        &self,
        records: &[T],
        base_url: &str,
        includes: &[String],
        page: Option<PageContext>,
    ) -> Result<ResourceCollectionDocument, DocumentError>
    where
        T: ResourceModel + Send + Sync,
    {
        let mut data = Vec::with_capacity(records.len());
        let mut included = Vec::new();
        let mut seen = HashSet::new();

        for record in records {
            let resource = resource_object(&self.registry, record, base_url)?;
            seen.insert((resource.resource_type.clone(), resource.id.clone()));
            data.push(resource);
        }
        for record in records {
            resolve_includes(
                &self.registry,
                record,
                includes,
                base_url,
                &mut included,
                &mut seen,
            )?;
        }

        let mut meta: Option<Map<String, Value>> = None;
        let mut links: Option<DocumentLinks> = None;
        if let Some(context) = page {
            if let Some(total) = context.total {
                meta.get_or_insert_with(Map::new)
                    .insert("total".to_string(), json!(total));
            }
            let computed = self.page_links::<T>(base_url, context)?;
            if !computed.is_empty() {
                links = Some(computed);
            }
        }

        Ok(ResourceCollectionDocument {
            data,
            included,
            links,
            meta,
        })
    }

    fn page_links<T>(&self, base_url: &str, context: PageContext) -> Result<DocumentLinks, DocumentError>
    where
        T: ResourceModel,
    {
        let resource_type = self.registry.resource_type_name::<T>()?;
        let page_url = |number: u64| {
            format!(
                "{}/{}?page[number]={}&page[size]={}",
                base_url.trim_end_matches('/'),
                resource_type,
                number,
                context.page.size
            )
        };

        let mut links = DocumentLinks {
            self_link: Some(page_url(context.page.number)),
            first: Some(page_url(1)),
            ..DocumentLinks::default()
        };
        if context.page.number > 1 {
            links.prev = Some(page_url(context.page.number - 1));
        }
        if let Some(total) = context.total {
            let last = total.div_ceil(context.page.size).max(1);
            links.last = Some(page_url(last));
            if context.page.number < last {
                links.next = Some(page_url(context.page.number + 1));
            }
        }
        Ok(links)
    }
}
