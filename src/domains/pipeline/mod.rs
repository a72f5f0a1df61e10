//! Materialization pipeline domain.
//!
//! Orchestrates one inbound request into one response document: directive
//! extraction, registry-backed field resolution, data-source application,
//! and document building, with cancellation observed at every suspend
//! point.

pub mod base_url;
pub mod error;
pub mod materializer;
pub mod memory;
pub mod related;
pub mod request;
pub mod source;

pub use base_url::{BaseUrlService, DefaultBaseUrlService};
pub use error::{MaterializeError, PersistenceError};
pub use materializer::{DocumentMaterializer, QueryableMaterializer};
pub use memory::InMemoryDataSource;
pub use related::{
    RelatedRecordFetcher, RelatedResourceMaterializer, ToOneRelatedResourceMaterializer,
};
pub use request::MaterializationRequest;
pub use source::{DataSource, FieldOrdering, FieldPredicate, RecordSet, ResolvedPage};
