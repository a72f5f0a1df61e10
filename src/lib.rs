//! Resource Engine Library
//!
//! This crate exposes arbitrary in-memory domain types as hypermedia
//! resources over a query-parameterized request/response pipeline, with a
//! modular architecture organized by domains.
//!
//! # Architecture
//!
//! The engine is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration and error handling
//! - **domains**: Engine logic organized by bounded contexts
//!   - **registry**: the resource type registry mapping domain types to
//!     resource type names, identifier fields, and wire field maps
//!   - **query**: query parameter carriage and sort/include extraction
//!   - **documents**: the response document model and its builders
//!   - **pipeline**: the document materializer, data-source boundary, and
//!     request plumbing
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use resource_engine::core::EngineConfig;
//! use resource_engine::domains::pipeline::{
//!     DefaultBaseUrlService, DocumentMaterializer, InMemoryDataSource,
//!     MaterializationRequest, QueryableMaterializer,
//! };
//! use resource_engine::domains::registry::{
//!     FieldSpec, NamingService, ResourceModel, ResourceTypeRegistry,
//! };
//! use serde_json::json;
//!
//! #[derive(Debug, Clone, Default)]
//! struct Album {
//!     id: i64,
//!     title: String,
//! }
//!
//! impl ResourceModel for Album {
//!     fn fields() -> Vec<FieldSpec> {
//!         vec![
//!             FieldSpec::attribute("Id", |r| r.downcast_ref::<Album>().map(|a| json!(a.id))),
//!             FieldSpec::attribute("Title", |r| {
//!                 r.downcast_ref::<Album>().map(|a| json!(a.title))
//!             }),
//!         ]
//!     }
//! }
//!
//! struct Naming;
//!
//! impl NamingService for Naming {
//!     fn pluralize(&self, word: &str) -> String {
//!         format!("{word}s")
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> resource_engine::core::Result<()> {
//!     let registry = Arc::new(ResourceTypeRegistry::new(Arc::new(Naming)));
//!     registry.register::<Album>()?;
//!
//!     let source = Arc::new(InMemoryDataSource::with_records(vec![Album {
//!         id: 1,
//!         title: "Revolver".to_string(),
//!     }]));
//!     let materializer = QueryableMaterializer::new(
//!         registry,
//!         source,
//!         Arc::new(DefaultBaseUrlService::default()),
//!         &EngineConfig::default(),
//!     );
//!
//!     let uri = url::Url::parse("http://localhost/albums?sort=title").unwrap();
//!     let document = materializer
//!         .get_records(&MaterializationRequest::new(uri))
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&document)?);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use self::core::{EngineConfig, Error, Result};
pub use domains::documents::{Document, SingleResourceDocument};
pub use domains::pipeline::{DocumentMaterializer, MaterializationRequest, QueryableMaterializer};
pub use domains::registry::{ResourceModel, ResourceTypeRegistry};
