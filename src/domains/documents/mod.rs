//! Document domain.
//!
//! The response document model and the builders that assemble documents
//! from resolved records. Builder tests live here because the three
//! builders share their assembly path.

pub mod builders;
pub mod error;
pub mod types;

pub use builders::{
    CollectionDocumentBuilder, FallbackDocumentBuilder, SingleResourceDocumentBuilder,
    collection::PageContext,
};
pub use error::DocumentError;
pub use types::{
    AcknowledgementDocument, Document, DocumentLinks, ErrorDocument, ErrorObject,
    ResourceCollectionDocument, ResourceLinks, ResourceObject, SingleResourceDocument,
    wire_id_string,
};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::domains::registry::{
        ConfigurationError, ErasedRecord, FieldSpec, NamingService, ResourceModel,
        ResourceTypeRegistry, TypeKey,
    };

    struct Suffixing;

    impl NamingService for Suffixing {
        fn pluralize(&self, word: &str) -> String {
            format!("{word}s")
        }
    }

    #[derive(Debug, Clone)]
    struct Author {
        id: i64,
        name: String,
    }

    impl ResourceModel for Author {
        fn fields() -> Vec<FieldSpec> {
            vec![
                FieldSpec::attribute("Id", |r| r.downcast_ref::<Author>().map(|a| json!(a.id))),
                FieldSpec::attribute("Name", |r| {
                    r.downcast_ref::<Author>().map(|a| json!(a.name))
                }),
            ]
        }
    }

    #[derive(Debug, Clone)]
    struct Book {
        id: i64,
        title: String,
        author: Author,
    }

    impl ResourceModel for Book {
        fn fields() -> Vec<FieldSpec> {
            vec![
                FieldSpec::attribute("Id", |r| r.downcast_ref::<Book>().map(|b| json!(b.id))),
                FieldSpec::attribute("Title", |r| {
                    r.downcast_ref::<Book>().map(|b| json!(b.title))
                }),
                FieldSpec::to_one(
                    "Author",
                    |r| r.downcast_ref::<Book>().map(|b| json!(b.author.id)),
                    |r| match r.downcast_ref::<Book>() {
                        Some(b) => vec![Box::new(b.author.clone()) as Box<dyn ErasedRecord>],
                        None => Vec::new(),
                    },
                ),
            ]
        }
    }

    /// Unregistered on its own; resolves through Author.
    #[derive(Debug, Clone)]
    struct GuestAuthor {
        id: i64,
    }

    impl ResourceModel for GuestAuthor {
        fn fields() -> Vec<FieldSpec> {
            vec![FieldSpec::attribute("Id", |r| {
                r.downcast_ref::<GuestAuthor>().map(|a| json!(a.id))
            })]
        }

        fn ancestors() -> Vec<TypeKey> {
            vec![TypeKey::of::<Author>()]
        }
    }

    #[derive(Debug, Clone)]
    struct Orphan;

    impl ResourceModel for Orphan {
        fn fields() -> Vec<FieldSpec> {
            vec![FieldSpec::attribute("Id", |_| Some(json!(0)))]
        }
    }

    fn registry() -> Arc<ResourceTypeRegistry> {
        let registry = ResourceTypeRegistry::new(Arc::new(Suffixing));
        registry.register_named::<Book>("books").unwrap();
        registry.register_named::<Author>("authors").unwrap();
        Arc::new(registry)
    }

    fn book() -> Book {
        Book {
            id: 7,
            title: "Dune".to_string(),
            author: Author {
                id: 3,
                name: "Frank Herbert".to_string(),
            },
        }
    }

    #[test]
    fn test_single_builder_wraps_record() {
        let builder = SingleResourceDocumentBuilder::new(registry());
        let doc = builder
            .build(Some(&book()), "http://api.test", &[], None)
            .unwrap();
        let resource = doc.data.unwrap();
        assert_eq!(resource.resource_type, "books");
        assert_eq!(resource.id, "7");
        assert_eq!(resource.attributes["title"], json!("Dune"));
        assert!(!resource.attributes.contains_key("id"));
        assert_eq!(
            resource.links.unwrap().self_link,
            "http://api.test/books/7"
        );
    }

    #[test]
    fn test_single_builder_absent_record_is_not_an_error() {
        let builder = SingleResourceDocumentBuilder::new(registry());
        let doc = builder
            .build::<Book>(None, "http://api.test", &[], None)
            .unwrap();
        assert!(doc.data.is_none());
        assert!(doc.included.is_empty());
    }

    #[test]
    fn test_single_builder_resolves_includes() {
        let builder = SingleResourceDocumentBuilder::new(registry());
        let doc = builder
            .build(
                Some(&book()),
                "http://api.test",
                &["author".to_string()],
                None,
            )
            .unwrap();
        assert_eq!(doc.included.len(), 1);
        assert_eq!(doc.included[0].resource_type, "authors");
        assert_eq!(doc.included[0].id, "3");
        assert_eq!(doc.included[0].attributes["name"], json!("Frank Herbert"));
    }

    #[test]
    fn test_unknown_include_path_fails_lazily() {
        let builder = SingleResourceDocumentBuilder::new(registry());
        let err = builder
            .build(
                Some(&book()),
                "http://api.test",
                &["publisher".to_string()],
                None,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Configuration(ConfigurationError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_include_of_attribute_is_rejected() {
        let builder = SingleResourceDocumentBuilder::new(registry());
        let err = builder
            .build(
                Some(&book()),
                "http://api.test",
                &["title".to_string()],
                None,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Configuration(ConfigurationError::NotARelationship { .. })
        ));
    }

    #[test]
    fn test_collection_builder_orders_and_dedups_includes() {
        let builder = CollectionDocumentBuilder::new(registry());
        let shared = Author {
            id: 3,
            name: "Frank Herbert".to_string(),
        };
        let records = vec![
            Book {
                id: 1,
                title: "Dune".to_string(),
                author: shared.clone(),
            },
            Book {
                id: 2,
                title: "Dune Messiah".to_string(),
                author: shared,
            },
        ];
        let doc = builder
            .build(&records, "http://api.test", &["author".to_string()], None)
            .unwrap();
        let ids: Vec<_> = doc.data.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        // Both books share one author; it must appear once.
        assert_eq!(doc.included.len(), 1);
    }

    #[test]
    fn test_collection_builder_page_links_and_total() {
        use crate::domains::query::PageRequest;

        let builder = CollectionDocumentBuilder::new(registry());
        let records = vec![book()];
        let doc = builder
            .build(
                &records,
                "http://api.test",
                &[],
                Some(PageContext {
                    page: PageRequest { number: 2, size: 1 },
                    total: Some(3),
                }),
            )
            .unwrap();
        assert_eq!(doc.meta.unwrap()["total"], json!(3));
        let links = doc.links.unwrap();
        assert_eq!(
            links.self_link.unwrap(),
            "http://api.test/books?page[number]=2&page[size]=1"
        );
        assert_eq!(
            links.next.unwrap(),
            "http://api.test/books?page[number]=3&page[size]=1"
        );
        assert_eq!(
            links.prev.unwrap(),
            "http://api.test/books?page[number]=1&page[size]=1"
        );
        assert_eq!(
            links.last.unwrap(),
            "http://api.test/books?page[number]=3&page[size]=1"
        );
    }

    #[test]
    fn test_fallback_builder_resolves_runtime_type() {
        let builder = FallbackDocumentBuilder::new(registry());
        let record = GuestAuthor { id: 11 };
        let doc = builder
            .build(&record, "http://api.test", &[], None)
            .unwrap();
        let resource = doc.data.unwrap();
        // Unregistered subclass serves under its ancestor's name.
        assert_eq!(resource.resource_type, "authors");
        assert_eq!(resource.id, "11");
    }

    #[test]
    fn test_fallback_builder_rejects_unresolvable_type() {
        let builder = FallbackDocumentBuilder::new(registry());
        let err = builder
            .build(&Orphan, "http://api.test", &[], None)
            .unwrap_err();
        assert!(matches!(err, DocumentError::UnresolvableType { .. }));
    }
}
