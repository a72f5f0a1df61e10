//! Response document model.
//!
//! These types are the output of the materialization pipeline and the input
//! of create/update operations. Their serde representation approximates the
//! usual hypermedia layout (`type`/`id`/`attributes`), but the exact wire
//! schema is the transport's concern; the engine only guarantees the
//! structure and error signaling defined here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One resource representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    /// Resource type name.
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Identifier value, stringified. Empty on inbound create documents
    /// that leave id assignment to the server.
    #[serde(default)]
    pub id: String,

    /// Attribute values keyed by wire field name.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,

    /// Links for this resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ResourceLinks>,
}

impl ResourceObject {
    /// A bare inbound resource with a type and attributes.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: String::new(),
            attributes: Map::new(),
            links: None,
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Add an attribute value.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Links attached to a single resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLinks {
    /// Canonical URL of the resource.
    #[serde(rename = "self")]
    pub self_link: String,
}

/// Links attached to a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentLinks {
    /// URL of the document itself.
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    /// First page of the collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,

    /// Previous page, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,

    /// Next page, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// Last page, when the total count is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

impl DocumentLinks {
    /// Whether no link is set.
    pub fn is_empty(&self) -> bool {
        self.self_link.is_none()
            && self.first.is_none()
            && self.prev.is_none()
            && self.next.is_none()
            && self.last.is_none()
    }
}

/// Document wrapping zero or one primary resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleResourceDocument {
    /// The primary resource. `None` represents "no resource", which is a
    /// valid outcome for relationship lookups.
    pub data: Option<ResourceObject>,

    /// Resources pulled in by include directives.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,

    /// Document links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<DocumentLinks>,

    /// Free-form document metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl SingleResourceDocument {
    /// An inbound document carrying one resource, as a create or update
    /// request would.
    pub fn of(resource: ResourceObject) -> Self {
        Self {
            data: Some(resource),
            ..Self::default()
        }
    }
}

/// Document wrapping an ordered collection of resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceCollectionDocument {
    /// The resources of this page, in order.
    pub data: Vec<ResourceObject>,

    /// Resources pulled in by include directives.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,

    /// Pagination links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<DocumentLinks>,

    /// Document metadata; carries the total count when the data source
    /// reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

/// One error entry of an error document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Short, human-readable summary.
    pub title: String,

    /// Longer description of this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Document describing one or more errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDocument {
    /// The errors, most significant first.
    pub errors: Vec<ErrorObject>,
}

impl ErrorDocument {
    /// A document with a single error entry.
    pub fn new(title: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            errors: vec![ErrorObject {
                title: title.into(),
                detail,
            }],
        }
    }
}

/// Empty document acknowledging an operation with no resource payload,
/// such as a delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcknowledgementDocument {
    /// Free-form document metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

/// Any document the pipeline can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    /// A single-resource document.
    Single(SingleResourceDocument),

    /// A collection document.
    Collection(ResourceCollectionDocument),

    /// An error document.
    Errors(ErrorDocument),

    /// An empty acknowledgement.
    Acknowledgement(AcknowledgementDocument),
}

/// Stringify a field value for use as a wire identifier.
///
/// Strings pass through unquoted; everything else uses its JSON rendering.
pub fn wire_id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
