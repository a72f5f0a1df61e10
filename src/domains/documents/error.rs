//! Document-specific error types.

use thiserror::Error;

use crate::domains::registry::ConfigurationError;

/// Errors raised while building a response document or applying an
/// inbound one.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Registry or metadata misuse surfaced during document construction.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A runtime-typed record could not be resolved against the registry.
    #[error("unable to resolve a resource type for `{type_name}`")]
    UnresolvableType {
        /// Fully qualified type name of the record.
        type_name: &'static str,
    },

    /// An inbound attribute value could not be applied to its field.
    #[error("cannot apply value to field `{field}`: {reason}")]
    InvalidAttribute {
        /// Wire key of the field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The inbound document carried no primary resource.
    #[error("the request document has no primary resource")]
    MissingPrimaryData,
}

impl DocumentError {
    /// Create an invalid-attribute error.
    pub fn invalid_attribute(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
