//! Registry-specific error types.

use thiserror::Error;

/// Errors raised by registry and metadata misuse.
///
/// Every variant is a programming or setup defect: unregistered types or
/// names, duplicate registrations, missing identifier fields, and unknown
/// field references in sort, filter, or include expressions. None of them
/// are retried.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The type (nor any of its ancestors) was never registered.
    #[error("the type `{type_name}` was not registered")]
    TypeNotRegistered {
        /// Fully qualified type name.
        type_name: &'static str,
    },

    /// No type was registered under the resource type name.
    #[error("the resource type name `{name}` was not registered")]
    NameNotRegistered {
        /// The name that was looked up.
        name: String,
    },

    /// The type was registered twice.
    #[error("the type `{type_name}` has already been registered")]
    DuplicateType {
        /// Fully qualified type name.
        type_name: &'static str,
    },

    /// The resolved resource type name is already taken.
    #[error("the resource type name `{name}` has already been registered")]
    DuplicateName {
        /// The colliding name.
        name: String,
    },

    /// The type has neither a field marked as identifier nor one named `Id`.
    #[error("unable to determine identifier field for type `{type_name}`")]
    NoIdentifierField {
        /// Fully qualified type name.
        type_name: &'static str,
    },

    /// A sort, filter, or include expression named a field the type
    /// does not have.
    #[error("the field `{field}` does not exist on type `{type_name}`")]
    UnknownField {
        /// Wire key of the missing field.
        field: String,
        /// Fully qualified type name.
        type_name: &'static str,
    },

    /// An include path named a field that is not a relationship.
    #[error("the field `{field}` on type `{type_name}` is not a relationship")]
    NotARelationship {
        /// Wire key of the field.
        field: String,
        /// Fully qualified type name.
        type_name: &'static str,
    },

    /// Element type was requested for a non-collection type.
    #[error("the type `{type_name}` is not a collection type")]
    NotACollection {
        /// Fully qualified type name.
        type_name: &'static str,
    },

    /// A pagination parameter carried a non-numeric or zero value.
    #[error("invalid value `{value}` for query parameter `{key}`")]
    InvalidPageParameter {
        /// The offending parameter key.
        key: String,
        /// The raw value.
        value: String,
    },
}

impl ConfigurationError {
    /// Create an unknown-field error.
    pub fn unknown_field(field: impl Into<String>, type_name: &'static str) -> Self {
        Self::UnknownField {
            field: field.into(),
            type_name,
        }
    }

    /// Create a name-not-registered error.
    pub fn name_not_registered(name: impl Into<String>) -> Self {
        Self::NameNotRegistered { name: name.into() }
    }
}
