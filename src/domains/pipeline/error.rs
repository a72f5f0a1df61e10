//! Materialization pipeline error types.

use thiserror::Error;

use crate::domains::documents::DocumentError;
use crate::domains::registry::ConfigurationError;

/// A data-source failure.
///
/// Carries whatever error the backend produced; the pipeline propagates it
/// without retrying. Retry policy, if any, belongs to the data source.
#[derive(Debug, Error)]
#[error("data source failure: {source}")]
pub struct PersistenceError {
    #[from]
    source: anyhow::Error,
}

impl PersistenceError {
    /// Create a persistence error from a backend message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self {
            source: anyhow::anyhow!(message.into()),
        }
    }
}

/// Everything a materialization call can surface.
///
/// `Cancelled` is an outcome rather than a fault: it reports that the
/// caller stopped the operation, never that the operation failed. The
/// transport layer is responsible for mapping each variant to a wire-level
/// error document and status code.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// Registry or metadata misuse, including unknown sort and filter
    /// fields. A setup defect; never retried.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// No record matched the requested identifier.
    #[error("no `{resource_type}` record with id `{id}`")]
    NotFound {
        /// Resource type that was searched.
        resource_type: String,
        /// The identifier that did not match.
        id: String,
    },

    /// The inbound document declared a different resource type than the
    /// endpoint serves.
    #[error("document declares resource type `{declared}` but this endpoint serves `{expected}`")]
    Conflict {
        /// Type name declared by the document.
        declared: String,
        /// Type name the operation targets.
        expected: String,
    },

    /// Document construction or application failed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The data source failed; propagated without local recovery.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The caller cancelled the operation before it completed.
    #[error("the operation was cancelled")]
    Cancelled,
}

impl MaterializeError {
    /// Create a not-found error.
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Whether this value reports cancellation rather than a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
