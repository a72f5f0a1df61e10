//! Error types and handling for the engine.
//!
//! This module defines a unified error type that can represent errors from
//! all domains, providing consistent error handling at the crate surface.
//! The domain enums stay the primary currency inside the pipeline; this
//! type exists for callers that want a single error to match on.

use thiserror::Error;

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Registry or metadata misuse.
    #[error("configuration error: {0}")]
    Configuration(#[from] crate::domains::registry::ConfigurationError),

    /// Document construction or application failure.
    #[error("document error: {0}")]
    Document(#[from] crate::domains::documents::DocumentError),

    /// Materialization pipeline failure or cancellation outcome.
    #[error("materialization error: {0}")]
    Materialize(#[from] crate::domains::pipeline::MaterializeError),

    /// Data source failure.
    #[error("persistence error: {0}")]
    Persistence(#[from] crate::domains::pipeline::PersistenceError),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
