//! Data source boundary.
//!
//! The materializer never talks to a concrete store. It composes a query
//! through [`RecordSet`] (predicate, ordering, pagination, then one async
//! materialization) and persists through [`DataSource`]. Both carry the
//! resolved [`FieldSpec`] in their directives so in-memory sources can
//! evaluate through field accessors while external sources key on the
//! field name.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::PersistenceError;
use crate::domains::query::PageRequest;
use crate::domains::registry::FieldSpec;

/// An equality predicate on one field.
#[derive(Debug, Clone)]
pub struct FieldPredicate {
    /// The resolved field.
    pub field: FieldSpec,

    /// Raw comparison value from the query parameter, matched against the
    /// field's stringified wire value.
    pub value: String,
}

impl FieldPredicate {
    /// Build a predicate comparing `field` to `value`.
    pub fn equals(field: FieldSpec, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// One step of an ordering directive.
#[derive(Debug, Clone)]
pub struct FieldOrdering {
    /// The resolved field.
    pub field: FieldSpec,

    /// Sort direction.
    pub descending: bool,
}

/// The outcome of materializing a record set.
#[derive(Debug, Clone)]
pub struct ResolvedPage<T> {
    /// The matching records, in order, after pagination.
    pub records: Vec<T>,

    /// Total number of matching records before pagination, when the
    /// source can report it cheaply.
    pub total: Option<u64>,
}

/// A composable query over a sequence of domain records.
///
/// Directives accumulate; nothing touches the backing store until
/// [`materialize`](Self::materialize) runs.
#[async_trait]
pub trait RecordSet<T>: Send {
    /// Restrict the set to records matching the predicate.
    fn apply_predicate(&mut self, predicate: FieldPredicate);

    /// Order the set; earlier entries are more significant.
    fn apply_ordering(&mut self, orderings: Vec<FieldOrdering>);

    /// Restrict the set to one page.
    fn apply_page(&mut self, page: PageRequest);

    /// Execute the accumulated query.
    ///
    /// This is the pipeline's fetch suspend point; implementations backed
    /// by real I/O should observe `cancel` while waiting.
    async fn materialize(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<ResolvedPage<T>, PersistenceError>;
}

/// Queryable and writable boundary around a store of `T` records.
#[async_trait]
pub trait DataSource<T>: Send + Sync {
    /// Start a fresh query over all records.
    fn records(&self) -> Box<dyn RecordSet<T> + '_>;

    /// Add a record.
    async fn insert(
        &self,
        record: T,
        cancel: &CancellationToken,
    ) -> Result<T, PersistenceError>;

    /// Replace the record matching `existing`.
    async fn save(
        &self,
        record: T,
        existing: FieldPredicate,
        cancel: &CancellationToken,
    ) -> Result<T, PersistenceError>;

    /// Remove the record matching the predicate.
    ///
    /// Returns whether a record was present. Absence is not a failure;
    /// deletions are idempotent unless the backing store objects.
    async fn remove(
        &self,
        predicate: FieldPredicate,
        cancel: &CancellationToken,
    ) -> Result<bool, PersistenceError>;

    /// Commit pending changes.
    async fn commit(&self, cancel: &CancellationToken) -> Result<(), PersistenceError>;
}
