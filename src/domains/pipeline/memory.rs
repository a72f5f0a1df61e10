//! In-memory reference data source.
//!
//! Backs the engine with a plain vector of records behind an async lock.
//! Predicates and orderings are evaluated through the field accessors the
//! directives carry, so any [`ResourceModel`] works without extra wiring.
//! Useful as the test backend and for serving genuinely in-memory data.

use std::cmp::Ordering;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use serde_json::Value;

use super::error::PersistenceError;
use super::source::{DataSource, FieldOrdering, FieldPredicate, RecordSet, ResolvedPage};
use crate::domains::documents::wire_id_string;
use crate::domains::query::PageRequest;
use crate::domains::registry::ResourceModel;

/// Total order over JSON values, used for in-memory sorting.
///
/// Values rank by kind (null, bool, number, string, array, object), then
/// within a kind by natural order.
pub fn value_ordering(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ if rank(a) != rank(b) => rank(a).cmp(&rank(b)),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Vector-backed data source.
pub struct InMemoryDataSource<T> {
    records: RwLock<Vec<T>>,
}

impl<T> InMemoryDataSource<T> {
    /// An empty source.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// A source seeded with records.
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl<T> Default for InMemoryDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn matches<T: ResourceModel>(record: &T, predicate: &FieldPredicate) -> bool {
    match (predicate.field.get)(record) {
        Some(value) => wire_id_string(&value) == predicate.value,
        None => false,
    }
}

fn compare<T: ResourceModel>(a: &T, b: &T, orderings: &[FieldOrdering]) -> Ordering {
    for ordering in orderings {
        let left = (ordering.field.get)(a);
        let right = (ordering.field.get)(b);
        let step = match (left, right) {
            (Some(left), Some(right)) => value_ordering(&left, &right),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let step = if ordering.descending { step.reverse() } else { step };
        if step != Ordering::Equal {
            return step;
        }
    }
    Ordering::Equal
}

/// Accumulated query over an [`InMemoryDataSource`].
pub struct InMemoryRecordSet<'a, T> {
    source: &'a InMemoryDataSource<T>,
    predicates: Vec<FieldPredicate>,
    orderings: Vec<FieldOrdering>,
    page: Option<PageRequest>,
}

#[async_trait]
impl<T> RecordSet<T> for InMemoryRecordSet<'_, T>
where
    T: ResourceModel + Clone + Send + Sync,
{
    fn apply_predicate(&mut self, predicate: FieldPredicate) {
        self.predicates.push(predicate);
    }

    fn apply_ordering(&mut self, orderings: Vec<FieldOrdering>) {
        self.orderings = orderings;
    }

    fn apply_page(&mut self, page: PageRequest) {
        self.page = Some(page);
    }

    async fn materialize(
        &mut self,
        _cancel: &CancellationToken,
    ) -> Result<ResolvedPage<T>, PersistenceError> {
        let records = self.source.records.read().await;

        let mut matching: Vec<T> = records
            .iter()
            .filter(|record| {
                self.predicates
                    .iter()
                    .all(|predicate| matches(*record, predicate))
            })
            .cloned()
            .collect();

        if !self.orderings.is_empty() {
            matching.sort_by(|a, b| compare(a, b, &self.orderings));
        }

        let total = matching.len() as u64;
        if let Some(page) = self.page {
            let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
            let end = start.saturating_add(page.size as usize);
            matching = if start >= matching.len() {
                Vec::new()
            } else {
                matching[start..end.min(matching.len())].to_vec()
            };
        }

        Ok(ResolvedPage {
            records: matching,
            total: Some(total),
        })
    }
}

#[async_trait]
impl<T> DataSource<T> for InMemoryDataSource<T>
where
    T: ResourceModel + Clone + Send + Sync,
{
    fn records(&self) -> Box<dyn RecordSet<T> + '_> {
        Box::new(InMemoryRecordSet {
            source: self,
            predicates: Vec::new(),
            orderings: Vec::new(),
            page: None,
        })
    }

    async fn insert(
        &self,
        record: T,
        _cancel: &CancellationToken,
    ) -> Result<T, PersistenceError> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn save(
        &self,
        record: T,
        existing: FieldPredicate,
        _cancel: &CancellationToken,
    ) -> Result<T, PersistenceError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|candidate| matches(*candidate, &existing)) {
            Some(slot) => *slot = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(record)
    }

    async fn remove(
        &self,
        predicate: FieldPredicate,
        _cancel: &CancellationToken,
    ) -> Result<bool, PersistenceError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| !matches(record, &predicate));
        Ok(records.len() < before)
    }

    async fn commit(&self, _cancel: &CancellationToken) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::registry::FieldSpec;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct Track {
        id: i64,
        title: String,
        length: i64,
    }

    impl ResourceModel for Track {
        fn fields() -> Vec<FieldSpec> {
            vec![
                FieldSpec::attribute("Id", |r| r.downcast_ref::<Track>().map(|t| json!(t.id))),
                FieldSpec::attribute("Title", |r| {
                    r.downcast_ref::<Track>().map(|t| json!(t.title))
                }),
                FieldSpec::attribute("Length", |r| {
                    r.downcast_ref::<Track>().map(|t| json!(t.length))
                }),
            ]
        }
    }

    fn field(name: &str) -> FieldSpec {
        Track::fields()
            .into_iter()
            .find(|f| f.name == name)
            .unwrap()
    }

    fn tracks() -> Vec<Track> {
        vec![
            Track { id: 1, title: "Breathe".into(), length: 163 },
            Track { id: 2, title: "Time".into(), length: 413 },
            Track { id: 3, title: "Money".into(), length: 382 },
        ]
    }

    #[tokio::test]
    async fn test_predicate_filters_records() {
        let source = InMemoryDataSource::with_records(tracks());
        let mut set = source.records();
        set.apply_predicate(FieldPredicate::equals(field("Id"), "2"));
        let page = set.materialize(&CancellationToken::new()).await.unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].title, "Time");
    }

    #[tokio::test]
    async fn test_ordering_ascending_and_descending() {
        let source = InMemoryDataSource::with_records(tracks());

        let mut set = source.records();
        set.apply_ordering(vec![FieldOrdering {
            field: field("Length"),
            descending: false,
        }]);
        let page = set.materialize(&CancellationToken::new()).await.unwrap();
        let ids: Vec<_> = page.records.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        let mut set = source.records();
        set.apply_ordering(vec![FieldOrdering {
            field: field("Length"),
            descending: true,
        }]);
        let page = set.materialize(&CancellationToken::new()).await.unwrap();
        let ids: Vec<_> = page.records.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_pagination_reports_unpaged_total() {
        let source = InMemoryDataSource::with_records(tracks());
        let mut set = source.records();
        set.apply_page(PageRequest { number: 2, size: 2 });
        let page = set.materialize(&CancellationToken::new()).await.unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.total, Some(3));
    }

    #[tokio::test]
    async fn test_save_replaces_matching_record() {
        let source = InMemoryDataSource::with_records(tracks());
        let updated = Track { id: 2, title: "Time (remaster)".into(), length: 413 };
        source
            .save(
                updated.clone(),
                FieldPredicate::equals(field("Id"), "2"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let mut set = source.records();
        set.apply_predicate(FieldPredicate::equals(field("Id"), "2"));
        let page = set.materialize(&CancellationToken::new()).await.unwrap();
        assert_eq!(page.records, vec![updated]);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let source = InMemoryDataSource::with_records(tracks());
        let token = CancellationToken::new();
        let removed = source
            .remove(FieldPredicate::equals(field("Id"), "3"), &token)
            .await
            .unwrap();
        assert!(removed);
        let removed_again = source
            .remove(FieldPredicate::equals(field("Id"), "3"), &token)
            .await
            .unwrap();
        assert!(!removed_again);
    }

    #[test]
    fn test_value_ordering_is_total_across_kinds() {
        let mut values = vec![json!("b"), json!(2), json!(null), json!(true), json!("a")];
        values.sort_by(value_ordering);
        assert_eq!(
            values,
            vec![json!(null), json!(true), json!(2), json!("a"), json!("b")]
        );
    }
}
