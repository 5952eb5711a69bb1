//! Filter executor.

use crate::compiler::{compile, CompiledFilter};
use crate::query::Query;
use alloc::vec::Vec;
use cocoql_core::{Collection, Record, Result};

/// Filter executor - keeps the records a compiled filter accepts.
pub struct FilterExecutor {
    filter: CompiledFilter,
}

impl FilterExecutor {
    /// Creates a new filter executor.
    pub fn new(filter: CompiledFilter) -> Self {
        Self { filter }
    }

    /// Compiles `query` into an executor.
    pub fn compile(query: &Query) -> Result<Self> {
        compile(query).map(Self::new)
    }

    pub fn filter(&self) -> &CompiledFilter {
        &self.filter
    }

    /// Executes the filter on `input`, returning the survivors in order.
    ///
    /// The first record that fails to evaluate aborts the call.
    pub fn execute<R: Record>(&self, input: &Collection<R>) -> Result<Collection<R>> {
        let records = self.select(input)?;
        tracing::debug!(
            kind = R::KIND,
            input = input.len(),
            output = records.len(),
            "filter executed"
        );
        Ok(input.derive(records))
    }

    /// Executes the filter and swaps the survivors into `target`.
    ///
    /// Every record is evaluated before the swap, so a failure leaves `target`
    /// untouched. Returns the number of removed records.
    pub fn execute_in_place<R: Record>(&self, target: &mut Collection<R>) -> Result<usize> {
        let records = self.select(target)?;
        let removed = target.len() - records.len();
        target.replace(records);
        tracing::debug!(
            kind = R::KIND,
            removed,
            remaining = target.len(),
            "filter executed in place"
        );
        Ok(removed)
    }

    fn select<R: Record>(&self, input: &Collection<R>) -> Result<Vec<R>> {
        if self.filter.is_trivial() {
            return Ok(input.records().to_vec());
        }
        let mut records = Vec::new();
        for record in input {
            if self.filter.matches(record)? {
                records.push(record.clone());
            }
        }
        Ok(records)
    }
}

/// Filters `collection` by `query`.
///
/// Returns the filtered collection. With `inplace` the collection's content is
/// also replaced by the result.
pub fn filter<R: Record>(
    collection: &mut Collection<R>,
    query: &Query,
    inplace: bool,
) -> Result<Collection<R>> {
    let executor = FilterExecutor::compile(query)?;
    let filtered = executor.execute(collection)?;
    if inplace {
        collection.replace(filtered.records().to_vec());
    }
    Ok(filtered)
}

/// Query filtering as collection methods.
pub trait Filterable<R: Record> {
    /// Returns the records matching `query`.
    fn filter_by(&self, query: &Query) -> Result<Collection<R>>;

    /// Keeps only the records matching `query`. Returns the number removed.
    fn filter_in_place(&mut self, query: &Query) -> Result<usize>;
}

impl<R: Record> Filterable<R> for Collection<R> {
    fn filter_by(&self, query: &Query) -> Result<Collection<R>> {
        FilterExecutor::compile(query)?.execute(self)
    }

    fn filter_in_place(&mut self, query: &Query) -> Result<usize> {
        FilterExecutor::compile(query)?.execute_in_place(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ComparisonOp, RangeTerm, ValueTerm, ValuesTerm};
    use crate::query::FilterBuilder;
    use alloc::string::String;
    use alloc::vec;
    use cocoql_core::{Error, IdPolicy, RecordId, Value, ID};

    #[derive(Clone, Debug, PartialEq)]
    struct Shape {
        id: RecordId,
        name: String,
        area: f64,
    }

    impl Record for Shape {
        const KIND: &'static str = "shape";
        const FIELDS: &'static [&'static str] = &[ID, "name", "area"];

        fn id(&self) -> RecordId {
            self.id
        }

        fn set_id(&mut self, id: RecordId) {
            self.id = id;
        }

        fn field(&self, name: &str) -> Option<Value> {
            match name {
                ID => Some(self.id.into()),
                "name" => Some(self.name.as_str().into()),
                "area" => Some(self.area.into()),
                _ => None,
            }
        }
    }

    fn shape(id: RecordId, name: &str, area: f64) -> Shape {
        Shape {
            id,
            name: name.into(),
            area,
        }
    }

    fn shapes() -> Collection<Shape> {
        Collection::from_records(vec![
            shape(1, "square", 9.999),
            shape(2, "circle", 10.0),
            shape(3, "square", 15.0),
            shape(4, "circle", 20.0),
            shape(5, "square", 20.001),
        ])
    }

    fn ids(collection: &Collection<Shape>) -> Vec<RecordId> {
        collection.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_filter_executor() {
        let query = Query::from(ValueTerm::new("area", 12i64, ComparisonOp::Gt));
        let executor = FilterExecutor::compile(&query).unwrap();
        let result = executor.execute(&shapes()).unwrap();
        assert_eq!(ids(&result), vec![3, 4, 5]);
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let query = Query::new().push(RangeTerm::inclusive("area", 10i64, 20i64));
        let result = shapes().filter_by(&query).unwrap();
        assert_eq!(ids(&result), vec![2, 3, 4]);
    }

    #[test]
    fn test_range_exclusive_bounds() {
        let term =
            RangeTerm::new("area", 10i64, 20i64, ComparisonOp::Gt, ComparisonOp::Lt).unwrap();
        let result = shapes().filter_by(&Query::new().push(term)).unwrap();
        assert_eq!(ids(&result), vec![3]);
    }

    #[test]
    fn test_not_in() {
        let query = Query::from(ValuesTerm::not_in(ID, [1i64, 2, 3]));
        let result = shapes().filter_by(&query).unwrap();
        assert_eq!(ids(&result), vec![4, 5]);
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        // name == circle or name == square and area > 16
        let query = Query::new()
            .push(ValueTerm::eq("name", "circle"))
            .or()
            .push(ValueTerm::eq("name", "square"))
            .push(ValueTerm::new("area", 16i64, ComparisonOp::Gt));
        let result = shapes().filter_by(&query).unwrap();
        assert_eq!(ids(&result), vec![2, 4, 5]);
    }

    #[test]
    fn test_filter_not_inplace_keeps_source() {
        let mut collection = shapes();
        let query = Query::from(ValueTerm::eq("name", "circle"));
        let result = filter(&mut collection, &query, false).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(collection.len(), 5);
    }

    #[test]
    fn test_filter_inplace() {
        let mut collection = shapes();
        let query = Query::from(ValueTerm::eq("name", "circle"));
        let result = filter(&mut collection, &query, true).unwrap();
        assert_eq!(result, collection);
        assert_eq!(ids(&collection), vec![2, 4]);
    }

    #[test]
    fn test_failure_leaves_collection_untouched() {
        let mut collection = shapes();
        let query = Query::from(ValueTerm::new("name", 3i64, ComparisonOp::Lt));
        let err = collection.filter_in_place(&query).unwrap_err();
        match err {
            Error::Evaluation { record, term, .. } => {
                assert_eq!(record, 1);
                assert_eq!(term, "entity.name < 3");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(collection, shapes());
    }

    #[test]
    fn test_execute_in_place_counts_removed() {
        let mut collection = shapes();
        let removed = collection
            .filter_in_place(&Query::new().ids([1i64, 5]))
            .unwrap();
        assert_eq!(removed, 3);
        assert_eq!(ids(&collection), vec![1, 5]);
    }

    #[test]
    fn test_policy_survives_filtering() {
        let collection = shapes().policy_of(IdPolicy::Strict);
        let result = collection.filter_by(&Query::new()).unwrap();
        assert_eq!(result.policy(), IdPolicy::Strict);
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_empty_collection() {
        let collection: Collection<Shape> = Collection::new();
        let query = Query::from(ValueTerm::eq("missing", 1i64));
        assert!(collection.filter_by(&query).unwrap().is_empty());
    }
}
