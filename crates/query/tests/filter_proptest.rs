//! Property-based tests for query filtering.
//!
//! These tests check the structural guarantees of `filter` for randomly
//! generated collections and queries.

use cocoql_core::{Collection, Record, RecordId, Value, ID};
use cocoql_query::ast::{ComparisonOp, IntersectionTerm, RangeTerm, ValueTerm, ValuesTerm};
use cocoql_query::{filter, FilterBuilder, Filterable, Query};
use proptest::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct Item {
    id: RecordId,
    score: i64,
    label: String,
}

impl Record for Item {
    const KIND: &'static str = "item";
    const FIELDS: &'static [&'static str] = &[ID, "score", "label"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            ID => Some(self.id.into()),
            "score" => Some(self.score.into()),
            "label" => Some(self.label.as_str().into()),
            _ => None,
        }
    }
}

const LABELS: [&str; 4] = ["person", "car", "dog", "bus"];

/// Strategy for a collection with ids 1..=n in order.
fn collection_strategy(max_items: usize) -> impl Strategy<Value = Collection<Item>> {
    prop::collection::vec((-100i64..100, 0usize..LABELS.len()), 0..max_items).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (score, label))| Item {
                id: i as u64 + 1,
                score,
                label: LABELS[label].to_string(),
            })
            .collect()
    })
}

fn comparison_strategy() -> impl Strategy<Value = ComparisonOp> {
    prop::sample::select(ComparisonOp::ALL.to_vec())
}

fn score_term_strategy() -> impl Strategy<Value = ValueTerm> {
    (comparison_strategy(), -100i64..100).prop_map(|(op, v)| ValueTerm::new("score", v, op))
}

fn label_term_strategy() -> impl Strategy<Value = ValuesTerm> {
    prop::collection::vec(0usize..LABELS.len(), 0..3)
        .prop_map(|idx| ValuesTerm::is_in("label", idx.into_iter().map(|i| LABELS[i])))
}

fn ids(collection: &Collection<Item>) -> Vec<RecordId> {
    collection.iter().map(|item| item.id).collect()
}

proptest! {
    /// The result is an order-preserving subsequence of the input.
    #[test]
    fn filter_yields_subsequence(
        collection in collection_strategy(60),
        score in score_term_strategy(),
        labels in label_term_strategy(),
    ) {
        let query = Query::new().push(score).or().push(labels);
        let result = collection.filter_by(&query).unwrap();

        let mut source = collection.iter();
        for kept in &result {
            prop_assert!(source.any(|item| item == kept));
        }
        prop_assert!(result.len() <= collection.len());
    }

    /// Filtering twice with the same query changes nothing.
    #[test]
    fn filter_is_idempotent(
        collection in collection_strategy(60),
        score in score_term_strategy(),
        labels in label_term_strategy(),
    ) {
        let query = Query::new().push(score).push(labels);
        let once = collection.filter_by(&query).unwrap();
        let twice = once.filter_by(&query).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Juxtaposed terms behave as an explicit `and`, and as filtering in sequence.
    #[test]
    fn default_join_is_and(
        collection in collection_strategy(60),
        first in score_term_strategy(),
        second in label_term_strategy(),
    ) {
        let implicit = Query::new().push(first.clone()).push(second.clone());
        let explicit = Query::new().push(first.clone()).and().push(second.clone());
        let sequential = collection
            .filter_by(&Query::from(first))
            .unwrap()
            .filter_by(&Query::from(second))
            .unwrap();

        let implicit = collection.filter_by(&implicit).unwrap();
        let explicit = collection.filter_by(&explicit).unwrap();
        prop_assert_eq!(&implicit, &explicit);
        prop_assert_eq!(&implicit, &sequential);
    }

    /// `a or b c` keeps records matching `a` or both `b` and `c`.
    #[test]
    fn and_binds_tighter_than_or(
        collection in collection_strategy(60),
        a in score_term_strategy(),
        b in label_term_strategy(),
        c in score_term_strategy(),
    ) {
        let query = Query::new().push(a.clone()).or().push(b.clone()).push(c.clone());
        let result = ids(&collection.filter_by(&query).unwrap());

        let in_a = ids(&collection.filter_by(&Query::from(a)).unwrap());
        let in_bc = ids(&collection.filter_by(&Query::new().push(b).push(c)).unwrap());
        let expected: Vec<RecordId> = collection
            .iter()
            .map(|item| item.id)
            .filter(|id| in_a.contains(id) || in_bc.contains(id))
            .collect();
        prop_assert_eq!(result, expected);
    }

    /// An intersection bounds the whole query, `or` groups included.
    #[test]
    fn intersect_constrains_every_group(
        collection in collection_strategy(60),
        a in score_term_strategy(),
        b in label_term_strategy(),
        allowed in prop::collection::vec(1u64..60, 0..20),
    ) {
        let query = Query::new()
            .push(a.clone())
            .or()
            .push(b.clone())
            .intersect(IntersectionTerm::new().with(ValuesTerm::is_in(ID, allowed.clone())));
        let result = ids(&collection.filter_by(&query).unwrap());

        let unconstrained = ids(&collection.filter_by(&Query::new().push(a).or().push(b)).unwrap());
        let expected: Vec<RecordId> = unconstrained
            .into_iter()
            .filter(|id| allowed.contains(id))
            .collect();
        prop_assert_eq!(result, expected);
    }

    /// `in` and `not_in` over the same set partition the collection.
    #[test]
    fn membership_partitions(
        collection in collection_strategy(60),
        values in prop::collection::vec(-100i64..100, 0..10),
    ) {
        let inside = collection
            .filter_by(&Query::from(ValuesTerm::is_in("score", values.clone())))
            .unwrap();
        let outside = collection
            .filter_by(&Query::from(ValuesTerm::not_in("score", values)))
            .unwrap();
        prop_assert_eq!(inside.len() + outside.len(), collection.len());
        for item in &inside {
            prop_assert!(!outside.contains_id(item.id));
        }
    }

    /// In-place filtering leaves the collection equal to the returned result.
    #[test]
    fn inplace_matches_returned(
        collection in collection_strategy(60),
        lo in -100i64..0,
        hi in 0i64..100,
    ) {
        let query = Query::new().push(RangeTerm::inclusive("score", lo, hi));
        let mut target = collection.clone();
        let result = filter(&mut target, &query, true).unwrap();
        prop_assert_eq!(&result, &target);
        prop_assert!(target.iter().all(|item| item.score >= lo && item.score <= hi));
    }
}
