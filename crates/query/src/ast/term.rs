//! Filter terms.
//!
//! A term is one condition on a record field. Terms are plain data: they are
//! validated when built and only bound to records once a query is compiled.

use crate::ast::intersection::IntersectionTerm;
use crate::ast::operator::{
    check_comparison, check_membership, check_range, check_range_tokens, ComparisonOp,
    MembershipOp,
};
use alloc::string::String;
use alloc::vec::Vec;
use cocoql_core::{Result, Value};

/// Compares a field to a single value.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueTerm {
    pub field: String,
    pub value: Value,
    pub op: ComparisonOp,
}

impl ValueTerm {
    pub fn new(field: impl Into<String>, value: impl Into<Value>, op: ComparisonOp) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            op,
        }
    }

    /// Equality term, the default operator of a single-value filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, value, ComparisonOp::Eq)
    }

    /// Builds a term from an operator token.
    pub fn parse(field: impl Into<String>, value: impl Into<Value>, token: &str) -> Result<Self> {
        let field = field.into();
        let op = check_comparison(&field, token)?;
        Ok(Self::new(field, value, op))
    }
}

/// Tests a field for membership in a list of values.
#[derive(Clone, Debug, PartialEq)]
pub struct ValuesTerm {
    pub field: String,
    pub values: Vec<Value>,
    pub op: MembershipOp,
}

impl ValuesTerm {
    pub fn new<I, V>(field: impl Into<String>, values: I, op: MembershipOp) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
            op,
        }
    }

    pub fn is_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(field, values, MembershipOp::In)
    }

    pub fn not_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(field, values, MembershipOp::NotIn)
    }

    pub fn parse<I, V>(field: impl Into<String>, values: I, token: &str) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let field = field.into();
        let op = check_membership(&field, token)?;
        Ok(Self::new(field, values, op))
    }
}

/// Bounds a field between two values.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeTerm {
    pub field: String,
    pub min: Value,
    pub max: Value,
    pub min_op: ComparisonOp,
    pub max_op: ComparisonOp,
}

impl RangeTerm {
    /// Creates a range, rejecting a lower bound that is not `>`/`>=` or an upper
    /// bound that is not `<`/`<=`.
    pub fn new(
        field: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
        min_op: ComparisonOp,
        max_op: ComparisonOp,
    ) -> Result<Self> {
        let field = field.into();
        let (min_op, max_op) = check_range(&field, min_op, max_op)?;
        Ok(Self {
            field,
            min: min.into(),
            max: max.into(),
            min_op,
            max_op,
        })
    }

    /// Inclusive range `min <= field <= max`.
    pub fn inclusive(field: impl Into<String>, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            min: min.into(),
            max: max.into(),
            min_op: ComparisonOp::Ge,
            max_op: ComparisonOp::Le,
        }
    }

    pub fn parse(
        field: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
        min_token: &str,
        max_token: &str,
    ) -> Result<Self> {
        let field = field.into();
        let (min_op, max_op) = check_range_tokens(&field, min_token, max_token)?;
        Ok(Self {
            field,
            min: min.into(),
            max: max.into(),
            min_op,
            max_op,
        })
    }
}

/// Compares one element of a sequence field to a value.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedValueTerm {
    pub field: String,
    pub index: usize,
    pub value: Value,
    pub op: ComparisonOp,
}

impl IndexedValueTerm {
    pub fn new(
        field: impl Into<String>,
        index: usize,
        value: impl Into<Value>,
        op: ComparisonOp,
    ) -> Self {
        Self {
            field: field.into(),
            index,
            value: value.into(),
            op,
        }
    }
}

/// Bounds one element of a sequence field between two values.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedRangeTerm {
    pub field: String,
    pub index: usize,
    pub min: Value,
    pub max: Value,
    pub min_op: ComparisonOp,
    pub max_op: ComparisonOp,
}

impl IndexedRangeTerm {
    pub fn new(
        field: impl Into<String>,
        index: usize,
        min: impl Into<Value>,
        max: impl Into<Value>,
        min_op: ComparisonOp,
        max_op: ComparisonOp,
    ) -> Result<Self> {
        let field = field.into();
        let (min_op, max_op) = check_range(&field, min_op, max_op)?;
        Ok(Self {
            field,
            index,
            min: min.into(),
            max: max.into(),
            min_op,
            max_op,
        })
    }

    pub fn inclusive(
        field: impl Into<String>,
        index: usize,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            index,
            min: min.into(),
            max: max.into(),
            min_op: ComparisonOp::Ge,
            max_op: ComparisonOp::Le,
        }
    }
}

/// Any term a query can hold.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Value(ValueTerm),
    Values(ValuesTerm),
    Range(RangeTerm),
    IndexedValue(IndexedValueTerm),
    IndexedRange(IndexedRangeTerm),
    Intersection(IntersectionTerm),
}

impl From<ValueTerm> for Term {
    fn from(term: ValueTerm) -> Self {
        Term::Value(term)
    }
}

impl From<ValuesTerm> for Term {
    fn from(term: ValuesTerm) -> Self {
        Term::Values(term)
    }
}

impl From<RangeTerm> for Term {
    fn from(term: RangeTerm) -> Self {
        Term::Range(term)
    }
}

impl From<IndexedValueTerm> for Term {
    fn from(term: IndexedValueTerm) -> Self {
        Term::IndexedValue(term)
    }
}

impl From<IndexedRangeTerm> for Term {
    fn from(term: IndexedRangeTerm) -> Self {
        Term::IndexedRange(term)
    }
}

impl From<IntersectionTerm> for Term {
    fn from(term: IntersectionTerm) -> Self {
        Term::Intersection(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use cocoql_core::Error;

    #[test]
    fn test_value_term_parse() {
        let term = ValueTerm::parse("width", 640i64, ">").unwrap();
        assert_eq!(term.op, ComparisonOp::Gt);
        assert_eq!(term.value, Value::Int(640));

        let err = ValueTerm::parse("width", 640i64, "in").unwrap_err();
        assert!(matches!(err, Error::InvalidOperator { field, .. } if field == "width"));
    }

    #[test]
    fn test_values_term() {
        let term = ValuesTerm::is_in("category_id", [1i64, 2, 3]);
        assert_eq!(term.values.len(), 3);
        assert_eq!(term.op, MembershipOp::In);

        let term = ValuesTerm::parse("category_id", vec![1i64], "not_in").unwrap();
        assert_eq!(term.op, MembershipOp::NotIn);
        assert!(ValuesTerm::parse("category_id", vec![1i64], "==").is_err());
    }

    #[test]
    fn test_range_term_validates_bounds() {
        let term = RangeTerm::new("area", 10.0, 20.0, ComparisonOp::Gt, ComparisonOp::Lt).unwrap();
        assert_eq!(term.min, Value::Float(10.0));

        assert!(RangeTerm::new("area", 10.0, 20.0, ComparisonOp::Le, ComparisonOp::Lt).is_err());
        assert!(RangeTerm::new("area", 10.0, 20.0, ComparisonOp::Ge, ComparisonOp::Ge).is_err());
        assert!(RangeTerm::parse("area", 1i64, 2i64, ">=", "<").is_ok());
        assert!(RangeTerm::parse("area", 1i64, 2i64, "<", "<").is_err());
    }

    #[test]
    fn test_range_inclusive_defaults() {
        let term = RangeTerm::inclusive("height", 0i64, 480i64);
        assert_eq!(term.min_op, ComparisonOp::Ge);
        assert_eq!(term.max_op, ComparisonOp::Le);

        let term = IndexedRangeTerm::inclusive("bbox", 2, 1.0, 5.0);
        assert_eq!(term.index, 2);
        assert_eq!(term.min_op, ComparisonOp::Ge);
    }

    #[test]
    fn test_indexed_range_validates_bounds() {
        assert!(
            IndexedRangeTerm::new("bbox", 3, 1.0, 2.0, ComparisonOp::Eq, ComparisonOp::Le).is_err()
        );
    }
}
