//! Filter queries and the shared builder surface.

use crate::ast::{
    check_logical, ComparisonOp, IndexedRangeTerm, IndexedValueTerm, IntersectionTerm, LogicalOp,
    MembershipOp, RangeTerm, Term, ValueTerm, ValuesTerm,
};
use crate::compiler::{compile, CompiledFilter};
use crate::executor::FilterExecutor;
use alloc::vec::Vec;
use cocoql_core::{Collection, Record, Result, Value, ID};

/// One element of a query: a term or an explicit logical token.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryItem {
    Term(Term),
    Logical(LogicalOp),
}

/// An ordered sequence of terms and logical tokens, plus whole-query constraints.
///
/// Adjacent terms with no token between them are joined with `and`. Tokens are
/// only validated structurally when the query is compiled. Constraints are
/// intersection terms AND-ed with the whole sequence: `(items) and c1 and c2`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    items: Vec<QueryItem>,
    constraints: Vec<IntersectionTerm>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[QueryItem] {
        &self.items
    }

    pub fn constraints(&self) -> &[IntersectionTerm] {
        &self.constraints
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the query has neither items nor constraints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.constraints.is_empty()
    }

    /// Returns the number of terms, ignoring tokens.
    pub fn term_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, QueryItem::Term(_)))
            .count()
    }

    pub fn push_term(&mut self, term: impl Into<Term>) {
        self.items.push(QueryItem::Term(term.into()));
    }

    pub fn push_logical(&mut self, op: LogicalOp) {
        self.items.push(QueryItem::Logical(op));
    }

    /// Adds an intersection that every matching record must satisfy.
    pub fn push_constraint(&mut self, intersection: IntersectionTerm) {
        self.constraints.push(intersection);
    }

    /// Appends a logical token given as text.
    pub fn push_token(&mut self, token: &str) -> Result<()> {
        let op = check_logical(token)?;
        self.push_logical(op);
        Ok(())
    }

    /// Compiles the query.
    pub fn compile(&self) -> Result<CompiledFilter> {
        compile(self)
    }
}

impl From<Term> for Query {
    fn from(term: Term) -> Self {
        Self {
            items: alloc::vec![QueryItem::Term(term)],
            constraints: Vec::new(),
        }
    }
}

impl From<ValueTerm> for Query {
    fn from(term: ValueTerm) -> Self {
        Term::from(term).into()
    }
}

impl From<ValuesTerm> for Query {
    fn from(term: ValuesTerm) -> Self {
        Term::from(term).into()
    }
}

impl FromIterator<QueryItem> for Query {
    fn from_iter<I: IntoIterator<Item = QueryItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            constraints: Vec::new(),
        }
    }
}

/// Fluent builder surface shared by every record kind's filter.
///
/// Builders are owned values: each method takes `self` and returns it.
pub trait FilterBuilder: Sized {
    fn query(&self) -> &Query;

    fn query_mut(&mut self) -> &mut Query;

    fn into_query(self) -> Query;

    /// Appends a term.
    fn push(mut self, term: impl Into<Term>) -> Self {
        self.query_mut().push_term(term);
        self
    }

    /// Joins the previous and the next term with `and`.
    fn and(mut self) -> Self {
        self.query_mut().push_logical(LogicalOp::And);
        self
    }

    /// Joins the previous and the next term with `or`.
    fn or(mut self) -> Self {
        self.query_mut().push_logical(LogicalOp::Or);
        self
    }

    /// Appends a logical token given as text.
    fn logical(mut self, token: &str) -> Result<Self> {
        self.query_mut().push_token(token)?;
        Ok(self)
    }

    /// Keeps records whose id is one of `values`.
    fn ids<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.ids_with(values, MembershipOp::In)
    }

    fn ids_with<I, V>(self, values: I, op: MembershipOp) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(ValuesTerm::new(ID, values, op))
    }

    /// Compares the record id to `value`.
    fn id(self, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.push(ValueTerm::new(ID, value, op))
    }

    /// Compares a named field to `value`.
    fn compare(self, field: &str, value: impl Into<Value>, op: ComparisonOp) -> Self {
        self.push(ValueTerm::new(field, value, op))
    }

    /// Tests a named field for membership in `values`.
    fn member<I, V>(self, field: &str, values: I, op: MembershipOp) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(ValuesTerm::new(field, values, op))
    }

    /// Bounds a named field with `min <= field <= max`.
    fn range(self, field: &str, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.push(RangeTerm::inclusive(field, min, max))
    }

    /// Bounds a named field with explicit bound operators.
    fn range_with(
        self,
        field: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
        min_op: ComparisonOp,
        max_op: ComparisonOp,
    ) -> Result<Self> {
        let term = RangeTerm::new(field, min, max, min_op, max_op)?;
        Ok(self.push(term))
    }

    /// Compares element `index` of a sequence field to `value`.
    fn compare_at(
        self,
        field: &str,
        index: usize,
        value: impl Into<Value>,
        op: ComparisonOp,
    ) -> Self {
        self.push(IndexedValueTerm::new(field, index, value, op))
    }

    /// Bounds element `index` of a sequence field with `min <= field[index] <= max`.
    fn range_at(
        self,
        field: &str,
        index: usize,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        self.push(IndexedRangeTerm::inclusive(field, index, min, max))
    }

    fn range_at_with(
        self,
        field: &str,
        index: usize,
        min: impl Into<Value>,
        max: impl Into<Value>,
        min_op: ComparisonOp,
        max_op: ComparisonOp,
    ) -> Result<Self> {
        let term = IndexedRangeTerm::new(field, index, min, max, min_op, max_op)?;
        Ok(self.push(term))
    }

    /// Constrains the whole query with an intersection.
    ///
    /// The result matches `(query) and intersection` whatever `or` tokens the
    /// query holds. Use `push` to place an intersection term inside the sequence.
    fn intersect(mut self, intersection: IntersectionTerm) -> Self {
        self.query_mut().push_constraint(intersection);
        self
    }

    /// Compiles the query and filters `collection` into a new collection.
    fn apply<R: Record>(&self, collection: &Collection<R>) -> Result<Collection<R>> {
        FilterExecutor::new(compile(self.query())?).execute(collection)
    }
}

impl FilterBuilder for Query {
    fn query(&self) -> &Query {
        self
    }

    fn query_mut(&mut self) -> &mut Query {
        self
    }

    fn into_query(self) -> Query {
        self
    }
}
