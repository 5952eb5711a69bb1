//! Query compiler.
//!
//! Turns a `Query` into an OR of AND-groups. Terms with no token between them
//! join with `and`; an explicit token overrides that one junction. Constraints
//! are AND-ed with the whole result.

use crate::ast::{Expr, FieldAccess, IntersectionTerm, LogicalOp, Term, ValuesTerm};
use crate::query::{Query, QueryItem};
use alloc::format;
use alloc::vec::Vec;
use cocoql_core::{Error, Record, Result};
use core::fmt;

/// A compiled query, ready to evaluate against records.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledFilter {
    expr: Expr,
}

impl CompiledFilter {
    pub fn new(expr: Expr) -> Self {
        Self { expr }
    }

    /// Filter that keeps every record.
    pub fn always() -> Self {
        Self::new(Expr::Const(true))
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Returns true if the filter keeps every record without looking at it.
    pub fn is_trivial(&self) -> bool {
        self.expr == Expr::Const(true)
    }

    /// Evaluates the filter against one record.
    #[inline]
    pub fn matches<R: Record>(&self, record: &R) -> Result<bool> {
        self.expr.eval(record)
    }
}

impl fmt::Display for CompiledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.expr, f)
    }
}

/// Compiles a query.
///
/// Fails with `Error::MalformedQuery` if a logical token starts or ends the query
/// or follows another token. An empty query compiles to `true`.
pub fn compile(query: &Query) -> Result<CompiledFilter> {
    validate(query)?;

    let mut groups: Vec<Vec<Expr>> = Vec::new();
    let mut current: Vec<Expr> = Vec::new();
    for item in query.items() {
        match item {
            QueryItem::Term(term) => current.push(compile_term(term)),
            QueryItem::Logical(LogicalOp::And) => {}
            QueryItem::Logical(LogicalOp::Or) => {
                groups.push(core::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    let body = if groups.is_empty() {
        Expr::Const(true)
    } else {
        Expr::or(groups.into_iter().map(Expr::and).collect())
    };
    let conjuncts = core::iter::once(body)
        .chain(query.constraints().iter().map(compile_intersection))
        .filter(|expr| *expr != Expr::Const(true))
        .collect();
    let filter = CompiledFilter::new(Expr::and(conjuncts));
    tracing::trace!(filter = %filter, terms = query.term_count(), "compiled query");
    Ok(filter)
}

fn validate(query: &Query) -> Result<()> {
    let items = query.items();
    let mut previous_token = true;
    for (position, item) in items.iter().enumerate() {
        match item {
            QueryItem::Term(_) => previous_token = false,
            QueryItem::Logical(op) => {
                if position == 0 {
                    return Err(Error::malformed_query(format!(
                        "query starts with logical operator {}",
                        op
                    )));
                }
                if previous_token {
                    return Err(Error::malformed_query(format!(
                        "logical operator {} at position {} follows another operator",
                        op, position
                    )));
                }
                previous_token = true;
            }
        }
    }
    if let Some(QueryItem::Logical(op)) = items.last() {
        return Err(Error::malformed_query(format!(
            "query ends with logical operator {}",
            op
        )));
    }
    Ok(())
}

fn compile_term(term: &Term) -> Expr {
    match term {
        Term::Value(t) => Expr::compare(FieldAccess::field(t.field.as_str()), t.op, t.value.clone()),
        Term::Values(t) => compile_values(t),
        Term::Range(t) => {
            let access = FieldAccess::field(t.field.as_str());
            Expr::And(alloc::vec![
                Expr::compare(access.clone(), t.min_op, t.min.clone()),
                Expr::compare(access, t.max_op, t.max.clone()),
            ])
        }
        Term::IndexedValue(t) => Expr::compare(
            FieldAccess::indexed(t.field.as_str(), t.index),
            t.op,
            t.value.clone(),
        ),
        Term::IndexedRange(t) => {
            let access = FieldAccess::indexed(t.field.as_str(), t.index);
            Expr::And(alloc::vec![
                Expr::compare(access.clone(), t.min_op, t.min.clone()),
                Expr::compare(access, t.max_op, t.max.clone()),
            ])
        }
        Term::Intersection(t) => compile_intersection(t),
    }
}

fn compile_values(term: &ValuesTerm) -> Expr {
    Expr::member(
        FieldAccess::field(term.field.as_str()),
        term.op,
        term.values.clone(),
    )
}

fn compile_intersection(term: &IntersectionTerm) -> Expr {
    Expr::and(term.terms().iter().map(compile_values).collect())
}
