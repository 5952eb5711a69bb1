//! Compiled filter expressions.
//!
//! `Expr` is the boolean AST a query compiles to. It has one free variable, the
//! record under test, rendered as `entity` in diagnostics.

use crate::ast::operator::{ComparisonOp, MembershipOp};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use cocoql_core::{Error, Record, Result, Value};
use core::fmt;
use hashbrown::HashSet;

/// Access to a record field, optionally to one element of a sequence field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldAccess {
    pub field: String,
    pub index: Option<usize>,
}

impl FieldAccess {
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            index: None,
        }
    }

    pub fn indexed(field: impl Into<String>, index: usize) -> Self {
        Self {
            field: field.into(),
            index: Some(index),
        }
    }

    /// Field label used in error messages, e.g. `bbox[2]`.
    pub fn label(&self) -> String {
        match self.index {
            Some(index) => alloc::format!("{}[{}]", self.field, index),
            None => self.field.clone(),
        }
    }

    /// Resolves the accessed value on `record`.
    pub fn resolve<R: Record>(&self, record: &R) -> Result<Value> {
        let value = record
            .field(&self.field)
            .ok_or_else(|| Error::field_not_found(R::KIND, self.field.as_str()))?;
        let Some(index) = self.index else {
            return Ok(value);
        };
        match value {
            Value::List(mut items) => {
                let len = items.len();
                if index < len {
                    Ok(items.swap_remove(index))
                } else {
                    Err(Error::IndexOutOfBounds {
                        field: self.field.clone(),
                        index,
                        len,
                    })
                }
            }
            other => Err(Error::NotIndexable {
                field: self.field.clone(),
                got: other.data_type(),
            }),
        }
    }
}

impl fmt::Display for FieldAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity.{}", self.field)?;
        if let Some(index) = self.index {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}

/// A membership set: the listed values plus a hash set for lookup.
#[derive(Clone, Debug)]
pub struct MemberSet {
    values: Vec<Value>,
    lookup: HashSet<Value>,
}

impl MemberSet {
    pub fn new(values: Vec<Value>) -> Self {
        let lookup = values.iter().cloned().collect();
        Self { values, lookup }
    }

    #[inline]
    pub fn contains(&self, value: &Value) -> bool {
        self.lookup.contains(value)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

impl PartialEq for MemberSet {
    fn eq(&self, other: &Self) -> bool {
        self.lookup == other.lookup
    }
}

/// Compiled boolean expression over one record.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Constant result.
    Const(bool),
    /// `entity.f op value`.
    Compare {
        access: FieldAccess,
        op: ComparisonOp,
        operand: Value,
    },
    /// `entity.f in set` / `entity.f not in set`.
    Member {
        access: FieldAccess,
        op: MembershipOp,
        set: MemberSet,
    },
    /// Conjunction, evaluated left to right with short-circuit.
    And(Vec<Expr>),
    /// Disjunction, evaluated left to right with short-circuit.
    Or(Vec<Expr>),
}

impl Expr {
    pub fn compare(access: FieldAccess, op: ComparisonOp, operand: impl Into<Value>) -> Self {
        Expr::Compare {
            access,
            op,
            operand: operand.into(),
        }
    }

    pub fn member(access: FieldAccess, op: MembershipOp, values: Vec<Value>) -> Self {
        Expr::Member {
            access,
            op,
            set: MemberSet::new(values),
        }
    }

    /// Builds a conjunction, collapsing the trivial cases.
    pub fn and(mut exprs: Vec<Expr>) -> Self {
        match exprs.len() {
            0 => Expr::Const(true),
            1 => exprs.remove(0),
            _ => Expr::And(exprs),
        }
    }

    /// Builds a disjunction, collapsing the trivial cases.
    pub fn or(mut exprs: Vec<Expr>) -> Self {
        match exprs.len() {
            0 => Expr::Const(false),
            1 => exprs.remove(0),
            _ => Expr::Or(exprs),
        }
    }

    /// Evaluates the expression against a record.
    ///
    /// Leaf failures are wrapped in `Error::Evaluation` naming the record and the
    /// rendered leaf.
    pub fn eval<R: Record>(&self, record: &R) -> Result<bool> {
        match self {
            Expr::Const(b) => Ok(*b),
            Expr::Compare { access, op, operand } => {
                compare(access, *op, operand, record).map_err(|cause| self.failed(record, cause))
            }
            Expr::Member { access, op, set } => access
                .resolve(record)
                .map(|value| op.apply(set.contains(&value)))
                .map_err(|cause| self.failed(record, cause)),
            Expr::And(exprs) => {
                for expr in exprs {
                    if !expr.eval(record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Expr::Or(exprs) => {
                for expr in exprs {
                    if expr.eval(record)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Returns the number of leaf comparisons.
    pub fn leaf_count(&self) -> usize {
        match self {
            Expr::Const(_) => 0,
            Expr::Compare { .. } | Expr::Member { .. } => 1,
            Expr::And(exprs) | Expr::Or(exprs) => exprs.iter().map(Expr::leaf_count).sum(),
        }
    }

    fn failed<R: Record>(&self, record: &R, cause: Error) -> Error {
        Error::evaluation(record.id(), self.to_string(), cause)
    }
}

fn compare<R: Record>(
    access: &FieldAccess,
    op: ComparisonOp,
    operand: &Value,
    record: &R,
) -> Result<bool> {
    let value = access.resolve(record)?;
    match op {
        ComparisonOp::Eq => Ok(value == *operand),
        ComparisonOp::Ne => Ok(value != *operand),
        _ => {
            if !value.is_comparable_with(operand) {
                return Err(Error::type_mismatch(
                    access.label(),
                    operand.data_type(),
                    value.data_type(),
                ));
            }
            // NaN orders against nothing
            Ok(value.compare(operand).is_some_and(|ord| op.matches(ord)))
        }
    }
}

struct Members<'a>(&'a [Value]);

impl fmt::Display for Members<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(b) => write!(f, "{}", b),
            Expr::Compare { access, op, operand } => write!(f, "{} {} {}", access, op, operand),
            Expr::Member { access, op, set } => {
                let op = match op {
                    MembershipOp::In => "in",
                    MembershipOp::NotIn => "not in",
                };
                write!(f, "{} {} {}", access, op, Members(set.values()))
            }
            Expr::And(exprs) => {
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    match expr {
                        Expr::Or(_) => write!(f, "({})", expr)?,
                        _ => write!(f, "{}", expr)?,
                    }
                }
                Ok(())
            }
            Expr::Or(exprs) => {
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    write!(f, "{}", expr)?;
                }
                Ok(())
            }
        }
    }
}
