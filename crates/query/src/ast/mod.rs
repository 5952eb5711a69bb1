//! AST module for filter terms and compiled expressions.

pub mod expr;
pub mod intersection;
pub mod operator;
pub mod term;

pub use expr::{Expr, FieldAccess, MemberSet};
pub use intersection::{restrict, restrict_to_peer, IntersectionTerm};
pub use operator::{
    check_comparison, check_logical, check_membership, check_range, check_range_tokens,
    ComparisonOp, LogicalOp, MembershipOp,
};
pub use term::{IndexedRangeTerm, IndexedValueTerm, RangeTerm, Term, ValueTerm, ValuesTerm};
