//! Operator catalog.
//!
//! Comparison, membership and logical operators, their tokens, and the validators
//! that reject an operator outside the set a term accepts.

use cocoql_core::{Error, Result};
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

/// Accepted comparison tokens, as listed in error messages.
pub const COMPARISON_TOKENS: &str = "==, !=, >, <, >=, <=";
/// Accepted range lower-bound tokens.
pub const LOWER_BOUND_TOKENS: &str = ">, >=";
/// Accepted range upper-bound tokens.
pub const UPPER_BOUND_TOKENS: &str = "<, <=";
/// Accepted membership tokens.
pub const MEMBERSHIP_TOKENS: &str = "in, not_in";
/// Accepted logical tokens.
pub const LOGICAL_TOKENS: &str = "and, or";

// Field name reported when a token is parsed outside of any term.
const UNBOUND_FIELD: &str = "<unbound>";

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 6] = [
        ComparisonOp::Eq,
        ComparisonOp::Ne,
        ComparisonOp::Gt,
        ComparisonOp::Lt,
        ComparisonOp::Ge,
        ComparisonOp::Le,
    ];

    /// Returns the operator token.
    pub fn token(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Le => "<=",
        }
    }

    /// Parses a token, returning None if it is not a comparison operator.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.token() == token)
    }

    /// Returns true for operators legal on a range's lower bound.
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, ComparisonOp::Gt | ComparisonOp::Ge)
    }

    /// Returns true for operators legal on a range's upper bound.
    pub fn is_upper_bound(&self) -> bool {
        matches!(self, ComparisonOp::Lt | ComparisonOp::Le)
    }

    /// Returns true for operators that need an ordering between operands.
    pub fn is_ordering(&self) -> bool {
        !matches!(self, ComparisonOp::Eq | ComparisonOp::Ne)
    }

    /// Tests an ordering of `left` relative to `right` against this operator.
    pub fn matches(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Eq => ordering == Ordering::Equal,
            ComparisonOp::Ne => ordering != Ordering::Equal,
            ComparisonOp::Gt => ordering == Ordering::Greater,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::Ge => ordering != Ordering::Less,
            ComparisonOp::Le => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ComparisonOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        check_comparison(UNBOUND_FIELD, s)
    }
}

/// Membership operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum MembershipOp {
    #[default]
    In,
    NotIn,
}

impl MembershipOp {
    pub fn token(&self) -> &'static str {
        match self {
            MembershipOp::In => "in",
            MembershipOp::NotIn => "not_in",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "in" => Some(MembershipOp::In),
            "not_in" => Some(MembershipOp::NotIn),
            _ => None,
        }
    }

    /// Applies the operator to the result of a membership lookup.
    #[inline]
    pub fn apply(&self, contained: bool) -> bool {
        match self {
            MembershipOp::In => contained,
            MembershipOp::NotIn => !contained,
        }
    }
}

impl fmt::Display for MembershipOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for MembershipOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        check_membership(UNBOUND_FIELD, s)
    }
}

/// Logical operators joining two terms of a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

impl LogicalOp {
    pub fn token(&self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for LogicalOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        check_logical(s)
    }
}

/// Validates a comparison token for `field`.
pub fn check_comparison(field: &str, token: &str) -> Result<ComparisonOp> {
    ComparisonOp::from_token(token)
        .ok_or_else(|| Error::invalid_operator(field, token, COMPARISON_TOKENS))
}

/// Validates a membership token for `field`.
pub fn check_membership(field: &str, token: &str) -> Result<MembershipOp> {
    MembershipOp::from_token(token)
        .ok_or_else(|| Error::invalid_operator(field, token, MEMBERSHIP_TOKENS))
}

/// Validates the bound operators of a range on `field`.
pub fn check_range(
    field: &str,
    min_op: ComparisonOp,
    max_op: ComparisonOp,
) -> Result<(ComparisonOp, ComparisonOp)> {
    if !min_op.is_lower_bound() {
        return Err(Error::invalid_operator(
            field,
            min_op.token(),
            LOWER_BOUND_TOKENS,
        ));
    }
    if !max_op.is_upper_bound() {
        return Err(Error::invalid_operator(
            field,
            max_op.token(),
            UPPER_BOUND_TOKENS,
        ));
    }
    Ok((min_op, max_op))
}

/// Validates range bound tokens on `field`.
pub fn check_range_tokens(
    field: &str,
    min_token: &str,
    max_token: &str,
) -> Result<(ComparisonOp, ComparisonOp)> {
    let min_op = ComparisonOp::from_token(min_token)
        .filter(ComparisonOp::is_lower_bound)
        .ok_or_else(|| Error::invalid_operator(field, min_token, LOWER_BOUND_TOKENS))?;
    let max_op = ComparisonOp::from_token(max_token)
        .filter(ComparisonOp::is_upper_bound)
        .ok_or_else(|| Error::invalid_operator(field, max_token, UPPER_BOUND_TOKENS))?;
    Ok((min_op, max_op))
}

/// Validates a logical token.
pub fn check_logical(token: &str) -> Result<LogicalOp> {
    match token {
        "and" => Ok(LogicalOp::And),
        "or" => Ok(LogicalOp::Or),
        _ => Err(Error::invalid_logical_operator(token, LOGICAL_TOKENS)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_tokens_roundtrip() {
        for op in ComparisonOp::ALL {
            assert_eq!(ComparisonOp::from_token(op.token()), Some(op));
        }
        assert_eq!(ComparisonOp::from_token("="), None);
    }

    #[test]
    fn test_check_comparison() {
        assert_eq!(check_comparison("area", ">=").unwrap(), ComparisonOp::Ge);
        let err = check_comparison("area", "=>").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidOperator {
                field: "area".into(),
                operator: "=>".into(),
                accepted: COMPARISON_TOKENS,
            }
        );
    }

    #[test]
    fn test_check_range_rejects_wrong_direction() {
        assert!(check_range("area", ComparisonOp::Ge, ComparisonOp::Le).is_ok());
        assert!(check_range("area", ComparisonOp::Gt, ComparisonOp::Lt).is_ok());

        let err = check_range("area", ComparisonOp::Lt, ComparisonOp::Le).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidOperator { accepted: LOWER_BOUND_TOKENS, .. }
        ));

        let err = check_range("area", ComparisonOp::Ge, ComparisonOp::Eq).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidOperator { accepted: UPPER_BOUND_TOKENS, .. }
        ));
    }

    #[test]
    fn test_check_range_tokens() {
        assert_eq!(
            check_range_tokens("width", ">", "<=").unwrap(),
            (ComparisonOp::Gt, ComparisonOp::Le)
        );
        assert!(check_range_tokens("width", "<", "<=").is_err());
        assert!(check_range_tokens("width", ">=", "==").is_err());
    }

    #[test]
    fn test_membership() {
        assert_eq!(check_membership("id", "not_in").unwrap(), MembershipOp::NotIn);
        assert!(check_membership("id", "not in").is_err());
        assert!(MembershipOp::NotIn.apply(false));
        assert!(!MembershipOp::NotIn.apply(true));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("!=".parse::<ComparisonOp>().unwrap(), ComparisonOp::Ne);
        assert_eq!("in".parse::<MembershipOp>().unwrap(), MembershipOp::In);
        assert!("<>".parse::<ComparisonOp>().is_err());
    }

    #[test]
    fn test_logical() {
        assert_eq!("or".parse::<LogicalOp>().unwrap(), LogicalOp::Or);
        let err = "xor".parse::<LogicalOp>().unwrap_err();
        assert!(matches!(err, Error::InvalidLogicalOperator { .. }));
    }

    #[test]
    fn test_matches_ordering() {
        assert!(ComparisonOp::Ge.matches(Ordering::Equal));
        assert!(ComparisonOp::Ge.matches(Ordering::Greater));
        assert!(!ComparisonOp::Gt.matches(Ordering::Equal));
        assert!(ComparisonOp::Le.matches(Ordering::Less));
        assert!(ComparisonOp::Ne.matches(Ordering::Less));
    }
}
