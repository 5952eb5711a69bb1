//! Error types for cocoql.

use crate::record::{RecordId, MAX_RECORD_ID};
use crate::types::DataType;
use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

/// Result type alias for cocoql operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for cocoql operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An operator outside the accepted set was given for a field.
    InvalidOperator {
        field: String,
        operator: String,
        accepted: &'static str,
    },
    /// An unknown logical operator token.
    InvalidLogicalOperator {
        operator: String,
        accepted: &'static str,
    },
    /// A query whose term/operator sequence cannot be compiled.
    MalformedQuery {
        message: String,
    },
    /// The record kind has no such field.
    FieldNotFound {
        kind: &'static str,
        field: String,
    },
    /// Positional access on a field that is not a sequence.
    NotIndexable {
        field: String,
        got: Option<DataType>,
    },
    /// Positional access past the end of a sequence field.
    IndexOutOfBounds {
        field: String,
        index: usize,
        len: usize,
    },
    /// Ordering comparison between incompatible value kinds.
    TypeMismatch {
        field: String,
        expected: Option<DataType>,
        got: Option<DataType>,
    },
    /// A compiled filter failed on one record; aborts the whole filter call.
    Evaluation {
        record: RecordId,
        term: String,
        cause: Box<Error>,
    },
    /// A required field is absent from a field mapping.
    MissingField {
        kind: &'static str,
        field: String,
    },
    /// A field mapping holds a value of the wrong kind.
    MalformedField {
        kind: &'static str,
        field: String,
        expected: DataType,
        got: Option<DataType>,
    },
    /// An explicit id already present in a strict collection.
    DuplicateId {
        kind: &'static str,
        id: RecordId,
    },
    /// An id past `MAX_RECORD_ID`, or no id left to assign.
    IdOutOfRange {
        kind: &'static str,
        id: RecordId,
    },
}

struct TypeName(Option<DataType>);

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(dt) => f.write_str(dt.name()),
            None => f.write_str("null"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidOperator {
                field,
                operator,
                accepted,
            } => {
                write!(
                    f,
                    "Invalid operator {:?} for field {}. Supported operators: {}",
                    operator, field, accepted
                )
            }
            Error::InvalidLogicalOperator { operator, accepted } => {
                write!(
                    f,
                    "Invalid logical operator: {:?}. Supported logical operators: {}",
                    operator, accepted
                )
            }
            Error::MalformedQuery { message } => {
                write!(f, "Malformed query: {}", message)
            }
            Error::FieldNotFound { kind, field } => {
                write!(f, "Field {} not found on {}", field, kind)
            }
            Error::NotIndexable { field, got } => {
                write!(f, "Field {} of type {} is not indexable", field, TypeName(*got))
            }
            Error::IndexOutOfBounds { field, index, len } => {
                write!(
                    f,
                    "Index {} out of bounds for field {} of length {}",
                    index, field, len
                )
            }
            Error::TypeMismatch {
                field,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Type mismatch on field {}: cannot order {} against {}",
                    field,
                    TypeName(*got),
                    TypeName(*expected)
                )
            }
            Error::Evaluation {
                record,
                term,
                cause,
            } => {
                write!(
                    f,
                    "Evaluation of `{}` failed for record {}: {}",
                    term, record, cause
                )
            }
            Error::MissingField { kind, field } => {
                write!(f, "Missing field {} for {}", field, kind)
            }
            Error::MalformedField {
                kind,
                field,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Malformed field {} for {}: expected {}, got {}",
                    field,
                    kind,
                    expected,
                    TypeName(*got)
                )
            }
            Error::DuplicateId { kind, id } => {
                write!(f, "Duplicate id {} in {} collection", id, kind)
            }
            Error::IdOutOfRange { kind, id } => {
                write!(
                    f,
                    "Id {} out of range in {} collection (max {})",
                    id, kind, MAX_RECORD_ID
                )
            }
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::Evaluation { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl Error {
    /// Creates an invalid operator error.
    pub fn invalid_operator(
        field: impl Into<String>,
        operator: impl Into<String>,
        accepted: &'static str,
    ) -> Self {
        Error::InvalidOperator {
            field: field.into(),
            operator: operator.into(),
            accepted,
        }
    }

    /// Creates an invalid logical operator error.
    pub fn invalid_logical_operator(operator: impl Into<String>, accepted: &'static str) -> Self {
        Error::InvalidLogicalOperator {
            operator: operator.into(),
            accepted,
        }
    }

    /// Creates a malformed query error.
    pub fn malformed_query(message: impl Into<String>) -> Self {
        Error::MalformedQuery {
            message: message.into(),
        }
    }

    /// Creates a field not found error.
    pub fn field_not_found(kind: &'static str, field: impl Into<String>) -> Self {
        Error::FieldNotFound {
            kind,
            field: field.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: Option<DataType>,
        got: Option<DataType>,
    ) -> Self {
        Error::TypeMismatch {
            field: field.into(),
            expected,
            got,
        }
    }

    /// Wraps an error raised while evaluating `term` against one record.
    pub fn evaluation(record: RecordId, term: impl Into<String>, cause: Error) -> Self {
        Error::Evaluation {
            record,
            term: term.into(),
            cause: Box::new(cause),
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(kind: &'static str, field: impl Into<String>) -> Self {
        Error::MissingField {
            kind,
            field: field.into(),
        }
    }

    /// Returns true for errors raised while building or compiling a query.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidOperator { .. }
                | Error::InvalidLogicalOperator { .. }
                | Error::MalformedQuery { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_operator("area", "<", "> , >=");
        assert!(err.to_string().contains("area"));
        assert!(err.to_string().contains("\"<\""));

        let err = Error::field_not_found("image", "bbox");
        assert!(err.to_string().contains("bbox"));

        let err = Error::type_mismatch("file_name", Some(DataType::Int), Some(DataType::String));
        assert!(err.to_string().contains("cannot order string against int"));

        let err = Error::type_mismatch("width", Some(DataType::Int), None);
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn test_evaluation_wraps_cause() {
        let err = Error::evaluation(3, "entity.area > 1", Error::field_not_found("image", "area"));
        match &err {
            Error::Evaluation { record, cause, .. } => {
                assert_eq!(*record, 3);
                assert!(matches!(**cause, Error::FieldNotFound { .. }));
            }
            _ => panic!("Wrong error type"),
        }
        assert!(err.to_string().contains("record 3"));
    }

    #[test]
    fn test_is_configuration() {
        assert!(Error::malformed_query("x").is_configuration());
        assert!(Error::invalid_logical_operator("xor", "and, or").is_configuration());
        assert!(!Error::missing_field("image", "file_name").is_configuration());
    }
}
