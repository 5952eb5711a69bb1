//! Data type definitions for cocoql records.
//!
//! This module defines the value kinds a record field can hold.

use core::fmt;

/// Supported value kinds of a record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean type (true/false)
    Boolean,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point number
    Float,
    /// UTF-8 string
    String,
    /// Ordered sequence of values (bounding boxes, polygons)
    List,
    /// Opaque structured payload kept as JSON text
    Json,
}

impl DataType {
    /// Returns the lowercase name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::List => "list",
            DataType::Json => "json",
        }
    }

    /// Returns whether values of this type are numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }

    /// Returns whether two values of this type have an order.
    pub fn is_ordered(&self) -> bool {
        !matches!(self, DataType::Json)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_equality() {
        assert_eq!(DataType::Int, DataType::Int);
        assert_ne!(DataType::Int, DataType::Float);
    }

    #[test]
    fn test_numeric() {
        assert!(DataType::Int.is_numeric());
        assert!(DataType::Float.is_numeric());
        assert!(!DataType::String.is_numeric());
        assert!(!DataType::List.is_numeric());
    }

    #[test]
    fn test_ordered() {
        assert!(DataType::List.is_ordered());
        assert!(DataType::Boolean.is_ordered());
        assert!(!DataType::Json.is_ordered());
    }
}
