//! Primitive column types for the reflected schema model.
//!
//! This module defines [`PrimitiveType`], the closed type vocabulary that every
//! reflected column and decoded constant carries, together with the inference
//! rule mapping raw type spellings (declared column types as well as per-value
//! runtime type names) into it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error type for a type spelling outside the recognized vocabulary.
///
/// Unrecognized spellings are a configuration problem: the database under test
/// was created with a type this tool does not model, and silently guessing a
/// type would poison every query built from the schema.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unrecognized column type '{raw}'")]
pub struct UnknownTypeError {
    /// The spelling exactly as the database reported it.
    pub raw: String,
}

/// Primitive type of a column or constant.
///
/// The vocabulary deliberately mirrors SQLite's storage-class world plus the
/// two declared-type wrinkles that matter for query generation: `DATETIME`
/// columns are tracked separately from plain `TEXT`, and columns declared with
/// no type at all get their own `None` marker instead of being folded into
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// 64-bit signed integer
    Int,

    /// 64-bit IEEE 754 floating point
    Real,

    /// Text string
    Text,

    /// Date/time value, stored and surfaced as text
    Datetime,

    /// Raw byte string
    Binary,

    /// Column declared without any type
    None,

    /// The null type, as reported by the engine for NULL values
    Null,
}

impl PrimitiveType {
    /// Infer the primitive type from a raw type spelling.
    ///
    /// Matching is case-insensitive and covers both declared column types
    /// (`"INTEGER"`, `"datetime"`, the empty string for untyped columns) and
    /// the runtime type names the engine reports per value (`"integer"`,
    /// `"null"`, ...). Anything outside the vocabulary is an error.
    ///
    /// ```rust
    /// use rowprobe::types::PrimitiveType;
    ///
    /// assert_eq!(PrimitiveType::infer("integer").unwrap(), PrimitiveType::Int);
    /// assert_eq!(PrimitiveType::infer("BLOB").unwrap(), PrimitiveType::Binary);
    /// assert_eq!(PrimitiveType::infer("").unwrap(), PrimitiveType::None);
    /// assert!(PrimitiveType::infer("VARCHAR(255)").is_err());
    /// ```
    pub fn infer(raw: &str) -> Result<PrimitiveType, UnknownTypeError> {
        match raw.to_uppercase().as_str() {
            "TEXT" => Ok(PrimitiveType::Text),
            "INTEGER" | "INT" => Ok(PrimitiveType::Int),
            "DATETIME" => Ok(PrimitiveType::Datetime),
            "" => Ok(PrimitiveType::None),
            "BLOB" => Ok(PrimitiveType::Binary),
            "REAL" => Ok(PrimitiveType::Real),
            "NULL" => Ok(PrimitiveType::Null),
            _ => Err(UnknownTypeError { raw: raw.to_owned() }),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::Int => "INT",
            PrimitiveType::Real => "REAL",
            PrimitiveType::Text => "TEXT",
            PrimitiveType::Datetime => "DATETIME",
            PrimitiveType::Binary => "BINARY",
            PrimitiveType::None => "NONE",
            PrimitiveType::Null => "NULL",
        };
        write!(f, "{name}")
    }
}

/// Whether a raw declared type is literally the spelling `INTEGER`.
///
/// Type inference is case-insensitive, but the rowid-alias rule cares about
/// the exact declared spelling: `INTEGER PRIMARY KEY` makes a column an alias
/// for the rowid, while `INT PRIMARY KEY` (or `integer PRIMARY KEY`) does not.
/// The comparison is therefore case-sensitive and untrimmed.
pub fn is_literal_integer(raw: &str) -> bool {
    raw == "INTEGER"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_recognized_spellings() {
        let cases = [
            ("TEXT", PrimitiveType::Text),
            ("INTEGER", PrimitiveType::Int),
            ("INT", PrimitiveType::Int),
            ("DATETIME", PrimitiveType::Datetime),
            ("", PrimitiveType::None),
            ("BLOB", PrimitiveType::Binary),
            ("REAL", PrimitiveType::Real),
            ("NULL", PrimitiveType::Null),
        ];
        for (raw, expected) in cases {
            assert_eq!(PrimitiveType::infer(raw).unwrap(), expected, "raw: {raw:?}");
        }
    }

    #[test]
    fn test_infer_is_case_insensitive() {
        assert_eq!(PrimitiveType::infer("text").unwrap(), PrimitiveType::Text);
        assert_eq!(PrimitiveType::infer("Integer").unwrap(), PrimitiveType::Int);
        assert_eq!(PrimitiveType::infer("int").unwrap(), PrimitiveType::Int);
        assert_eq!(
            PrimitiveType::infer("DateTime").unwrap(),
            PrimitiveType::Datetime
        );
        assert_eq!(PrimitiveType::infer("blob").unwrap(), PrimitiveType::Binary);
        assert_eq!(PrimitiveType::infer("real").unwrap(), PrimitiveType::Real);
        assert_eq!(PrimitiveType::infer("null").unwrap(), PrimitiveType::Null);
    }

    #[test]
    fn test_infer_rejects_unknown_spellings() {
        for raw in ["FOOBAR", "VARCHAR(255)", "INTEGER ", " ", "TEXT NOT NULL"] {
            let err = PrimitiveType::infer(raw).unwrap_err();
            assert_eq!(err.raw, raw);
            assert!(err.to_string().contains(raw), "message: {err}");
        }
    }

    #[test]
    fn test_literal_integer_requires_exact_spelling() {
        assert!(is_literal_integer("INTEGER"));
        assert!(!is_literal_integer("integer"));
        assert!(!is_literal_integer("Integer"));
        assert!(!is_literal_integer("INT"));
        assert!(!is_literal_integer("INTEGER "));
        assert!(!is_literal_integer(""));
    }

    #[test]
    fn test_display_uses_uppercase_names() {
        assert_eq!(PrimitiveType::Int.to_string(), "INT");
        assert_eq!(PrimitiveType::Datetime.to_string(), "DATETIME");
        assert_eq!(PrimitiveType::Binary.to_string(), "BINARY");
        assert_eq!(PrimitiveType::None.to_string(), "NONE");
    }
}
