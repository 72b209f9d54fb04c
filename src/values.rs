//! Typed constants and sampled row values.
//!
//! This module provides [`Constant`], the explicit sum type every sampled cell
//! decodes into, and [`RowValue`], one sampled row bound to its owning table.
//! Decoding pairs a [`PrimitiveType`] with a [`RawDatum`] and is strict: the
//! runtime type name and the storage shape of a value always agree in a
//! healthy adapter, so any mismatch is surfaced instead of coerced.

use crate::schema::{Column, Table};
use crate::source::RawDatum;
use crate::types::PrimitiveType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Error type for a datum whose shape does not match its announced type.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Cannot decode {datum} datum as a {expected} value")]
pub struct DecodeError {
    /// The primitive type the value was announced as.
    pub expected: PrimitiveType,

    /// Shape of the datum actually received.
    pub datum: &'static str,
}

/// A decoded database value.
///
/// Each variant carries the natural Rust payload for its primitive type.
/// NULLs are not a separate type-less marker: a null cell becomes
/// [`Constant::Null`] tagged with the type it was announced as, so consumers
/// can still reason about the slot's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constant {
    /// Integer value
    Int(i64),

    /// Floating-point value
    Real(f64),

    /// Text value
    Text(String),

    /// Date/time value, kept in its textual storage form
    Datetime(String),

    /// Byte-string value
    Binary(Vec<u8>),

    /// Value from an untyped column, kept as text
    None(String),

    /// A NULL, tagged with the type it was announced as
    Null(PrimitiveType),
}

impl Constant {
    /// Decode a raw datum announced as `primitive`.
    ///
    /// A [`RawDatum::Null`] decodes to [`Constant::Null`] for every primitive
    /// type. Otherwise the datum's shape must match the primitive's natural
    /// payload: integers for `INT`, floats for `REAL`, text for `TEXT`,
    /// `DATETIME` and `NONE`, bytes for `BINARY`. Anything else is a
    /// [`DecodeError`].
    pub fn decode(primitive: PrimitiveType, datum: &RawDatum) -> Result<Constant, DecodeError> {
        if datum.is_null() {
            return Ok(Constant::Null(primitive));
        }
        match (primitive, datum) {
            (PrimitiveType::Int, RawDatum::Integer(i)) => Ok(Constant::Int(*i)),
            (PrimitiveType::Real, RawDatum::Real(r)) => Ok(Constant::Real(*r)),
            (PrimitiveType::Text, RawDatum::Text(s)) => Ok(Constant::Text(s.clone())),
            (PrimitiveType::Datetime, RawDatum::Text(s)) => Ok(Constant::Datetime(s.clone())),
            (PrimitiveType::None, RawDatum::Text(s)) => Ok(Constant::None(s.clone())),
            (PrimitiveType::Binary, RawDatum::Blob(b)) => Ok(Constant::Binary(b.clone())),
            _ => Err(DecodeError {
                expected: primitive,
                datum: datum.kind(),
            }),
        }
    }

    /// The primitive type this constant carries.
    ///
    /// For [`Constant::Null`] this is the type the null was announced as, not
    /// a separate null marker.
    pub fn primitive(&self) -> PrimitiveType {
        match self {
            Constant::Int(_) => PrimitiveType::Int,
            Constant::Real(_) => PrimitiveType::Real,
            Constant::Text(_) => PrimitiveType::Text,
            Constant::Datetime(_) => PrimitiveType::Datetime,
            Constant::Binary(_) => PrimitiveType::Binary,
            Constant::None(_) => PrimitiveType::None,
            Constant::Null(primitive) => *primitive,
        }
    }

    /// Whether this constant is a NULL of any type.
    pub fn is_null(&self) -> bool {
        matches!(self, Constant::Null(_))
    }
}

impl fmt::Display for Constant {
    /// Diagnostic rendition for logs and reproduction records. Text is shown
    /// Rust-quoted and blobs as `x'..'` hex; this is not SQL-safe escaping.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(i) => write!(f, "{i}"),
            Constant::Real(r) => write!(f, "{r}"),
            Constant::Text(s) | Constant::Datetime(s) | Constant::None(s) => write!(f, "{s:?}"),
            Constant::Binary(bytes) => {
                write!(f, "x'")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                write!(f, "'")
            }
            Constant::Null(_) => write!(f, "NULL"),
        }
    }
}

/// One sampled row, bound to the table it came from.
///
/// Values are keyed by [`Column`], whose equality and hashing look only at
/// the column's name and type. A caller can therefore look values up with its
/// own `Column` instance without threading the exact reflected object around.
#[derive(Debug, Clone)]
pub struct RowValue<'a> {
    table: &'a Table,
    values: HashMap<Column, Constant>,
}

impl<'a> RowValue<'a> {
    /// Bind a set of decoded values to their table.
    pub fn new(table: &'a Table, values: HashMap<Column, Constant>) -> Self {
        Self { table, values }
    }

    /// The table this row was sampled from.
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// All decoded values, keyed by column.
    pub fn values(&self) -> &HashMap<Column, Constant> {
        &self.values
    }

    /// The value sampled for `column`, if the row has one.
    pub fn get(&self, column: &Column) -> Option<&Constant> {
        self.values.get(column)
    }

    /// Name/value pairs in column declaration order, for recording and
    /// printing.
    pub fn ordered_pairs(&self) -> Vec<(&str, &Constant)> {
        self.table
            .columns()
            .iter()
            .filter_map(|column| {
                self.values
                    .get(column)
                    .map(|constant| (column.name(), constant))
            })
            .collect()
    }
}

impl fmt::Display for RowValue<'_> {
    /// Constants in column declaration order, comma-separated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.table.columns().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.values.get(column) {
                Some(value) => write!(f, "{value}")?,
                None => write!(f, "?")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableId;

    #[test]
    fn test_decode_natural_payloads() {
        assert_eq!(
            Constant::decode(PrimitiveType::Int, &RawDatum::Integer(42)).unwrap(),
            Constant::Int(42)
        );
        assert_eq!(
            Constant::decode(PrimitiveType::Real, &RawDatum::Real(0.5)).unwrap(),
            Constant::Real(0.5)
        );
        assert_eq!(
            Constant::decode(PrimitiveType::Text, &RawDatum::Text("a".into())).unwrap(),
            Constant::Text("a".into())
        );
        assert_eq!(
            Constant::decode(PrimitiveType::Datetime, &RawDatum::Text("2024-01-01".into()))
                .unwrap(),
            Constant::Datetime("2024-01-01".into())
        );
        assert_eq!(
            Constant::decode(PrimitiveType::None, &RawDatum::Text("loose".into())).unwrap(),
            Constant::None("loose".into())
        );
        assert_eq!(
            Constant::decode(PrimitiveType::Binary, &RawDatum::Blob(vec![1, 2, 3])).unwrap(),
            Constant::Binary(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_decode_null_datum_yields_typed_null() {
        for primitive in [
            PrimitiveType::Int,
            PrimitiveType::Text,
            PrimitiveType::Binary,
            PrimitiveType::Null,
        ] {
            let constant = Constant::decode(primitive, &RawDatum::Null).unwrap();
            assert_eq!(constant, Constant::Null(primitive));
            assert!(constant.is_null());
            assert_eq!(constant.primitive(), primitive);
        }
    }

    #[test]
    fn test_decode_shape_mismatch_is_an_error() {
        let err = Constant::decode(PrimitiveType::Int, &RawDatum::Text("5".into())).unwrap_err();
        assert_eq!(err.expected, PrimitiveType::Int);
        assert_eq!(err.datum, "text");
        assert!(err.to_string().contains("INT"), "message: {err}");

        assert!(Constant::decode(PrimitiveType::Real, &RawDatum::Integer(1)).is_err());
        assert!(Constant::decode(PrimitiveType::Binary, &RawDatum::Text("x".into())).is_err());
        // A non-null datum announced as the null type has no valid decoding.
        assert!(Constant::decode(PrimitiveType::Null, &RawDatum::Integer(1)).is_err());
    }

    #[test]
    fn test_constant_primitive_tags() {
        assert_eq!(Constant::Int(1).primitive(), PrimitiveType::Int);
        assert_eq!(Constant::Real(1.0).primitive(), PrimitiveType::Real);
        assert_eq!(Constant::Text("".into()).primitive(), PrimitiveType::Text);
        assert_eq!(
            Constant::Datetime("".into()).primitive(),
            PrimitiveType::Datetime
        );
        assert_eq!(Constant::Binary(vec![]).primitive(), PrimitiveType::Binary);
        assert_eq!(Constant::None("".into()).primitive(), PrimitiveType::None);
        assert_eq!(
            Constant::Null(PrimitiveType::Real).primitive(),
            PrimitiveType::Real
        );
    }

    #[test]
    fn test_constant_display() {
        assert_eq!(Constant::Int(-7).to_string(), "-7");
        assert_eq!(Constant::Text("a\"b".into()).to_string(), "\"a\\\"b\"");
        assert_eq!(Constant::Binary(vec![0x0a, 0xf3]).to_string(), "x'0af3'");
        assert_eq!(Constant::Null(PrimitiveType::Int).to_string(), "NULL");
    }

    #[test]
    fn test_constant_serializes_with_type_tag() {
        let int = serde_json::to_value(Constant::Int(5)).unwrap();
        assert_eq!(int, serde_json::json!({ "int": 5 }));
        let null = serde_json::to_value(Constant::Null(PrimitiveType::Int)).unwrap();
        assert_eq!(null, serde_json::json!({ "null": "int" }));
    }

    fn two_column_table() -> Table {
        let id = TableId(0);
        Table::new(
            id,
            "t",
            vec![
                Column::new("id", PrimitiveType::Int, true, true, id),
                Column::new("name", PrimitiveType::Text, false, false, id),
            ],
        )
    }

    #[test]
    fn test_row_value_display_follows_column_order() {
        let table = two_column_table();
        let mut values = HashMap::new();
        values.insert(table.columns()[1].clone(), Constant::Text("a".into()));
        values.insert(table.columns()[0].clone(), Constant::Int(5));
        let row = RowValue::new(&table, values);
        assert_eq!(row.to_string(), "5, \"a\"");
    }

    #[test]
    fn test_row_value_ordered_pairs() {
        let table = two_column_table();
        let mut values = HashMap::new();
        values.insert(table.columns()[1].clone(), Constant::Text("a".into()));
        values.insert(table.columns()[0].clone(), Constant::Int(5));
        let row = RowValue::new(&table, values);

        let text = Constant::Text("a".into());
        let int = Constant::Int(5);
        assert_eq!(row.ordered_pairs(), [("id", &int), ("name", &text)]);
    }

    #[test]
    fn test_row_value_lookup_ignores_flags_and_owner() {
        let table = two_column_table();
        let mut values = HashMap::new();
        values.insert(table.columns()[0].clone(), Constant::Int(5));
        let row = RowValue::new(&table, values);

        // Same name and type, different flags and owner: still the same key.
        let probe = Column::new("id", PrimitiveType::Int, false, false, TableId(9));
        assert_eq!(row.get(&probe), Some(&Constant::Int(5)));

        let miss = Column::new("id", PrimitiveType::Text, false, false, TableId(0));
        assert_eq!(row.get(&miss), None);
    }
}
