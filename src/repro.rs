//! Reproduction records for sampled rows.
//!
//! Randomized testing is only useful when a failing run can be replayed.
//! [`ReproState`] is the mutable record the sampler writes its observations
//! into: the exact query text, the decoded row, and a capture timestamp.
//! Recording is the sampler's only side effect; everything else it returns by
//! value.

use crate::values::{Constant, RowValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One decoded cell of a recorded row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedCell {
    /// Column name
    pub column: String,
    /// Decoded value
    pub value: Constant,
}

/// One random-row observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedRow {
    /// Table the row was sampled from
    pub table: String,
    /// Exact SQL text of the sampling statement
    pub query: String,
    /// Decoded cells in column declaration order
    pub cells: Vec<RecordedCell>,
    /// When the observation was captured
    pub recorded_at: DateTime<Utc>,
}

/// Record of what the tool last observed in the database.
///
/// The format is self-describing JSON so a record can be attached to a bug
/// report as-is.
///
/// # File Format
///
/// ```json
/// {
///     "last_row": {
///         "table": "t",
///         "query": "SELECT \"id\", \"name\" FROM \"t\" ORDER BY RANDOM() LIMIT 1",
///         "cells": [
///             { "column": "id", "value": { "int": 5 } },
///             { "column": "name", "value": { "text": "a" } }
///         ],
///         "recorded_at": "2024-01-01T00:00:00Z"
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReproState {
    /// The most recent sampled row, if any
    pub last_row: Option<RecordedRow>,
}

impl ReproState {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sampled row and the statement that produced it, replacing any
    /// previous observation.
    pub fn record(&mut self, query: &str, row: &RowValue<'_>) {
        let cells = row
            .ordered_pairs()
            .into_iter()
            .map(|(column, value)| RecordedCell {
                column: column.to_owned(),
                value: value.clone(),
            })
            .collect();
        self.last_row = Some(RecordedRow {
            table: row.table().name().to_owned(),
            query: query.to_owned(),
            cells,
            recorded_at: Utc::now(),
        });
    }

    /// The most recent observation.
    pub fn last_row(&self) -> Option<&RecordedRow> {
        self.last_row.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, Table, TableId};
    use crate::types::PrimitiveType;
    use std::collections::HashMap;

    fn one_column_table(name: &str) -> Table {
        let id = TableId(0);
        Table::new(
            id,
            name,
            vec![Column::new("x", PrimitiveType::Int, false, false, id)],
        )
    }

    fn row_with<'a>(table: &'a Table, value: Constant) -> RowValue<'a> {
        let mut values = HashMap::new();
        values.insert(table.columns()[0].clone(), value);
        RowValue::new(table, values)
    }

    #[test]
    fn test_record_replaces_previous_observation() {
        let first = one_column_table("first");
        let second = one_column_table("second");
        let mut state = ReproState::new();

        state.record("SELECT 1", &row_with(&first, Constant::Int(1)));
        state.record("SELECT 2", &row_with(&second, Constant::Int(2)));

        let recorded = state.last_row().unwrap();
        assert_eq!(recorded.table, "second");
        assert_eq!(recorded.query, "SELECT 2");
        assert_eq!(recorded.cells.len(), 1);
        assert_eq!(recorded.cells[0].value, Constant::Int(2));
    }

    #[test]
    fn test_state_serializes_to_self_describing_json() {
        let table = one_column_table("t");
        let mut state = ReproState::new();
        state.record("SELECT \"x\" FROM \"t\"", &row_with(&table, Constant::Int(5)));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["last_row"]["table"], "t");
        assert_eq!(json["last_row"]["query"], "SELECT \"x\" FROM \"t\"");
        assert_eq!(json["last_row"]["cells"][0]["column"], "x");
        assert_eq!(json["last_row"]["cells"][0]["value"], serde_json::json!({ "int": 5 }));
        assert!(json["last_row"]["recorded_at"].is_string());
    }

    #[test]
    fn test_empty_state_serializes_without_observation() {
        let json = serde_json::to_value(ReproState::new()).unwrap();
        assert!(json["last_row"].is_null());
    }
}
