//! Uniform random-row sampling.
//!
//! [`sample_random_row`] fetches one uniformly random row from a table and
//! decodes it into typed constants. The decisive detail: every cell is decoded
//! against the type the engine reports for that *value* at runtime, not the
//! column's declared type. With flexible typing the two routinely disagree,
//! and the sampled constants must describe what is actually stored.

use crate::repro::ReproState;
use crate::schema::Table;
use crate::source::{RandomRowQuery, RowSource};
use crate::types::{PrimitiveType, UnknownTypeError};
use crate::values::{Constant, DecodeError, RowValue};
use std::collections::HashMap;
use tracing::debug;

/// Error type for row sampling.
///
/// Only [`SampleError::EmptyTable`] is a property of the data under test;
/// every other variant means the tool's assumptions about the database were
/// violated and continuing would test the wrong thing.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// The table has no rows; callers typically pick another table
    #[error("Table '{table}' has no rows to sample")]
    EmptyTable { table: String },

    /// The single-random-row query returned more than one row
    #[error("Random-row query against '{table}' returned {rows} rows, expected exactly one")]
    RowCountViolation { table: String, rows: usize },

    /// The fetched row's width does not match the table's column count
    #[error("Random-row query against '{table}' returned {got} cells, expected {expected}")]
    WidthMismatch {
        table: String,
        expected: usize,
        got: usize,
    },

    /// A value's runtime type name was outside the recognized vocabulary
    #[error("Table '{table}' column '{column}': {source}")]
    UnknownRuntimeType {
        table: String,
        column: String,
        #[source]
        source: UnknownTypeError,
    },

    /// A value's shape did not match its announced runtime type
    #[error("Table '{table}' column '{column}': {source}")]
    Decode {
        table: String,
        column: String,
        #[source]
        source: DecodeError,
    },

    /// Error from the underlying row source
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

impl SampleError {
    /// Whether a caller can recover by sampling a different table.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SampleError::EmptyTable { .. })
    }
}

/// Fetch one uniformly random row from `table` and decode it.
///
/// Renders the statement via `query`, executes it via `rows`, and enforces
/// that exactly one row of the right width comes back. Each cell's type is
/// re-inferred from the runtime type name reported alongside the value, then
/// decoded into a [`Constant`] keyed by the declared column. On success the
/// query text and the decoded row are recorded into `state` so a failing run
/// can be reproduced later.
pub fn sample_random_row<'a>(
    table: &'a Table,
    rows: &mut impl RowSource,
    query: &impl RandomRowQuery,
    state: &mut ReproState,
) -> Result<RowValue<'a>, SampleError> {
    let sql = query.random_row_query(table);
    debug!("Sampling random row: {sql}");

    let fetched = rows.fetch_rows(&sql)?;
    let total = fetched.len();
    let row = match fetched.into_iter().next() {
        None => {
            return Err(SampleError::EmptyTable {
                table: table.name().to_owned(),
            })
        }
        Some(_) if total > 1 => {
            return Err(SampleError::RowCountViolation {
                table: table.name().to_owned(),
                rows: total,
            })
        }
        Some(row) => row,
    };

    if row.len() != table.columns().len() {
        return Err(SampleError::WidthMismatch {
            table: table.name().to_owned(),
            expected: table.columns().len(),
            got: row.len(),
        });
    }

    let mut values = HashMap::with_capacity(row.len());
    for (column, cell) in table.columns().iter().zip(&row) {
        let runtime = PrimitiveType::infer(&cell.type_name).map_err(|source| {
            SampleError::UnknownRuntimeType {
                table: table.name().to_owned(),
                column: column.name().to_owned(),
                source,
            }
        })?;
        let constant =
            Constant::decode(runtime, &cell.datum).map_err(|source| SampleError::Decode {
                table: table.name().to_owned(),
                column: column.name().to_owned(),
                source,
            })?;
        values.insert(column.clone(), constant);
    }

    let row_value = RowValue::new(table, values);
    state.record(&sql, &row_value);
    Ok(row_value)
}
