//! rowprobe Library
//!
//! A library for reflecting the schema of a live SQLite database into an
//! in-memory model and sampling uniformly random rows from it, decoded into
//! typed constants. It is the foundation layer for randomized SQL testing:
//! a query generator consumes the reflected [`Schema`], and a reducer
//! consumes the [`ReproState`] written during sampling.
//!
//! # Features
//!
//! - Schema reflection: base tables, columns, declared types, primary keys
//! - Rowid-alias detection: `INTEGER PRIMARY KEY` columns flagged per
//!   SQLite's exact-spelling rule
//! - Random-row sampling: one uniformly random row per call, every cell
//!   decoded against its *runtime* type, not the column's declared type
//! - Reproduction records: the exact query and decoded row of the last
//!   sample, serializable as JSON
//!
//! # Architecture
//!
//! ```text
//! rusqlite::Connection
//!        │
//!        ▼
//! ┌──────────────────┐   CatalogSource    ┌────────────────────┐
//! │  SqliteSource    │ ─────────────────► │  Schema::reflect   │
//! │                  │                    │  Schema / Table /  │
//! │                  │   RowSource        │  Column            │
//! │                  │ ──────────┐        └─────────┬──────────┘
//! └──────────────────┘           │                  │ random_table(rng)
//!                                ▼                  ▼
//!                        ┌────────────────────────────────┐
//!                        │       sample_random_row        │
//!                        │  RowValue { Column → Constant} │
//!                        │  + ReproState record           │
//!                        └────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use rowprobe::{sample_random_row, ReproState, Schema, SqliteRandomRow, SqliteSource};
//!
//! let conn = rusqlite::Connection::open_in_memory().unwrap();
//! conn.execute_batch(
//!     "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);
//!      INSERT INTO t VALUES (5, 'a');",
//! )
//! .unwrap();
//!
//! let mut source = SqliteSource::new(&conn);
//! let schema = Schema::reflect(&mut source).unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let table = schema.random_table(&mut rng).unwrap();
//!
//! let mut state = ReproState::new();
//! let row = sample_random_row(table, &mut source, &SqliteRandomRow, &mut state).unwrap();
//! assert_eq!(row.to_string(), "5, \"a\"");
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the reflected schema
//! rowprobe schema --database test.db
//!
//! # Sample one random row from a random table, keeping a reproduction record
//! rowprobe sample --database test.db --seed 42 --repro repro.json
//! ```

pub mod repro;
pub mod sampler;
pub mod schema;
pub mod source;
pub mod sqlite;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use repro::{RecordedCell, RecordedRow, ReproState};
pub use sampler::{sample_random_row, SampleError};
pub use schema::{Column, Schema, SchemaError, Table, TableId};
pub use source::{
    CatalogSource, ColumnEntry, RandomRowQuery, RawCell, RawDatum, RawRow, RowSource, TableEntry,
    TableKind,
};
pub use sqlite::{SqliteRandomRow, SqliteSource};
pub use types::{PrimitiveType, UnknownTypeError};
pub use values::{Constant, DecodeError, RowValue};
