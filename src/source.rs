//! Database-facing traits for schema reflection and row sampling.
//!
//! The schema builder and the row sampler never talk to a driver directly.
//! They consume three narrow traits — [`CatalogSource`] for catalog
//! enumeration, [`RowSource`] for executing a query and returning raw cells,
//! and [`RandomRowQuery`] for rendering the single-random-row statement — so
//! the core logic stays engine-neutral and unit-testable with in-memory fakes.
//! The SQLite implementations live in [`crate::sqlite`].

use crate::schema::Table;

/// Classification of a catalog entry.
///
/// Only [`TableKind::BaseTable`] entries are reflected into the schema model;
/// views cannot be sampled meaningfully for mutation-based testing, and system
/// tables belong to the engine, not to the database under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Ordinary user table
    BaseTable,

    /// User-defined view
    View,

    /// Engine-internal table (e.g. names reserved by the engine)
    SystemTable,

    /// Engine-internal view
    SystemView,
}

impl TableKind {
    /// Whether entries of this kind participate in reflection.
    pub fn is_base(&self) -> bool {
        matches!(self, TableKind::BaseTable)
    }
}

/// One table-like entry from the catalog.
#[derive(Debug, Clone)]
pub struct TableEntry {
    /// Table or view name
    pub name: String,

    /// Classification of the entry
    pub kind: TableKind,
}

/// One column description from the catalog.
#[derive(Debug, Clone)]
pub struct ColumnEntry {
    /// Column name
    pub name: String,

    /// Declared type spelling, exactly as stored in the catalog.
    ///
    /// The empty string means the column was declared without a type.
    pub declared_type: String,
}

/// A raw value fetched from the database, before decoding.
///
/// Carries the engine's storage representation without committing to a
/// primitive type yet; decoding happens in the sampler against the runtime
/// type name in [`RawCell`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawDatum {
    /// Integer storage class
    Integer(i64),

    /// Floating-point storage class
    Real(f64),

    /// Text storage class
    Text(String),

    /// Blob storage class
    Blob(Vec<u8>),

    /// SQL NULL
    Null,
}

impl RawDatum {
    /// Whether this datum is the SQL NULL marker.
    pub fn is_null(&self) -> bool {
        matches!(self, RawDatum::Null)
    }

    /// Short name of the datum's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RawDatum::Integer(_) => "integer",
            RawDatum::Real(_) => "real",
            RawDatum::Text(_) => "text",
            RawDatum::Blob(_) => "blob",
            RawDatum::Null => "null",
        }
    }
}

/// One cell of a fetched row: the value plus the runtime type name the engine
/// reports for that specific value.
///
/// The type name describes the *value*, not the column it came from. With
/// flexible typing the two routinely disagree, and decoding trusts the value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCell {
    /// Runtime type name for this value (e.g. `"integer"`, `"null"`)
    pub type_name: String,

    /// The value itself
    pub datum: RawDatum,
}

/// A fetched row as a positional list of cells.
pub type RawRow = Vec<RawCell>;

/// Catalog access for schema reflection.
pub trait CatalogSource {
    /// Enumerate all table-like catalog entries in catalog order.
    fn tables(&mut self) -> anyhow::Result<Vec<TableEntry>>;

    /// Describe the columns of one table, in declaration order.
    fn columns(&mut self, table: &str) -> anyhow::Result<Vec<ColumnEntry>>;

    /// Names of the table's primary-key columns, in key order.
    ///
    /// Empty when the table has no declared primary key.
    fn primary_keys(&mut self, table: &str) -> anyhow::Result<Vec<String>>;
}

/// Query execution for row sampling.
pub trait RowSource {
    /// Execute `sql` and return every result row as raw cells.
    fn fetch_rows(&mut self, sql: &str) -> anyhow::Result<Vec<RawRow>>;
}

/// Renders the statement that fetches one uniformly random row.
pub trait RandomRowQuery {
    /// SQL text selecting the table's columns, in declaration order, from a
    /// single random row.
    fn random_row_query(&self, table: &Table) -> String;
}
