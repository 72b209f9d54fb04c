//! In-memory schema model and the reflection builder.
//!
//! This module defines the model a query generator works against —
//! [`Schema`], [`Table`], [`Column`] — and [`Schema::reflect`], which builds
//! it from a [`CatalogSource`]. Only base tables are reflected; views and
//! engine-internal tables are skipped.
//!
//! Two modeling choices matter to consumers:
//!
//! - A column points back at its owning table through a [`TableId`] index
//!   rather than a reference, keeping the model cycle-free and cheaply
//!   clonable.
//! - Column equality and hashing consider only the name and primitive type,
//!   so columns work as row-value map keys across independently constructed
//!   instances.

use crate::source::CatalogSource;
use crate::types::{self, PrimitiveType, UnknownTypeError};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::{debug, info};

/// Error type for schema reflection.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The catalog exposed nothing to test against
    #[error("Database exposes no base tables")]
    NoBaseTables,

    /// A column was declared with a type outside the recognized vocabulary
    #[error("Table '{table}' column '{column}': {source}")]
    UnknownColumnType {
        table: String,
        column: String,
        #[source]
        source: UnknownTypeError,
    },

    /// Error from the underlying catalog source
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

/// Index of a table within its owning [`Schema`].
///
/// Tables are stored in catalog order and never reordered after reflection,
/// so the index is a stable back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TableId(pub usize);

/// One reflected column.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    name: String,
    primitive: PrimitiveType,
    literal_integer: bool,
    primary_key: bool,
    table: TableId,
}

impl Column {
    /// Create a column.
    ///
    /// `literal_integer` records whether the declared type was spelled exactly
    /// `INTEGER`; such a column always carries [`PrimitiveType::Int`].
    pub fn new(
        name: impl Into<String>,
        primitive: PrimitiveType,
        literal_integer: bool,
        primary_key: bool,
        table: TableId,
    ) -> Self {
        debug_assert!(
            !literal_integer || primitive == PrimitiveType::Int,
            "a literally-INTEGER column must carry the INT type"
        );
        Self {
            name: name.into(),
            primitive,
            literal_integer,
            primary_key,
            table,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Primitive type inferred from the declared type.
    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    /// Whether the declared type was spelled exactly `INTEGER`.
    pub fn is_literal_integer(&self) -> bool {
        self.literal_integer
    }

    /// Whether this column is part of the table's primary key.
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Index of the owning table within the schema.
    pub fn table_id(&self) -> TableId {
        self.table
    }

    /// Whether this column is an alias for the table's rowid.
    ///
    /// True exactly when the column is the table's only primary-key column,
    /// its declared type was spelled literally `INTEGER`, and the table is a
    /// rowid table. Aliased columns mirror the rowid, which matters both for
    /// row identity and for predicting automatically assigned values.
    pub fn is_rowid_alias(&self, table: &Table) -> bool {
        self.primary_key
            && self.literal_integer
            && table.primary_key_count() == 1
            && !table.has_without_rowid()
    }
}

/// Columns are equal when their name and primitive type agree; key flags and
/// the owning table do not participate.
impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.primitive == other.primitive
    }
}

impl Eq for Column {}

impl Hash for Column {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.primitive.hash(state);
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.primitive)
    }
}

/// One reflected base table.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    id: TableId,
    name: String,
    columns: Vec<Column>,
}

impl Table {
    /// Create a table from its columns, which must all carry `id` as their
    /// owning table.
    pub fn new(id: TableId, name: impl Into<String>, columns: Vec<Column>) -> Self {
        debug_assert!(!columns.is_empty(), "a table has at least one column");
        debug_assert!(
            columns.iter().all(|c| c.table == id),
            "every column must point back at its owning table"
        );
        Self {
            id,
            name: name.into(),
            columns,
        }
    }

    /// Index of this table within the schema.
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Column names joined with `", "`, for projection lists.
    pub fn columns_as_string(&self) -> String {
        self.column_names().join(", ")
    }

    /// Number of primary-key columns.
    pub fn primary_key_count(&self) -> usize {
        self.columns.iter().filter(|c| c.primary_key).count()
    }

    /// Whether the table was created `WITHOUT ROWID`.
    pub fn has_without_rowid(&self) -> bool {
        // TODO: detect WITHOUT ROWID by inspecting the stored CREATE TABLE
        // text; until then every table is treated as a rowid table.
        false
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for column in &self.columns {
            writeln!(f, "\t{column}")?;
        }
        Ok(())
    }
}

/// The reflected schema of one database.
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    /// Assemble a schema from prebuilt tables.
    ///
    /// Each table's [`TableId`] must equal its position in `tables`;
    /// [`Schema::reflect`] maintains this, and synthetic schemas must too.
    pub fn new(tables: Vec<Table>) -> Self {
        debug_assert!(
            tables.iter().enumerate().all(|(i, t)| t.id == TableId(i)),
            "table ids must match their positions"
        );
        Self { tables }
    }

    /// Reflect the schema of a live database.
    ///
    /// Enumerates the catalog in order, keeps base tables only, and resolves
    /// every column's declared type through [`PrimitiveType::infer`]. Fails
    /// when a declared type is unrecognized or when no base table remains
    /// after filtering.
    pub fn reflect(catalog: &mut impl CatalogSource) -> Result<Schema, SchemaError> {
        let mut tables = Vec::new();
        for entry in catalog.tables()? {
            if !entry.kind.is_base() {
                debug!("Skipping {:?} ({:?})", entry.name, entry.kind);
                continue;
            }
            let id = TableId(tables.len());
            let primary_keys = catalog.primary_keys(&entry.name)?;
            let mut columns = Vec::new();
            for column in catalog.columns(&entry.name)? {
                let primitive = PrimitiveType::infer(&column.declared_type).map_err(|source| {
                    SchemaError::UnknownColumnType {
                        table: entry.name.clone(),
                        column: column.name.clone(),
                        source,
                    }
                })?;
                let literal_integer = types::is_literal_integer(&column.declared_type);
                let primary_key = primary_keys.iter().any(|pk| pk == &column.name);
                columns.push(Column::new(
                    column.name,
                    primitive,
                    literal_integer,
                    primary_key,
                    id,
                ));
            }
            debug!(
                "Reflected table {:?} with {} columns",
                entry.name,
                columns.len()
            );
            tables.push(Table::new(id, entry.name, columns));
        }
        if tables.is_empty() {
            return Err(SchemaError::NoBaseTables);
        }
        info!("Reflected {} base tables", tables.len());
        Ok(Schema::new(tables))
    }

    /// Tables in catalog order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Resolve a table id back to its table.
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0)
    }

    /// Look up a table by name.
    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Draw one table uniformly at random.
    ///
    /// `None` only for a schema without tables, which [`Schema::reflect`]
    /// never produces.
    pub fn random_table<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Table> {
        self.tables.choose(rng)
    }

    /// Whether `column` aliases the rowid of its owning table.
    ///
    /// Resolves the column's [`TableId`] against this schema; the column must
    /// come from this schema's tables.
    pub fn is_rowid_alias(&self, column: &Column) -> bool {
        match self.table(column.table_id()) {
            Some(table) => {
                debug_assert!(
                    table.columns.contains(column),
                    "column does not belong to this schema"
                );
                column.is_rowid_alias(table)
            }
            None => false,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for table in &self.tables {
            writeln!(f, "{table}")?;
        }
        Ok(())
    }
}
