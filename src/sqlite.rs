//! SQLite implementations of the database-facing traits.
//!
//! [`SqliteSource`] reads the catalog from `sqlite_master` and
//! `pragma_table_info`, and fetches rows, over a borrowed
//! [`rusqlite::Connection`]. [`SqliteRandomRow`] renders the
//! `ORDER BY RANDOM() LIMIT 1` sampling statement.

use crate::schema::Table;
use crate::source::{
    CatalogSource, ColumnEntry, RandomRowQuery, RawCell, RawDatum, RawRow, RowSource, TableEntry,
    TableKind,
};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};

/// Catalog and row access over a live SQLite connection.
pub struct SqliteSource<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteSource<'c> {
    /// Wrap an open connection.
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

/// Classify a `sqlite_master` entry by its `type` column and name.
///
/// Names starting with `sqlite_` are reserved by the engine.
fn classify(name: &str, kind: &str) -> TableKind {
    let system = name.starts_with("sqlite_");
    match kind {
        "view" if system => TableKind::SystemView,
        "view" => TableKind::View,
        _ if system => TableKind::SystemTable,
        _ => TableKind::BaseTable,
    }
}

/// Map one fetched value to its runtime type name and datum.
///
/// Type names use SQLite's `typeof()` vocabulary: `integer`, `real`, `text`,
/// `blob`, `null`.
fn cell_from_value(value: ValueRef<'_>) -> RawCell {
    let (type_name, datum) = match value {
        ValueRef::Null => ("null", RawDatum::Null),
        ValueRef::Integer(i) => ("integer", RawDatum::Integer(i)),
        ValueRef::Real(r) => ("real", RawDatum::Real(r)),
        ValueRef::Text(t) => (
            "text",
            RawDatum::Text(String::from_utf8_lossy(t).to_string()),
        ),
        ValueRef::Blob(b) => ("blob", RawDatum::Blob(b.to_vec())),
    };
    RawCell {
        type_name: type_name.to_owned(),
        datum,
    }
}

impl CatalogSource for SqliteSource<'_> {
    fn tables(&mut self) -> anyhow::Result<Vec<TableEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, type FROM sqlite_master WHERE type IN ('table', 'view')")?;
        let entries = stmt
            .query_map([], |row| {
                let name: String = row.get(0)?;
                let kind: String = row.get(1)?;
                Ok(TableEntry {
                    kind: classify(&name, &kind),
                    name,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn columns(&mut self, table: &str) -> anyhow::Result<Vec<ColumnEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")?;
        let columns = stmt
            .query_map(params![table], |row| {
                Ok(ColumnEntry {
                    name: row.get(0)?,
                    declared_type: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    fn primary_keys(&mut self, table: &str) -> anyhow::Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY pk")?;
        let keys = stmt
            .query_map(params![table], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

impl RowSource for SqliteSource<'_> {
    fn fetch_rows(&mut self, sql: &str) -> anyhow::Result<Vec<RawRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        let width = stmt.column_count();
        let mut rows = stmt.query([])?;
        let mut fetched = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(cell_from_value(row.get_ref(i)?));
            }
            fetched.push(cells);
        }
        Ok(fetched)
    }
}

/// Double-quote an identifier for embedding in SQLite SQL text.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Renders `SELECT <columns> FROM <table> ORDER BY RANDOM() LIMIT 1`.
///
/// Columns are projected explicitly, in declaration order, so fetched cells
/// line up positionally with the reflected columns regardless of what `*`
/// would expand to.
pub struct SqliteRandomRow;

impl RandomRowQuery for SqliteRandomRow {
    fn random_row_query(&self, table: &Table) -> String {
        let projection = table
            .column_names()
            .into_iter()
            .map(quote_ident)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "SELECT {} FROM {} ORDER BY RANDOM() LIMIT 1",
            projection,
            quote_ident(table.name())
        )
    }
}
