//! SQLite storage for the CRM.
//!
//! A single database file holds the four entity tables. `CrmDb` owns the
//! connection; the web layer opens it once at startup and injects it into
//! every operation. Schema creation is idempotent and runs on every open.

use std::path::PathBuf;
use std::str::FromStr;

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use tracing::debug;

pub mod types;
pub use types::*;

mod activities;
mod companies;
mod contacts;
mod dashboard;
mod deals;

const SCHEMA: &str = include_str!("schema.sql");

/// The tables exposed to the generic select/insert path, in menu order.
pub const TABLES: [&str; 4] = ["companies", "contacts", "deals", "activities"];

/// Resolve a caller-supplied table name against the closed table set.
///
/// Everything on the generic path goes through here before a table name is
/// interpolated into SQL.
fn known_table(table: &str) -> Result<&'static str, DbError> {
    TABLES
        .iter()
        .find(|t| **t == table)
        .copied()
        .ok_or_else(|| DbError::UnknownTable(table.to_string()))
}

/// Map an enum column read from text onto its closed Rust type.
pub(crate) fn parse_enum_col<T: FromStr>(idx: usize, raw: String) -> Result<T, rusqlite::Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub struct CrmDb {
    conn: Connection,
}

impl CrmDb {
    /// Borrow the underlying connection for ad-hoc statements.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Open (or create) the database at the configured path.
    pub fn open() -> Result<Self, DbError> {
        Self::open_at(crate::config::db_path())
    }

    /// Open a database at an explicit path. Useful for testing.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self, DbError> {
        let path: PathBuf = path.into();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        // FK enforcement is per-connection in SQLite; without it the
        // ON DELETE SET NULL clauses are inert.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let db = Self { conn };
        db.ensure_schema()?;
        debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// Create the four entity tables if absent. Safe to invoke on every
    /// process start and from the settings page.
    pub fn ensure_schema(&self) -> Result<(), DbError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Execute a closure within a SQLite transaction.
    /// Commits on Ok, rolls back on Err.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Self) -> Result<T, DbError>,
    {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        match f(self) {
            Ok(val) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(val)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    /// Column names of a table, in declaration order.
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>, DbError> {
        let table = known_table(table)?;
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let rows = stmt.query_map(params![table], |row| row.get(0))?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    /// Check that every name in `columns` is a column of `table`.
    pub fn validate_columns(&self, table: &str, columns: &[String]) -> Result<(), DbError> {
        let table = known_table(table)?;
        let known = self.table_columns(table)?;
        for column in columns {
            if !known.iter().any(|c| c == column) {
                return Err(DbError::UnknownColumn {
                    table: table.to_string(),
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }

    /// Read an entire table: column names plus every row as raw SQL values.
    /// Bulk export path; the typed queries are preferred everywhere else.
    pub fn select_all(&self, table: &str) -> Result<(Vec<String>, Vec<Vec<Value>>), DbError> {
        let table = known_table(table)?;
        let mut stmt = self.conn.prepare(&format!("SELECT * FROM {table}"))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let ncols = columns.len();

        let mapped = stmt.query_map([], |row| {
            (0..ncols)
                .map(|i| row.get::<_, Value>(i))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut rows = Vec::new();
        for row in mapped {
            rows.push(row?);
        }
        Ok((columns, rows))
    }

    /// Insert one row with explicit columns and return the generated id.
    /// Bulk import path; identifiers are validated before interpolation,
    /// values are always bound as parameters.
    pub fn insert_row(
        &self,
        table: &str,
        columns: &[String],
        values: Vec<Value>,
    ) -> Result<i64, DbError> {
        let table = known_table(table)?;
        self.validate_columns(table, columns)?;

        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );
        self.conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(self.conn.last_insert_rowid())
    }
}

#[cfg(test)]
pub(crate) fn test_db() -> CrmDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("test_crm.db");
    // Leak the TempDir so it is not deleted while the DB connection is open.
    std::mem::forget(dir);
    CrmDb::open_at(path).expect("Failed to open test database")
}
