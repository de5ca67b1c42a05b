//! Warehouse database backed by SQLite.
//!
//! Owns the connection, creates the schema on open, and provides a
//! generic bulk append used to land provider data in a named table.

pub mod schema;

use anyhow::{anyhow, Context, Result};
use rusqlite::types::Value;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Handle to the warehouse database.
///
/// # Thread Safety
/// - Connection is wrapped in Mutex for safe concurrent access
/// - SQLite itself is thread-safe with serialized mode
pub struct Warehouse {
    conn: Mutex<Connection>,
}

impl Warehouse {
    /// Creates or opens the warehouse at `db_path`, creating any missing
    /// tables.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path).context("Failed to open database")?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory warehouse (used by tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        schema::create_all(&conn).context("Failed to create warehouse schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquires the underlying connection for the duration of one operation.
    pub(crate) fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    /// Appends rows to a named warehouse table.
    ///
    /// All rows are inserted inside a single transaction: either every row
    /// lands or none do. The table must be part of the warehouse schema.
    ///
    /// # Arguments
    /// * `table` - Warehouse table name (e.g., "strava_summary")
    /// * `columns` - Column names matching each row's values
    /// * `rows` - Row values, one `Vec<Value>` per row
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows inserted
    /// * `Err` - If the table is unknown, a row is malformed, or the insert fails
    pub fn append(&self, table: &str, columns: &[&str], rows: &[Vec<Value>]) -> Result<usize> {
        if !schema::is_known_table(table) {
            return Err(anyhow!("Unknown warehouse table '{}'", table));
        }
        if columns.is_empty() {
            return Err(anyhow!("No columns given for append to '{}'", table));
        }

        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        );

        let mut conn = self.connection();
        let tx = conn.transaction().context("Failed to begin transaction")?;
        {
            let mut stmt = tx.prepare(&sql).context("Failed to prepare insert")?;
            for row in rows {
                if row.len() != columns.len() {
                    return Err(anyhow!(
                        "Row has {} values but {} columns were given",
                        row.len(),
                        columns.len()
                    ));
                }
                stmt.execute(rusqlite::params_from_iter(row.iter()))
                    .with_context(|| format!("Failed to insert into '{}'", table))?;
            }
        }
        tx.commit().context("Failed to commit append")?;

        debug!(table = %table, rows = rows.len(), "Appended rows to warehouse");
        Ok(rows.len())
    }
}
