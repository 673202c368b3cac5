//! Catalog queries: table listing and column introspection.
//!
//! Table and column names are user input that ends up interpolated into SQL
//! text, so everything here goes through parameterized catalog lookups
//! (`sqlite_master` and the `pragma_table_info` table-valued function) before
//! any name is used unparameterized.

use sqlx::SqliteConnection;

/// One column of a table, as reported by `pragma_table_info`.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type from the table definition, e.g. `INTEGER` or `TEXT`.
    /// May be empty for untyped columns.
    pub decl_type: String,
}

impl ColumnInfo {
    /// Whether the declared type has numeric affinity per SQLite's rules
    /// (INTEGER, REAL, or NUMERIC affinity).
    ///
    /// The cascade mirrors the affinity determination order in the SQLite
    /// documentation: INT wins, then text types, then BLOB/untyped, then
    /// REAL, with NUMERIC as the catch-all.
    pub fn has_numeric_affinity(&self) -> bool {
        let decl = self.decl_type.to_ascii_uppercase();
        if decl.contains("INT") {
            return true;
        }
        if decl.contains("CHAR") || decl.contains("CLOB") || decl.contains("TEXT") {
            return false;
        }
        if decl.is_empty() || decl.contains("BLOB") {
            return false;
        }
        // REAL, FLOA, DOUB, and the NUMERIC catch-all (DECIMAL, NUM, ...).
        true
    }
}

/// List the names of all tables in the database.
pub async fn list_tables(conn: &mut SqliteConnection) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
        .fetch_all(conn)
        .await
}

/// Check whether a table exists, via a parameterized catalog lookup.
pub async fn table_exists(
    conn: &mut SqliteConnection,
    table: &str,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_optional(conn)
            .await?;
    Ok(found.is_some())
}

/// List the columns of a table in declaration order.
///
/// Callers must have confirmed the table exists via [`table_exists`]; an
/// unknown name simply yields an empty list here.
pub async fn list_columns(
    conn: &mut SqliteConnection,
    table: &str,
) -> Result<Vec<ColumnInfo>, sqlx::Error> {
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT name, type FROM pragma_table_info(?)")
            .bind(table)
            .fetch_all(conn)
            .await?;
    Ok(rows
        .into_iter()
        .map(|(name, decl_type)| ColumnInfo { name, decl_type })
        .collect())
}
