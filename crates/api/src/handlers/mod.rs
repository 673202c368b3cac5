//! Request handlers.
//!
//! Every browse endpoint follows the same shape: load the project's
//! manifest, open its database read-only, validate any identifiers against
//! the catalog, then query. The connection is dropped when the handler
//! returns, on success and error alike.

pub mod data;
pub mod health;
pub mod projects;
pub mod schema;
pub mod stats;

use sqlx::SqliteConnection;

use framescope_core::error::CoreError;
use framescope_core::manifest;

use crate::error::AppResult;
use crate::state::AppState;

/// Resolve a project id to an open read-only connection to its database.
pub(crate) async fn open_project_database(
    state: &AppState,
    project_id: &str,
) -> AppResult<SqliteConnection> {
    let manifest = manifest::load_manifest(&state.config.projects_dir, project_id).await?;
    let db_name = manifest::database_name(&manifest)?;
    let conn = framescope_db::open_database(&state.config.db_dir, &db_name).await?;
    Ok(conn)
}

/// Fail with 404 unless `table` exists in the connected database.
///
/// This runs before any query that interpolates the table name, so an
/// unknown name never reaches SQL text.
pub(crate) async fn require_table(conn: &mut SqliteConnection, table: &str) -> AppResult<()> {
    if framescope_db::schema::table_exists(conn, table).await? {
        Ok(())
    } else {
        Err(CoreError::not_found("table", table).into())
    }
}
