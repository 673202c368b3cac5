//! SQLite access for framescope.
//!
//! Databases are per-project files owned by the detection pipeline; this
//! crate only ever opens them read-only, one short-lived connection per
//! request. Identifier validation lives in [`schema`]; the browse and stats
//! modules interpolate only identifiers that have already been confirmed
//! against the catalog, and bind every value.

use std::path::Path;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};

pub mod browse;
pub mod schema;
pub mod stats;

/// Open a read-only connection to a database file under `db_dir`.
///
/// The connection is scoped to one request; dropping it closes it on every
/// exit path. A missing file is an open error (this service never creates
/// databases).
pub async fn open_database(
    db_dir: &Path,
    db_name: &str,
) -> Result<SqliteConnection, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_dir.join(db_name))
        .read_only(true)
        .create_if_missing(false);
    SqliteConnection::connect_with(&options).await
}
