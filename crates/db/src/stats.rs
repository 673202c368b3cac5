//! Per-column statistics: value frequencies and numeric summaries.

use indexmap::IndexMap;
use serde_json::Value;
use sqlx::{Row, SqliteConnection};

use framescope_core::browse::quote_ident;

use crate::browse::decode_value;

/// Min/max/average over a column with numeric affinity.
#[derive(Debug)]
pub struct NumericSummary {
    pub min: Value,
    pub max: Value,
    pub avg: Value,
}

/// Statistics for one column.
#[derive(Debug)]
pub struct ColumnStats {
    /// Distinct values mapped to their row counts, most frequent first.
    /// Keys are stringified since JSON object keys must be strings.
    pub value_counts: IndexMap<String, i64>,
    /// Present only when the column's declared type has numeric affinity;
    /// aggregates over text would produce SQLite's garbage-in defaults
    /// (e.g. `AVG` of text is 0.0), so they are omitted instead.
    pub numeric: Option<NumericSummary>,
}

/// Compute statistics for `column` in `table`.
///
/// Both identifiers must have been confirmed against the catalog by the
/// caller; `include_numeric` is the caller's affinity decision (from
/// [`crate::schema::ColumnInfo::has_numeric_affinity`]).
pub async fn column_stats(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
    include_numeric: bool,
) -> Result<ColumnStats, sqlx::Error> {
    let col = quote_ident(column);
    let tbl = quote_ident(table);

    let counts_sql =
        format!("SELECT {col}, COUNT(*) FROM {tbl} GROUP BY {col} ORDER BY COUNT(*) DESC");
    tracing::debug!(sql = %counts_sql, "stats query");

    let rows = sqlx::query(&counts_sql).fetch_all(&mut *conn).await?;
    let mut value_counts = IndexMap::with_capacity(rows.len());
    for row in &rows {
        let key = match decode_value(row, 0)? {
            Value::String(s) => s,
            Value::Null => "null".to_string(),
            other => other.to_string(),
        };
        let count: i64 = row.try_get(1)?;
        value_counts.insert(key, count);
    }

    let numeric = if include_numeric {
        let summary_sql = format!("SELECT MIN({col}), MAX({col}), AVG({col}) FROM {tbl}");
        let row = sqlx::query(&summary_sql).fetch_one(&mut *conn).await?;
        Some(NumericSummary {
            min: decode_value(&row, 0)?,
            max: decode_value(&row, 1)?,
            avg: decode_value(&row, 2)?,
        })
    } else {
        None
    };

    Ok(ColumnStats {
        value_counts,
        numeric,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::create_database;
    use serde_json::json;

    async fn stats_conn(dir: &tempfile::TempDir) -> SqliteConnection {
        let path = dir.path().join("stats.db");
        create_database(
            &path,
            &[
                "CREATE TABLE events (id INTEGER PRIMARY KEY, label TEXT, score REAL)",
                "INSERT INTO events (id, label, score) VALUES (1, 'goal', 4.0)",
                "INSERT INTO events (id, label, score) VALUES (2, 'goal', 2.0)",
                "INSERT INTO events (id, label, score) VALUES (3, 'pass', 6.0)",
            ],
        )
        .await;
        crate::open_database(dir.path(), "stats.db").await.unwrap()
    }

    #[tokio::test]
    async fn value_counts_ordered_by_frequency() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = stats_conn(&dir).await;

        let stats = column_stats(&mut conn, "events", "label", false)
            .await
            .unwrap();
        let entries: Vec<(&str, i64)> = stats
            .value_counts
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(entries, vec![("goal", 2), ("pass", 1)]);
        assert!(stats.numeric.is_none());
    }

    #[tokio::test]
    async fn numeric_summary_for_numeric_column() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = stats_conn(&dir).await;

        let stats = column_stats(&mut conn, "events", "score", true)
            .await
            .unwrap();
        let numeric = stats.numeric.unwrap();
        assert_eq!(numeric.min, json!(2.0));
        assert_eq!(numeric.max, json!(6.0));
        assert_eq!(numeric.avg, json!(4.0));
    }

    #[tokio::test]
    async fn numeric_summary_of_empty_table_is_null() {
        let dir = tempfile::tempdir().unwrap();
        create_database(
            &dir.path().join("empty.db"),
            &["CREATE TABLE events (id INTEGER)"],
        )
        .await;
        let mut conn = crate::open_database(dir.path(), "empty.db").await.unwrap();

        let stats = column_stats(&mut conn, "events", "id", true).await.unwrap();
        assert!(stats.value_counts.is_empty());
        let numeric = stats.numeric.unwrap();
        assert_eq!(numeric.min, serde_json::Value::Null);
        assert_eq!(numeric.avg, serde_json::Value::Null);
    }

    #[tokio::test]
    async fn integer_keys_are_stringified() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = stats_conn(&dir).await;

        let stats = column_stats(&mut conn, "events", "id", true).await.unwrap();
        assert!(stats.value_counts.contains_key("1"));
        assert!(stats.value_counts.contains_key("3"));
    }
}
