//! Paginated, filterable row queries.
//!
//! SQL text is assembled from three kinds of fragments: identifiers that the
//! caller has validated against the catalog (interpolated, quoted), operator
//! and order keywords from the core allow-lists, and `?` placeholders for
//! every value. Request text never becomes SQL syntax.

use indexmap::IndexMap;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqliteConnection, TypeInfo, ValueRef};

use framescope_core::browse::{quote_ident, SearchOperator, SortOrder};

/// A validated filter: `column` is known to exist in the target table.
#[derive(Debug, Clone)]
pub struct Filter {
    pub column: String,
    pub operator: SearchOperator,
    pub value: String,
}

impl Filter {
    /// The value bound for this filter (`LIKE` gets `%` wildcards).
    fn bind_value(&self) -> String {
        self.operator.bind_value(&self.value)
    }
}

/// A validated sort: `column` is known to exist in the target table.
#[derive(Debug, Clone)]
pub struct Sort {
    pub column: String,
    pub order: SortOrder,
}

/// One page worth of browse parameters. `limit`/`offset` are validated by
/// the caller via `framescope_core::browse::validate_window`.
#[derive(Debug, Clone)]
pub struct BrowseQuery {
    pub filter: Option<Filter>,
    pub sort: Option<Sort>,
    pub limit: i64,
    pub offset: i64,
}

/// One page of rows plus the total count over the same filter.
#[derive(Debug)]
pub struct Page {
    /// Column names from the result metadata, in declaration order.
    pub columns: Vec<String>,
    /// Rows as column-ordered name/value maps.
    pub rows: Vec<IndexMap<String, Value>>,
    pub total_records: i64,
}

fn build_select(table: &str, query: &BrowseQuery) -> String {
    let mut sql = format!("SELECT * FROM {}", quote_ident(table));
    if let Some(filter) = &query.filter {
        sql.push_str(&format!(
            " WHERE {} {} ?",
            quote_ident(&filter.column),
            filter.operator.as_sql()
        ));
    }
    if let Some(sort) = &query.sort {
        sql.push_str(&format!(
            " ORDER BY {} {}",
            quote_ident(&sort.column),
            sort.order.as_sql()
        ));
    }
    sql.push_str(" LIMIT ? OFFSET ?");
    sql
}

fn build_count(table: &str, filter: Option<&Filter>) -> String {
    let mut sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
    if let Some(filter) = filter {
        sql.push_str(&format!(
            " WHERE {} {} ?",
            quote_ident(&filter.column),
            filter.operator.as_sql()
        ));
    }
    sql
}

/// Fetch one page of rows from `table` together with the filtered total.
///
/// The caller must have confirmed `table` (and any filter/sort column)
/// against the catalog via [`crate::schema`].
pub async fn fetch_page(
    conn: &mut SqliteConnection,
    table: &str,
    query: &BrowseQuery,
) -> Result<Page, sqlx::Error> {
    let select_sql = build_select(table, query);
    tracing::debug!(sql = %select_sql, "browse query");

    let mut select = sqlx::query(&select_sql);
    if let Some(filter) = &query.filter {
        select = select.bind(filter.bind_value());
    }
    let rows = select
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&mut *conn)
        .await?;

    let count_sql = build_count(table, query.filter.as_ref());
    let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(filter) = &query.filter {
        count = count.bind(filter.bind_value());
    }
    let total_records = count.fetch_one(&mut *conn).await?;

    // Column names come from the result metadata; an empty page falls back
    // to the catalog so clients still get the header row.
    let columns = match rows.first() {
        Some(row) => row
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect(),
        None => crate::schema::list_columns(&mut *conn, table)
            .await?
            .into_iter()
            .map(|column| column.name)
            .collect(),
    };

    let rows = rows
        .iter()
        .map(row_to_object)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
        columns,
        rows,
        total_records,
    })
}

/// Decode a dynamically-typed SQLite value into JSON.
///
/// SQLite types values, not columns, so the stored datatype of each cell
/// drives the decode. BLOBs are rendered as lossy UTF-8 text (detection
/// databases store numbers and text; a raw blob is a degenerate case we
/// still want to display rather than fail on).
pub(crate) fn decode_value(row: &SqliteRow, idx: usize) -> Result<Value, sqlx::Error> {
    let (is_null, type_name) = {
        let raw = row.try_get_raw(idx)?;
        (raw.is_null(), raw.type_info().name().to_string())
    };
    if is_null {
        return Ok(Value::Null);
    }
    let value = match type_name.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(idx)?),
        "REAL" => serde_json::Number::from_f64(row.try_get::<f64, _>(idx)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BLOB" => {
            let bytes = row.try_get::<Vec<u8>, _>(idx)?;
            Value::from(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::from(row.try_get::<String, _>(idx)?),
    };
    Ok(value)
}

/// Decode a whole row into a column-ordered JSON object.
pub(crate) fn row_to_object(row: &SqliteRow) -> Result<IndexMap<String, Value>, sqlx::Error> {
    let mut object = IndexMap::with_capacity(row.len());
    for column in row.columns() {
        let idx = column.ordinal();
        object.insert(column.name().to_string(), decode_value(row, idx)?);
    }
    Ok(object)
}
