//! Handler for per-column statistics.

use axum::extract::State;
use axum::Json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use framescope_core::error::CoreError;

use crate::error::AppResult;
use crate::handlers::{open_project_database, require_table};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GetStatsRequest {
    pub project_id: String,
    pub table_name: String,
    pub stat_column: String,
}

#[derive(Serialize)]
pub struct GetStatsResponse {
    pub value_counts: IndexMap<String, i64>,
    /// Present only for columns with numeric affinity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<Value>,
}

/// POST /get_stats
pub async fn get_stats(
    State(state): State<AppState>,
    Json(request): Json<GetStatsRequest>,
) -> AppResult<Json<GetStatsResponse>> {
    let mut conn = open_project_database(&state, &request.project_id).await?;
    require_table(&mut conn, &request.table_name).await?;

    let columns = framescope_db::schema::list_columns(&mut conn, &request.table_name).await?;
    let Some(column) = columns.iter().find(|c| c.name == request.stat_column) else {
        return Err(CoreError::Validation(format!(
            "unknown stat_column '{}'",
            request.stat_column
        ))
        .into());
    };

    let stats = framescope_db::stats::column_stats(
        &mut conn,
        &request.table_name,
        &request.stat_column,
        column.has_numeric_affinity(),
    )
    .await?;

    let (min, max, avg) = match stats.numeric {
        Some(numeric) => (Some(numeric.min), Some(numeric.max), Some(numeric.avg)),
        None => (None, None, None),
    };

    Ok(Json(GetStatsResponse {
        value_counts: stats.value_counts,
        min,
        max,
        avg,
    }))
}
