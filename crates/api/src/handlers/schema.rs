//! Handlers for table and column introspection.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::{open_project_database, require_table};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GetTablesRequest {
    pub project_id: String,
}

/// POST /get_tables
pub async fn get_tables(
    State(state): State<AppState>,
    Json(request): Json<GetTablesRequest>,
) -> AppResult<Json<Vec<String>>> {
    let mut conn = open_project_database(&state, &request.project_id).await?;
    let tables = framescope_db::schema::list_tables(&mut conn).await?;
    Ok(Json(tables))
}

#[derive(Debug, Deserialize)]
pub struct GetColumnsRequest {
    pub project_id: String,
    pub table_name: String,
}

/// POST /get_columns
pub async fn get_columns(
    State(state): State<AppState>,
    Json(request): Json<GetColumnsRequest>,
) -> AppResult<Json<Vec<String>>> {
    let mut conn = open_project_database(&state, &request.project_id).await?;
    require_table(&mut conn, &request.table_name).await?;

    let columns = framescope_db::schema::list_columns(&mut conn, &request.table_name).await?;
    Ok(Json(columns.into_iter().map(|c| c.name).collect()))
}
