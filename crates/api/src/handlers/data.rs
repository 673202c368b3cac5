//! Handler for paginated, filterable row queries.

use axum::extract::State;
use axum::Json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use framescope_core::browse::{
    current_page, total_pages, validate_window, SearchOperator, SortOrder, DEFAULT_PAGE_LIMIT,
};
use framescope_core::error::CoreError;
use framescope_db::browse::{BrowseQuery, Filter, Sort};

use crate::error::AppResult;
use crate::handlers::{open_project_database, require_table};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GetDataRequest {
    pub project_id: String,
    pub table_name: String,
    pub search_column: Option<String>,
    pub search_text: Option<String>,
    /// Defaults to `=`. Must be one of `=, !=, <, >, <=, >=, LIKE`.
    pub search_operator: Option<String>,
    /// Rows per page, default 100. Must be positive.
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort_by: Option<String>,
    /// `ASC` (default) or `DESC`.
    pub sort_order: Option<String>,
}

#[derive(Serialize)]
pub struct GetDataResponse {
    pub columns: Vec<String>,
    pub data: Vec<IndexMap<String, Value>>,
    pub total_records: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

/// POST /get_data
pub async fn get_data(
    State(state): State<AppState>,
    Json(request): Json<GetDataRequest>,
) -> AppResult<Json<GetDataResponse>> {
    let limit = request.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = request.offset.unwrap_or(0);
    validate_window(limit, offset)?;

    let mut conn = open_project_database(&state, &request.project_id).await?;
    require_table(&mut conn, &request.table_name).await?;

    let valid_columns =
        framescope_db::schema::list_columns(&mut conn, &request.table_name).await?;
    let is_valid = |name: &str| valid_columns.iter().any(|c| c.name == name);

    // Any supplied column must be a member of the schema, whether or not it
    // ends up used: a filter column without search text is still rejected.
    let search_column = request.search_column.as_deref().filter(|s| !s.is_empty());
    if let Some(column) = search_column {
        if !is_valid(column) {
            return Err(CoreError::Validation(format!(
                "unknown search_column '{column}'"
            ))
            .into());
        }
    }
    let sort_by = request.sort_by.as_deref().filter(|s| !s.is_empty());
    if let Some(column) = sort_by {
        if !is_valid(column) {
            return Err(
                CoreError::Validation(format!("unknown sort_by column '{column}'")).into(),
            );
        }
    }

    // A filter needs both a column and non-empty text; a column alone is
    // treated as no filter, matching how the browse UI submits forms.
    let search_text = request.search_text.as_deref().filter(|t| !t.is_empty());
    let filter = match (search_column, search_text) {
        (Some(column), Some(text)) => {
            let operator = SearchOperator::parse(request.search_operator.as_deref().unwrap_or("="))?;
            Some(Filter {
                column: column.to_string(),
                operator,
                value: text.to_string(),
            })
        }
        _ => None,
    };

    let sort = match sort_by {
        Some(column) => {
            let order = match &request.sort_order {
                Some(raw) => SortOrder::parse(raw)?,
                None => SortOrder::default(),
            };
            Some(Sort {
                column: column.to_string(),
                order,
            })
        }
        None => None,
    };

    let query = BrowseQuery {
        filter,
        sort,
        limit,
        offset,
    };
    let page = framescope_db::browse::fetch_page(&mut conn, &request.table_name, &query).await?;

    Ok(Json(GetDataResponse {
        columns: page.columns,
        data: page.rows,
        total_records: page.total_records,
        current_page: current_page(offset, limit),
        total_pages: total_pages(page.total_records, limit),
    }))
}
