//! Handlers for project discovery and manifest access.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use framescope_core::manifest::{self, ProjectSummary};

use crate::error::AppResult;
use crate::state::AppState;

/// A project whose manifest could not be read during the listing scan.
#[derive(Debug, Serialize)]
pub struct SkippedProject {
    pub id: String,
    pub error: String,
}

#[derive(Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectSummary>,
    /// Manifests that failed to load. The listing degrades per-project
    /// instead of failing as a whole; failures are reported here rather
    /// than silently dropped.
    pub skipped: Vec<SkippedProject>,
}

/// GET /
///
/// Scan the projects directory for `*.json` manifests and summarize each.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ProjectListResponse>> {
    let ids = manifest::list_project_ids(&state.config.projects_dir).await?;

    let mut projects = Vec::with_capacity(ids.len());
    let mut skipped = Vec::new();
    for id in ids {
        match manifest::load_manifest(&state.config.projects_dir, &id).await {
            Ok(value) => projects.push(ProjectSummary::from_manifest(&id, &value)),
            Err(err) => {
                tracing::warn!(project_id = %id, error = %err, "Skipping unreadable manifest");
                skipped.push(SkippedProject {
                    id,
                    error: err.to_string(),
                });
            }
        }
    }

    Ok(Json(ProjectListResponse { projects, skipped }))
}

#[derive(Debug, Deserialize)]
pub struct ProjectInfoRequest {
    pub project_id: String,
}

/// POST /get_project_info
///
/// Returns the manifest exactly as parsed, unknown fields included.
pub async fn project_info(
    State(state): State<AppState>,
    Json(request): Json<ProjectInfoRequest>,
) -> AppResult<Json<Value>> {
    let manifest =
        manifest::load_manifest(&state.config.projects_dir, &request.project_id).await?;
    Ok(Json(manifest))
}
