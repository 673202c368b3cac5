//! Project manifest loading.
//!
//! Each project is described by a `<projects_dir>/<project_id>.json` manifest
//! written by the detection pipeline. This service only ever reads manifests;
//! their lifecycle is owned by the producer. Field access mirrors that
//! contract: missing keys fall back to defaults, unknown keys are preserved
//! in the raw JSON value returned to API clients.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;

/// Summary of one project as shown in the project listing.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub display_name: String,
    pub status: String,
    pub video_path: String,
    pub db_path: String,
    pub total_frames: u64,
    pub processed_frames: u64,
    pub progress: f64,
}

impl ProjectSummary {
    /// Extract the summary fields from a raw manifest value.
    ///
    /// Missing or wrongly-typed fields fall back to defaults rather than
    /// failing; a half-written manifest still lists with `status: unknown`.
    pub fn from_manifest(id: &str, manifest: &Value) -> Self {
        Self {
            id: id.to_string(),
            display_name: id.to_string(),
            status: manifest
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            video_path: pointer_str(manifest, "/paths/vid_path"),
            db_path: pointer_str(manifest, "/paths/db_path"),
            total_frames: manifest
                .get("total_frames")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            processed_frames: manifest
                .get("processed_frames")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            progress: manifest
                .get("progress")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
        }
    }
}

fn pointer_str(manifest: &Value, pointer: &str) -> String {
    manifest
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

/// Check that a project id is a plain file stem.
///
/// Ids come straight from request bodies and are joined onto the projects
/// directory, so anything that could escape it is rejected.
pub fn validate_project_id(project_id: &str) -> Result<(), CoreError> {
    if project_id.is_empty() {
        return Err(CoreError::Validation("project_id must not be empty".into()));
    }
    if project_id.contains(['/', '\\']) || project_id.contains("..") {
        return Err(CoreError::Validation(format!(
            "invalid project_id '{project_id}'"
        )));
    }
    Ok(())
}

/// Path of the manifest file for a project id.
pub fn manifest_path(projects_dir: &Path, project_id: &str) -> PathBuf {
    projects_dir.join(format!("{project_id}.json"))
}

/// Load and parse the manifest for a project.
///
/// A missing file maps to [`CoreError::NotFound`]; an unreadable or
/// unparseable file maps to [`CoreError::Internal`].
pub async fn load_manifest(projects_dir: &Path, project_id: &str) -> Result<Value, CoreError> {
    validate_project_id(project_id)?;
    let path = manifest_path(projects_dir, project_id);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(CoreError::not_found("project", project_id));
        }
        Err(err) => {
            return Err(CoreError::Internal(format!(
                "failed to read manifest {}: {err}",
                path.display()
            )));
        }
    };

    serde_json::from_slice(&bytes).map_err(|err| {
        CoreError::Internal(format!("invalid manifest {}: {err}", path.display()))
    })
}

/// The database file name registered in a manifest (`paths.db_path`).
///
/// An absent or empty value is a validation error: the project exists but has
/// no database to browse.
pub fn database_name(manifest: &Value) -> Result<String, CoreError> {
    let name = manifest
        .pointer("/paths/db_path")
        .and_then(Value::as_str)
        .unwrap_or("");
    if name.is_empty() {
        return Err(CoreError::Validation(
            "project has no registered database".into(),
        ));
    }
    Ok(name.to_string())
}

/// List project ids by scanning the projects directory for `*.json` files.
///
/// Returns ids sorted for a stable listing order. A missing directory is not
/// an error; it just yields an empty list (the producer may not have created
/// it yet).
pub async fn list_project_ids(projects_dir: &Path) -> Result<Vec<String>, CoreError> {
    let mut entries = match tokio::fs::read_dir(projects_dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(CoreError::Internal(format!(
                "failed to read projects directory {}: {err}",
                projects_dir.display()
            )));
        }
    };

    let mut ids = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|err| {
        CoreError::Internal(format!("failed to scan projects directory: {err}"))
    })? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            ids.push(stem.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_manifest() -> Value {
        json!({
            "status": "processing",
            "paths": { "vid_path": "match.mp4", "db_path": "match.db" },
            "total_frames": 1200,
            "processed_frames": 450,
            "progress": 37.5
        })
    }

    #[test]
    fn summary_extracts_all_fields() {
        let summary = ProjectSummary::from_manifest("match01", &sample_manifest());
        assert_eq!(summary.id, "match01");
        assert_eq!(summary.display_name, "match01");
        assert_eq!(summary.status, "processing");
        assert_eq!(summary.video_path, "match.mp4");
        assert_eq!(summary.db_path, "match.db");
        assert_eq!(summary.total_frames, 1200);
        assert_eq!(summary.processed_frames, 450);
        assert_eq!(summary.progress, 37.5);
    }

    #[test]
    fn summary_defaults_for_empty_manifest() {
        let summary = ProjectSummary::from_manifest("bare", &json!({}));
        assert_eq!(summary.status, "unknown");
        assert_eq!(summary.video_path, "");
        assert_eq!(summary.db_path, "");
        assert_eq!(summary.total_frames, 0);
        assert_eq!(summary.progress, 0.0);
    }

    #[test]
    fn database_name_rejects_missing_path() {
        assert!(matches!(
            database_name(&json!({})),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            database_name(&json!({"paths": {"db_path": ""}})),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(database_name(&sample_manifest()).unwrap(), "match.db");
    }

    #[test]
    fn project_id_validation_rejects_traversal() {
        assert!(validate_project_id("proj1").is_ok());
        assert!(validate_project_id("").is_err());
        assert!(validate_project_id("../etc/passwd").is_err());
        assert!(validate_project_id("a/b").is_err());
        assert!(validate_project_id("a\\b").is_err());
    }

    #[tokio::test]
    async fn load_manifest_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(dir.path(), "ghost").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn load_manifest_roundtrips_raw_json() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = sample_manifest();
        std::fs::write(
            dir.path().join("match01.json"),
            serde_json::to_vec(&manifest).unwrap(),
        )
        .unwrap();

        let loaded = load_manifest(dir.path(), "match01").await.unwrap();
        assert_eq!(loaded, manifest);
    }

    #[tokio::test]
    async fn load_manifest_invalid_json_is_internal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), b"{not json").unwrap();
        let err = load_manifest(dir.path(), "broken").await.unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }

    #[tokio::test]
    async fn list_project_ids_skips_non_json_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("a.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let ids = list_project_ids(dir.path()).await.unwrap();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn list_project_ids_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let ids = list_project_ids(&missing).await.unwrap();
        assert!(ids.is_empty());
    }
}
