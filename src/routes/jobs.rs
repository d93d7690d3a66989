use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app_state::AppState;
use crate::models::config::FieldValues;
use crate::models::job::{BuildView, JobView};
use crate::models::job_kind::JobKind;
use crate::routes::envelope::{ok, ApiError, Envelope};
use crate::services::schema::ResolvedForm;
use crate::services::submission::{self, SubmittedJob};

#[derive(Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobView>,
}

#[derive(Serialize)]
pub struct BuildsResponse {
    pub builds: Vec<BuildView>,
}

#[derive(Serialize)]
pub struct ConfigResponse {
    pub form: ResolvedForm,
}

#[derive(Serialize)]
pub struct SubmittedResponse {
    pub job: SubmittedJob,
}

#[derive(Serialize)]
pub struct MessageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct BuildParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Kind named by the `type` key of a submitted body, if any.
fn submitted_kind(raw: &FieldValues) -> Option<JobKind> {
    raw.get("type")
        .and_then(Value::as_str)
        .filter(|kind| !kind.trim().is_empty())
        .map(JobKind::parse)
}

/// GET /api/jobs: Job list with kind descriptors and canonical status.
pub async fn list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Envelope<JobsResponse>>, ApiError> {
    let jobs = submission::list_jobs(&state.console).await?;
    Ok(ok(JobsResponse { jobs }))
}

/// GET /api/job/{name}/config: Current configuration as an editing form.
pub async fn get_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Envelope<ConfigResponse>>, ApiError> {
    let form = submission::fetch_resolved_config(&state.console, &name).await?;
    Ok(ok(ConfigResponse { form }))
}

/// GET /api/job/{name}/builds: Build history with canonical status per build.
pub async fn list_builds(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Envelope<BuildsResponse>>, ApiError> {
    let builds = submission::list_builds(&state.console, &name).await?;
    Ok(ok(BuildsResponse { builds }))
}

/// POST /api/jobs/create: Validate and create a job.
pub async fn create_job(
    State(state): State<AppState>,
    Json(raw): Json<FieldValues>,
) -> Result<Json<Envelope<SubmittedResponse>>, ApiError> {
    let kind = match submitted_kind(&raw) {
        Some(JobKind::Unknown) => {
            return Err(ApiError::unprocessable("Unsupported job type", "type"));
        }
        Some(kind) => kind,
        None => return Err(ApiError::unprocessable("Job type is required", "type")),
    };
    let job = submission::create_job(&state.console, kind, &raw).await?;
    Ok(ok(SubmittedResponse { job }))
}

/// POST /api/job/{name}/config/update: Validate and update a job.
pub async fn update_job(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(raw): Json<FieldValues>,
) -> Result<Json<Envelope<SubmittedResponse>>, ApiError> {
    let job = submission::update_job(&state.console, &name, submitted_kind(&raw), &raw).await?;
    Ok(ok(SubmittedResponse { job }))
}

/// POST /api/job/{name}/build: Trigger a build.
pub async fn trigger_build(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<BuildParams>,
) -> Result<Json<Envelope<MessageResponse>>, ApiError> {
    let kind = params.kind.as_deref().map(JobKind::parse);
    let message = submission::trigger_build(&state.console, &name, kind).await?;
    Ok(ok(MessageResponse { message }))
}

/// DELETE /api/jobs/{name}/delete
pub async fn delete_job(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Envelope<MessageResponse>>, ApiError> {
    let ack = state.console.delete_job(&name).await?;
    tracing::info!(job = %name, "Job deleted");
    Ok(ok(MessageResponse {
        message: ack.message,
    }))
}
