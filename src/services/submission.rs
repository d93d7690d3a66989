//! Job submission: local validation first, then the upstream call.
//!
//! Nothing reaches the console service unless the job name and the
//! transcoded payload are both valid.

use garde::Validate;
use serde::Serialize;
use serde_json::Value;

use crate::models::config::{ConfigPayload, FieldValues};
use crate::models::job::{BuildView, JobName, JobView};
use crate::models::job_kind::JobKind;
use crate::models::plugin::PluginReport;
use crate::services::console_client::{ConsoleClient, ConsoleError};
use crate::services::registry;
use crate::services::schema::{self, ResolvedForm};
use crate::services::status;
use crate::services::transcoder::{self, ValidationError};

/// Outcome of an accepted create or update.
#[derive(Debug, Clone, Serialize)]
pub struct SubmittedJob {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: JobKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Validate and create a new job.
pub async fn create_job(
    console: &ConsoleClient,
    kind: JobKind,
    raw: &FieldValues,
) -> Result<SubmittedJob, SubmissionError> {
    let payload = prepare("create", kind, raw)?;

    tracing::info!(job = %payload.name, kind = %kind, "Submitting job creation");
    let ack = console
        .create_job(&payload)
        .await
        .map_err(|e| upstream_failure("create", kind, e))?;
    record_submission("create", kind);

    Ok(SubmittedJob {
        name: payload.name,
        kind,
        message: ack.message,
    })
}

/// Validate and update the job currently named `current_name`.
///
/// The payload name defaults to `current_name`. When `kind` is not given it
/// is read from the job's current configuration upstream.
pub async fn update_job(
    console: &ConsoleClient,
    current_name: &str,
    kind: Option<JobKind>,
    raw: &FieldValues,
) -> Result<SubmittedJob, SubmissionError> {
    let kind = match kind {
        Some(kind) => kind,
        None => console.fetch_config(current_name).await?.job_type,
    };

    let mut raw = raw.clone();
    let has_name = raw
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.trim().is_empty());
    if !has_name {
        raw.insert("name".to_string(), Value::String(current_name.to_string()));
    }

    let payload = prepare("update", kind, &raw)?;

    tracing::info!(job = %current_name, new_name = %payload.name, kind = %kind, "Submitting job update");
    let ack = console
        .update_job(current_name, &payload)
        .await
        .map_err(|e| upstream_failure("update", kind, e))?;
    record_submission("update", kind);

    Ok(SubmittedJob {
        name: payload.name,
        kind,
        message: ack.message,
    })
}

/// Trigger a build. Known non-buildable kinds are refused locally; unknown
/// kinds are passed through and left to the console service to judge.
pub async fn trigger_build(
    console: &ConsoleClient,
    name: &str,
    kind: Option<JobKind>,
) -> Result<Option<String>, SubmissionError> {
    if let Some(kind) = kind {
        if kind != JobKind::Unknown && !registry::describe(kind).buildable {
            tracing::warn!(job = %name, kind = %kind, "Refusing build of non-buildable job");
            return Err(SubmissionError::NotBuildable(kind));
        }
    }

    let kind = kind.unwrap_or_default();
    let ack = console
        .trigger_build(name)
        .await
        .map_err(|e| upstream_failure("build", kind, e))?;
    tracing::info!(job = %name, "Build triggered");
    Ok(ack.message)
}

/// List jobs decorated with their kind descriptor and canonical status.
pub async fn list_jobs(console: &ConsoleClient) -> Result<Vec<JobView>, SubmissionError> {
    let jobs = console.list_jobs().await?;
    Ok(jobs
        .into_iter()
        .map(|summary| JobView {
            kind: registry::describe(summary.kind()),
            status: status::classify(&summary.signal),
            last_build_at: summary.last_build_at(),
            summary,
        })
        .collect())
}

/// Build history of a job, each build with its canonical status.
pub async fn list_builds(
    console: &ConsoleClient,
    name: &str,
) -> Result<Vec<BuildView>, SubmissionError> {
    let builds = console.job_builds(name).await?;
    Ok(builds.into_iter().map(BuildView::from).collect())
}

/// Check that the plugins `kind` depends on are installed and enabled.
/// Kinds without requirements are answered without calling upstream.
pub async fn check_plugins(
    console: &ConsoleClient,
    kind: JobKind,
) -> Result<PluginReport, SubmissionError> {
    let descriptor = registry::describe(kind);
    if descriptor.required_plugins.is_empty() {
        return Ok(descriptor.check_plugins(&[]));
    }

    let installed = console.list_plugins().await?;
    let report = descriptor.check_plugins(&installed);
    if !report.plugins_ok {
        tracing::warn!(kind = %kind, reason = %report.message, "Required plugins unavailable");
    }
    Ok(report)
}

/// Fetch a job's configuration resolved against its kind's schema.
pub async fn fetch_resolved_config(
    console: &ConsoleClient,
    name: &str,
) -> Result<ResolvedForm, SubmissionError> {
    let record = console.fetch_config(name).await?;
    Ok(schema::resolve_form(record.job_type, &record.config))
}

fn prepare(
    operation: &'static str,
    kind: JobKind,
    raw: &FieldValues,
) -> Result<ConfigPayload, SubmissionError> {
    let name = raw.get("name").and_then(Value::as_str).unwrap_or_default();
    let checked = JobName::new(name);
    if let Err(report) = checked.validate() {
        record_validation_failure(operation, kind, "name");
        return Err(SubmissionError::InvalidName(report.to_string()));
    }

    transcoder::build(kind, raw).map_err(|e| {
        record_validation_failure(operation, kind, e.field().unwrap_or("-"));
        SubmissionError::Validation(e)
    })
}

fn record_submission(operation: &'static str, kind: JobKind) {
    metrics::counter!(
        "job_submissions_total",
        "operation" => operation,
        "kind" => kind.to_string()
    )
    .increment(1);
}

fn record_validation_failure(operation: &'static str, kind: JobKind, field: &str) {
    tracing::info!(operation, kind = %kind, field, "Job payload failed local validation");
    metrics::counter!(
        "job_validation_failures_total",
        "operation" => operation,
        "kind" => kind.to_string()
    )
    .increment(1);
}

fn upstream_failure(operation: &'static str, kind: JobKind, error: ConsoleError) -> SubmissionError {
    match &error {
        ConsoleError::UpstreamRejected(_) => {
            metrics::counter!("upstream_rejections_total", "operation" => operation).increment(1);
        }
        _ => tracing::error!(operation, kind = %kind, error = %error, "Console service call failed"),
    }
    SubmissionError::Upstream(error)
}

/// Error type for job submissions.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Invalid job name: {0}")]
    InvalidName(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} jobs cannot be built")]
    NotBuildable(JobKind),

    #[error(transparent)]
    Upstream(#[from] ConsoleError),
}

impl SubmissionError {
    /// Whether the submission was blocked before any upstream call.
    pub fn is_local(&self) -> bool {
        !matches!(self, SubmissionError::Upstream(_))
    }
}
