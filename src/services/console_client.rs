//! Console Service Client
//!
//! Talks to the upstream job-management service. Every response is a JSON
//! envelope `{ "success": bool, "error"?: string, "message"?: string, ... }`;
//! a `success: false` envelope is surfaced verbatim as
//! [`ConsoleError::UpstreamRejected`] and never retried.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::config::ConfigPayload;
use crate::models::job::{BuildRecord, JobConfigRecord, JobSummary};
use crate::models::plugin::PluginInfo;

const FALLBACK_REJECTION: &str = "upstream rejected the request";

/// Acknowledgement returned by upstream actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Server-wide counters reported by `/api/statistics`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleStatistics {
    #[serde(default)]
    pub total_jobs: u64,
    #[serde(default)]
    pub total_nodes: u64,
    #[serde(default)]
    pub total_plugins: u64,
    #[serde(default)]
    pub queue_size: u64,
    #[serde(default)]
    pub jenkins_version: Option<String>,
}

#[derive(Deserialize)]
struct JobList {
    #[serde(default)]
    jobs: Vec<JobSummary>,
}

#[derive(Deserialize)]
struct PluginList {
    #[serde(default)]
    plugins: Vec<PluginInfo>,
}

#[derive(Deserialize)]
struct BuildList {
    #[serde(default)]
    builds: Vec<BuildRecord>,
}

#[derive(Deserialize)]
struct StatisticsEnvelope {
    #[serde(default)]
    statistics: ConsoleStatistics,
}

/// Client for the upstream console service.
#[derive(Clone)]
pub struct ConsoleClient {
    http: reqwest::Client,
    base_url: String,
}

impl ConsoleClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConsoleError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("jenkins-console/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub async fn list_jobs(&self) -> Result<Vec<JobSummary>, ConsoleError> {
        let list: JobList = self.send(Method::GET, "/api/jobs".to_string(), None).await?;
        Ok(list.jobs)
    }

    pub async fn fetch_config(&self, name: &str) -> Result<JobConfigRecord, ConsoleError> {
        let path = format!("/api/job/{}/config", urlencoding::encode(name));
        self.send(Method::GET, path, None).await
    }

    /// Build history of a job, newest first as the service reports it.
    pub async fn job_builds(&self, name: &str) -> Result<Vec<BuildRecord>, ConsoleError> {
        let path = format!("/api/job/{}/builds", urlencoding::encode(name));
        let list: BuildList = self.send(Method::GET, path, None).await?;
        Ok(list.builds)
    }

    pub async fn list_plugins(&self) -> Result<Vec<PluginInfo>, ConsoleError> {
        let list: PluginList = self.send(Method::GET, "/api/plugins".to_string(), None).await?;
        Ok(list.plugins)
    }

    /// Reachability check used by the health endpoint.
    pub async fn statistics(&self) -> Result<ConsoleStatistics, ConsoleError> {
        let envelope: StatisticsEnvelope = self
            .send(Method::GET, "/api/statistics".to_string(), None)
            .await?;
        Ok(envelope.statistics)
    }

    // ── Writes ──────────────────────────────────────────────────────────

    pub async fn create_job(&self, payload: &ConfigPayload) -> Result<Acknowledgement, ConsoleError> {
        let body = serde_json::to_value(payload)?;
        self.send(Method::POST, "/api/jobs/create".to_string(), Some(body))
            .await
    }

    /// Update the job currently named `current_name`. The payload may rename it.
    pub async fn update_job(
        &self,
        current_name: &str,
        payload: &ConfigPayload,
    ) -> Result<Acknowledgement, ConsoleError> {
        let path = format!("/api/job/{}/config/update", urlencoding::encode(current_name));
        let body = serde_json::to_value(payload)?;
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn trigger_build(&self, name: &str) -> Result<Acknowledgement, ConsoleError> {
        let path = format!("/api/job/{}/build", urlencoding::encode(name));
        self.send(Method::POST, path, None).await
    }

    pub async fn delete_job(&self, name: &str) -> Result<Acknowledgement, ConsoleError> {
        let path = format!("/api/jobs/{}/delete", urlencoding::encode(name));
        self.send(Method::DELETE, path, None).await
    }

    pub async fn toggle_node(&self, name: &str) -> Result<Acknowledgement, ConsoleError> {
        let path = format!("/api/nodes/{}/toggle", urlencoding::encode(name));
        self.send(Method::POST, path, None).await
    }

    pub async fn cancel_queue_item(&self, id: u64) -> Result<Acknowledgement, ConsoleError> {
        self.send(Method::POST, format!("/api/queue/{id}/cancel"), None)
            .await
    }

    // ── Transport ───────────────────────────────────────────────────────

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> Result<T, ConsoleError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, path = %path, "Calling console service");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let envelope = match serde_json::from_slice::<Value>(&bytes) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(ConsoleError::Status {
                    status,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
            Err(e) => return Err(ConsoleError::Decode(e)),
        };

        if let Some(reason) = rejection(&envelope) {
            tracing::warn!(method = %method, path = %path, reason = %reason, "Console service rejected request");
            return Err(ConsoleError::UpstreamRejected(reason));
        }

        if !status.is_success() {
            return Err(ConsoleError::Status {
                status,
                body: envelope.to_string(),
            });
        }

        Ok(serde_json::from_value(envelope)?)
    }
}

/// Reason carried by a `success: false` envelope.
fn rejection(envelope: &Value) -> Option<String> {
    if envelope.get("success").and_then(Value::as_bool) != Some(false) {
        return None;
    }
    let reason = ["error", "message"]
        .iter()
        .find_map(|key| envelope.get(*key).and_then(Value::as_str))
        .unwrap_or(FALLBACK_REJECTION);
    Some(reason.to_string())
}

/// Error type for console service calls.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("HTTP request to console service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    UpstreamRejected(String),

    #[error("Console service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode console service response: {0}")]
    Decode(#[from] serde_json::Error),
}
