use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::config::FieldValues;
use crate::models::job_kind::JobKind;
use crate::models::status::{CanonicalStatus, StatusSignal};
use crate::services::registry::KindDescriptor;
use crate::services::status;

/// Longest job name the console accepts.
pub const MAX_JOB_NAME_LEN: usize = 256;

/// Job summary as listed by the console service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub job_type: JobKind,

    /// Upstream implementation class, e.g. `hudson.model.FreeStyleProject`.
    #[serde(default, rename = "_class", skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Last build start, Unix epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Last build duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    #[serde(flatten)]
    pub signal: StatusSignal,
}

impl JobSummary {
    /// Reported kind, falling back to the implementation class when the
    /// service did not classify the job.
    pub fn kind(&self) -> JobKind {
        match (self.job_type, self.class.as_deref()) {
            (JobKind::Unknown, Some(class)) => JobKind::from_class(class),
            (kind, _) => kind,
        }
    }

    pub fn last_build_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(DateTime::from_timestamp_millis)
    }
}

/// A job summary decorated with its kind descriptor and canonical status.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub summary: JobSummary,
    pub kind: &'static KindDescriptor,
    /// Serialized apart from the upstream `status` text flattened above.
    #[serde(rename = "canonical_status")]
    pub status: CanonicalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_build_at: Option<DateTime<Utc>>,
}

/// One entry of a job's build history.
///
/// The colour in `signal` is the job's overall colour, not the build's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRecord {
    pub number: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    #[serde(default, rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, rename = "keepLog")]
    pub keep_log: bool,

    #[serde(default, rename = "queueId", skip_serializing_if = "Option::is_none")]
    pub queue_id: Option<u64>,

    #[serde(flatten)]
    pub signal: StatusSignal,
}

impl BuildRecord {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(DateTime::from_timestamp_millis)
    }

    /// Canonical status from the build's own result and building flag. The
    /// job colour is only consulted when the build reports neither.
    pub fn status(&self) -> CanonicalStatus {
        let own = StatusSignal {
            color: None,
            ..self.signal.clone()
        };
        if own.result.is_some() || own.building.is_some() {
            status::classify(&own)
        } else {
            status::classify(&self.signal)
        }
    }
}

/// A build record decorated with its canonical status.
#[derive(Debug, Clone, Serialize)]
pub struct BuildView {
    #[serde(flatten)]
    pub record: BuildRecord,
    #[serde(rename = "canonical_status")]
    pub status: CanonicalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl From<BuildRecord> for BuildView {
    fn from(record: BuildRecord) -> Self {
        Self {
            status: record.status(),
            started_at: record.started_at(),
            record,
        }
    }
}

/// Current configuration of a job, as fetched for editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfigRecord {
    #[serde(default)]
    pub job_type: JobKind,
    #[serde(default)]
    pub config: FieldValues,
}

/// Addressing name of a job being created or renamed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobName {
    #[garde(length(min = 1, max = 256), custom(job_name_charset))]
    pub name: String,
}

impl JobName {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }
}

fn job_name_charset(value: &str, _context: &()) -> garde::Result {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Ok(())
    } else {
        Err(garde::Error::new(
            "may only contain letters, numbers, underscores, dots, and hyphens",
        ))
    }
}
