use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Category of job or organisational unit reported by the console service.
///
/// `Unknown` is the fallback for anything the service reports that is not in
/// the closed set, so deserialising and parsing never fail.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum JobKind {
    Freestyle,
    Pipeline,
    Multibranch,
    External,
    Matrix,
    Folder,
    Organization,
    #[default]
    Unknown,
}

/// Deserialises through [`JobKind::parse`], so the wire name is matched
/// case-insensitively and `null` reads as `Unknown`.
impl<'de> Deserialize<'de> for JobKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(JobKind::parse).unwrap_or_default())
    }
}

impl JobKind {
    /// Parse a kind name, mapping anything unrecognised to `Unknown`.
    pub fn parse(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(JobKind::Unknown)
    }

    /// Map the upstream `_class` of a job to its kind.
    pub fn from_class(class: &str) -> Self {
        match class {
            "hudson.model.FreeStyleProject" => JobKind::Freestyle,
            "org.jenkinsci.plugins.workflow.job.WorkflowJob" => JobKind::Pipeline,
            "org.jenkinsci.plugins.workflow.multibranch.WorkflowMultiBranchProject" => {
                JobKind::Multibranch
            }
            "hudson.model.ExternalJob" => JobKind::External,
            "hudson.matrix.MatrixProject" => JobKind::Matrix,
            "com.cloudbees.hudson.plugins.folder.Folder" => JobKind::Folder,
            "jenkins.branch.OrganizationFolder" => JobKind::Organization,
            _ => JobKind::Unknown,
        }
    }
}
