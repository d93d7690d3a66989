use serde::{Deserialize, Serialize};

use crate::models::job_kind::JobKind;

/// Plugin as reported by the console service's plugin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    #[serde(rename = "shortName")]
    pub short_name: String,

    /// Absent reads as disabled.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Whether the plugins a job kind depends on are installed and enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginReport {
    #[serde(rename = "type")]
    pub kind: JobKind,
    pub required_plugins: &'static [&'static str],
    pub missing: Vec<&'static str>,
    pub disabled: Vec<&'static str>,
    pub plugins_ok: bool,
    pub message: String,
}
