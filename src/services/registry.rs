//! Job kind registry: display metadata and capabilities per kind.

use serde::Serialize;

use crate::models::config::ConfigSchema;
use crate::models::job_kind::JobKind;
use crate::models::plugin::{PluginInfo, PluginReport};
use crate::services::schema;

/// Static description of one job kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KindDescriptor {
    pub kind: JobKind,
    pub icon: &'static str,
    pub badge_label: &'static str,
    /// Whether the console offers a build action for jobs of this kind.
    pub buildable: bool,
    /// Upstream plugins jobs of this kind depend on.
    pub required_plugins: &'static [&'static str],
}

impl KindDescriptor {
    pub fn schema(&self) -> ConfigSchema {
        schema::schema_for(self.kind)
    }

    /// Compare the required plugins against what the console has installed.
    /// A required plugin is missing when no installed plugin has its short
    /// name, and disabled when one does but is not enabled.
    pub fn check_plugins(&self, installed: &[PluginInfo]) -> PluginReport {
        let mut missing = Vec::new();
        let mut disabled = Vec::new();
        for &required in self.required_plugins {
            match installed.iter().find(|plugin| plugin.short_name == required) {
                None => missing.push(required),
                Some(plugin) if !plugin.enabled => disabled.push(required),
                Some(_) => {}
            }
        }

        let mut problems = Vec::new();
        if !missing.is_empty() {
            problems.push(format!("Missing: {}", missing.join(", ")));
        }
        if !disabled.is_empty() {
            problems.push(format!("Disabled: {}", disabled.join(", ")));
        }
        let message = if self.required_plugins.is_empty() {
            "No plugins required".to_string()
        } else if problems.is_empty() {
            "All required plugins are installed and enabled".to_string()
        } else {
            problems.join("; ")
        };

        PluginReport {
            kind: self.kind,
            required_plugins: self.required_plugins,
            plugins_ok: problems.is_empty(),
            missing,
            disabled,
            message,
        }
    }
}

const PIPELINE_PLUGINS: &[&str] = &[
    "workflow-aggregator",
    "workflow-api",
    "workflow-job",
    "workflow-support",
    "workflow-step-api",
    "workflow-durable-task-step",
    "workflow-scm-step",
    "workflow-cps",
    "workflow-basic-steps",
    "pipeline-stage-view",
    "structs",
    "script-security",
    "scm-api",
    "credentials",
    "durable-task",
];

const MULTIBRANCH_PLUGINS: &[&str] = &[
    "workflow-aggregator",
    "workflow-api",
    "workflow-job",
    "workflow-support",
    "workflow-multibranch",
    "branch-api",
    "scm-api",
    "structs",
    "credentials",
    "git",
];

const ORGANIZATION_PLUGINS: &[&str] = &[
    "github-branch-source",
    "branch-api",
    "scm-api",
    "workflow-multibranch",
    "structs",
    "credentials",
];

/// One entry per kind, in display order. `Unknown` is last.
const REGISTRY: &[KindDescriptor] = &[
    KindDescriptor {
        kind: JobKind::Freestyle,
        icon: "🔧",
        badge_label: "Freestyle",
        buildable: true,
        required_plugins: &["git", "credentials"],
    },
    KindDescriptor {
        kind: JobKind::Pipeline,
        icon: "🔄",
        badge_label: "Pipeline",
        buildable: true,
        required_plugins: PIPELINE_PLUGINS,
    },
    KindDescriptor {
        kind: JobKind::Multibranch,
        icon: "🌳",
        badge_label: "Multibranch",
        buildable: true,
        required_plugins: MULTIBRANCH_PLUGINS,
    },
    KindDescriptor {
        kind: JobKind::External,
        icon: "🌐",
        badge_label: "External",
        buildable: true,
        required_plugins: &[],
    },
    KindDescriptor {
        kind: JobKind::Matrix,
        icon: "🔢",
        badge_label: "Matrix",
        buildable: true,
        required_plugins: &["git", "credentials"],
    },
    KindDescriptor {
        kind: JobKind::Folder,
        icon: "📁",
        badge_label: "Folder",
        buildable: false,
        required_plugins: &["cloudbees-folder"],
    },
    KindDescriptor {
        kind: JobKind::Organization,
        icon: "🏢",
        badge_label: "Organization",
        buildable: false,
        required_plugins: ORGANIZATION_PLUGINS,
    },
    KindDescriptor {
        kind: JobKind::Unknown,
        icon: "❓",
        badge_label: "Unknown",
        buildable: true,
        required_plugins: &[],
    },
];

const UNKNOWN: &KindDescriptor = &REGISTRY[REGISTRY.len() - 1];

/// Look up a kind's descriptor.
pub fn describe(kind: JobKind) -> &'static KindDescriptor {
    REGISTRY
        .iter()
        .find(|entry| entry.kind == kind)
        .unwrap_or(UNKNOWN)
}

/// Look up a descriptor by kind name. Unrecognised names get the `unknown`
/// entry.
pub fn describe_str(raw: &str) -> &'static KindDescriptor {
    describe(JobKind::parse(raw))
}

/// Kinds a user can create, in display order.
pub fn creatable_kinds() -> impl Iterator<Item = &'static KindDescriptor> {
    REGISTRY
        .iter()
        .filter(|entry| entry.kind != JobKind::Unknown)
}
