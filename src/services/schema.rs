//! Per-kind configuration schemas.
//!
//! Every schema is a static, ordered field list. Conditional fields declare
//! a `visible_when` predicate over a discriminator (`scm_type` or
//! `pipeline_definition_type`); hidden fields are never part of a payload.

use serde::Serialize;
use serde_json::Value;

use crate::models::config::{
    Condition, ConfigField, ConfigSchema, FieldDefault, FieldKind, FieldValue, FieldValues,
    ResolvedValues, ShapeMismatch,
};
use crate::models::job_kind::JobKind;

pub const DEFAULT_PIPELINE_SCRIPT: &str = "pipeline {
    agent any
    stages {
        stage('Hello') {
            steps {
                echo 'Hello World'
            }
        }
    }
}";

// ── Envelope values ─────────────────────────────────────────────────────

/// Job name and disabled flag travel with every record but belong to no
/// kind's schema.
pub const NAME_KEY: &str = "name";
pub const DISABLED_KEY: &str = "disabled";

const DISABLED_FIELD: ConfigField =
    ConfigField::new(DISABLED_KEY, "Disabled", FieldKind::Boolean);

/// Trimmed `name` of a raw record, `""` when absent or not a string.
pub fn envelope_name(raw: &FieldValues) -> String {
    raw.get(NAME_KEY)
        .and_then(Value::as_str)
        .map(|name| name.trim().to_string())
        .unwrap_or_default()
}

/// `disabled` flag of a raw record, `false` when absent.
pub fn envelope_disabled(raw: &FieldValues) -> Result<bool, ShapeMismatch> {
    match raw.get(DISABLED_KEY) {
        Some(value) => Ok(DISABLED_FIELD
            .coerce(value)?
            .and_then(|value| value.as_flag())
            .unwrap_or(false)),
        None => Ok(false),
    }
}

// ── Shared fields ───────────────────────────────────────────────────────

const DESCRIPTION: ConfigField =
    ConfigField::multiline("description", "Description").with_default(FieldDefault::Text(""));

// ── Source control (freestyle, matrix) ──────────────────────────────────

const USES_GIT: Condition = Condition::equals("scm_type", "git");

const SCM_TYPE: ConfigField = ConfigField::radio("scm_type", "Source Code Management", &["none", "git"])
    .with_default(FieldDefault::Text("none"));

const SCM_REPOSITORY_URL: ConfigField = ConfigField::url("repository_url", "Repository URL")
    .required_when(USES_GIT)
    .visible_when(USES_GIT);

const SCM_CREDENTIALS: ConfigField = ConfigField::text("credentials_id", "Credentials")
    .with_default(FieldDefault::Text(""))
    .visible_when(USES_GIT);

const SCM_BRANCH_SPECIFIER: ConfigField = ConfigField::text("branch_specifier", "Branch Specifier")
    .with_default(FieldDefault::Text("*/master"))
    .visible_when(USES_GIT);

const SCM_REPOSITORY_BROWSER: ConfigField = ConfigField::select(
    "repository_browser",
    "Repository browser",
    &["auto", "github", "gitlab", "bitbucket", "cgit", "gitweb"],
)
.with_default(FieldDefault::Text("auto"))
.visible_when(USES_GIT);

const SCM_BEHAVIOURS: ConfigField = ConfigField::tags(
    "behaviours",
    "Additional Behaviours",
    &[
        "clean-checkout",
        "shallow-clone",
        "sparse-checkout",
        "submodule",
        "polling-ignores-commits",
    ],
)
.with_default(FieldDefault::Tags(&[]))
.visible_when(USES_GIT);

// ── Pipeline definition ─────────────────────────────────────────────────

const INLINE_SCRIPT: Condition = Condition::equals("pipeline_definition_type", "script");
const SCRIPT_FROM_SCM: Condition = Condition::equals("pipeline_definition_type", "scm");

const PIPELINE_DEFINITION_TYPE: ConfigField =
    ConfigField::radio("pipeline_definition_type", "Pipeline Definition", &["script", "scm"])
        .with_default(FieldDefault::Text("script"));

const PIPELINE_SCRIPT: ConfigField = ConfigField::multiline("pipeline_script", "Pipeline Script")
    .with_default(FieldDefault::Text(DEFAULT_PIPELINE_SCRIPT))
    .required_when(INLINE_SCRIPT)
    .visible_when(INLINE_SCRIPT);

const PIPELINE_REPOSITORY_URL: ConfigField = ConfigField::url("repository_url", "Repository URL")
    .required_when(SCRIPT_FROM_SCM)
    .visible_when(SCRIPT_FROM_SCM);

const PIPELINE_BRANCH: ConfigField = ConfigField::text("branch", "Branch Specifier")
    .with_default(FieldDefault::Text("main"))
    .visible_when(SCRIPT_FROM_SCM);

const PIPELINE_SCRIPT_PATH: ConfigField = ConfigField::text("script_path", "Script Path")
    .with_default(FieldDefault::Text("Jenkinsfile"))
    .visible_when(SCRIPT_FROM_SCM);

const PIPELINE_CREDENTIALS: ConfigField = ConfigField::text("credentials_id", "Credentials")
    .with_default(FieldDefault::Text(""))
    .visible_when(SCRIPT_FROM_SCM);

// ── Per-kind tables ─────────────────────────────────────────────────────

const FREESTYLE_FIELDS: &[ConfigField] = &[
    DESCRIPTION,
    SCM_TYPE,
    SCM_REPOSITORY_URL,
    SCM_CREDENTIALS,
    SCM_BRANCH_SPECIFIER,
    SCM_REPOSITORY_BROWSER,
    SCM_BEHAVIOURS,
    ConfigField::select("build_step_type", "Build Step Type", &["shell", "batch"])
        .with_default(FieldDefault::Text("shell")),
    ConfigField::multiline("build_steps", "Build Commands")
        .with_default(FieldDefault::Text("echo \"Hello World\"")),
];

const MATRIX_FIELDS: &[ConfigField] = &[
    DESCRIPTION,
    SCM_TYPE,
    SCM_REPOSITORY_URL,
    SCM_CREDENTIALS,
    SCM_BRANCH_SPECIFIER,
    SCM_REPOSITORY_BROWSER,
    SCM_BEHAVIOURS,
    ConfigField::text("axis_name", "Configuration Axis Name")
        .with_default(FieldDefault::Text("environment")),
    ConfigField::text("axis_values", "Axis Values (comma-separated)")
        .with_default(FieldDefault::Text("dev,test,prod")),
    ConfigField::multiline("build_steps", "Build Steps")
        .with_default(FieldDefault::Text("echo \"Matrix build for $environment\"")),
];

const PIPELINE_FIELDS: &[ConfigField] = &[
    DESCRIPTION,
    PIPELINE_DEFINITION_TYPE,
    PIPELINE_SCRIPT,
    PIPELINE_REPOSITORY_URL,
    PIPELINE_BRANCH,
    PIPELINE_SCRIPT_PATH,
    PIPELINE_CREDENTIALS,
];

const MULTIBRANCH_FIELDS: &[ConfigField] = &[
    DESCRIPTION,
    ConfigField::url("repository_url", "Repository URL").required(),
    ConfigField::text("repo_id", "Repository ID").with_default(FieldDefault::Text("repo-1")),
];

const ORGANIZATION_FIELDS: &[ConfigField] = &[
    DESCRIPTION,
    ConfigField::text("organization_name", "Organization/Owner Name").required(),
];

const DESCRIPTION_ONLY: &[ConfigField] = &[DESCRIPTION];

/// Schema for a job kind. Total over [`JobKind`].
pub fn schema_for(kind: JobKind) -> ConfigSchema {
    let fields = match kind {
        JobKind::Freestyle => FREESTYLE_FIELDS,
        JobKind::Matrix => MATRIX_FIELDS,
        JobKind::Pipeline => PIPELINE_FIELDS,
        JobKind::Multibranch => MULTIBRANCH_FIELDS,
        JobKind::Organization => ORGANIZATION_FIELDS,
        JobKind::External | JobKind::Folder | JobKind::Unknown => DESCRIPTION_ONLY,
    };
    ConfigSchema { kind, fields }
}

// ── Resolution ──────────────────────────────────────────────────────────

/// Outcome of reading raw values against a schema.
#[derive(Debug, Default)]
pub struct EffectiveValues {
    /// Raw value where present, declared default otherwise.
    pub values: ResolvedValues,
    /// Fields whose raw value had the wrong JSON shape.
    pub malformed: Vec<&'static str>,
}

/// Read every schema field from `raw`, substituting defaults for absent
/// keys. Select and radio fields also take their default when blank, since
/// blank is never one of their options.
pub fn effective_values(schema: &ConfigSchema, raw: &FieldValues) -> EffectiveValues {
    let mut effective = EffectiveValues::default();
    for field in schema.fields {
        let coerced = match raw.get(field.name) {
            Some(value) => field.coerce(value),
            None => Ok(None),
        };
        let value = match coerced {
            Ok(Some(value)) if value.is_blank() && takes_default_when_blank(field) => {
                field.default_value()
            }
            Ok(Some(value)) => Some(value),
            Ok(None) => field.default_value(),
            Err(_) => {
                effective.malformed.push(field.name);
                field.default_value()
            }
        };
        if let Some(value) = value {
            effective.values.insert(field.name, value);
        }
    }
    effective
}

fn takes_default_when_blank(field: &ConfigField) -> bool {
    matches!(field.kind, FieldKind::SingleSelect | FieldKind::RadioGroup)
}

/// One field of a form being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: Option<FieldValue>,
    pub visible: bool,
    pub required: bool,
}

/// Editing view of a job configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedForm {
    pub kind: JobKind,
    pub name: String,
    pub disabled: bool,
    pub fields: Vec<ResolvedField>,
}

impl ResolvedForm {
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn visible_names(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| field.visible)
            .map(|field| field.name)
            .collect()
    }

    /// Raw record holding every field value, hidden ones included, plus the
    /// name and disabled flag. Feeding it back to the transcoder saves the
    /// form as shown.
    pub fn record(&self) -> FieldValues {
        let mut record: FieldValues = self
            .fields
            .iter()
            .filter_map(|field| {
                let value = field.value.as_ref()?;
                serde_json::to_value(value)
                    .ok()
                    .map(|json| (field.name.to_string(), json))
            })
            .collect();
        record.insert(NAME_KEY.to_string(), Value::String(self.name.clone()));
        record.insert(DISABLED_KEY.to_string(), Value::Bool(self.disabled));
        record
    }
}

/// Resolve a configuration record against its kind's schema.
///
/// Hidden fields keep their values so switching the discriminator back
/// restores them; they are only flagged as not visible. Malformed record
/// values fall back to the field default, and a malformed `disabled` reads
/// as `false`.
pub fn resolve_form(kind: JobKind, record: &FieldValues) -> ResolvedForm {
    let schema = schema_for(kind);
    let effective = effective_values(&schema, record);
    let fields = schema
        .fields
        .iter()
        .map(|field| ResolvedField {
            name: field.name,
            label: field.label,
            kind: field.kind,
            value: effective.values.get(field.name).cloned(),
            visible: field.visible_when.evaluate(&effective.values),
            required: field.required.evaluate(&effective.values),
        })
        .collect();
    ResolvedForm {
        kind,
        name: envelope_name(record),
        disabled: envelope_disabled(record).unwrap_or(false),
        fields,
    }
}

/// Apply a single field change to a form and re-resolve it.
pub fn apply_change(form: &ResolvedForm, name: &str, value: Value) -> ResolvedForm {
    let mut record = form.record();
    record.insert(name.to_string(), value);
    resolve_form(form.kind, &record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn record(value: Value) -> FieldValues {
        match value {
            Value::Object(map) => map,
            _ => panic!("record must be an object"),
        }
    }

    #[test]
    fn test_every_schema_starts_with_description() {
        for kind in JobKind::iter() {
            let schema = schema_for(kind);
            assert_eq!(schema.kind, kind);
            assert_eq!(schema.fields[0].name, "description", "{kind}");
        }
    }

    #[test]
    fn test_field_names_unique_within_schema() {
        for kind in JobKind::iter() {
            let schema = schema_for(kind);
            for (i, field) in schema.fields.iter().enumerate() {
                assert!(
                    schema.fields[i + 1..].iter().all(|other| other.name != field.name),
                    "{kind} repeats {}",
                    field.name
                );
            }
        }
    }

    #[test]
    fn test_minimal_schemas() {
        for kind in [JobKind::Folder, JobKind::External, JobKind::Organization] {
            assert!(schema_for(kind).fields.len() <= 2, "{kind}");
        }
    }

    #[test]
    fn test_defaults_match_declared_values() {
        let freestyle = schema_for(JobKind::Freestyle);
        assert_eq!(
            freestyle.field("branch_specifier").and_then(|f| f.default),
            Some(FieldDefault::Text("*/master"))
        );
        assert_eq!(
            freestyle.field("repository_browser").and_then(|f| f.default),
            Some(FieldDefault::Text("auto"))
        );
        let pipeline = schema_for(JobKind::Pipeline);
        assert_eq!(
            pipeline.field("branch").and_then(|f| f.default),
            Some(FieldDefault::Text("main"))
        );
        assert_eq!(
            pipeline.field("script_path").and_then(|f| f.default),
            Some(FieldDefault::Text("Jenkinsfile"))
        );
    }

    #[test]
    fn test_option_lists_match_typed_enums() {
        use crate::models::config::{GitBehaviour, PipelineDefinitionType, RepositoryBrowser, ScmType};

        let freestyle = schema_for(JobKind::Freestyle);
        let names = |options: &[&str]| options.iter().map(|o| o.to_string()).collect::<Vec<_>>();
        assert_eq!(
            names(freestyle.field("scm_type").unwrap().options),
            ScmType::iter().map(|v| v.to_string()).collect::<Vec<_>>()
        );
        assert_eq!(
            names(freestyle.field("repository_browser").unwrap().options),
            RepositoryBrowser::iter().map(|v| v.to_string()).collect::<Vec<_>>()
        );
        assert_eq!(
            names(freestyle.field("behaviours").unwrap().options),
            GitBehaviour::iter().map(|v| v.to_string()).collect::<Vec<_>>()
        );
        assert_eq!(
            names(schema_for(JobKind::Pipeline).field("pipeline_definition_type").unwrap().options),
            PipelineDefinitionType::iter().map(|v| v.to_string()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_git_fields_depend_on_scm_type() {
        let schema = schema_for(JobKind::Matrix);
        let dependents: Vec<_> = schema.dependents_of("scm_type").map(|f| f.name).collect();
        assert_eq!(
            dependents,
            vec![
                "repository_url",
                "credentials_id",
                "branch_specifier",
                "repository_browser",
                "behaviours",
            ]
        );
    }

    #[test]
    fn test_resolve_form_fills_defaults() {
        let form = resolve_form(JobKind::Freestyle, &FieldValues::new());
        assert_eq!(
            form.field("scm_type").and_then(|f| f.value.clone()),
            Some(FieldValue::Text("none".to_string()))
        );
        assert_eq!(
            form.visible_names(),
            vec!["description", "scm_type", "build_step_type", "build_steps"]
        );
        assert!(!form.field("repository_url").unwrap().required);
    }

    #[test]
    fn test_selecting_git_reveals_and_requires_repository() {
        let form = resolve_form(JobKind::Freestyle, &record(json!({ "scm_type": "git" })));
        let url = form.field("repository_url").unwrap();
        assert!(url.visible);
        assert!(url.required);
        assert_eq!(
            form.field("branch_specifier").and_then(|f| f.value.clone()),
            Some(FieldValue::Text("*/master".to_string()))
        );
    }

    #[test]
    fn test_hidden_values_survive_discriminator_round_trip() {
        let form = resolve_form(
            JobKind::Freestyle,
            &record(json!({ "scm_type": "git", "repository_url": "https://x/y.git" })),
        );
        let hidden = apply_change(&form, "scm_type", json!("none"));
        let url = hidden.field("repository_url").unwrap();
        assert!(!url.visible);
        assert_eq!(url.value, Some(FieldValue::Text("https://x/y.git".to_string())));

        let shown = apply_change(&hidden, "scm_type", json!("git"));
        assert!(shown.field("repository_url").unwrap().visible);
    }

    #[test]
    fn test_pipeline_definition_switches_sections() {
        let script = resolve_form(JobKind::Pipeline, &FieldValues::new());
        assert!(script.field("pipeline_script").unwrap().visible);
        assert!(!script.field("script_path").unwrap().visible);

        let scm = apply_change(&script, "pipeline_definition_type", json!("scm"));
        assert!(!scm.field("pipeline_script").unwrap().visible);
        assert!(scm.field("repository_url").unwrap().required);
        assert_eq!(
            scm.field("script_path").and_then(|f| f.value.clone()),
            Some(FieldValue::Text("Jenkinsfile".to_string()))
        );
    }

    #[test]
    fn test_resolve_form_keeps_envelope_values() {
        let form = resolve_form(
            JobKind::Freestyle,
            &record(json!({ "name": " api ", "disabled": true, "scm_type": "none" })),
        );
        assert_eq!(form.name, "api");
        assert!(form.disabled);

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["disabled"], true);

        let toggled = apply_change(&form, "scm_type", json!("git"));
        assert!(toggled.disabled);
        assert_eq!(toggled.name, "api");
    }

    #[test]
    fn test_resolve_form_disabled_uses_form_rules() {
        let on = resolve_form(JobKind::Folder, &record(json!({ "disabled": "on" })));
        assert!(on.disabled);
        let absent = resolve_form(JobKind::Folder, &FieldValues::new());
        assert!(!absent.disabled);
        assert_eq!(absent.name, "");
        let malformed = resolve_form(JobKind::Folder, &record(json!({ "disabled": [true] })));
        assert!(!malformed.disabled);
    }

    #[test]
    fn test_form_record_round_trips_through_resolution() {
        let form = resolve_form(
            JobKind::Pipeline,
            &record(json!({ "name": "nightly", "disabled": true, "pipeline_definition_type": "scm", "repository_url": "https://x" })),
        );
        assert_eq!(resolve_form(JobKind::Pipeline, &form.record()), form);
    }

    #[test]
    fn test_blank_select_takes_default() {
        let effective = effective_values(
            &schema_for(JobKind::Freestyle),
            &record(json!({ "scm_type": "", "build_steps": "" })),
        );
        assert_eq!(
            effective.values.get("scm_type"),
            Some(&FieldValue::Text("none".to_string()))
        );
        assert_eq!(
            effective.values.get("build_steps"),
            Some(&FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn test_malformed_record_value_is_reported_and_defaulted() {
        let effective = effective_values(
            &schema_for(JobKind::Multibranch),
            &record(json!({ "repo_id": { "nested": 1 } })),
        );
        assert_eq!(effective.malformed, vec!["repo_id"]);
        assert_eq!(
            effective.values.get("repo_id"),
            Some(&FieldValue::Text("repo-1".to_string()))
        );
    }
}
