//! Converts raw field values into a validated [`ConfigPayload`].
//!
//! Validation is fail-fast: the first violation found is returned and nothing
//! else is checked. Per-field checks run in schema order over visible fields;
//! kind-level invariants run afterwards.

use std::collections::BTreeMap;

use crate::models::config::{
    ConfigField, ConfigPayload, ConfigSchema, FieldValue, FieldValues, ResolvedValues,
};
use crate::models::job_kind::JobKind;
use crate::services::schema::{self, EffectiveValues, DISABLED_KEY};

const DESCRIPTION_KEY: &str = "description";

/// Build the payload for a job of `kind` from raw submitted values.
///
/// Pure: the same inputs always give the same result.
pub fn build(kind: JobKind, raw: &FieldValues) -> Result<ConfigPayload, ValidationError> {
    let schema = schema::schema_for(kind);
    let EffectiveValues { values, malformed } = schema::effective_values(&schema, raw);

    let visible: Vec<&ConfigField> = schema
        .fields
        .iter()
        .filter(|field| field.visible_when.evaluate(&values))
        .collect();

    for field in &visible {
        check_field(field, &values, &malformed)?;
    }

    check_invariants(&schema, &values)?;

    let disabled = schema::envelope_disabled(raw)
        .map_err(|_| ValidationError::InvalidFieldType(DISABLED_KEY.to_string()))?;
    let name = schema::envelope_name(raw);

    let mut description = String::new();
    let mut fields = BTreeMap::new();
    for field in visible {
        let Some(value) = values.get(field.name) else {
            continue;
        };
        if field.name == DESCRIPTION_KEY {
            description = value.as_text().unwrap_or_default().to_string();
            continue;
        }
        fields.insert(field.name.to_string(), normalize(field, value));
    }

    Ok(ConfigPayload {
        name,
        kind,
        description,
        disabled,
        fields,
    })
}

fn check_field(
    field: &ConfigField,
    values: &ResolvedValues,
    malformed: &[&'static str],
) -> Result<(), ValidationError> {
    if malformed.contains(&field.name) {
        return Err(ValidationError::InvalidFieldType(field.name.to_string()));
    }

    let value = values.get(field.name).filter(|value| !value.is_blank());
    if value.is_none() && field.required.evaluate(values) {
        return Err(ValidationError::MissingRequiredField(field.name.to_string()));
    }

    match value {
        Some(value) if field.kind.is_choice() => check_choice(field, value),
        _ => Ok(()),
    }
}

fn check_choice(field: &ConfigField, value: &FieldValue) -> Result<(), ValidationError> {
    let invalid = |choice: &str| ValidationError::InvalidChoice {
        field: field.name.to_string(),
        value: choice.to_string(),
    };
    match value {
        FieldValue::Text(choice) if !field.options.contains(&choice.trim()) => Err(invalid(choice)),
        FieldValue::Tags(tags) => match tags.iter().find(|tag| !field.options.contains(&tag.as_str())) {
            Some(tag) => Err(invalid(tag)),
            None => Ok(()),
        },
        FieldValue::Flag(flag) => Err(invalid(&flag.to_string())),
        FieldValue::Text(_) => Ok(()),
    }
}

/// Choice values are sent without surrounding whitespace.
fn normalize(field: &ConfigField, value: &FieldValue) -> FieldValue {
    match value {
        FieldValue::Text(text) if field.kind.is_choice() => FieldValue::Text(text.trim().to_string()),
        other => other.clone(),
    }
}

// ── Kind-level invariants ───────────────────────────────────────────────

fn check_invariants(schema: &ConfigSchema, values: &ResolvedValues) -> Result<(), ValidationError> {
    let kind = schema.kind;
    let present = |name: &str| values.get(name).is_some_and(|value| !value.is_blank());
    let text = |name: &str| values.get(name).and_then(FieldValue::as_text).map(str::trim);
    let broken = |reason: &str| {
        Err(ValidationError::InvalidCrossFieldState {
            kind,
            reason: reason.to_string(),
        })
    };

    match kind {
        JobKind::Freestyle | JobKind::Matrix => {
            if text("scm_type") == Some("git") && !present("repository_url") {
                return broken("repository_url is required when scm_type is git");
            }
            if kind == JobKind::Matrix && axis_values(text("axis_values")).next().is_none() {
                return broken("axis_values must list at least one value");
            }
        }
        JobKind::Pipeline => {
            let definition = text("pipeline_definition_type");
            let script = definition == Some("script") && present("pipeline_script");
            let scm = definition == Some("scm") && present("repository_url");
            if script == scm {
                return broken(
                    "exactly one of pipeline_script or repository_url must be set for the chosen definition type",
                );
            }
        }
        JobKind::Multibranch if !present("repository_url") => {
            return broken("multibranch jobs require repository_url");
        }
        JobKind::Organization if !present("organization_name") => {
            return broken("organization jobs require organization_name");
        }
        _ => {}
    }
    Ok(())
}

fn axis_values(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

// ── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingRequiredField(String),

    #[error("invalid {kind} configuration: {reason}")]
    InvalidCrossFieldState { kind: JobKind, reason: String },

    #[error("{value:?} is not a valid choice for {field}")]
    InvalidChoice { field: String, value: String },

    #[error("{0} has the wrong value type")]
    InvalidFieldType(String),
}

impl ValidationError {
    /// Offending field, when the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingRequiredField(field)
            | ValidationError::InvalidFieldType(field)
            | ValidationError::InvalidChoice { field, .. } => Some(field),
            ValidationError::InvalidCrossFieldState { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn raw(value: Value) -> FieldValues {
        match value {
            Value::Object(map) => map,
            _ => panic!("raw values must be an object"),
        }
    }

    fn missing(field: &str) -> ValidationError {
        ValidationError::MissingRequiredField(field.to_string())
    }

    #[test]
    fn test_git_without_repository_is_missing_field() {
        let result = build(
            JobKind::Freestyle,
            &raw(json!({ "scm_type": "git", "repository_url": "" })),
        );
        assert_eq!(result, Err(missing("repository_url")));
        assert_eq!(result.unwrap_err().field(), Some("repository_url"));
    }

    #[test]
    fn test_hidden_repository_is_dropped() {
        let payload = build(
            JobKind::Freestyle,
            &raw(json!({ "scm_type": "none", "repository_url": "https://x/y.git" })),
        )
        .unwrap();
        assert!(!payload.fields.contains_key("repository_url"));
        assert!(!payload.fields.contains_key("branch_specifier"));
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("repository_url").is_none());
    }

    #[test]
    fn test_git_payload_carries_source_control_defaults() {
        let payload = build(
            JobKind::Freestyle,
            &raw(json!({
                "name": " api-build ",
                "scm_type": "git",
                "repository_url": "https://x/y.git",
                "behaviours": ["shallow-clone", "submodule", "shallow-clone"],
            })),
        )
        .unwrap();
        assert_eq!(payload.name, "api-build");
        assert_eq!(payload.kind, JobKind::Freestyle);
        assert_eq!(payload.text("branch_specifier"), Some("*/master"));
        assert_eq!(payload.text("repository_browser"), Some("auto"));
        assert_eq!(payload.text("build_steps"), Some("echo \"Hello World\""));

        let scm = payload.source_control().unwrap();
        assert_eq!(scm.repository_url.as_deref(), Some("https://x/y.git"));
        assert_eq!(scm.behaviours.len(), 2);
    }

    #[test]
    fn test_pipeline_script_required_when_inline() {
        let result = build(
            JobKind::Pipeline,
            &raw(json!({ "pipeline_definition_type": "script", "pipeline_script": "" })),
        );
        assert_eq!(result, Err(missing("pipeline_script")));
    }

    #[test]
    fn test_pipeline_from_scm_succeeds() {
        let payload = build(
            JobKind::Pipeline,
            &raw(json!({
                "pipeline_definition_type": "scm",
                "repository_url": "https://x",
                "pipeline_script": "",
            })),
        )
        .unwrap();
        assert!(!payload.fields.contains_key("pipeline_script"));
        assert_eq!(payload.text("script_path"), Some("Jenkinsfile"));
        assert_eq!(payload.text("branch"), Some("main"));
    }

    #[test]
    fn test_pipeline_defaults_to_hello_world_script() {
        let payload = build(JobKind::Pipeline, &FieldValues::new()).unwrap();
        assert_eq!(
            payload.text("pipeline_script"),
            Some(schema::DEFAULT_PIPELINE_SCRIPT)
        );
        assert!(payload.pipeline().is_some());
    }

    #[test]
    fn test_multibranch_and_organization_requirements() {
        assert_eq!(
            build(JobKind::Multibranch, &raw(json!({ "repository_url": "" }))),
            Err(missing("repository_url"))
        );
        assert_eq!(
            build(JobKind::Organization, &raw(json!({ "organization_name": "" }))),
            Err(missing("organization_name"))
        );
        assert!(build(JobKind::Organization, &raw(json!({ "organization_name": "acme" }))).is_ok());
    }

    #[test]
    fn test_first_violation_only() {
        let result = build(
            JobKind::Freestyle,
            &raw(json!({
                "scm_type": "git",
                "repository_url": "",
                "repository_browser": "sourceforge",
            })),
        );
        assert_eq!(result, Err(missing("repository_url")));
    }

    #[test]
    fn test_invalid_choice() {
        let result = build(
            JobKind::Freestyle,
            &raw(json!({ "build_step_type": "powershell" })),
        );
        assert_eq!(
            result,
            Err(ValidationError::InvalidChoice {
                field: "build_step_type".to_string(),
                value: "powershell".to_string(),
            })
        );

        let result = build(
            JobKind::Matrix,
            &raw(json!({
                "scm_type": "git",
                "repository_url": "https://x/y.git",
                "behaviours": "clean-checkout,lfs",
            })),
        );
        assert!(matches!(result, Err(ValidationError::InvalidChoice { value, .. }) if value == "lfs"));
    }

    #[test]
    fn test_invalid_type_on_visible_field() {
        let result = build(JobKind::Freestyle, &raw(json!({ "build_steps": ["a"] })));
        assert_eq!(
            result,
            Err(ValidationError::InvalidFieldType("build_steps".to_string()))
        );
        let result = build(JobKind::Folder, &raw(json!({ "disabled": "sometimes" })));
        assert_eq!(
            result,
            Err(ValidationError::InvalidFieldType("disabled".to_string()))
        );
    }

    #[test]
    fn test_invalid_type_on_hidden_field_is_ignored() {
        let payload = build(
            JobKind::Freestyle,
            &raw(json!({ "scm_type": "none", "repository_url": { "bad": true } })),
        );
        assert!(payload.is_ok());
    }

    #[test]
    fn test_matrix_requires_axis_values() {
        let result = build(JobKind::Matrix, &raw(json!({ "axis_values": " , " })));
        assert!(matches!(
            result,
            Err(ValidationError::InvalidCrossFieldState {
                kind: JobKind::Matrix,
                ..
            })
        ));
        let payload = build(JobKind::Matrix, &FieldValues::new()).unwrap();
        assert_eq!(payload.text("axis_values"), Some("dev,test,prod"));
    }

    #[test]
    fn test_envelope_values() {
        let payload = build(
            JobKind::Folder,
            &raw(json!({ "name": "team", "description": "Team jobs", "disabled": "on" })),
        )
        .unwrap();
        assert_eq!(payload.description, "Team jobs");
        assert!(payload.disabled);
        assert!(payload.fields.is_empty());

        let unnamed = build(JobKind::Unknown, &FieldValues::new()).unwrap();
        assert_eq!(unnamed.name, "");
        assert!(!unnamed.disabled);
    }

    #[test]
    fn test_blank_text_stays_blank_when_present() {
        let payload = build(JobKind::Freestyle, &raw(json!({ "build_steps": "" }))).unwrap();
        assert_eq!(payload.text("build_steps"), Some(""));
    }

    #[test]
    fn test_build_is_idempotent() {
        let input = raw(json!({
            "name": "nightly",
            "scm_type": "git",
            "repository_url": "https://x/y.git",
            "behaviours": "clean-checkout",
        }));
        assert_eq!(build(JobKind::Matrix, &input), build(JobKind::Matrix, &input));
    }
}
