use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::models::job_kind::JobKind;

/// Raw field values as submitted by a form or fetched from the console service.
pub type FieldValues = serde_json::Map<String, Value>;

/// Effective values keyed by field name, after defaults have been applied.
pub type ResolvedValues = BTreeMap<&'static str, FieldValue>;

/// Input widget a field is edited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Text,
    MultilineText,
    Url,
    SingleSelect,
    MultiSelectTags,
    Boolean,
    RadioGroup,
}

impl FieldKind {
    /// Whether values must come from the field's option list.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            FieldKind::SingleSelect | FieldKind::RadioGroup | FieldKind::MultiSelectTags
        )
    }
}

/// A validated field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Tags(Vec<String>),
}

impl FieldValue {
    /// Blank means absent for requiredness: empty or whitespace-only text,
    /// or an empty tag list. Flags are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Flag(_) => false,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Tags(tags) => tags.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

/// A raw value whose JSON shape cannot represent the field's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMismatch;

/// Declared default of a field. Kept `Copy` so schemas can live in constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldDefault {
    Text(&'static str),
    Flag(bool),
    Tags(&'static [&'static str]),
}

impl FieldDefault {
    pub fn to_value(self) -> FieldValue {
        match self {
            FieldDefault::Text(text) => FieldValue::Text(text.to_string()),
            FieldDefault::Flag(flag) => FieldValue::Flag(flag),
            FieldDefault::Tags(tags) => {
                FieldValue::Tags(tags.iter().map(|tag| tag.to_string()).collect())
            }
        }
    }
}

/// Predicate over sibling field values, used for both visibility and
/// requiredness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum Condition {
    Always,
    Never,
    Equals {
        field: &'static str,
        value: &'static str,
    },
}

impl Condition {
    pub const fn equals(field: &'static str, value: &'static str) -> Self {
        Condition::Equals { field, value }
    }

    pub fn evaluate(&self, siblings: &ResolvedValues) -> bool {
        match self {
            Condition::Always => true,
            Condition::Never => false,
            Condition::Equals { field, value } => siblings
                .get(field)
                .and_then(FieldValue::as_text)
                .is_some_and(|current| current.trim() == *value),
        }
    }

    /// Name of the discriminator this condition reads, if any.
    pub fn depends_on(&self) -> Option<&'static str> {
        match self {
            Condition::Equals { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Descriptor of one editable configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldDefault>,
    pub required: Condition,
    pub visible_when: Condition,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub options: &'static [&'static str],
}

impl ConfigField {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            default: None,
            required: Condition::Never,
            visible_when: Condition::Always,
            options: &[],
        }
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub const fn multiline(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::MultilineText)
    }

    pub const fn url(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Url)
    }

    pub const fn select(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            options,
            ..Self::new(name, label, FieldKind::SingleSelect)
        }
    }

    pub const fn radio(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            options,
            ..Self::new(name, label, FieldKind::RadioGroup)
        }
    }

    pub const fn tags(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            options,
            ..Self::new(name, label, FieldKind::MultiSelectTags)
        }
    }

    pub const fn with_default(self, default: FieldDefault) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: Condition::Always,
            ..self
        }
    }

    pub const fn required_when(self, condition: Condition) -> Self {
        Self {
            required: condition,
            ..self
        }
    }

    pub const fn visible_when(self, condition: Condition) -> Self {
        Self {
            visible_when: condition,
            ..self
        }
    }

    pub fn default_value(&self) -> Option<FieldValue> {
        self.default.map(FieldDefault::to_value)
    }

    /// Convert a raw JSON value into this field's value shape.
    ///
    /// Returns `Ok(None)` for `null`, and `Err(ShapeMismatch)` when the JSON shape cannot
    /// represent a value of this field's kind.
    pub fn coerce(&self, raw: &Value) -> Result<Option<FieldValue>, ShapeMismatch> {
        match (self.kind, raw) {
            (_, Value::Null) => Ok(None),
            (FieldKind::Boolean, Value::Bool(flag)) => Ok(Some(FieldValue::Flag(*flag))),
            (FieldKind::Boolean, Value::String(text)) => parse_flag(text).map(Some),
            (FieldKind::Boolean, Value::Number(number)) => match number.as_i64() {
                Some(0) => Ok(Some(FieldValue::Flag(false))),
                Some(1) => Ok(Some(FieldValue::Flag(true))),
                _ => Err(ShapeMismatch),
            },
            (FieldKind::MultiSelectTags, Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::trim).ok_or(ShapeMismatch))
                .collect::<Result<Vec<_>, ShapeMismatch>>()
                .map(|tags| Some(FieldValue::Tags(dedup_tags(tags)))),
            (FieldKind::MultiSelectTags, Value::String(text)) => Ok(Some(FieldValue::Tags(
                dedup_tags(text.split(',').map(str::trim)),
            ))),
            (FieldKind::Boolean | FieldKind::MultiSelectTags, _) => Err(ShapeMismatch),
            (_, Value::String(text)) => Ok(Some(FieldValue::Text(text.clone()))),
            (_, Value::Number(number)) => Ok(Some(FieldValue::Text(number.to_string()))),
            (_, Value::Bool(flag)) => Ok(Some(FieldValue::Text(flag.to_string()))),
            (_, Value::Array(_) | Value::Object(_)) => Err(ShapeMismatch),
        }
    }
}

fn parse_flag(text: &str) -> Result<FieldValue, ShapeMismatch> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(FieldValue::Flag(true)),
        "false" | "off" | "0" | "no" | "" => Ok(FieldValue::Flag(false)),
        _ => Err(ShapeMismatch),
    }
}

/// Ordered set semantics: keep first occurrence, drop blanks.
fn dedup_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for tag in tags {
        if !tag.is_empty() && !seen.iter().any(|existing| existing == tag) {
            seen.push(tag.to_string());
        }
    }
    seen
}

/// Ordered field list for one job kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigSchema {
    pub kind: JobKind,
    pub fields: &'static [ConfigField],
}

impl ConfigSchema {
    pub fn field(&self, name: &str) -> Option<&'static ConfigField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields whose visibility depends on `discriminator`.
    pub fn dependents_of<'s>(
        &'s self,
        discriminator: &'s str,
    ) -> impl Iterator<Item = &'static ConfigField> + 's {
        self.fields
            .iter()
            .filter(move |field| field.visible_when.depends_on() == Some(discriminator))
    }
}

/// Validated payload for job creation and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: JobKind,
    pub description: String,
    pub disabled: bool,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl ConfigPayload {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    /// Typed view of the embedded source-control section, for kinds that
    /// have one.
    pub fn source_control(&self) -> Option<SourceControlSpec> {
        if !matches!(self.kind, JobKind::Freestyle | JobKind::Matrix) {
            return None;
        }
        let scm_type = self.text("scm_type")?.parse().ok()?;
        let behaviours = match self.fields.get("behaviours") {
            Some(FieldValue::Tags(tags)) => tags.iter().filter_map(|tag| tag.parse().ok()).collect(),
            _ => Vec::new(),
        };
        Some(SourceControlSpec {
            scm_type,
            repository_url: self.text("repository_url").map(str::to_string),
            credentials_id: self.text("credentials_id").map(str::to_string),
            branch_specifier: self.text("branch_specifier").map(str::to_string),
            repository_browser: self.text("repository_browser").and_then(|b| b.parse().ok()),
            behaviours,
        })
    }

    /// Typed view of the pipeline definition, for pipeline jobs.
    pub fn pipeline(&self) -> Option<PipelineSpec> {
        if self.kind != JobKind::Pipeline {
            return None;
        }
        let definition = match self.text("pipeline_definition_type")?.parse().ok()? {
            PipelineDefinitionType::Script => PipelineDefinition::Script {
                pipeline_script: self.text("pipeline_script")?.to_string(),
            },
            PipelineDefinitionType::Scm => PipelineDefinition::Scm {
                repository_url: self.text("repository_url")?.to_string(),
                branch: self.text("branch").unwrap_or("main").to_string(),
                script_path: self.text("script_path").unwrap_or("Jenkinsfile").to_string(),
                credentials_id: self.text("credentials_id").map(str::to_string),
            },
        };
        Some(PipelineSpec { definition })
    }
}

// ── Source control ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScmType {
    None,
    Git,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RepositoryBrowser {
    Auto,
    Github,
    Gitlab,
    Bitbucket,
    Cgit,
    Gitweb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GitBehaviour {
    CleanCheckout,
    ShallowClone,
    SparseCheckout,
    Submodule,
    PollingIgnoresCommits,
}

/// Source-control section shared by freestyle and matrix jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceControlSpec {
    pub scm_type: ScmType,
    pub repository_url: Option<String>,
    pub credentials_id: Option<String>,
    pub branch_specifier: Option<String>,
    pub repository_browser: Option<RepositoryBrowser>,
    pub behaviours: Vec<GitBehaviour>,
}

// ── Pipeline definition ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PipelineDefinitionType {
    Script,
    Scm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "definition_type", rename_all = "lowercase")]
pub enum PipelineDefinition {
    Script {
        pipeline_script: String,
    },
    Scm {
        repository_url: String,
        branch: String,
        script_path: String,
        credentials_id: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSpec {
    pub definition: PipelineDefinition,
}
