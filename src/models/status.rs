use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// Canonical status vocabulary used for every badge in the console.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusClass {
    Success,
    Failure,
    Unstable,
    Aborted,
    Disabled,
    Building,
    Unknown,
}

impl StatusClass {
    /// Human-readable label shown next to the badge.
    pub fn label(self) -> &'static str {
        match self {
            StatusClass::Success => "Success",
            StatusClass::Failure => "Failed",
            StatusClass::Unstable => "Unstable",
            StatusClass::Aborted => "Aborted",
            StatusClass::Disabled => "Disabled",
            StatusClass::Building => "Building",
            StatusClass::Unknown => "Unknown",
        }
    }
}

/// A `(class, label)` pair derived from a status signal. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanonicalStatus {
    pub class: StatusClass,
    pub label: &'static str,
}

impl CanonicalStatus {
    pub const UNKNOWN: CanonicalStatus = CanonicalStatus {
        class: StatusClass::Unknown,
        label: "Unknown",
    };

    pub const PENDING: CanonicalStatus = CanonicalStatus {
        class: StatusClass::Unknown,
        label: "Pending",
    };

    pub fn of(class: StatusClass) -> Self {
        Self {
            class,
            label: class.label(),
        }
    }
}

/// Whatever subset of status information an upstream job or build record
/// carries. Fields may contradict each other; the classifier decides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSignal {
    /// Explicit result keyword such as `SUCCESS` or `NOT_BUILT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Ball colour token such as `blue_anime`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Free-text status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<bool>,
}

impl StatusSignal {
    pub fn from_result(result: impl Into<String>) -> Self {
        Self {
            result: Some(result.into()),
            ..Self::default()
        }
    }

    pub fn from_color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    /// The text the classifier should look at: the first non-blank of
    /// `result`, `color`, `status`, in that order.
    pub fn status_text(&self) -> Option<&str> {
        [&self.result, &self.color, &self.status]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|text| !text.trim().is_empty())
    }

    pub fn is_building(&self) -> bool {
        self.building.unwrap_or(false)
    }
}
