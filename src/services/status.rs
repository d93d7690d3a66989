//! Status classification.
//!
//! Upstream records describe state in several overlapping ways: an explicit
//! build result, a ball colour, free text, and a "currently building" flag.
//! Everything is reduced here to one [`CanonicalStatus`], with a fixed
//! precedence that downstream displays depend on:
//!
//! 1. exact result keyword
//! 2. colour token containment
//! 3. free-text containment
//! 4. building flag, only when no status text is present
//! 5. unknown

use crate::models::status::{CanonicalStatus, StatusClass, StatusSignal};

// ── Keyword and token tables ────────────────────────────────────────────

/// Exact result keywords, including historic aliases.
const RESULT_KEYWORDS: &[(&str, StatusClass)] = &[
    ("success", StatusClass::Success),
    ("stable", StatusClass::Success),
    ("failure", StatusClass::Failure),
    ("failed", StatusClass::Failure),
    ("unstable", StatusClass::Unstable),
    ("aborted", StatusClass::Aborted),
    ("cancelled", StatusClass::Aborted),
    ("not_built", StatusClass::Disabled),
    ("disabled", StatusClass::Disabled),
];

/// Ball colour tokens, tested in order. The base colour wins over an
/// `_anime` suffix, so `blue_anime` reads as success.
const COLOR_TOKENS: &[(&str, StatusClass)] = &[
    ("blue", StatusClass::Success),
    ("red", StatusClass::Failure),
    ("yellow", StatusClass::Unstable),
    ("grey", StatusClass::Disabled),
    ("gray", StatusClass::Disabled),
    ("aborted", StatusClass::Aborted),
    ("anime", StatusClass::Building),
    ("blinking", StatusClass::Building),
];

const TEXT_TOKENS: &[(&str, StatusClass)] = &[
    ("success", StatusClass::Success),
    ("pass", StatusClass::Success),
    ("fail", StatusClass::Failure),
    ("error", StatusClass::Failure),
    ("building", StatusClass::Building),
    ("running", StatusClass::Building),
];

const PENDING_TOKENS: &[&str] = &["pending", "queued"];

// ── Classification ──────────────────────────────────────────────────────

/// Classify a full status signal. Total: never fails.
pub fn classify(signal: &StatusSignal) -> CanonicalStatus {
    match signal.status_text() {
        Some(text) => classify_text(Some(text)),
        None if signal.is_building() => CanonicalStatus::of(StatusClass::Building),
        None => CanonicalStatus::UNKNOWN,
    }
}

/// Classify a single status string. `None` and blank input are unknown.
///
/// Input is trimmed and lowercased before matching, so `" SUCCESS "` reads
/// as `success`.
pub fn classify_text(raw: Option<&str>) -> CanonicalStatus {
    let Some(raw) = raw else {
        return CanonicalStatus::UNKNOWN;
    };
    let status = raw.trim().to_lowercase();
    if status.is_empty() {
        return CanonicalStatus::UNKNOWN;
    }

    if let Some((_, class)) = RESULT_KEYWORDS.iter().find(|(keyword, _)| *keyword == status) {
        return CanonicalStatus::of(*class);
    }

    if let Some(class) = first_contained(COLOR_TOKENS, &status) {
        return CanonicalStatus::of(class);
    }

    if let Some(class) = first_contained(TEXT_TOKENS, &status) {
        return CanonicalStatus::of(class);
    }

    if PENDING_TOKENS.iter().any(|token| status.contains(token)) {
        return CanonicalStatus::PENDING;
    }

    CanonicalStatus::UNKNOWN
}

fn first_contained(table: &[(&str, StatusClass)], status: &str) -> Option<StatusClass> {
    table
        .iter()
        .find(|(token, _)| status.contains(token))
        .map(|(_, class)| *class)
}
