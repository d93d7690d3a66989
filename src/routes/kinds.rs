use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;
use crate::models::config::{ConfigSchema, FieldValues};
use crate::models::job_kind::JobKind;
use crate::models::plugin::PluginReport;
use crate::models::status::{CanonicalStatus, StatusSignal};
use crate::routes::envelope::{ok, ApiError, Envelope};
use crate::services::registry::{self, KindDescriptor};
use crate::services::schema::{self, ResolvedForm};
use crate::services::{status, submission};

#[derive(Serialize)]
pub struct KindsResponse {
    pub kinds: Vec<&'static KindDescriptor>,
}

#[derive(Serialize)]
pub struct SchemaResponse {
    pub descriptor: &'static KindDescriptor,
    pub schema: ConfigSchema,
}

#[derive(Serialize)]
pub struct FormResponse {
    pub form: ResolvedForm,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: CanonicalStatus,
}

/// GET /api/kinds: Creatable job kinds in display order.
pub async fn list_kinds() -> Json<Envelope<KindsResponse>> {
    ok(KindsResponse {
        kinds: registry::creatable_kinds().collect(),
    })
}

/// GET /api/kinds/{kind}/schema: Field schema for one kind.
pub async fn kind_schema(Path(kind): Path<String>) -> Json<Envelope<SchemaResponse>> {
    let descriptor = registry::describe_str(&kind);
    ok(SchemaResponse {
        descriptor,
        schema: descriptor.schema(),
    })
}

/// POST /api/kinds/{kind}/resolve: Editing view of a configuration record.
pub async fn resolve_form(
    Path(kind): Path<String>,
    Json(record): Json<FieldValues>,
) -> Json<Envelope<FormResponse>> {
    ok(FormResponse {
        form: schema::resolve_form(JobKind::parse(&kind), &record),
    })
}

/// GET /api/plugins/check/{kind}: Required plugin availability for a kind.
pub async fn check_plugins(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Envelope<PluginReport>>, ApiError> {
    let report = submission::check_plugins(&state.console, JobKind::parse(&kind)).await?;
    Ok(ok(report))
}

/// POST /api/status/classify: Canonical status of a status signal.
pub async fn classify_status(Json(signal): Json<StatusSignal>) -> Json<Envelope<StatusResponse>> {
    ok(StatusResponse {
        status: status::classify(&signal),
    })
}
