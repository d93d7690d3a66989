pub mod actions;
pub mod envelope;
pub mod health;
pub mod jobs;
pub mod kinds;
pub mod metrics;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::app_state::AppState;

/// Health and API routes. The binary adds `/metrics` and the HTTP layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/kinds", get(kinds::list_kinds))
        .route("/api/kinds/{kind}/schema", get(kinds::kind_schema))
        .route("/api/kinds/{kind}/resolve", post(kinds::resolve_form))
        .route("/api/status/classify", post(kinds::classify_status))
        .route("/api/plugins/check/{kind}", get(kinds::check_plugins))
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/create", post(jobs::create_job))
        .route("/api/jobs/{name}/delete", delete(jobs::delete_job))
        .route("/api/job/{name}/config", get(jobs::get_config))
        .route("/api/job/{name}/config/update", post(jobs::update_job))
        .route("/api/job/{name}/build", post(jobs::trigger_build))
        .route("/api/job/{name}/builds", get(jobs::list_builds))
        .route("/api/nodes/{name}/toggle", post(actions::toggle_node))
        .route("/api/queue/{id}/cancel", post(actions::cancel_queue_item))
        .with_state(state)
}
