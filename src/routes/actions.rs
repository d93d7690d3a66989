use axum::extract::{Path, State};
use axum::Json;

use crate::app_state::AppState;
use crate::routes::envelope::{ok, ApiError, Envelope};
use crate::services::console_client::Acknowledgement;

/// POST /api/nodes/{name}/toggle: Take a node offline or bring it back.
pub async fn toggle_node(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Envelope<Acknowledgement>>, ApiError> {
    let ack = state.console.toggle_node(&name).await?;
    tracing::info!(node = %name, "Node toggled");
    Ok(ok(ack))
}

/// POST /api/queue/{id}/cancel
pub async fn cancel_queue_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Envelope<Acknowledgement>>, ApiError> {
    let ack = state.console.cancel_queue_item(id).await?;
    tracing::info!(queue_id = id, "Queue item cancelled");
    Ok(ok(ack))
}
