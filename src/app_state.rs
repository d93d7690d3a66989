use std::sync::Arc;

use crate::services::console_client::ConsoleClient;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub console: Arc<ConsoleClient>,
}

impl AppState {
    pub fn new(console: ConsoleClient) -> Self {
        Self {
            console: Arc::new(console),
        }
    }
}
