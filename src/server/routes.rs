// src/server/routes.rs

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::server::AppState;
use crate::server::handler;

/// Build the router; `/debug` is only mounted when enabled.
pub fn routes(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(handler::liveness))
        .route("/updates", get(handler::updates))
        .route("/updates/esp32", get(handler::updates_compact));

    if state.debug_enabled {
        router = router.route("/debug", get(handler::debug));
    }
    router.with_state(state)
}
