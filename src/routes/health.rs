use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

/// GET /health — liveness only; the ERP endpoint is not probed.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "window_months": state.config.window_months,
            "in_flight": state.feed.in_flight(),
        })),
    )
}
