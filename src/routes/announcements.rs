use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{error::AnnouncementError, models::role::RoleQuery, AppState};

/// GET /announcements?role=student — feed for the given viewer role, newest first.
pub async fn list_announcements(
    State(state): State<AppState>,
    Query(params): Query<RoleQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let role = params.viewer_role();
    let feed = state.feed.get_for_user(&role).await.map_err(upstream_error)?;
    serde_json::to_value(feed)
        .map(Json)
        .map_err(|e| {
            tracing::error!("Failed to serialize announcements: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal error" })),
            )
        })
}

/// GET /announcements/recent?role=student — "new" badge data for the dashboard.
pub async fn recent_summary(
    State(state): State<AppState>,
    Query(params): Query<RoleQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let role = params.viewer_role();
    let count = state
        .feed
        .count_recent_for_user(&role)
        .await
        .map_err(upstream_error)?;

    Ok(Json(json!({ "hasRecent": count > 0, "count": count })))
}

/// The technical cause was already logged by the service; callers only get the user message.
fn upstream_error(e: AnnouncementError) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": e.user_message() })),
    )
}
