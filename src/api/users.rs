use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::Admin;
use crate::api::server::AppState;
use crate::db::models::{Item, User};
use crate::db::{items, users};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPayload {
    pub user_id: Option<String>,
    pub item_id: Option<String>,
}

pub async fn list(State(state): State<Arc<AppState>>, _admin: Admin) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(users::list(&state.db).await?))
}

/// Deletes a user and clears their item assignments. Historical sales keep
/// the dangling recorder id; self-deletion is refused.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    admin: Admin,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if admin.0.id == user_id {
        return Err(ApiError::forbidden("Cannot delete your own account"));
    }
    users::find_by_id(&state.db, &user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    users::delete(&state.db, &user_id).await?;
    items::unassign_all_for(&state.db, &user_id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

/// Body-driven twin of the item assignment endpoint.
pub async fn assign(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
    Json(payload): Json<AssignPayload>,
) -> ApiResult<Json<Item>> {
    let (Some(user_id), Some(item_id)) = (
        payload.user_id.filter(|v| !v.is_empty()),
        payload.item_id.filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::validation("userId and itemId are required"));
    };

    let mut item = items::find_by_id(&state.db, &item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;
    users::find_by_id(&state.db, &user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    items::set_assignee(&state.db, &item.id, Some(&user_id)).await?;
    item.assigned_to = Some(user_id);
    Ok(Json(item))
}
