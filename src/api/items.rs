use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{Admin, CurrentUser};
use crate::api::server::AppState;
use crate::db::models::{Item, ItemRecord};
use crate::db::{items, users};
use crate::grouping::{group_by_owner, Owner, OwnerGroup};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemPayload {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPayload {
    pub user_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsGroup {
    pub user_id: String,
    pub username: String,
    pub items: Vec<ItemRecord>,
}

/// Admins see every item with its assignee resolved; everyone else sees only
/// the items assigned to them.
pub async fn list(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<ItemRecord>>> {
    let items = if user.is_admin() {
        items::list_all(&state.db).await?
    } else {
        items::list_assigned_to(&state.db, &user.id).await?
    };
    Ok(Json(items))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
    Json(payload): Json<CreateItemPayload>,
) -> ApiResult<impl IntoResponse> {
    let (Some(name), Some(serial_number), Some(price)) = (
        payload.name.filter(|v| !v.is_empty()),
        payload.serial_number.filter(|v| !v.is_empty()),
        payload.price,
    ) else {
        return Err(ApiError::validation(
            "Name, serial number, and price are required",
        ));
    };
    if price < 0.0 {
        return Err(ApiError::validation("Price must be non-negative"));
    }

    if let Some(existing) = items::find_conflict(&state.db, &name, &serial_number).await? {
        let message = if existing.name == name {
            "Item name already exists"
        } else {
            "Serial number already exists"
        };
        return Err(ApiError::conflict(message));
    }

    let item = Item {
        id: Uuid::new_v4().to_string(),
        name,
        serial_number,
        description: payload.description,
        price,
        assigned_to: None,
    };
    items::insert(&state.db, &item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Sets or clears the item's assignee.
pub async fn assign(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
    Path(item_id): Path<String>,
    Json(payload): Json<AssignPayload>,
) -> ApiResult<Json<Item>> {
    let mut item = items::find_by_id(&state.db, &item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;

    if let Some(user_id) = &payload.user_id {
        users::find_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
    }

    items::set_assignee(&state.db, &item.id, payload.user_id.as_deref()).await?;
    item.assigned_to = payload.user_id;
    Ok(Json(item))
}

/// Full recompute of the per-user item groups, shared with the PDF export.
pub(crate) async fn grouped(state: &AppState) -> ApiResult<Vec<OwnerGroup<ItemRecord>>> {
    let owners: Vec<Owner> = users::list(&state.db)
        .await?
        .into_iter()
        .map(|user| Owner {
            id: user.id,
            name: user.username,
        })
        .collect();
    let items = items::list_all(&state.db).await?;
    Ok(group_by_owner(
        &owners,
        items,
        |item| item.assigned_to.as_deref(),
        "unassigned",
        "Unassigned",
    ))
}

/// One group per user (zero-item users included) plus the unassigned bucket.
pub async fn by_user(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
) -> ApiResult<Json<Vec<ItemsGroup>>> {
    let groups = grouped(&state).await?;
    Ok(Json(groups.into_iter().map(ItemsGroup::from).collect()))
}

impl From<OwnerGroup<ItemRecord>> for ItemsGroup {
    fn from(group: OwnerGroup<ItemRecord>) -> Self {
        Self {
            user_id: group.user_id,
            username: group.username,
            items: group.rows,
        }
    }
}
