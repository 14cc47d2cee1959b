use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{Admin, CurrentUser};
use crate::api::server::AppState;
use crate::db::models::{Sale, SaleRecord};
use crate::db::{items, sales, users};
use crate::grouping::{group_by_owner, Owner, OwnerGroup};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSalePayload {
    pub item_id: Option<String>,
    pub buyer_name: Option<String>,
    pub sale_date: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesGroup {
    pub user_id: String,
    pub username: String,
    pub sales: Vec<SaleRecord>,
}

/// Records a sale for an item currently assigned to the caller. Sales are
/// immutable once written.
pub async fn record(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(payload): Json<RecordSalePayload>,
) -> ApiResult<impl IntoResponse> {
    let (Some(item_id), Some(buyer_name), Some(raw_date)) = (
        payload.item_id.filter(|v| !v.is_empty()),
        payload.buyer_name.filter(|v| !v.is_empty()),
        payload.sale_date.filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::validation(
            "Item ID, buyer name, and sale date are required",
        ));
    };
    let sale_date: NaiveDate = raw_date
        .parse()
        .map_err(|_| ApiError::validation("Sale date must be a valid YYYY-MM-DD date"))?;

    let item = items::find_by_id(&state.db, &item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;
    if item.assigned_to.as_deref() != Some(user.id.as_str()) {
        return Err(ApiError::forbidden("Item not assigned to you"));
    }

    let sale = Sale {
        id: Uuid::new_v4().to_string(),
        item_id,
        buyer_name,
        sale_date,
        user_id: user.id,
    };
    sales::insert(&state.db, &sale).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// The caller's own sales, item details resolved.
pub async fn mine(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<SaleRecord>>> {
    Ok(Json(sales::list_for_user(&state.db, &user.id).await?))
}

/// Full recompute of the per-user sale groups, shared with the PDF export.
pub(crate) async fn grouped(state: &AppState) -> ApiResult<Vec<OwnerGroup<SaleRecord>>> {
    let owners: Vec<Owner> = users::list(&state.db)
        .await?
        .into_iter()
        .map(|user| Owner {
            id: user.id,
            name: user.username,
        })
        .collect();
    let sales = sales::list_all(&state.db).await?;
    Ok(group_by_owner(
        &owners,
        sales,
        |sale| Some(sale.user_id.as_str()),
        "unknown",
        "Unknown",
    ))
}

/// One group per user plus an "Unknown" bucket for sales whose recording
/// user has since been deleted.
pub async fn by_user(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
) -> ApiResult<Json<Vec<SalesGroup>>> {
    let groups = grouped(&state).await?;
    Ok(Json(groups.into_iter().map(SalesGroup::from).collect()))
}

impl From<OwnerGroup<SaleRecord>> for SalesGroup {
    fn from(group: OwnerGroup<SaleRecord>) -> Self {
        Self {
            user_id: group.user_id,
            username: group.username,
            sales: group.rows,
        }
    }
}
