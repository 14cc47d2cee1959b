use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::Admin;
use crate::api::server::AppState;
use crate::db::models::{Role, User};
use crate::db::users;
use crate::security;

#[derive(Deserialize)]
pub struct RegisterPayload {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    pub username: Option<String>,
    pub password: Option<String>,
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// Admin-only account creation; passwords are stored as salted argon2 hashes.
pub async fn register(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
    Json(payload): Json<RegisterPayload>,
) -> ApiResult<impl IntoResponse> {
    let (Some(username), Some(password), Some(email)) = (
        required(payload.username),
        required(payload.password),
        required(payload.email),
    ) else {
        return Err(ApiError::validation(
            "Username, email, and password are required",
        ));
    };

    if let Some(existing) = users::find_conflict(&state.db, &username, &email).await? {
        let message = if existing.username == username {
            "Username already exists"
        } else {
            "Email already exists"
        };
        return Err(ApiError::conflict(message));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        username,
        email,
        password_hash: security::hash_password(&password)?,
        role: payload.role.unwrap_or(Role::User),
    };
    users::insert(&state.db, &user).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully" })),
    ))
}

/// Issues a one-hour session token. The failure message is identical for
/// unknown usernames and wrong passwords.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> ApiResult<impl IntoResponse> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let user = users::find_by_username(&state.db, &username).await?;
    let user = match user {
        Some(user) if security::verify_password(&user.password_hash, &password) => user,
        _ => return Err(ApiError::Auth("Invalid credentials".to_string())),
    };

    let token = state.tokens.issue(&user.id, user.role)?;
    Ok(Json(json!({ "token": token, "role": user.role })))
}
