pub mod items;
pub mod models;
pub mod sales;
pub mod users;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::config::Config;
use crate::db::models::{Role, User};
use crate::security;

pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Idempotent schema setup, run once at startup.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT UNIQUE NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL CHECK (role IN ('user', 'admin'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id TEXT PRIMARY KEY,
            name TEXT UNIQUE NOT NULL,
            serial_number TEXT UNIQUE NOT NULL,
            description TEXT,
            price REAL NOT NULL,
            assigned_to TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sales (
            id TEXT PRIMARY KEY,
            item_id TEXT NOT NULL,
            buyer_name TEXT NOT NULL,
            sale_date TEXT NOT NULL,
            user_id TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seeds the configured admin account into an empty database so the
/// admin-only registration endpoint is reachable on first boot.
pub async fn seed_admin(pool: &SqlitePool, config: &Config) -> ApiResult<()> {
    if users::count(pool).await? > 0 {
        return Ok(());
    }
    let password_hash = security::hash_password(&config.admin_password)?;
    let admin = User {
        id: Uuid::new_v4().to_string(),
        username: config.admin_username.clone(),
        email: config.admin_email.clone(),
        password_hash,
        role: Role::Admin,
    };
    users::insert(pool, &admin).await?;
    tracing::info!(username = %admin.username, "seeded initial admin account");
    Ok(())
}
