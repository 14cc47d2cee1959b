use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub serial_number: String,
    pub description: Option<String>,
    pub price: f64,
    pub assigned_to: Option<String>,
}

/// Item row with the assignee's username resolved, as returned by listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: String,
    pub name: String,
    pub serial_number: String,
    pub description: Option<String>,
    pub price: f64,
    pub assigned_to: Option<String>,
    pub assigned_to_username: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub item_id: String,
    pub buyer_name: String,
    pub sale_date: NaiveDate,
    pub user_id: String,
}

/// Sale row with the sold item's details resolved.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: String,
    pub item_name: String,
    pub item_serial: String,
    pub buyer_name: String,
    pub sale_date: NaiveDate,
    pub user_id: String,
}
