use sqlx::SqlitePool;

use crate::db::models::{Item, ItemRecord};

const SELECT_WITH_ASSIGNEE: &str = r#"
    SELECT items.id, items.name, items.serial_number, items.description,
           items.price, items.assigned_to, users.username AS assigned_to_username
    FROM items
    LEFT JOIN users ON users.id = items.assigned_to
"#;

pub async fn insert(pool: &SqlitePool, item: &Item) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO items (id, name, serial_number, description, price, assigned_to)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&item.id)
    .bind(&item.name)
    .bind(&item.serial_number)
    .bind(&item.description)
    .bind(item.price)
    .bind(&item.assigned_to)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Existing item whose name or serial number collides with the given pair.
pub async fn find_conflict(
    pool: &SqlitePool,
    name: &str,
    serial_number: &str,
) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>("SELECT * FROM items WHERE name = ? OR serial_number = ?")
        .bind(name)
        .bind(serial_number)
        .fetch_optional(pool)
        .await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<ItemRecord>, sqlx::Error> {
    sqlx::query_as::<_, ItemRecord>(&format!("{SELECT_WITH_ASSIGNEE} ORDER BY items.rowid"))
        .fetch_all(pool)
        .await
}

pub async fn list_assigned_to(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<ItemRecord>, sqlx::Error> {
    sqlx::query_as::<_, ItemRecord>(&format!(
        "{SELECT_WITH_ASSIGNEE} WHERE items.assigned_to = ? ORDER BY items.rowid"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn set_assignee(
    pool: &SqlitePool,
    item_id: &str,
    user_id: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE items SET assigned_to = ? WHERE id = ?")
        .bind(user_id)
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Clears the assignment on every item held by the given user.
pub async fn unassign_all_for(pool: &SqlitePool, user_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE items SET assigned_to = NULL WHERE assigned_to = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
