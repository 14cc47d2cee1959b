use sqlx::SqlitePool;

use crate::db::models::{Sale, SaleRecord};

const SELECT_WITH_ITEM: &str = r#"
    SELECT sales.id, items.name AS item_name, items.serial_number AS item_serial,
           sales.buyer_name, sales.sale_date, sales.user_id
    FROM sales
    JOIN items ON items.id = sales.item_id
"#;

pub async fn insert(pool: &SqlitePool, sale: &Sale) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO sales (id, item_id, buyer_name, sale_date, user_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.item_id)
    .bind(&sale.buyer_name)
    .bind(sale.sale_date)
    .bind(&sale.user_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<SaleRecord>, sqlx::Error> {
    sqlx::query_as::<_, SaleRecord>(&format!(
        "{SELECT_WITH_ITEM} WHERE sales.user_id = ? ORDER BY sales.rowid"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<SaleRecord>, sqlx::Error> {
    sqlx::query_as::<_, SaleRecord>(&format!("{SELECT_WITH_ITEM} ORDER BY sales.rowid"))
        .fetch_all(pool)
        .await
}
