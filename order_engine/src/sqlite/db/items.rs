use sqlx::SqliteConnection;

use crate::{db_types::Item, traits::StoreError};

/// Inserts one row per item. Rows are numbered by the table's autoincrement key, which preserves the item order.
pub async fn insert_items(order_uid: &str, items: &[Item], conn: &mut SqliteConnection) -> Result<(), StoreError> {
    for item in items {
        sqlx::query(
            r#"
                INSERT INTO items (
                    order_uid,
                    chrt_id,
                    track_number,
                    price,
                    rid,
                    name,
                    sale,
                    size,
                    total_price,
                    nm_id,
                    brand,
                    status
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12);
            "#,
        )
        .bind(order_uid)
        .bind(item.chrt_id)
        .bind(item.track_number.as_str())
        .bind(item.price)
        .bind(item.rid.as_str())
        .bind(item.name.as_str())
        .bind(item.sale)
        .bind(item.size.as_str())
        .bind(item.total_price)
        .bind(item.nm_id)
        .bind(item.brand.as_str())
        .bind(item.status)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn fetch_items(order_uid: &str, conn: &mut SqliteConnection) -> Result<Vec<Item>, StoreError> {
    let items = sqlx::query_as(
        r#"
        SELECT chrt_id, track_number, price, rid, name, sale, size, total_price, nm_id, brand, status
        FROM items WHERE order_uid = $1
        ORDER BY id ASC"#,
    )
    .bind(order_uid)
    .fetch_all(&mut *conn)
    .await?;
    Ok(items)
}
