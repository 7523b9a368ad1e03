use sqlx::SqliteConnection;

use crate::{db_types::Delivery, traits::StoreError};

pub async fn insert_delivery(
    order_uid: &str,
    delivery: &Delivery,
    conn: &mut SqliteConnection,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
            INSERT INTO delivery (order_uid, name, phone, zip, city, address, region, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8);
        "#,
    )
    .bind(order_uid)
    .bind(delivery.name.as_str())
    .bind(delivery.phone.as_str())
    .bind(delivery.zip.as_str())
    .bind(delivery.city.as_str())
    .bind(delivery.address.as_str())
    .bind(delivery.region.as_str())
    .bind(delivery.email.as_str())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn fetch_delivery(order_uid: &str, conn: &mut SqliteConnection) -> Result<Option<Delivery>, StoreError> {
    let delivery = sqlx::query_as(
        "SELECT name, phone, zip, city, address, region, email FROM delivery WHERE order_uid = $1",
    )
    .bind(order_uid)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(delivery)
}
