use log::{debug, trace};
use sqlx::SqliteConnection;

use super::{deliveries, items, payments};
use crate::{
    db_types::Order,
    traits::{SaveOrderResult, StoreError},
};

/// Inserts the full order aggregate, unless a header row for the `order_uid` already exists.
///
/// The header insert doubles as the existence check (`ON CONFLICT DO NOTHING`), so two concurrent writers of the same
/// order resolve at the primary key rather than racing between a lookup and an insert. Whoever loses sees zero affected
/// rows, or a unique violation from the driver, and reports [`SaveOrderResult::AlreadyExists`] without touching the
/// other tables.
///
/// This is not atomic on its own. Run it inside a transaction and pass `&mut tx` as the connection.
pub async fn idempotent_insert(order: &Order, conn: &mut SqliteConnection) -> Result<SaveOrderResult, StoreError> {
    match insert_header(order, conn).await {
        Ok(true) => {},
        Ok(false) | Err(StoreError::AlreadyExists(_)) => {
            debug!("🗃️ Order [{}] already exists. Skipping insert.", order.order_uid);
            return Ok(SaveOrderResult::AlreadyExists);
        },
        Err(e) => return Err(e),
    }
    let order_uid = order.order_uid.as_str();
    deliveries::insert_delivery(order_uid, &order.delivery, conn).await?;
    payments::insert_payment(order_uid, &order.payment, conn).await?;
    items::insert_items(order_uid, &order.items, conn).await?;
    debug!("🗃️ Order [{order_uid}] inserted with {} items", order.items.len());
    Ok(SaveOrderResult::Inserted)
}

/// Inserts the header row. Returns `false` if a row with this `order_uid` is already present.
async fn insert_header(order: &Order, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
            INSERT INTO orders (
                order_uid,
                track_number,
                entry,
                locale,
                internal_signature,
                customer_id,
                delivery_service,
                shardkey,
                sm_id,
                date_created,
                oof_shard
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (order_uid) DO NOTHING;
        "#,
    )
    .bind(order.order_uid.as_str())
    .bind(order.track_number.as_str())
    .bind(order.entry.as_str())
    .bind(order.locale.as_str())
    .bind(order.internal_signature.as_str())
    .bind(order.customer_id.as_str())
    .bind(order.delivery_service.as_str())
    .bind(order.shardkey.as_str())
    .bind(order.sm_id)
    .bind(order.date_created)
    .bind(order.oof_shard.as_str())
    .execute(&mut *conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => StoreError::AlreadyExists(order.order_uid.clone()),
        _ => StoreError::from(e),
    })?;
    Ok(result.rows_affected() > 0)
}

/// Checks whether a header row exists for the given `order_uid`.
pub async fn order_exists(order_uid: &str, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE order_uid = $1)")
        .bind(order_uid)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

/// Fetches the header rows of every order, newest first. The sub-structures are left empty.
pub async fn fetch_order_headers(conn: &mut SqliteConnection) -> Result<Vec<Order>, StoreError> {
    let orders = sqlx::query_as(
        r#"
        SELECT
            order_uid,
            track_number,
            entry,
            locale,
            internal_signature,
            customer_id,
            delivery_service,
            shardkey,
            sm_id,
            date_created,
            oof_shard
        FROM orders
        ORDER BY date_created DESC"#,
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(orders)
}

/// Assembles the full aggregate for every stored order, newest first.
///
/// A missing delivery or payment row yields the zero-valued record. Any failure aborts the whole read.
pub async fn fetch_all_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, StoreError> {
    let mut orders = fetch_order_headers(conn).await?;
    trace!("🗃️ Assembling {} order aggregates", orders.len());
    for order in orders.iter_mut() {
        complete_order(order, conn).await?;
    }
    Ok(orders)
}

/// Fetches a single full order aggregate, if it exists.
pub async fn fetch_order_by_uid(order_uid: &str, conn: &mut SqliteConnection) -> Result<Option<Order>, StoreError> {
    let header: Option<Order> = sqlx::query_as(
        r#"
        SELECT
            order_uid,
            track_number,
            entry,
            locale,
            internal_signature,
            customer_id,
            delivery_service,
            shardkey,
            sm_id,
            date_created,
            oof_shard
        FROM orders WHERE order_uid = $1"#,
    )
    .bind(order_uid)
    .fetch_optional(&mut *conn)
    .await?;
    match header {
        Some(mut order) => {
            complete_order(&mut order, conn).await?;
            Ok(Some(order))
        },
        None => Ok(None),
    }
}

async fn complete_order(order: &mut Order, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let order_uid = order.order_uid.as_str();
    order.delivery = deliveries::fetch_delivery(order_uid, conn).await?.unwrap_or_default();
    order.payment = payments::fetch_payment(order_uid, conn).await?.unwrap_or_default();
    order.items = items::fetch_items(order_uid, conn).await?;
    Ok(())
}
