use sqlx::SqliteConnection;

use crate::{db_types::Payment, traits::StoreError};

pub async fn insert_payment(order_uid: &str, payment: &Payment, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    sqlx::query(
        r#"
            INSERT INTO payment (
                order_uid,
                "transaction",
                request_id,
                currency,
                provider,
                amount,
                payment_dt,
                bank,
                delivery_cost,
                goods_total,
                custom_fee
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11);
        "#,
    )
    .bind(order_uid)
    .bind(payment.transaction.as_str())
    .bind(payment.request_id.as_str())
    .bind(payment.currency.as_str())
    .bind(payment.provider.as_str())
    .bind(payment.amount)
    .bind(payment.payment_dt)
    .bind(payment.bank.as_str())
    .bind(payment.delivery_cost)
    .bind(payment.goods_total)
    .bind(payment.custom_fee)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn fetch_payment(order_uid: &str, conn: &mut SqliteConnection) -> Result<Option<Payment>, StoreError> {
    let payment = sqlx::query_as(
        r#"
        SELECT
            "transaction",
            request_id,
            currency,
            provider,
            amount,
            payment_dt,
            bank,
            delivery_cost,
            goods_total,
            custom_fee
        FROM payment WHERE order_uid = $1"#,
    )
    .bind(order_uid)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(payment)
}
