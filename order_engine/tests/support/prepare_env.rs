#![allow(dead_code)]
use chrono::{TimeZone, Utc};
use log::*;
use order_engine::{
    db_types::{Delivery, Item, Order, Payment},
    SqliteDatabase,
};
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/order_store_test_{}.db", dir.display(), rand::random::<u64>())
}

/// Creates a fresh, migrated database at a random location.
pub async fn prepare_test_env() -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let url = random_db_path();
    create_database(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    debug!("🚀️ Test database ready at {url}");
    db
}

pub async fn create_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        trace!("Could not drop database {url}: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

pub async fn tear_down(db: SqliteDatabase) {
    let url = db.url().to_string();
    db.close().await;
    if let Err(e) = Sqlite::drop_database(&url).await {
        warn!("🚀️ Failed to remove test database {url}: {e}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCounts {
    pub orders: i64,
    pub delivery: i64,
    pub payment: i64,
    pub items: i64,
}

pub async fn row_counts(db: &SqliteDatabase, order_uid: &str) -> RowCounts {
    let mut counts = [0i64; 4];
    for (i, table) in ["orders", "delivery", "payment", "items"].iter().enumerate() {
        counts[i] = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE order_uid = $1"))
            .bind(order_uid)
            .fetch_one(db.pool())
            .await
            .expect("Error counting rows");
    }
    RowCounts { orders: counts[0], delivery: counts[1], payment: counts[2], items: counts[3] }
}

/// A fully populated order, modelled on a real marketplace order event.
pub fn sample_order(order_uid: &str, day: u32) -> Order {
    Order {
        order_uid: order_uid.to_string(),
        track_number: "WBILMTESTTRACK".into(),
        entry: "WBIL".into(),
        delivery: Delivery {
            name: "Test Testov".into(),
            phone: "+9720000000".into(),
            zip: "2639809".into(),
            city: "Kiryat Mozkin".into(),
            address: "Ploshad Mira 15".into(),
            region: "Kraiot".into(),
            email: "test@gmail.com".into(),
        },
        payment: Payment {
            transaction: order_uid.to_string(),
            request_id: String::new(),
            currency: "USD".into(),
            provider: "wbpay".into(),
            amount: 1817,
            payment_dt: 1637907727,
            bank: "alpha".into(),
            delivery_cost: 1500,
            goods_total: 317,
            custom_fee: 0,
        },
        items: vec![
            Item {
                chrt_id: 9934930,
                track_number: "WBILMTESTTRACK".into(),
                price: 453,
                rid: "ab4219087a764ae0btest".into(),
                name: "Mascaras".into(),
                sale: 30,
                size: "0".into(),
                total_price: 317,
                nm_id: 2389212,
                brand: "Vivienne Sabo".into(),
                status: 202,
            },
            Item { chrt_id: 9934931, name: "Lipstick".into(), price: 200, total_price: 200, ..Default::default() },
        ],
        locale: "en".into(),
        internal_signature: String::new(),
        customer_id: "test".into(),
        delivery_service: "meest".into(),
        shardkey: "9".into(),
        sm_id: 99,
        date_created: Utc.with_ymd_and_hms(2021, 11, day, 6, 22, 19).unwrap(),
        oof_shard: "1".into(),
    }
}
