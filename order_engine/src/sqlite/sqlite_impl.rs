//! `SqliteDatabase` is the concrete order store.
//!
//! It implements [`OrderWriter`] and [`OrderSource`] on top of a shared connection pool. Every `save_order` call runs
//! in its own transaction, so any number of them can be in flight at once.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::Migrator, SqlitePool};

use super::db::{new_pool, orders};
use crate::{
    db_types::Order,
    traits::{OrderSource, OrderWriter, SaveOrderResult, StoreError},
};

static MIGRATOR: Migrator = sqlx::migrate!("./src/sqlite/migrations");

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl OrderWriter for SqliteDatabase {
    async fn save_order(&self, order: &Order) -> Result<SaveOrderResult, StoreError> {
        let mut tx = self.pool.begin().await?;
        // Dropping `tx` on any early return rolls back everything written so far
        let result = orders::idempotent_insert(order, &mut tx).await?;
        tx.commit().await?;
        trace!("🗃️ Order [{}] save complete: {result}", order.order_uid);
        Ok(result)
    }
}

impl OrderSource for SqliteDatabase {
    /// Reads every aggregate inside one read transaction, so the result is a consistent snapshot of the store.
    async fn fetch_all_orders(&self) -> Result<Vec<Order>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let orders = orders::fetch_all_orders(&mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Fetched {} orders from the store", orders.len());
        Ok(orders)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await.map_err(|e| StoreError::Connection(e.to_string()))?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Applies any pending schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        MIGRATOR.run(&self.pool).await.map_err(|e| StoreError::Query(format!("Migration failed. {e}")))?;
        info!("🗃️ Database migrations are up to date");
        Ok(())
    }

    /// The URL of the database
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Fetches a single full order aggregate straight from the store, bypassing any cache.
    pub async fn fetch_order(&self, order_uid: &str) -> Result<Option<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_uid(order_uid, &mut conn).await
    }

    pub async fn order_exists(&self, order_uid: &str) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::order_exists(order_uid, &mut conn).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("🗃️ Order database connections closed");
    }
}
