use std::future::Future;

use thiserror::Error;

use crate::{db_types::Order, traits::SaveOrderResult};

/// Durable, idempotent writes of order aggregates.
pub trait OrderWriter {
    /// Stores the order, its delivery and payment records, and all of its items in a single atomic transaction.
    ///
    /// If a header row already exists for `order.order_uid`, nothing is written and
    /// [`SaveOrderResult::AlreadyExists`] is returned. This includes the case where a concurrent transaction inserted
    /// the same order between this call starting and committing. Either all rows for the order are committed, or none
    /// are.
    fn save_order(&self, order: &Order) -> impl Future<Output = Result<SaveOrderResult, StoreError>> + Send;
}

/// A full read of every persisted order, used to rehydrate the cache.
pub trait OrderSource {
    /// Returns every stored order aggregate, newest (`date_created`) first.
    ///
    /// A missing delivery or payment row produces a zero-valued sub-structure. Any database failure aborts the whole
    /// read, so a partial result set is never returned.
    fn fetch_all_orders(&self) -> impl Future<Output = Result<Vec<Order>, StoreError>> + Send;
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Could not reach the order database. {0}")]
    Connection(String),
    #[error("A constraint was violated while writing order data. {0}")]
    Constraint(String),
    #[error("The order database returned an error. {0}")]
    Query(String),
    #[error("Order {0} already exists")]
    AlreadyExists(String),
}

impl StoreError {
    /// Connection-level failures are not something a single message can fix, but they are transient.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(err) if err.is_unique_violation() => Self::Constraint(err.to_string()),
            sqlx::Error::Database(err) if err.is_foreign_key_violation() || err.is_check_violation() => {
                Self::Constraint(err.to_string())
            },
            sqlx::Error::Io(_) |
            sqlx::Error::Tls(_) |
            sqlx::Error::PoolTimedOut |
            sqlx::Error::PoolClosed |
            sqlx::Error::WorkerCrashed |
            sqlx::Error::Configuration(_) => Self::Connection(e.to_string()),
            _ => Self::Query(e.to_string()),
        }
    }
}
