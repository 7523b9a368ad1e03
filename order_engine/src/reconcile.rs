//! # Startup reconciliation
//!
//! Loads every persisted order into the cache once, before the subscriber attaches. A failure here is not fatal. The
//! service carries on with whatever the cache holds, and new orders fill it as they arrive. Orders that were persisted
//! before the failed restore stay invisible to readers until the next successful restart, so the failure is logged
//! loudly.
use log::*;

use crate::{cache::OrderCache, traits::OrderSource};

/// The result of a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileReport {
    /// The cache was rehydrated with this many orders.
    Restored(usize),
    /// The store could not be read. The cache holds this many (previously set) orders.
    Degraded(usize),
}

impl ReconcileReport {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Restored(_))
    }
}

/// Rehydrates `cache` from `store`. Never fails, see the module docs.
pub async fn reconcile<S: OrderSource>(cache: &OrderCache, store: &S) -> ReconcileReport {
    info!("🔄️ Restoring the order cache from the database...");
    match cache.restore_from_store(store).await {
        Ok(count) => {
            info!("🔄️ Cache restored: {count} orders loaded");
            ReconcileReport::Restored(count)
        },
        Err(e) => {
            let count = cache.len();
            warn!(
                "🔄️ Could not restore the order cache from the database. {e}. Continuing with {count} cached orders. \
                 Orders persisted before this start will not be served until the next successful restore."
            );
            ReconcileReport::Degraded(count)
        },
    }
}
