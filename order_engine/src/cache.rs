//! # Order cache
//!
//! A process-lifetime, read-optimised map from `order_uid` to the full order aggregate. A single reader/writer lock
//! guards the map: `set` and the insertion phase of `restore_from_store` take it exclusively, lookups and snapshots
//! take it shared. The lock is never held across an `.await`.
//!
//! Entries are never evicted. `set` always replaces the whole aggregate; there is no merge. `set_if_absent` leaves an
//! existing entry alone.
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use log::*;
use parking_lot::RwLock;

use crate::{
    db_types::Order,
    traits::{OrderReader, OrderSink, OrderSource, StoreError},
};

#[derive(Debug, Default)]
pub struct OrderCache {
    orders: RwLock<HashMap<String, Arc<Order>>>,
}

impl OrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, order: Order) {
        let order_uid = order.order_uid.clone();
        self.orders.write().insert(order_uid, Arc::new(order));
    }

    pub fn set_if_absent(&self, order: Order) -> bool {
        match self.orders.write().entry(order.order_uid.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(order));
                true
            },
        }
    }

    pub fn get(&self, order_uid: &str) -> Option<Arc<Order>> {
        self.orders.read().get(order_uid).cloned()
    }

    /// Returns a copy of the whole map. Only the `Arc`s are cloned, so this is linear in the number of entries, and the
    /// shared lock is held for the duration of the copy.
    pub fn get_all(&self) -> HashMap<String, Arc<Order>> {
        self.orders.read().clone()
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }

    /// Reads every order from `store` and inserts them all.
    ///
    /// Fails only if the store read itself fails, in which case the cache is left untouched. An empty store is a
    /// success. Returns the number of orders loaded.
    pub async fn restore_from_store<S: OrderSource>(&self, store: &S) -> Result<usize, StoreError> {
        debug!("🗂️ Restoring order cache from the store");
        let orders = store.fetch_all_orders().await?;
        let count = orders.len();
        let mut map = self.orders.write();
        for order in orders {
            map.insert(order.order_uid.clone(), Arc::new(order));
        }
        debug!("🗂️ {count} orders restored. The cache now holds {} orders", map.len());
        Ok(count)
    }
}

impl OrderSink for OrderCache {
    fn set_order(&self, order: Order) {
        self.set(order)
    }

    fn set_order_if_absent(&self, order: Order) -> bool {
        self.set_if_absent(order)
    }
}

impl OrderReader for OrderCache {
    fn get_order(&self, order_uid: &str) -> Option<Arc<Order>> {
        self.get(order_uid)
    }

    fn all_orders(&self) -> HashMap<String, Arc<Order>> {
        self.get_all()
    }
}
