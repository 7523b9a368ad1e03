use std::{collections::HashMap, sync::Arc};

use crate::db_types::Order;

/// Anything that can accept a freshly persisted order.
pub trait OrderSink {
    /// Inserts or replaces the entry for `order.order_uid`. Cannot fail.
    fn set_order(&self, order: Order);

    /// Inserts `order` only if nothing is cached under its `order_uid` yet. Returns whether it was inserted.
    fn set_order_if_absent(&self, order: Order) -> bool;
}

/// The read boundary exposed to the HTTP front end. Implementations must never block on network I/O.
pub trait OrderReader {
    /// Looks up a single order. `None` signals absence, not an error.
    fn get_order(&self, order_uid: &str) -> Option<Arc<Order>>;

    /// An independent snapshot of every order. Mutating the returned map never affects the reader.
    fn all_orders(&self) -> HashMap<String, Arc<Order>>;
}

impl<T: OrderSink + ?Sized> OrderSink for Arc<T> {
    fn set_order(&self, order: Order) {
        (**self).set_order(order)
    }

    fn set_order_if_absent(&self, order: Order) -> bool {
        (**self).set_order_if_absent(order)
    }
}

impl<T: OrderReader + ?Sized> OrderReader for Arc<T> {
    fn get_order(&self, order_uid: &str) -> Option<Arc<Order>> {
        (**self).get_order(order_uid)
    }

    fn all_orders(&self) -> HashMap<String, Arc<Order>> {
        (**self).all_orders()
    }
}
