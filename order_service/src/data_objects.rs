use order_engine::db_types::Order;
use serde::Serialize;

/// The body of `GET /api/orders`.
#[derive(Debug, Serialize)]
pub struct OrderList<'a> {
    pub count: usize,
    pub orders: Vec<&'a Order>,
}

impl<'a> OrderList<'a> {
    /// Sorts the orders newest first. Orders created at the same instant are ordered by `order_uid`, so the listing is
    /// stable between calls.
    pub fn new<I: IntoIterator<Item = &'a Order>>(orders: I) -> Self {
        let mut orders = orders.into_iter().collect::<Vec<_>>();
        orders.sort_by(|a, b| b.date_created.cmp(&a.date_created).then_with(|| a.order_uid.cmp(&b.order_uid)));
        Self { count: orders.len(), orders }
    }
}
