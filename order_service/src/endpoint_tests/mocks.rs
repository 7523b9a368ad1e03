use std::{collections::HashMap, sync::Arc};

use mockall::mock;
use order_engine::{db_types::Order, OrderReader};

mock! {
    pub Reader {}
    impl OrderReader for Reader {
        fn get_order(&self, order_uid: &str) -> Option<Arc<Order>>;
        fn all_orders(&self) -> HashMap<String, Arc<Order>>;
    }
}
