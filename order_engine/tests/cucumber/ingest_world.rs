use std::sync::Arc;

use cucumber::World;
use log::*;
use order_engine::{IngestOutcome, OrderCache, OrderIngestor, SqliteDatabase};

use crate::support::{messages::TestMessage, prepare_env::prepare_test_env};

#[derive(Default, Debug, World)]
pub struct IngestWorld {
    pub system: Option<IngestSystem>,
}

#[derive(Debug)]
pub struct IngestSystem {
    pub db: SqliteDatabase,
    pub cache: Arc<OrderCache>,
    pub ingestor: OrderIngestor<SqliteDatabase, Arc<OrderCache>>,
    pub last_message: Option<TestMessage>,
    pub last_outcome: Option<IngestOutcome>,
    pub ingested: Vec<String>,
    next_sequence: u64,
}

impl IngestWorld {
    pub fn system(&mut self) -> &mut IngestSystem {
        self.system.as_mut().expect("Order system not initialised")
    }
}

impl IngestSystem {
    pub async fn new() -> Self {
        let db = prepare_test_env().await;
        debug!("Created database: {}", db.url());
        let cache = Arc::new(OrderCache::new());
        let ingestor = OrderIngestor::new(db.clone(), Arc::clone(&cache));
        Self { db, cache, ingestor, last_message: None, last_outcome: None, ingested: Vec::new(), next_sequence: 1 }
    }

    pub async fn deliver(&mut self, msg: TestMessage) -> IngestOutcome {
        let outcome = self.ingestor.handle(&msg).await;
        self.last_message = Some(msg);
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    pub fn next_sequence(&mut self) -> u64 {
        let seq = self.next_sequence;
        self.next_sequence += 1;
        seq
    }

    /// Simulates a process restart: the cache is lost, and a new one is rehydrated from the store.
    pub async fn restart(&mut self) {
        let cache = Arc::new(OrderCache::new());
        let report = order_engine::reconcile(&cache, &self.db).await;
        info!("Restart complete: {report:?}");
        self.ingestor = OrderIngestor::new(self.db.clone(), Arc::clone(&cache));
        self.cache = cache;
    }
}
