//! Order Engine
//!
//! The order engine is the core of the order ingestion service. It persists order events delivered over an
//! at-least-once channel exactly once, and keeps an in-memory read cache consistent with the store.
//!
//! The library is divided into these sections:
//! 1. The order aggregate and its wire format ([`mod@db_types`]).
//! 2. The narrow capability traits that the components use to talk to each other ([`mod@traits`]).
//! 3. The concurrent, process-lifetime read cache ([`OrderCache`]).
//! 4. The SQLite order store ([`SqliteDatabase`]), with idempotent, all-or-nothing aggregate writes.
//! 5. The per-message ingestion state machine ([`OrderIngestor`]), which is transport-agnostic. The transport only has
//!    to implement [`InboundMessage`].
//! 6. Startup reconciliation ([`reconcile()`]), which rehydrates the cache from the store before traffic starts.
pub mod cache;
pub mod db_types;
pub mod ingest;
pub mod reconcile;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

pub use cache::OrderCache;
pub use ingest::{AckError, InboundMessage, IngestError, IngestOutcome, OrderIngestor};
pub use reconcile::{reconcile, ReconcileReport};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{OrderReader, OrderSink, OrderSource, OrderWriter, SaveOrderResult, StoreError};
