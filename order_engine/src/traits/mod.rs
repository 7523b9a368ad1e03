//! # Capability contracts
//!
//! The components of the ingestion pipeline only ever see each other through these narrow traits, so that each one
//! can be exercised in isolation with a substitute.
//!
//! * [`OrderWriter`] is what the ingestion path needs from the store: an idempotent, atomic `save_order`.
//! * [`OrderSource`] is what reconciliation needs from the store: a full read of every persisted order.
//! * [`OrderSink`] is what the ingestion path needs from the cache: "can set an order".
//! * [`OrderReader`] is the read boundary handed to the HTTP front end.
mod data_objects;
mod order_cache;
mod order_store;

pub use data_objects::SaveOrderResult;
pub use order_cache::{OrderReader, OrderSink};
pub use order_store::{OrderSource, OrderWriter, StoreError};
