//! # Order ingestion
//!
//! [`OrderIngestor`] is the per-message state machine that turns one transport delivery into a
//! persist → cache-update → acknowledge transaction. It knows nothing about the transport itself. A delivery is
//! anything implementing [`InboundMessage`].
//!
//! | Step        | Failure                | Outcome                                              |
//! |-------------|------------------------|------------------------------------------------------|
//! | Deserialize | malformed payload      | ack and drop ([`IngestOutcome::Discarded`])          |
//! | Persist     | store error            | no ack, redelivered after ack-wait ([`IngestOutcome::Pending`]) |
//! | Cache + ack | -                      | [`IngestOutcome::Stored`]                            |
//!
//! The ack is sent only once the order is durable *and* cached, so a crash anywhere before the ack leads to a
//! redelivery. That redelivery is harmless: `save_order` is a no-op for a known `order_uid`, and a cached entry is
//! left as it is. A duplicate only reaches the cache when the order is missing from it, e.g. after a partial
//! rehydration.
mod ingestor;
mod message;

pub use ingestor::{IngestError, IngestOutcome, OrderIngestor};
pub use message::{AckError, InboundMessage};
