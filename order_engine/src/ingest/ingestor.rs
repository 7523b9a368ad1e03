use std::fmt::Debug;

use log::*;
use thiserror::Error;

use super::InboundMessage;
use crate::{
    db_types::{Order, OrderPayloadError},
    traits::{OrderSink, OrderWriter, SaveOrderResult, StoreError},
};

#[derive(Debug, Clone, Error)]
pub enum IngestError {
    /// Non-retryable. The message can never be processed, no matter how often it is delivered.
    #[error("Invalid order payload. {0}")]
    InvalidPayload(#[from] OrderPayloadError),
    /// Retryable. The message should be left for redelivery.
    #[error("Could not persist order. {0}")]
    Persistence(#[from] StoreError),
}

/// What happened to a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The order is durable and cached, and the message was acknowledged. `inserted` is false when the order was
    /// already in the store, i.e. this was a duplicate delivery.
    Stored { order_uid: String, inserted: bool },
    /// The payload could not be parsed. The message was acknowledged and the event is lost.
    Discarded(String),
    /// The order could not be persisted. The message was *not* acknowledged and will be redelivered.
    Pending(String),
}

impl IngestOutcome {
    /// Whether the handler acknowledged the message (or at least attempted to).
    pub fn is_acknowledged(&self) -> bool {
        !matches!(self, Self::Pending(_))
    }
}

/// Drives each inbound message through deserialize → persist → cache → acknowledge.
///
/// `handle` holds no state between calls and takes `&self`, so any number of messages can be handled concurrently,
/// including two deliveries of the same order.
#[derive(Clone)]
pub struct OrderIngestor<W, C> {
    store: W,
    cache: C,
    max_deliver: Option<u64>,
}

impl<W, C> Debug for OrderIngestor<W, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderIngestor")
    }
}

impl<W, C> OrderIngestor<W, C> {
    pub fn new(store: W, cache: C) -> Self {
        Self { store, cache, max_deliver: None }
    }

    /// Tells the ingestor how many delivery attempts the channel allows, so that it can flag the final failed attempt
    /// loudly. Non-positive values mean "unbounded".
    pub fn with_max_deliver(mut self, max_deliver: i64) -> Self {
        self.max_deliver = u64::try_from(max_deliver).ok().filter(|&n| n > 0);
        self
    }

    pub fn store(&self) -> &W {
        &self.store
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<W, C> OrderIngestor<W, C>
where
    W: OrderWriter + Sync,
    C: OrderSink + Sync,
{
    /// Handles one delivery and acknowledges it where appropriate. See the [module docs](super) for the state machine.
    pub async fn handle<M: InboundMessage + Sync>(&self, msg: &M) -> IngestOutcome {
        let seq = msg.sequence();
        trace!("📬️ Message received: seq={seq}, delivery #{}", msg.delivery_count());
        match self.ingest(msg.payload()).await {
            Ok((order_uid, result)) => {
                acknowledge(msg).await;
                match result {
                    SaveOrderResult::Inserted => info!("📬️ Order [{order_uid}] saved (seq={seq})"),
                    SaveOrderResult::AlreadyExists => {
                        debug!("📬️ Order [{order_uid}] was already stored. Duplicate delivery acknowledged (seq={seq})")
                    },
                }
                IngestOutcome::Stored { order_uid, inserted: result.is_inserted() }
            },
            Err(IngestError::InvalidPayload(e)) => {
                warn!("📬️ Message seq={seq} is not a valid order and will be dropped. {e}");
                acknowledge(msg).await;
                IngestOutcome::Discarded(e.to_string())
            },
            Err(IngestError::Persistence(e)) => {
                if self.is_final_attempt(msg) {
                    error!(
                        "📬️ Order in message seq={seq} could not be saved on its final delivery attempt. The event \
                         will not be redelivered. {e}"
                    );
                } else {
                    error!("📬️ Order in message seq={seq} could not be saved. It will be redelivered. {e}");
                }
                IngestOutcome::Pending(e.to_string())
            },
        }
    }

    /// Parses, persists and caches a single payload, without involving the transport. Returns the `order_uid` and the
    /// result of the write.
    ///
    /// The cache is only updated once the write has succeeded. A duplicate never replaces a cached order, because the
    /// store keeps the first version it saw and the cache must agree with it.
    pub async fn ingest(&self, payload: &[u8]) -> Result<(String, SaveOrderResult), IngestError> {
        let order = Order::from_payload(payload)?;
        let result = self.store.save_order(&order).await?;
        let order_uid = order.order_uid.clone();
        match result {
            SaveOrderResult::Inserted => self.cache.set_order(order),
            SaveOrderResult::AlreadyExists => {
                if self.cache.set_order_if_absent(order) {
                    debug!("🗂️ Order [{order_uid}] was stored but not cached. Cached the redelivered copy.");
                }
            },
        }
        Ok((order_uid, result))
    }

    fn is_final_attempt<M: InboundMessage>(&self, msg: &M) -> bool {
        self.max_deliver.map(|max| msg.delivery_count() >= max).unwrap_or(false)
    }
}

async fn acknowledge<M: InboundMessage>(msg: &M) {
    if let Err(e) = msg.ack().await {
        // The message will come back after ack-wait. The write is idempotent, so that is safe.
        warn!("📬️ Message seq={} was processed but not acknowledged. {e}", msg.sequence());
    }
}
