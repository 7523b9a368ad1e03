use std::future::Future;

use thiserror::Error;

/// A single delivery from a durable, at-least-once channel that supports manual acknowledgement.
pub trait InboundMessage {
    /// The raw message body.
    fn payload(&self) -> &[u8];

    /// The channel's sequence number for this message. Used for logging only.
    fn sequence(&self) -> u64;

    /// How many times this message has been delivered, including this delivery. The first delivery is `1`.
    fn delivery_count(&self) -> u64 {
        1
    }

    /// Acknowledges the message so that it is not redelivered.
    fn ack(&self) -> impl Future<Output = Result<(), AckError>> + Send;
}

#[derive(Debug, Clone, Error)]
#[error("Could not acknowledge message. {0}")]
pub struct AckError(pub String);
