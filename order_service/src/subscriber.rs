//! # Message subscriber
//!
//! Binds the service to the order event stream on NATS JetStream, then feeds every delivery to an [`OrderIngestor`].
//!
//! The binding is a durable push consumer with explicit acknowledgement. Every replica of the service uses the same
//! durable name and queue group, so the broker remembers the acknowledged position across restarts and splits the
//! deliveries between the running replicas. A message that is not acknowledged within `ack_wait` is delivered again,
//! possibly to another replica.
//!
//! At most `max_in_flight` messages are outstanding at once. The broker enforces this with `max_ack_pending`, and the
//! handling loop enforces it locally.
use std::fmt::Display;

use async_nats::{
    jetstream::{
        self,
        consumer::{push, AckPolicy, DeliverPolicy},
        stream,
    },
    Client,
    ConnectOptions,
    Event,
};
use futures::{Stream, StreamExt};
use log::*;
use order_engine::{AckError, InboundMessage, OrderIngestor, OrderSink, OrderWriter};
use tokio_util::sync::CancellationToken;

use crate::{config::NatsConfig, errors::ServerError};

/// One delivery from the JetStream consumer.
pub struct JetStreamMessage {
    message: jetstream::Message,
    sequence: u64,
    delivery_count: u64,
}

impl JetStreamMessage {
    pub fn new(message: jetstream::Message) -> Self {
        let (sequence, delivery_count) = match message.info() {
            Ok(info) => (info.stream_sequence, u64::try_from(info.delivered).unwrap_or(1)),
            Err(e) => {
                warn!("📬️ Message on {} has no JetStream metadata. {e}", message.subject);
                (0, 1)
            },
        };
        Self { message, sequence, delivery_count }
    }
}

impl InboundMessage for JetStreamMessage {
    fn payload(&self) -> &[u8] {
        &self.message.payload
    }

    fn sequence(&self) -> u64 {
        self.sequence
    }

    fn delivery_count(&self) -> u64 {
        self.delivery_count
    }

    async fn ack(&self) -> Result<(), AckError> {
        self.message.ack().await.map_err(|e| AckError(e.to_string()))
    }
}

pub struct NatsSubscriber<W, C> {
    client: Client,
    messages: push::Messages,
    ingestor: OrderIngestor<W, C>,
    max_in_flight: usize,
}

impl<W, C> NatsSubscriber<W, C>
where
    W: OrderWriter + Sync,
    C: OrderSink + Sync,
{
    /// Connects to the NATS server, binds the durable consumer and opens its message stream, creating the stream and
    /// the consumer if they do not exist yet. Any failure here is fatal to the service.
    pub async fn connect(config: &NatsConfig, ingestor: OrderIngestor<W, C>) -> Result<Self, ServerError> {
        info!("📬️ Connecting to NATS at {} as {}", config.url, config.client_id);
        let client = ConnectOptions::new()
            .name(&config.client_id)
            .event_callback(|event| async move {
                match event {
                    Event::Disconnected => warn!("📬️ Lost the connection to NATS. Reconnecting."),
                    Event::Connected => info!("📬️ Connected to NATS"),
                    other => debug!("📬️ NATS connection event: {other}"),
                }
            })
            .connect(&config.url)
            .await
            .map_err(|e| ServerError::QueueError(format!("Could not connect to {}. {e}", config.url)))?;
        let js = jetstream::new(client.clone());
        let stream = js
            .get_or_create_stream(stream::Config {
                name: config.stream.clone(),
                subjects: vec![config.subject.clone()],
                ..Default::default()
            })
            .await
            .map_err(|e| ServerError::QueueError(format!("Could not bind to stream {}. {e}", config.stream)))?;
        let consumer = stream
            .get_or_create_consumer(&config.durable_name, consumer_config(config))
            .await
            .map_err(|e| ServerError::QueueError(format!("Could not bind consumer {}. {e}", config.durable_name)))?;
        let messages = consumer
            .messages()
            .await
            .map_err(|e| ServerError::QueueError(format!("Could not start the message stream. {e}")))?;
        info!(
            "📬️ Subscribed to {} on stream {} (durable: {}, group: {})",
            config.subject, config.stream, config.durable_name, config.queue_group
        );
        let ingestor = ingestor.with_max_deliver(config.max_deliver);
        Ok(Self { client, messages, ingestor, max_in_flight: config.max_in_flight })
    }

    /// Handles deliveries until `shutdown` is cancelled. See [`process_deliveries`].
    pub async fn run(self, shutdown: CancellationToken) {
        info!("📬️ Message subscriber is running, with up to {} messages in flight", self.max_in_flight);
        let deliveries = self.messages.map(|delivery| delivery.map(JetStreamMessage::new));
        process_deliveries(deliveries, &self.ingestor, self.max_in_flight, shutdown).await;
        info!("📬️ Message subscriber has stopped. No more messages are in flight.");
        drop(self.client);
    }
}

/// Feeds `deliveries` to `ingestor`, handling at most `max_in_flight` of them at a time.
///
/// Once `shutdown` is cancelled, no new deliveries are taken, but the ones already being handled are allowed to finish.
/// The returned future resolves when the last of them is done, or when `deliveries` ends.
pub async fn process_deliveries<S, M, E, W, C>(
    deliveries: S,
    ingestor: &OrderIngestor<W, C>,
    max_in_flight: usize,
    shutdown: CancellationToken,
) where
    S: Stream<Item = Result<M, E>>,
    M: InboundMessage + Sync,
    E: Display,
    W: OrderWriter + Sync,
    C: OrderSink + Sync,
{
    deliveries
        .take_until(shutdown.cancelled())
        .for_each_concurrent(max_in_flight, |delivery| async move {
            match delivery {
                Ok(message) => {
                    let outcome = ingestor.handle(&message).await;
                    trace!("📬️ {outcome:?}");
                },
                Err(e) => warn!("📬️ Error receiving a message. {e}"),
            }
        })
        .await;
}

/// The push consumer settings. Every replica must use the same values, since they bind to the same durable consumer.
pub fn consumer_config(config: &NatsConfig) -> push::Config {
    push::Config {
        durable_name: Some(config.durable_name.clone()),
        deliver_subject: deliver_subject(&config.durable_name),
        deliver_group: Some(config.queue_group.clone()),
        deliver_policy: DeliverPolicy::All,
        ack_policy: AckPolicy::Explicit,
        ack_wait: config.ack_wait,
        max_ack_pending: i64::try_from(config.max_in_flight).unwrap_or(i64::MAX),
        max_deliver: if config.max_deliver > 0 { config.max_deliver } else { -1 },
        filter_subject: config.subject.clone(),
        ..Default::default()
    }
}

fn deliver_subject(durable_name: &str) -> String {
    format!("_DELIVER.{durable_name}")
}
