//! Service configuration.
//!
//! Everything is read from `ORDERS_*` environment variables in [`ServiceConfig::from_env_or_default`]. A missing
//! variable silently takes its default. A variable that is set but cannot be parsed is logged as an error and also
//! falls back to the default, so a typo never prevents the service from starting.
use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::*;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/orders.db";
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_NATS_URL: &str = "nats://localhost:4222";
const DEFAULT_NATS_CLIENT_ID: &str = "order-service";
const DEFAULT_NATS_STREAM: &str = "ORDERS";
const DEFAULT_NATS_SUBJECT: &str = "orders";
const DEFAULT_NATS_QUEUE_GROUP: &str = "order-service-group";
const DEFAULT_NATS_DURABLE_NAME: &str = "order-service-durable";
const DEFAULT_ACK_WAIT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_IN_FLIGHT: usize = 25;
const DEFAULT_MAX_DELIVER: i64 = -1;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_db_connections: u32,
    pub nats: NatsConfig,
    /// How long to wait for in-flight messages to finish once shutdown has begun. Whatever is still running after
    /// this is abandoned, and will be redelivered to another consumer.
    pub shutdown_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct NatsConfig {
    pub url: String,
    /// The connection name reported to the NATS server.
    pub client_id: String,
    pub stream: String,
    pub subject: String,
    /// Replicas sharing a queue group split the deliveries between them.
    pub queue_group: String,
    /// The durable consumer name. The broker tracks the acknowledged position under this name across restarts.
    pub durable_name: String,
    pub ack_wait: Duration,
    /// The maximum number of delivered-but-unacknowledged messages. This also caps concurrent message handling.
    pub max_in_flight: usize,
    /// The maximum number of delivery attempts per message. Non-positive means unlimited.
    pub max_deliver: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_db_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            nats: NatsConfig::default(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_NATS_URL.to_string(),
            client_id: DEFAULT_NATS_CLIENT_ID.to_string(),
            stream: DEFAULT_NATS_STREAM.to_string(),
            subject: DEFAULT_NATS_SUBJECT.to_string(),
            queue_group: DEFAULT_NATS_QUEUE_GROUP.to_string(),
            durable_name: DEFAULT_NATS_DURABLE_NAME.to_string(),
            ack_wait: DEFAULT_ACK_WAIT,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            max_deliver: DEFAULT_MAX_DELIVER,
        }
    }
}

impl ServiceConfig {
    pub fn from_env_or_default() -> Self {
        let host = string_from_env("ORDERS_HOST", DEFAULT_HOST);
        let port = parse_or_default("ORDERS_PORT", env::var("ORDERS_PORT").ok(), DEFAULT_PORT);
        let database_url = env::var("ORDERS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ ORDERS_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_db_connections = positive_or_default(
            "ORDERS_DATABASE_MAX_CONNECTIONS",
            env::var("ORDERS_DATABASE_MAX_CONNECTIONS").ok(),
            DEFAULT_DATABASE_MAX_CONNECTIONS,
        );
        let shutdown_timeout = seconds_or_default(
            "ORDERS_SHUTDOWN_TIMEOUT",
            env::var("ORDERS_SHUTDOWN_TIMEOUT").ok(),
            DEFAULT_SHUTDOWN_TIMEOUT,
        );
        let nats = NatsConfig::from_env_or_default();
        Self { host, port, database_url, max_db_connections, nats, shutdown_timeout }
    }
}

impl NatsConfig {
    pub fn from_env_or_default() -> Self {
        let url = string_from_env("ORDERS_NATS_URL", DEFAULT_NATS_URL);
        let client_id = string_from_env("ORDERS_NATS_CLIENT_ID", DEFAULT_NATS_CLIENT_ID);
        let stream = string_from_env("ORDERS_NATS_STREAM", DEFAULT_NATS_STREAM);
        let subject = string_from_env("ORDERS_NATS_SUBJECT", DEFAULT_NATS_SUBJECT);
        let queue_group = string_from_env("ORDERS_NATS_QUEUE_GROUP", DEFAULT_NATS_QUEUE_GROUP);
        let durable_name = string_from_env("ORDERS_NATS_DURABLE_NAME", DEFAULT_NATS_DURABLE_NAME);
        let ack_wait =
            seconds_or_default("ORDERS_NATS_ACK_WAIT", env::var("ORDERS_NATS_ACK_WAIT").ok(), DEFAULT_ACK_WAIT);
        let max_in_flight = positive_or_default(
            "ORDERS_NATS_MAX_IN_FLIGHT",
            env::var("ORDERS_NATS_MAX_IN_FLIGHT").ok(),
            DEFAULT_MAX_IN_FLIGHT,
        );
        let max_deliver =
            parse_or_default("ORDERS_NATS_MAX_DELIVER", env::var("ORDERS_NATS_MAX_DELIVER").ok(), DEFAULT_MAX_DELIVER);
        if max_deliver > 0 {
            info!("🪛️ A message that fails {max_deliver} times will not be redelivered again.");
        }
        Self { url, client_id, stream, subject, queue_group, durable_name, ack_wait, max_in_flight, max_deliver }
    }
}

fn string_from_env(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(s) if !s.trim().is_empty() => s,
        _ => default.to_string(),
    }
}

/// Parses `value`, which was read from the variable `name`. Unset values take the default quietly. Invalid ones take
/// it loudly.
pub(crate) fn parse_or_default<T>(name: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match value {
        None => default,
        Some(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
    }
}

pub(crate) fn positive_or_default<T>(name: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + Display + Default + PartialOrd + Copy,
    T::Err: Display,
{
    let result = parse_or_default(name, value, default);
    if result > T::default() {
        return result;
    }
    error!("🪛️ {name} must be greater than zero. Using the default, {default}, instead.");
    default
}

pub(crate) fn seconds_or_default(name: &str, value: Option<String>, default: Duration) -> Duration {
    let secs = positive_or_default(name, value, default.as_secs());
    Duration::from_secs(secs)
}
