//! # Order service
//! This crate hosts the runnable order ingestion service. It is responsible for:
//! * Subscribing to the order event stream on NATS JetStream, through a durable, queue-grouped consumer.
//! * Handing every delivery to the [`order_engine::OrderIngestor`], which persists it exactly once and caches it.
//! * Serving the cached orders over a small, read-only JSON API.
//!
//! ## Configuration
//! The service is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/orders`: Every cached order, newest first.
//! * `/api/orders/{order_uid}`: A single order, or a 404 if it is not in the cache.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;
pub mod subscriber;
