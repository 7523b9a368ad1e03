#![allow(dead_code)]
use std::sync::atomic::{AtomicUsize, Ordering};

use order_engine::{AckError, InboundMessage};

/// An in-memory stand-in for a single broker delivery that records how often it was acknowledged.
#[derive(Debug)]
pub struct TestMessage {
    payload: Vec<u8>,
    sequence: u64,
    delivery_count: u64,
    acks: AtomicUsize,
}

impl TestMessage {
    pub fn new<P: Into<Vec<u8>>>(sequence: u64, payload: P) -> Self {
        Self { payload: payload.into(), sequence, delivery_count: 1, acks: AtomicUsize::new(0) }
    }

    /// The same message as seen by the consumer on the next delivery attempt, with a fresh ack counter.
    pub fn redeliver(&self) -> Self {
        Self {
            payload: self.payload.clone(),
            sequence: self.sequence,
            delivery_count: self.delivery_count + 1,
            acks: AtomicUsize::new(0),
        }
    }

    pub fn acks(&self) -> usize {
        self.acks.load(Ordering::SeqCst)
    }
}

impl InboundMessage for TestMessage {
    fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn sequence(&self) -> u64 {
        self.sequence
    }

    fn delivery_count(&self) -> u64 {
        self.delivery_count
    }

    async fn ack(&self) -> Result<(), AckError> {
        self.acks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
