//! Event-bus seam for entity lifecycle traffic.
//!
//! The timeline core never talks to a broker directly. Producers publish
//! JSON envelopes to a topic; the forwarder replays them into the UI
//! queue. The seam is deliberately small: a publisher trait, a message
//! with an explicit ack, and a per-topic subscription handle.

pub mod forwarder;
pub mod memory;

pub use forwarder::{publish_lifecycle, EntityBusForwarder, ENTITY_TOPIC};
pub use memory::InMemoryBus;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

/// Trait for publishing envelopes to the bus.
#[async_trait]
pub trait BusPublisher: Send + Sync {
    /// Publish a payload to a topic. Returns the number of active
    /// subscribers that received it.
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> usize;
}

/// A raw envelope delivered to a subscriber.
///
/// Acking is explicit so consumers decide when delivery counts as done.
#[derive(Debug, Clone)]
pub struct BusMessage {
    topic: Arc<str>,
    payload: Arc<[u8]>,
    acks: Arc<AtomicU64>,
}

impl BusMessage {
    pub(crate) fn new(topic: Arc<str>, payload: Vec<u8>, acks: Arc<AtomicU64>) -> Self {
        Self {
            topic,
            payload: payload.into(),
            acks,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Mark this delivery as consumed.
    pub fn ack(self) {
        self.acks.fetch_add(1, Ordering::Relaxed);
    }
}

/// Errors from non-blocking subscription reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The bus was dropped.
    Closed,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::Closed => write!(f, "event bus closed"),
        }
    }
}

impl std::error::Error for BusError {}

/// A subscription to a single topic.
pub struct Subscription {
    receiver: broadcast::Receiver<BusMessage>,
    topic: Arc<str>,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<BusMessage>, topic: Arc<str>) -> Self {
        Self { receiver, topic }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Receive the next envelope on this topic, or `None` once the bus
    /// is gone. Lagged deliveries are dropped with a log line.
    pub async fn recv(&mut self) -> Option<BusMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(message) if message.topic == self.topic => return Some(message),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, topic = %self.topic, "Subscriber lagged, envelopes dropped");
                    continue;
                }
            }
        }
    }

    /// Non-blocking read of the next envelope on this topic.
    pub fn try_recv(&mut self) -> Result<Option<BusMessage>, BusError> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) if message.topic == self.topic => return Ok(Some(message)),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => return Err(BusError::Closed),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            }
        }
    }
}
