//! In-memory bus over `tokio::sync::broadcast`.
//!
//! Suitable for a single process; embedders with a real broker implement
//! [`BusPublisher`] against it instead. The ack counter exists so tests
//! and health checks can observe consumption.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{BusMessage, BusPublisher, Subscription};

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

pub struct InMemoryBus {
    sender: broadcast::Sender<BusMessage>,
    published: AtomicU64,
    acked: Arc<AtomicU64>,
    capacity: usize,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: AtomicU64::new(0),
            acked: Arc::new(AtomicU64::new(0)),
            capacity,
        }
    }

    pub fn subscribe(&self, topic: &str) -> Subscription {
        debug!(topic, "New bus subscription");
        Subscription::new(self.sender.subscribe(), Arc::from(topic))
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Envelopes published so far.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Envelopes consumers have acked so far.
    pub fn acked(&self) -> u64 {
        self.acked.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BusPublisher for InMemoryBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        let message = BusMessage::new(Arc::from(topic), payload, self.acked.clone());
        match self.sender.send(message) {
            Ok(receivers) => {
                debug!(topic, receivers, "Envelope published");
                receivers
            }
            Err(_) => {
                warn!(topic, "Envelope dropped (no subscribers)");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::BusError;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn publish_without_subscribers_is_counted_but_dropped() {
        let bus = InMemoryBus::new();
        let receivers = bus.publish("ui.entities", b"{}".to_vec()).await;
        assert_eq!(receivers, 0);
        assert_eq!(bus.published(), 1);
        assert_eq!(bus.acked(), 0);
    }

    #[tokio::test]
    async fn subscribers_receive_and_ack() {
        let bus = InMemoryBus::new();
        let mut sub = bus.subscribe("ui.entities");
        assert_eq!(bus.subscriber_count(), 1);

        let receivers = bus.publish("ui.entities", b"payload".to_vec()).await;
        assert_eq!(receivers, 1);

        let message = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("message");
        assert_eq!(message.topic(), "ui.entities");
        assert_eq!(message.payload(), b"payload");

        message.ack();
        assert_eq!(bus.acked(), 1);
    }

    #[tokio::test]
    async fn other_topics_are_filtered_out() {
        let bus = InMemoryBus::new();
        let mut sub = bus.subscribe("ui.entities");

        bus.publish("metrics", b"ignored".to_vec()).await;
        assert!(matches!(sub.try_recv(), Ok(None)));

        bus.publish("ui.entities", b"kept".to_vec()).await;
        let message = sub.try_recv().expect("open").expect("message");
        assert_eq!(message.payload(), b"kept");
    }

    #[tokio::test]
    async fn dropping_the_bus_closes_subscriptions() {
        let bus = InMemoryBus::new();
        let mut sub = bus.subscribe("ui.entities");
        drop(bus);

        assert!(sub.recv().await.is_none());
        assert!(matches!(sub.try_recv(), Err(BusError::Closed)));
    }

    #[test]
    fn default_capacity_is_applied() {
        let bus = InMemoryBus::default();
        assert_eq!(bus.capacity(), DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
