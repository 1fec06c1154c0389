//! Replays entity lifecycle envelopes from the bus into the UI queue.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::{BusMessage, BusPublisher, Subscription};
use crate::timeline::event::LifecycleEvent;
use crate::timeline::msg::{TimelineMsg, TimelineSender};

/// Topic entity lifecycle envelopes travel on.
pub const ENTITY_TOPIC: &str = "ui.entities";

/// Serialize and publish one lifecycle event on [`ENTITY_TOPIC`].
pub async fn publish_lifecycle<P>(
    bus: &P,
    event: &LifecycleEvent,
) -> Result<usize, serde_json::Error>
where
    P: BusPublisher + ?Sized,
{
    let payload = serde_json::to_vec(event)?;
    Ok(bus.publish(ENTITY_TOPIC, payload).await)
}

/// Bridges a bus subscription onto the timeline message queue.
///
/// Decoding happens off the UI thread, so the controller only ever sees
/// well-formed lifecycle events. Every envelope is acked, decodable or
/// not: redelivery cannot fix a malformed payload.
pub struct EntityBusForwarder;

impl EntityBusForwarder {
    /// Consume `subscription` on its own task until the bus closes or
    /// `cancel_token` fires.
    pub fn spawn(
        mut subscription: Subscription,
        sender: TimelineSender,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    message = subscription.recv() => {
                        match message {
                            Some(message) => forward(message, &sender),
                            None => {
                                debug!("Bus closed; stopping entity forwarder");
                                break;
                            }
                        }
                    }
                    _ = cancel_token.cancelled() => {
                        debug!("Entity forwarder cancelled");
                        break;
                    }
                }
            }
        })
    }
}

fn forward(message: BusMessage, sender: &TimelineSender) {
    match serde_json::from_slice::<LifecycleEvent>(message.payload()) {
        Ok(event) => {
            trace!(
                event = event.type_name(),
                entity = %event.id().key(),
                "Forwarding lifecycle envelope"
            );
            sender.send(TimelineMsg::Lifecycle(event));
        }
        Err(error) => {
            warn!(error = %error, "Dropping undecodable entity envelope");
        }
    }
    message.ack();
}
