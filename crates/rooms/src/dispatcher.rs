//! Best-effort fanout of events to a topic's current subscribers

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::registry::RoomRegistry;
use crate::types::{ServerEvent, Topic};

/// Outcome of one broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Events accepted into a subscriber's queue
    pub delivered: usize,
    /// Subscribers whose queue was full or already closed
    pub dropped: usize,
}

impl DeliveryReport {
    pub fn recipients(&self) -> usize {
        self.delivered + self.dropped
    }
}

/// Stateless dispatcher over the shared registry.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<RoomRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver `event` once to every connection subscribed to `topic` right now.
    ///
    /// Recipients are fixed when the call starts; a connection joining
    /// afterwards does not receive this event. A failing recipient is logged
    /// and skipped, it never stops delivery to the others. No subscribers
    /// means the event is dropped silently.
    pub fn broadcast(&self, topic: &Topic, event: &ServerEvent) -> DeliveryReport {
        let recipients = self.registry.recipients(topic);
        let mut report = DeliveryReport::default();

        if recipients.is_empty() {
            debug!(%topic, event = event.name(), "no subscribers, event dropped");
            return report;
        }

        for (connection, outbound) in recipients {
            match outbound.try_send(event.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    report.dropped += 1;
                    warn!(connection_id = %connection, %topic, event = event.name(), "outbound queue full, event dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    report.dropped += 1;
                    debug!(connection_id = %connection, %topic, event = event.name(), "connection closed during delivery");
                }
            }
        }

        debug!(
            %topic,
            event = event.name(),
            delivered = report.delivered,
            dropped = report.dropped,
            "broadcast complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoomId;

    fn error_event(text: &str) -> ServerEvent {
        ServerEvent::Error {
            message: text.to_string(),
        }
    }

    #[test]
    fn delivers_only_to_subscribers_of_the_topic() {
        let registry = Arc::new(RoomRegistry::new(16));
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        let room_one = RoomId::from(1).topic();
        let room_two = RoomId::from(2).topic();

        let (a, mut rx_a) = registry.connect();
        let (b, mut rx_b) = registry.connect();
        registry.join(a, room_one.clone());
        registry.join(a, room_two.clone());
        registry.join(b, room_two.clone());

        let report = broadcaster.broadcast(&room_one, &error_event("one"));
        assert_eq!(report, DeliveryReport { delivered: 1, dropped: 0 });
        assert_eq!(rx_a.try_recv().unwrap(), error_event("one"));
        assert!(rx_b.try_recv().is_err());

        let report = broadcaster.broadcast(&room_two, &error_event("two"));
        assert_eq!(report.delivered, 2);
        assert_eq!(rx_a.try_recv().unwrap(), error_event("two"));
        assert_eq!(rx_b.try_recv().unwrap(), error_event("two"));
    }

    #[test]
    fn empty_topics_drop_silently() {
        let broadcaster = Broadcaster::new(Arc::new(RoomRegistry::new(16)));
        let report = broadcaster.broadcast(&RoomId::from(9).topic(), &error_event("x"));
        assert_eq!(report.recipients(), 0);
    }

    #[test]
    fn a_closed_recipient_does_not_block_the_others() {
        let registry = Arc::new(RoomRegistry::new(16));
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        let topic = RoomId::from(1).topic();

        let (gone, rx_gone) = registry.connect();
        let (alive, mut rx_alive) = registry.connect();
        registry.join(gone, topic.clone());
        registry.join(alive, topic.clone());
        drop(rx_gone);

        let report = broadcaster.broadcast(&topic, &error_event("still here"));
        assert_eq!(report, DeliveryReport { delivered: 1, dropped: 1 });
        assert_eq!(rx_alive.try_recv().unwrap(), error_event("still here"));
    }

    #[test]
    fn a_full_queue_drops_only_for_that_recipient() {
        let registry = Arc::new(RoomRegistry::new(1));
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        let topic = RoomId::from(1).topic();

        let (slow, mut rx_slow) = registry.connect();
        registry.join(slow, topic.clone());

        assert_eq!(broadcaster.broadcast(&topic, &error_event("first")).delivered, 1);
        let (fast, mut rx_fast) = registry.connect();
        registry.join(fast, topic.clone());

        let report = broadcaster.broadcast(&topic, &error_event("second"));
        assert_eq!(report, DeliveryReport { delivered: 1, dropped: 1 });
        assert_eq!(rx_fast.try_recv().unwrap(), error_event("second"));
        assert_eq!(rx_slow.try_recv().unwrap(), error_event("first"));
        assert!(rx_slow.try_recv().is_err());
    }

    #[test]
    fn late_joiners_miss_earlier_broadcasts() {
        let registry = Arc::new(RoomRegistry::new(16));
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        let topic = RoomId::from(3).topic();

        let (early, mut rx_early) = registry.connect();
        registry.join(early, topic.clone());
        broadcaster.broadcast(&topic, &error_event("before"));

        let (late, mut rx_late) = registry.connect();
        registry.join(late, topic.clone());

        assert_eq!(rx_early.try_recv().unwrap(), error_event("before"));
        assert!(rx_late.try_recv().is_err());
    }
}
