//! Event hub for realtime push notifications
//!
//! Fans JSON events out to every connected viewer through a tokio
//! broadcast channel. Delivery contract: at-most-once, no ordering
//! guarantee across connections, no retry. Publishing never fails from
//! the caller's perspective; a channel with no subscribers simply drops
//! the event, and lagged receivers skip whatever the ring buffer evicted.

use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Broadcast ring capacity per receiver; slow consumers past this lag
/// lose the oldest events rather than blocking publishers.
const EVENT_BUFFER: usize = 100;

/// Message pushed to realtime viewers, serialized as `{type, data}`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PushEvent {
    /// A quest was completed
    QuestComplete {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "questId")]
        quest_id: String,
        reward: u64,
    },
    /// A talent segment was unlocked
    Achievement {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "segmentId")]
        segment_id: String,
        message: String,
    },
    /// Synthetic per-connection progress notification
    Notification {
        id: String,
        title: String,
        message: String,
        timestamp: String,
    },
}

impl PushEvent {
    /// The synthetic achievement-progress event each connection receives
    /// on its heartbeat period.
    pub fn synthetic_progress() -> Self {
        PushEvent::Notification {
            id: format!("notif_{}", Uuid::new_v4()),
            title: "New Achievement Unlocked!".into(),
            message: "You've made progress on your Communication skill".into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Hub for broadcasting events to connected clients
pub struct EventHub {
    sender: broadcast::Sender<PushEvent>,
    heartbeat_interval_secs: u64,
}

impl EventHub {
    pub fn new(heartbeat_interval_secs: u64) -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            sender,
            heartbeat_interval_secs,
        }
    }

    /// Subscribe to events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PushEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all currently-open connections, best effort.
    pub fn publish(&self, event: PushEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Number of currently-subscribed connections.
    pub fn connection_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn heartbeat_interval_secs(&self) -> u64 {
        self.heartbeat_interval_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event = PushEvent::QuestComplete {
            user_id: "u1".into(),
            quest_id: "q1".into(),
            reward: 500,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"quest_complete\""));
        assert!(json.contains("\"data\":{"));
        assert!(json.contains("\"userId\":\"u1\""));
        assert!(json.contains("\"questId\":\"q1\""));
    }

    #[test]
    fn test_synthetic_progress_shape() {
        let event = PushEvent::synthetic_progress();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"notification\""));
        assert!(json.contains("Achievement"));
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let hub = EventHub::new(30);
        assert_eq!(hub.connection_count(), 0);
        // Must not panic or error with nobody listening.
        hub.publish(PushEvent::synthetic_progress());
    }

    #[test]
    fn test_fanout_reaches_all_subscribers() {
        tokio_test::block_on(async {
            let hub = EventHub::new(30);
            let mut rx1 = hub.subscribe();
            let mut rx2 = hub.subscribe();
            assert_eq!(hub.connection_count(), 2);

            hub.publish(PushEvent::Achievement {
                user_id: "u1".into(),
                segment_id: "s6".into(),
                message: "unlocked".into(),
            });

            for rx in [&mut rx1, &mut rx2] {
                match rx.recv().await.unwrap() {
                    PushEvent::Achievement { segment_id, .. } => assert_eq!(segment_id, "s6"),
                    other => panic!("unexpected event: {other:?}"),
                }
            }
        });
    }

    #[test]
    fn test_dropped_subscriber_is_forgotten() {
        let hub = EventHub::new(30);
        let rx = hub.subscribe();
        assert_eq!(hub.connection_count(), 1);
        drop(rx);
        assert_eq!(hub.connection_count(), 0);
    }
}
