use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::SessionId;

/// How a model turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    Completed,
    Cancelled,
    Failed,
}

/// Conversation events published by a session. `index` is the position of
/// the turn in the visible history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ChatEvent {
    SessionStarted { session_id: SessionId, language: String },
    TurnStarted { index: usize },
    /// Carries the full accumulated text of the turn, not just the delta.
    TurnUpdated { index: usize, text: String },
    TurnFinished { index: usize, outcome: TurnOutcome },
    SuggestionsReady(Vec<String>),
    Cleared,
}

pub struct EventBus {
    sender: broadcast::Sender<ChatEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ChatEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(ChatEvent::Cleared);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, ChatEvent::Cleared));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ChatEvent::TurnStarted { index: 3 });

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert!(matches!(e1, ChatEvent::TurnStarted { index: 3 }));
        assert!(matches!(e2, ChatEvent::TurnStarted { index: 3 }));
    }

    #[tokio::test]
    async fn turn_events_arrive_in_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(ChatEvent::TurnStarted { index: 2 });
        bus.publish(ChatEvent::TurnUpdated {
            index: 2,
            text: "Hel".into(),
        });
        bus.publish(ChatEvent::TurnUpdated {
            index: 2,
            text: "Hello".into(),
        });
        bus.publish(ChatEvent::TurnFinished {
            index: 2,
            outcome: TurnOutcome::Completed,
        });

        assert!(matches!(rx.recv().await.unwrap(), ChatEvent::TurnStarted { index: 2 }));
        assert!(
            matches!(rx.recv().await.unwrap(), ChatEvent::TurnUpdated { ref text, .. } if text == "Hel")
        );
        assert!(
            matches!(rx.recv().await.unwrap(), ChatEvent::TurnUpdated { ref text, .. } if text == "Hello")
        );
        assert!(matches!(
            rx.recv().await.unwrap(),
            ChatEvent::TurnFinished {
                outcome: TurnOutcome::Completed,
                ..
            }
        ));
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        let count = bus.publish(ChatEvent::Cleared);
        assert_eq!(count, 0);
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let json = serde_json::to_string(&ChatEvent::TurnFinished {
            index: 1,
            outcome: TurnOutcome::Cancelled,
        })
        .unwrap();
        assert!(json.contains(r#""type":"TurnFinished""#));
        assert!(json.contains(r#""outcome":"cancelled""#));
    }
}
