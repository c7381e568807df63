//! Outbound event port.
//!
//! Peer services (QA, manufacturing) are never called synchronously from the
//! engine. Every state change that peers care about is published as an
//! [`Event`] through an [`EventSender`] after the owning transaction commits,
//! so a slow or failed consumer can never leave engine state half-committed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    LotCreated {
        lot_id: i64,
        material_id: i64,
        batch_number: String,
        quantity: Decimal,
    },
    LotDepleted {
        lot_id: i64,
        material_id: i64,
        batch_number: String,
    },
    MovementRecorded {
        movement_id: i64,
        movement_number: String,
        movement_type: String,
        quantity: Decimal,
    },
    PutawayCompleted {
        putaway_id: i64,
        lot_id: i64,
        material_id: i64,
        quantity: Decimal,
    },
    IssueApproved {
        issue_id: i64,
    },
    IssuePicked {
        issue_id: i64,
        reservations: Vec<(i64, Decimal)>,
    },
    IssueIssued {
        issue_id: i64,
        movement_ids: Vec<i64>,
    },
    CycleCountCompleted {
        cycle_count_id: i64,
        variance: Decimal,
        has_variance: bool,
    },
    TemperatureOutOfRange {
        log_id: i64,
        location_id: i64,
        reading: Decimal,
        recorded_at: DateTime<Utc>,
    },
    /// Generic marker for consumers that only need a correlation id.
    Generic {
        reference_id: Uuid,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously. A send failure is reported to the
    /// caller but must never be used to roll back committed state.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Peer integrations hook in
/// here by replacing or wrapping this loop with their own consumer.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        match &event {
            Event::TemperatureOutOfRange {
                location_id,
                reading,
                ..
            } => {
                warn!(location_id, %reading, "Temperature reading out of range");
            }
            _ => {
                info!(?event, "Event processed");
            }
        }
    }
    info!("Event channel closed; event processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_event() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);

        sender
            .send(Event::IssueApproved { issue_id: 1 })
            .await
            .expect("send should succeed");

        match rx.recv().await {
            Some(Event::IssueApproved { issue_id }) => assert_eq!(issue_id, 1),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        let result = sender
            .send(Event::LotDepleted {
                lot_id: 9,
                material_id: 1,
                batch_number: "B1".into(),
            })
            .await;
        assert!(result.is_err());
    }
}
