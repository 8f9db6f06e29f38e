use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// Domain events emitted by the request lifecycle and assignment engine.
/// Consumed by a single in-process task; every mutation that changes
/// durable state emits one after its transaction commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    RequestCreated(Uuid),
    RequestApproved {
        request_id: Uuid,
        assigned_count: usize,
    },
    RequestRejected(Uuid),
    RequestCancelled(Uuid),
    RequestDeleted(Uuid),
    AssetReturned {
        assigned_id: Uuid,
        damaged: bool,
    },
    AssetRepaired {
        asset_tag: String,
    },
    UnitCreated {
        asset_type: String,
        unit_id: Uuid,
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

    /// Sends an event asynchronously. Failure to deliver is reported to the
    /// caller but must never fail the surrounding operation.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Runs for the lifetime of
/// the process; exits when all senders are dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::RequestCreated(id) => info!(request_id = %id, "Asset request created"),
            Event::RequestApproved {
                request_id,
                assigned_count,
            } => info!(
                request_id = %request_id,
                assigned_count = assigned_count,
                "Asset request approved"
            ),
            Event::RequestRejected(id) => info!(request_id = %id, "Asset request rejected"),
            Event::RequestCancelled(id) => {
                info!(request_id = %id, "Asset request cancelled by requester")
            }
            Event::RequestDeleted(id) => info!(request_id = %id, "Asset request deleted"),
            Event::AssetReturned {
                assigned_id,
                damaged,
            } => info!(assigned_id = %assigned_id, damaged = damaged, "Asset returned"),
            Event::AssetRepaired { asset_tag } => {
                info!(asset_tag = %asset_tag, "Asset repaired")
            }
            Event::UnitCreated {
                asset_type,
                unit_id,
            } => debug!(asset_type = %asset_type, unit_id = %unit_id, "Inventory unit created"),
        }
    }
    info!("Event processor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_round_trip_through_channel() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        let id = Uuid::new_v4();
        sender.send(Event::RequestCreated(id)).await.unwrap();

        match rx.recv().await {
            Some(Event::RequestCreated(got)) => assert_eq!(got, id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        assert!(sender.send(Event::RequestRejected(Uuid::new_v4())).await.is_err());
    }
}
