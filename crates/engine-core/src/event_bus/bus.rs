use model::events::Event;
use model::events::job::JobEvent;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};

/// A subscription handle that can be used to unsubscribe.
#[derive(Debug, Clone, Copy)]
pub struct Subscription {
    subscriber_id: u64,
}

/// In-process fan-out of [`JobEvent`]s to mpsc subscribers. Publishing is
/// non-blocking: a full subscriber channel drops the event for that
/// subscriber rather than stalling the pipeline.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<HashMap<u64, mpsc::Sender<Arc<JobEvent>>>>>,
    next_id: Arc<RwLock<u64>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, sender: mpsc::Sender<Arc<JobEvent>>) -> Subscription {
        let subscriber_id = {
            let mut id_lock = self.next_id.write().await;
            let id = *id_lock;
            *id_lock += 1;
            id
        };

        self.subscribers.write().await.insert(subscriber_id, sender);
        debug!(subscriber_id, "Subscribed to job events");

        Subscription { subscriber_id }
    }

    pub async fn publish(&self, event: JobEvent) {
        let event = Arc::new(event);
        let subscribers = self.subscribers.read().await;

        for (subscriber_id, sender) in subscribers.iter() {
            if let Err(e) = sender.try_send(event.clone()) {
                warn!(
                    event_type = event.event_type(),
                    subscriber_id,
                    error = ?e,
                    "Dropped event for slow subscriber (channel full)"
                );
            }
        }
    }

    pub async fn unsubscribe(&self, subscription: Subscription) {
        self.subscribers
            .write()
            .await
            .remove(&subscription.subscriber_id);
        debug!(
            subscriber_id = subscription.subscriber_id,
            "Unsubscribed from job events"
        );
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn started() -> JobEvent {
        JobEvent::JobStarted {
            job_id: "job-1".into(),
            job_name: "compute_completeness".into(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn delivers_to_all_subscribers() {
        let bus = EventBus::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        bus.subscribe(tx_a).await;
        bus.subscribe(tx_b).await;

        bus.publish(started()).await;

        assert_eq!(rx_a.recv().await.unwrap().event_type(), "job.started");
        assert_eq!(rx_b.recv().await.unwrap().event_type(), "job.started");
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let (tx, mut rx) = mpsc::channel(4);
        let sub = bus.subscribe(tx).await;
        assert_eq!(bus.subscriber_count().await, 1);

        bus.unsubscribe(sub).await;
        bus.publish(started()).await;

        assert_eq!(bus.subscriber_count().await, 0);
        assert!(rx.try_recv().is_err());
    }
}
