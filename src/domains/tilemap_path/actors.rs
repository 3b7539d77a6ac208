use super::events::FollowEvent;
use super::projections::{FollowOverview, FollowProjectionStore};
use crate::common::DomainEvent;
use crate::domains::DynLogger;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Drains follow events into the projection store and the domain log.
pub struct FollowEventActor {
    projection_store: Arc<RwLock<FollowProjectionStore>>,
    event_receiver: mpsc::Receiver<FollowEvent>,
    logger: DynLogger,
}

impl FollowEventActor {
    pub fn new(event_receiver: mpsc::Receiver<FollowEvent>, logger: DynLogger) -> Self {
        Self {
            projection_store: Arc::new(RwLock::new(FollowProjectionStore::new())),
            event_receiver,
            logger,
        }
    }

    /// Shared handle to the projections, usable after `run` is spawned.
    pub fn projection_store(&self) -> Arc<RwLock<FollowProjectionStore>> {
        self.projection_store.clone()
    }

    pub async fn run(&mut self) {
        while let Some(event) = self.event_receiver.recv().await {
            self.handle_event(&event).await;
        }
    }

    async fn handle_event(&self, event: &FollowEvent) {
        match serde_json::to_string(event) {
            Ok(json) => self.logger.info(&format!("{} {}", event.event_type(), json)),
            Err(e) => self
                .logger
                .error(&format!("Failed to serialize {}: {}", event.event_type(), e)),
        }

        let mut store = self.projection_store.write().await;
        store.apply_event(event);
    }

    pub async fn get_overview(&self, sprite_id: &str) -> Option<FollowOverview> {
        let store = self.projection_store.read().await;
        store.overviews.get(sprite_id).cloned()
    }
}
