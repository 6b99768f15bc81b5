//! Best-effort pricing notifications
//!
//! After every recompute-and-persist the service announces the fresh
//! snapshot on a team-scoped channel. Delivery is fire-and-forget: adapters
//! swallow their own failures, and the no-op adapter stands in when no
//! channel is configured. A notification problem must never fail the
//! pricing operation that triggered it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::team::PricingSnapshot;

/// Payload announced after a snapshot refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingUpdate {
    pub team_id: Uuid,
    pub pricing: PricingSnapshot,
}

/// Port for live pricing announcements
#[async_trait]
pub trait PricingNotifier: Send + Sync {
    /// Announce a refreshed snapshot; must not fail the caller
    async fn pricing_updated(&self, update: PricingUpdate);
}

/// Notifier used when no live channel is configured
pub struct NoopNotifier;

#[async_trait]
impl PricingNotifier for NoopNotifier {
    async fn pricing_updated(&self, _update: PricingUpdate) {}
}

/// Fan-out notifier over a tokio broadcast channel
///
/// Subscribers (websocket sessions, SSE streams) hold receivers; a send
/// into a channel with no receivers is the normal idle case and is ignored.
pub struct BroadcastNotifier {
    sender: broadcast::Sender<PricingUpdate>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// A new receiver for live updates
    pub fn subscribe(&self) -> broadcast::Receiver<PricingUpdate> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl PricingNotifier for BroadcastNotifier {
    async fn pricing_updated(&self, update: PricingUpdate) {
        if let Err(err) = self.sender.send(update) {
            tracing::warn!("pricing update dropped: {err}");
        }
    }
}
