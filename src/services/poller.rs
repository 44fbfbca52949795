use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::gateway::AvailabilityGateway;
use crate::services::snapshot::SnapshotStore;

/// Periodically refreshes the snapshot store from the backend.
pub struct RefreshPoller {
    gateway: Arc<dyn AvailabilityGateway>,
    store: Arc<SnapshotStore>,
    interval: Duration,
}

impl RefreshPoller {
    pub fn new(gateway: Arc<dyn AvailabilityGateway>, store: Arc<SnapshotStore>, interval: Duration) -> Self {
        Self {
            gateway,
            store,
            interval,
        }
    }

    /// Runs forever; failures are logged and stored, the loop keeps going.
    pub async fn start(self) {
        info!("Starting availability poller (interval: {:?})", self.interval);

        loop {
            self.refresh_once().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Returns whether the result was kept.
    pub async fn refresh_once(&self) -> bool {
        let ticket = self.store.begin();
        // Reuse the last viewer position so polling does not drop distance ordering.
        let position = self.store.latest().and_then(|s| s.position);

        let result = self.gateway.fetch_availability(position).await;
        match &result {
            Ok(buildings) => info!("Poll #{} fetched {} buildings", ticket.seq(), buildings.len()),
            Err(e) => warn!("Poll #{} failed: {}", ticket.seq(), e),
        }
        self.store.commit(ticket, position, result)
    }
}
