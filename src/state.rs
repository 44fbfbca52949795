use std::sync::{Arc, Mutex};

use crate::config::AppConfig;
use crate::gateway::AvailabilityGateway;
use crate::services::presenter::EmptyStateCopy;
use crate::services::{Clock, Renderer, ResolverPolicy, SnapshotStore, SystemClock, ViewSession};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn AvailabilityGateway>,
    pub store: Arc<SnapshotStore>,
    pub session: Arc<Mutex<ViewSession>>,
    pub renderer: Arc<Renderer>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: &AppConfig, gateway: Arc<dyn AvailabilityGateway>) -> Self {
        Self {
            gateway,
            store: Arc::new(SnapshotStore::new()),
            session: Arc::new(Mutex::new(ViewSession::default())),
            renderer: Arc::new(Renderer {
                policy: ResolverPolicy::from_config(config),
                copy: EmptyStateCopy::from_config(config),
            }),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
