use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::error::GatewayError;
use crate::models::{Building, Position};

/// Sequence number handed out before a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub ticket: Ticket,
    pub position: Option<Position>,
    pub result: Result<Vec<Building>, GatewayError>,
}

/// Latest fetched availability. Responses that resolve out of order are
/// dropped, so the most recently *started* fetch wins.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    next_seq: AtomicU64,
    latest: Mutex<Option<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.next_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns `false` when a newer snapshot is already stored.
    pub fn commit(
        &self,
        ticket: Ticket,
        position: Option<Position>,
        result: Result<Vec<Building>, GatewayError>,
    ) -> bool {
        let mut latest = match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(current) = latest.as_ref() {
            if current.ticket > ticket {
                debug!("dropping stale response #{} (have #{})", ticket.seq(), current.ticket.seq());
                return false;
            }
        }
        *latest = Some(Snapshot {
            ticket,
            position,
            result,
        });
        true
    }

    pub fn latest(&self) -> Option<Snapshot> {
        match self.latest.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
