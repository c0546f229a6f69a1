use crate::models::ActivityMap;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// No load has completed yet.
    Pending,
    Ready,
    Failed,
}

#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub activities: ActivityMap,
    pub state: LoadState,
    pub loaded_at: Option<DateTime<Local>>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            activities: ActivityMap::new(),
            state: LoadState::Pending,
            loaded_at: None,
        }
    }
}

/// Identifies one load request. Tickets are handed out in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Client-side cache of every activity, replaced wholesale on refresh.
///
/// Only the load path writes here. When two loads overlap, the response of
/// the most recently issued one wins no matter which arrives last. This
/// departs on purpose from plain last-response-wins, where a slow initial
/// load could overwrite the reload that follows an action.
#[derive(Debug, Default)]
pub struct ActivityStore {
    inner: RwLock<Inner>,
    issued: AtomicU64,
}

#[derive(Debug, Default)]
struct Inner {
    snapshot: StoreSnapshot,
    applied: u64,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replaces the cached activities. Returns `false` when a newer load
    /// already landed and this result was dropped.
    pub async fn replace(&self, ticket: LoadTicket, activities: ActivityMap) -> bool {
        let mut inner = self.inner.write().await;
        if ticket.0 <= inner.applied {
            return false;
        }
        inner.applied = ticket.0;
        inner.snapshot = StoreSnapshot {
            activities,
            state: LoadState::Ready,
            loaded_at: Some(Local::now()),
        };
        true
    }

    /// Moves the store into the failed-load state. Cached activities are
    /// left in place but no longer rendered.
    pub async fn mark_failed(&self, ticket: LoadTicket) -> bool {
        let mut inner = self.inner.write().await;
        if ticket.0 <= inner.applied {
            return false;
        }
        inner.applied = ticket.0;
        inner.snapshot.state = LoadState::Failed;
        true
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.inner.read().await.snapshot.clone()
    }
}
