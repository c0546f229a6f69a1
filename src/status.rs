use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

/// Holds the one transient status message.
///
/// Each `show` replaces the visible message and restarts the hide timer:
/// a message always stays up for the full ttl, and an older timer never
/// hides a newer message.
///
/// There is one board per process, shared by every browser talking to it:
/// the portal models a single user's page, so a message raised by one
/// visitor also shows on the next page another visitor loads.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    ttl: Duration,
    slot: Arc<Mutex<Slot>>,
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<StatusMessage>,
    generation: u64,
}

impl StatusBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, message: StatusMessage) {
        let generation = {
            let mut slot = self.lock();
            slot.generation += 1;
            slot.current = Some(message);
            slot.generation
        };

        let board = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(board.ttl).await;
            let mut slot = board.lock();
            if slot.generation == generation {
                debug!("status message expired");
                slot.current = None;
            }
        });
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn current(&self) -> Option<StatusMessage> {
        self.lock().current.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // The slot holds plain data; a panic mid-update cannot leave it torn.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_millis(5000);

    #[tokio::test(start_paused = true)]
    async fn message_hides_after_ttl() {
        let board = StatusBoard::new(TTL);
        board.show(StatusMessage::success("Signed up"));
        assert_eq!(board.current(), Some(StatusMessage::success("Signed up")));

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert!(board.current().is_some());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(board.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_message_restarts_the_timer() {
        let board = StatusBoard::new(TTL);
        board.show(StatusMessage::success("first"));
        tokio::time::sleep(Duration::from_millis(3000)).await;

        board.show(StatusMessage::error("second"));
        assert_eq!(board.current(), Some(StatusMessage::error("second")));

        // The first timer fires here and must leave "second" alone.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(board.current(), Some(StatusMessage::error("second")));

        tokio::time::sleep(Duration::from_millis(2600)).await;
        assert_eq!(board.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_the_process_wide_slot() {
        let board = StatusBoard::new(TTL);
        let other_request = board.clone();
        other_request.show(StatusMessage::error("Participant not found"));
        assert_eq!(board.current(), Some(StatusMessage::error("Participant not found")));

        tokio::time::sleep(TTL + Duration::from_millis(1)).await;
        assert_eq!(board.current(), None);
    }
}
