use crate::client::ActionReply;
use crate::errors::ClientError;
use crate::state::AppState;
use crate::status::StatusMessage;
use tracing::{error, info, warn};

pub const GENERIC_ACTION_ERROR: &str = "An error occurred";
pub const SIGNUP_TRANSPORT_ERROR: &str = "Failed to sign up. Please try again.";
pub const UNREGISTER_TRANSPORT_ERROR: &str = "Failed to unregister. Please try again.";

/// Result of a signup/unregister as seen by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub message: StatusMessage,
    pub accepted: bool,
}

/// Refreshes the store from `GET /activities`. Failures are logged and
/// leave the store in the failed-load state; nothing retries.
pub async fn load(state: &AppState) -> bool {
    let ticket = state.store.begin_load();
    match state.client.fetch_activities().await {
        Ok(activities) => {
            let count = activities.len();
            if state.store.replace(ticket, activities).await {
                info!(count, "activities loaded");
            } else {
                info!(?ticket, "discarded superseded activities response");
            }
            true
        }
        Err(err) => {
            error!("error fetching activities: {err}");
            state.store.mark_failed(ticket).await;
            false
        }
    }
}

pub async fn signup(state: &AppState, activity: &str, email: &str) -> ActionOutcome {
    let reply = state.client.signup(activity, email).await;
    finish(state, "signup", reply, SIGNUP_TRANSPORT_ERROR).await
}

pub async fn unregister(state: &AppState, activity: &str, email: &str) -> ActionOutcome {
    let reply = state.client.unregister(activity, email).await;
    finish(state, "unregister", reply, UNREGISTER_TRANSPORT_ERROR).await
}

async fn finish(
    state: &AppState,
    action: &str,
    reply: Result<ActionReply, ClientError>,
    transport_message: &str,
) -> ActionOutcome {
    let outcome = match reply {
        Ok(ActionReply::Accepted { message }) => {
            info!(action, "{message}");
            ActionOutcome {
                message: StatusMessage::success(message),
                accepted: true,
            }
        }
        Ok(ActionReply::Rejected { status, detail }) => {
            warn!(action, %status, ?detail, "server rejected request");
            ActionOutcome {
                message: StatusMessage::error(detail.unwrap_or_else(|| GENERIC_ACTION_ERROR.to_string())),
                accepted: false,
            }
        }
        Err(err) => {
            error!(action, "error during {action}: {err}");
            ActionOutcome {
                message: StatusMessage::error(transport_message),
                accepted: false,
            }
        }
    };

    state.status.show(outcome.message.clone());
    if outcome.accepted {
        load(state).await;
    }
    outcome
}
