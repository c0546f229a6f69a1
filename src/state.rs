use crate::client::ActivityClient;
use crate::config::Config;
use crate::errors::ClientError;
use crate::status::StatusBoard;
use crate::store::ActivityStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub client: ActivityClient,
    pub store: Arc<ActivityStore>,
    pub status: StatusBoard,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        Ok(Self {
            client: ActivityClient::new(config)?,
            store: Arc::new(ActivityStore::new()),
            status: StatusBoard::new(config.status_ttl),
        })
    }
}
