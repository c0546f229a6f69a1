use crate::config::Config;
use crate::errors::ClientError;
use crate::models::{ActivityMap, ServerReply};
use reqwest::{Client, Method, StatusCode, Url};
use tracing::debug;

/// Outcome of a signup or unregister call that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionReply {
    Accepted { message: String },
    Rejected { status: StatusCode, detail: Option<String> },
}

/// Thin REST client over the upstream activities API.
#[derive(Clone)]
pub struct ActivityClient {
    http: Client,
    base_url: Url,
}

impl ActivityClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|err| ClientError::InvalidBaseUrl(format!("{}: {err}", config.api_base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(config.api_base_url.clone()));
        }

        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub async fn fetch_activities(&self) -> Result<ActivityMap, ClientError> {
        let url = self.endpoint(&["activities"], None)?;
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(ClientError::Status(resp.status()));
        }
        Ok(resp.json::<ActivityMap>().await?)
    }

    pub async fn signup(&self, activity: &str, email: &str) -> Result<ActionReply, ClientError> {
        let url = self.endpoint(&["activities", activity, "signup"], Some(email))?;
        self.send_action(Method::POST, url).await
    }

    pub async fn unregister(&self, activity: &str, email: &str) -> Result<ActionReply, ClientError> {
        let url = self.endpoint(&["activities", activity, "unregister"], Some(email))?;
        self.send_action(Method::DELETE, url).await
    }

    async fn send_action(&self, method: Method, url: Url) -> Result<ActionReply, ClientError> {
        debug!("{method} {url}");
        let resp = self.http.request(method, url).send().await?;
        let status = resp.status();

        if status.is_success() {
            let reply: ServerReply = resp.json().await?;
            return Ok(ActionReply::Accepted {
                message: reply.message.unwrap_or_default(),
            });
        }

        // Error bodies are not guaranteed to be JSON.
        let bytes = resp.bytes().await?;
        let detail = serde_json::from_slice::<ServerReply>(&bytes)
            .ok()
            .and_then(|reply| reply.detail)
            .filter(|detail| !detail.is_empty());
        Ok(ActionReply::Rejected { status, detail })
    }

    /// Builds `{base}/{segments..}[?email=..]` with every component
    /// percent-encoded.
    pub fn endpoint(&self, segments: &[&str], email: Option<&str>) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if let Some(email) = email {
            url.query_pairs_mut().append_pair("email", email);
        }
        Ok(url)
    }
}
