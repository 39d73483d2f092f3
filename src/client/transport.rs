use async_trait::async_trait;
use tracing::debug;

use super::protocol::{NutritionQuery, NutritionReply};
use crate::messages::dto::HistoryResponse;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unreadable reply: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The network side of the chat client.
#[async_trait]
pub trait NutritionTransport: Send + Sync {
    async fn lookup(&self, query: &NutritionQuery) -> Result<NutritionReply, ClientError>;
}

/// Talks to a nutrition service over HTTP. No timeout and no retries: a
/// call runs until the server or the network gives up.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Newest `limit` conversation lines stored by the service.
    pub async fn history(&self, limit: i64) -> Result<HistoryResponse, ClientError> {
        let url = format!("{}/api/history?limit={}", self.base_url, limit);
        let body = self.http.get(url).send().await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl NutritionTransport for HttpTransport {
    async fn lookup(&self, query: &NutritionQuery) -> Result<NutritionReply, ClientError> {
        let url = format!("{}/api/nutrition", self.base_url);
        let res = self.http.post(url).json(query).send().await?;
        let status = res.status();
        // error statuses still carry a JSON reply
        let body = res.bytes().await?;
        debug!(%status, bytes = body.len(), "nutrition reply");
        Ok(serde_json::from_slice(&body)?)
    }
}
