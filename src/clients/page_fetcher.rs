use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Error, Result};

// Wikipedia rejects requests carrying the default library agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Outbound document retrieval. One attempt per call; the transport timeout
/// is the only deadline.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let res = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to fetch URL: {}", e)))?;

        if !res.status().is_success() {
            return Err(Error::Fetch(format!(
                "Failed to fetch URL: HTTP {}",
                res.status()
            )));
        }

        res.text()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to read response body: {}", e)))
    }
}
