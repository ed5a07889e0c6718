use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

/// One WHEP-style offer/answer exchange: POST the local SDP offer to the
/// endpoint, receive the remote answer. Timeout enforcement belongs to the
/// caller, which holds the hard deadline.
#[async_trait]
pub trait SignalingExchange: Send + Sync {
    async fn exchange(&self, url: &str, offer_sdp: &str) -> anyhow::Result<String>;
}

/// Signaling client against a MediaMTX-style WHEP endpoint.
#[derive(Clone)]
pub struct WhepSignaling {
    client: reqwest::Client,
}

impl WhepSignaling {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for WhepSignaling {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalingExchange for WhepSignaling {
    async fn exchange(&self, url: &str, offer_sdp: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/sdp")
            .body(offer_sdp.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("WHEP request failed: {} - {}", status, body);
        }

        Ok(response.text().await?)
    }
}
