//! Remote agent-gateway resolver.
//!
//! One round trip per submission: the submitted text is POSTed to the
//! gateway's `/send-query` endpoint and the JSON reply is mapped into a
//! single agent message. Any transport failure, non-2xx status, or body
//! lacking the success marker becomes a [`ResolverError`] — no retries,
//! no streaming, no batching.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Sender;

use super::resolver::{Reply, ReplyResolver, ResolverError};
use super::types::AgentInfo;

pub const DEFAULT_GATEWAY_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Serialize, Debug)]
struct QueryRequest<'a> {
    text: &'a str,
}

/// The gateway's reply envelope. `status` is an application-level marker
/// carried in the body, independent of the HTTP status line.
#[derive(Deserialize, Debug)]
struct QueryResponse {
    #[serde(default)]
    status: u16,
    content: Option<String>,
    name: Option<String>,
    message: Option<String>,
}

/// HTTP resolver talking to a locally running agent gateway.
pub struct GatewayResolver {
    base_url: String,
    client: reqwest::Client,
}

impl GatewayResolver {
    /// `base_url` arrives fully resolved; the defaults → file → env
    /// precedence is collapsed once, in `core::config::resolve`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ReplyResolver for GatewayResolver {
    fn name(&self) -> &str {
        "gateway"
    }

    async fn resolve(&self, text: &str, sender: Sender<Reply>) -> Result<(), ResolverError> {
        info!("Gateway query: {} chars", text.len());

        let response = self
            .client
            .post(format!("{}/send-query", self.base_url))
            .json(&QueryRequest { text })
            .send()
            .await
            .map_err(|e| ResolverError::Network(e.to_string()))?;

        debug!("Gateway response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!("Gateway HTTP error: {status}");
            return Err(ResolverError::Http { status });
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| ResolverError::Parse(e.to_string()))?;

        match (body.status, body.content) {
            (200, Some(content)) => {
                let agent_name = body.name.unwrap_or_else(|| "Agent".to_string());
                let reply = Reply::agent(content, AgentInfo::new(agent_name, "Agent response"));
                if sender.send(reply).await.is_err() {
                    return Err(ResolverError::ChannelClosed);
                }
                Ok(())
            }
            _ => {
                let message = body
                    .message
                    .unwrap_or_else(|| "No response received from agent".to_string());
                warn!("Gateway body-level failure (status {}): {message}", body.status);
                Err(ResolverError::Agent(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_stored_verbatim() {
        // No hidden env or default fallback at this level
        let resolver = GatewayResolver::new("http://10.0.0.1:9999");
        assert_eq!(resolver.base_url, "http://10.0.0.1:9999");
        assert_eq!(resolver.name(), "gateway");
    }

    #[test]
    fn test_response_envelope_tolerates_missing_fields() {
        let body: QueryResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.status, 0);
        assert!(body.content.is_none());
        assert!(body.name.is_none());
    }
}
