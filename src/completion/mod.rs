// HTTP client for the external completion service. The single request it
// makes is the engine's only suspension point; aborting the caller's future
// aborts the in-flight request. Failures are handled at the orchestrator
// boundary, so this client does not retry.


use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::DocQaError;
use crate::config::CompletionConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponseBody {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    endpoint: Url,
}

impl CompletionClient {
    #[inline]
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid completion endpoint: {}", config.endpoint))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build completion HTTP client")?;

        Ok(Self { http, endpoint })
    }

    #[inline]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one `{systemPrompt, userPrompt}` request and return the
    /// response `content`. A non-2xx status, an unparseable body, or a
    /// missing/empty content field is a service failure.
    #[inline]
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        debug!(
            "Requesting completion ({} system chars, {} user chars)",
            request.system_prompt.len(),
            request.user_prompt.len()
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| DocQaError::Completion(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Completion service returned HTTP {}", status);
            return Err(DocQaError::Completion(format!("HTTP {status}")).into());
        }

        let body: CompletionResponseBody = response
            .json()
            .await
            .map_err(|e| DocQaError::Completion(format!("malformed response body: {e}")))?;

        match body.content {
            Some(content) if !content.trim().is_empty() => {
                debug!("Received completion ({} chars)", content.len());
                Ok(content)
            }
            _ => {
                warn!("Completion response is missing content");
                Err(DocQaError::Completion("response missing content".to_string()).into())
            }
        }
    }
}
