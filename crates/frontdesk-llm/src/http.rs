//! OpenAI-compatible HTTP completion client.
//!
//! One POST per call with a bounded request timeout; expired or failed
//! calls return `FrontdeskError::Completion` and are not retried.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use frontdesk_core::config::CompletionConfig;
use frontdesk_core::error::{FrontdeskError, Result};

use crate::client::{parse_keyword_reply, CompletionClient, CompletionMessage};

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct HttpCompletionClient {
    url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [CompletionMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl HttpCompletionClient {
    /// Build a client from configuration.
    ///
    /// Fails if the reqwest client cannot be constructed (invalid TLS
    /// backend or timeout configuration).
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FrontdeskError::Completion(format!("client build failed: {}", e)))?;

        Ok(Self {
            url: config.url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        messages: &[CompletionMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| FrontdeskError::Completion(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FrontdeskError::Completion(format!(
                "completion API returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| FrontdeskError::Completion(format!("invalid response body: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| FrontdeskError::Completion("response had no choices".to_string()))?;

        debug!(model = %self.model, chars = content.len(), "Completion generated");
        Ok(content)
    }

    async fn extract_keywords(&self, text: &str) -> Result<Vec<String>> {
        let messages = [
            CompletionMessage::system(
                "Extract 3-5 keywords from the following text. \
                 Return only the keywords separated by commas.",
            ),
            CompletionMessage::user(text),
        ];

        let reply = self.complete(&messages, 0.3, 50).await?;
        Ok(parse_keyword_reply(&reply))
    }
}
