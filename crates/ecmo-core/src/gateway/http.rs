use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::{GatewayConfig, DEFAULT_ASK_PATH, DEFAULT_GATEWAY_TIMEOUT_SECS};

use super::{AnalysisConfiguration, GatewayError, QaGateway, QaResponse};

/// HTTP client for a paper QA service.
///
/// Sends `POST {base_url}/ask` with `{question, settings}` and decodes the
/// `{answer, formatted_answer, contexts}` reply.
pub struct HttpGateway {
    base_url: String,
    api_key: String,
    timeout: Duration,
    client: Client,
}

impl HttpGateway {
    /// Creates a new gateway for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_GATEWAY_TIMEOUT_SECS),
            client: Client::new(),
        }
    }

    /// Creates a gateway from configuration.
    ///
    /// Falls back to `ECMO_GATEWAY_API_KEY` when the config carries no key.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        if config.base_url.trim().is_empty() {
            return Err(GatewayError::MissingConfig("gateway.base_url".to_string()));
        }

        let key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ECMO_GATEWAY_API_KEY").ok())
            .unwrap_or_default();

        Ok(Self::new(&config.base_url)
            .with_api_key(key)
            .with_timeout(Duration::from_secs(config.timeout_secs)))
    }

    /// Sets the bearer token (empty means no authorization header).
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn ask_url(&self) -> String {
        format!("{}/{}", self.base_url, DEFAULT_ASK_PATH)
    }
}

#[async_trait]
impl QaGateway for HttpGateway {
    async fn ask(
        &self,
        question: &str,
        settings: &AnalysisConfiguration,
    ) -> Result<QaResponse, GatewayError> {
        let request = AskRequest { question, settings };
        let url = self.ask_url();

        debug!(%url, paper_directory = %settings.paper_directory.display(), "sending question");

        let mut req = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("content-type", "application/json");

        if !self.api_key.is_empty() {
            req = req.header("authorization", format!("Bearer {}", self.api_key));
        }

        let response = req.json(&request).send().await?;

        let status = response.status();

        if status == 429 {
            return Err(GatewayError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GatewayError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let answer: QaResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::ParseError(e.to_string()))?;

        debug!(contexts = answer.contexts.len(), "received answer");

        Ok(answer)
    }
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    settings: &'a AnalysisConfiguration,
}
