use sms_core::{ApiResponse, InboundEvent, SmsError};
use tracing::{debug, error};

use crate::{CatapultConfig, CatapultDriver, DEFAULT_BASE_URL};

/// Catapult REST client.
#[derive(Clone, Debug)]
pub struct CatapultClient {
    config: CatapultConfig,
    /// API base URL; override for testing/mocking.
    pub base_url: String,
    #[cfg(feature = "reqwest")]
    http: reqwest::Client,
}

impl CatapultClient {
    pub fn new(config: CatapultConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(config: CatapultConfig, base_url: String) -> Self {
        Self {
            config,
            base_url,
            #[cfg(feature = "reqwest")]
            http: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, ...).
    #[cfg(feature = "reqwest")]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn config(&self) -> &CatapultConfig {
        &self.config
    }

    /// Start handling one inbound request.
    pub fn driver(&self, event: InboundEvent) -> CatapultDriver<'_> {
        CatapultDriver::new(self, event)
    }

    /// POST `params` as a query string to `{base_url}/{endpoint}`.
    ///
    /// Transport failures and non-2xx answers are returned as errors; the body
    /// of a successful answer is handed back without interpretation.
    pub(crate) async fn post(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse, SmsError> {
        #[cfg(not(feature = "reqwest"))]
        {
            let _ = (endpoint, params);
            return Err(SmsError::Unexpected("reqwest feature disabled".into()));
        }
        #[cfg(feature = "reqwest")]
        {
            let url = format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                endpoint.trim_start_matches('/')
            );
            debug!(%url, params = params.len(), "posting catapult request");

            let res = self
                .http
                .post(&url)
                .query(params)
                .send()
                .await
                .map_err(|e| {
                    error!(%url, "catapult request failed: {}", e);
                    SmsError::Http(e.to_string())
                })?;

            let status = res.status();
            if !status.is_success() {
                let body = res.text().await.unwrap_or_default();
                error!(%url, %status, "catapult rejected request");
                return Err(SmsError::Provider(format!("HTTP {}: {}", status, body)));
            }

            let body = res
                .text()
                .await
                .map_err(|e| SmsError::Http(e.to_string()))?;
            Ok(ApiResponse {
                status: status.as_u16(),
                body,
            })
        }
    }
}
