//! Remote acquisition strategy
//!
//! One outbound call per dispatch attempt: POST the full wizard inputs to
//! the remote dashboard service with the fingerprint as the correlation
//! header and a hard client-side deadline. A non-success status or a
//! deadline expiry is a dispatch failure; retry is the caller's decision,
//! never taken here.

use super::DispatchError;
use riskwiz_common::types::WizardInputs;
use riskwiz_common::Error;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Correlation header carried on every remote dispatch
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

const USER_AGENT: &str = concat!("riskwiz/", env!("CARGO_PKG_VERSION"));

/// Client for the remote dashboard service
pub struct RemoteClient {
    http_client: reqwest::Client,
    base: String,
    timeout_ms: u64,
}

impl RemoteClient {
    /// Build a client for the given base endpoint with a hard deadline
    pub fn new(base: &str, timeout: Duration) -> Result<Self, Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base: base.trim_end_matches('/').to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    /// Fetch a raw dashboard payload for the inputs
    pub async fn fetch_dashboard(
        &self,
        inputs: &WizardInputs,
        fingerprint: &str,
    ) -> Result<Value, DispatchError> {
        let url = format!("{}/wizard/dashboard", self.base);

        debug!(
            url = %url,
            fingerprint = %fingerprint,
            timeout_ms = self.timeout_ms,
            "Dispatching to remote dashboard service"
        );

        let response = self
            .http_client
            .post(&url)
            .header(REQUEST_ID_HEADER, fingerprint)
            .json(inputs)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DispatchError::Timeout(self.timeout_ms)
                } else {
                    DispatchError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| DispatchError::Network(format!("Invalid response body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_on_base_is_normalized() {
        let client = RemoteClient::new("http://risk.example:9000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base, "http://risk.example:9000");
    }
}
