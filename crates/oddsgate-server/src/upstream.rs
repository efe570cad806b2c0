//! Outbound HTTP client for backend fetches.

use std::time::Duration;

use oddsgate_core::{GatewayError, Service};
use serde_json::Value;
use tracing::{debug, warn};

/// Thin wrapper around a shared `reqwest::Client`. Each fetch is a GET with
/// optional query parameters; a 2xx body parses as JSON, everything else is
/// a categorized failure carrying the service identity.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::configuration(format!("http client init failed: {e}")))?;
        Ok(Self { http })
    }

    /// Issue `GET {base}{path}` with the given query parameters.
    pub async fn get_json(
        &self,
        service: Service,
        base: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, GatewayError> {
        let url = format!("{base}{path}");

        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        debug!(service = %service, url = %url, "fetching from backend");

        let response = request
            .send()
            .await
            .map_err(|e| categorize(service, &e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(service = %service, url = %url, status = %status, "backend returned non-success");
            return Err(GatewayError::upstream_status(service, status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::malformed(service, e.to_string()))
    }
}

fn categorize(service: Service, err: &reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::timeout(service)
    } else {
        // Connection refused, DNS failure and friends all mean the instance
        // could not be reached; keep the detail for the log line.
        GatewayError::unreachable(service, err.to_string())
    }
}
