use thiserror::Error;

use crate::service::Service;

/// Error taxonomy for gateway operations.
///
/// Upstream failures keep the service identity and, where available, the
/// HTTP status, so handlers and logs can distinguish "backend down" from
/// "backend rejected request" even when the public contract flattens both
/// to a 500.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{service} service returned status {status}")]
    UpstreamStatus { service: Service, status: u16 },

    #[error("{service} service unreachable: {detail}")]
    UpstreamUnreachable { service: Service, detail: String },

    #[error("{service} service request timed out")]
    UpstreamTimeout { service: Service },

    #[error("{service} service returned a malformed payload: {detail}")]
    MalformedPayload { service: Service, detail: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Create a new UpstreamStatus error.
    pub fn upstream_status(service: Service, status: u16) -> Self {
        Self::UpstreamStatus { service, status }
    }

    /// Create a new UpstreamUnreachable error.
    pub fn unreachable(service: Service, detail: impl Into<String>) -> Self {
        Self::UpstreamUnreachable {
            service,
            detail: detail.into(),
        }
    }

    /// Create a new UpstreamTimeout error.
    pub fn timeout(service: Service) -> Self {
        Self::UpstreamTimeout { service }
    }

    /// Create a new MalformedPayload error.
    pub fn malformed(service: Service, detail: impl Into<String>) -> Self {
        Self::MalformedPayload {
            service,
            detail: detail.into(),
        }
    }

    /// Create a new Configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// True when the upstream answered 404 for the requested entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UpstreamStatus { status: 404, .. })
    }

    /// True for failures caused by the upstream (status, transport, payload).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamStatus { .. }
                | Self::UpstreamUnreachable { .. }
                | Self::UpstreamTimeout { .. }
                | Self::MalformedPayload { .. }
        )
    }

    /// True when the caller sent an invalid request (4xx category).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingParameter(_))
    }
}

/// Convenience result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GatewayError::upstream_status(Service::Odds, 503);
        assert_eq!(err.to_string(), "odds service returned status 503");

        let err = GatewayError::unreachable(Service::Video, "connection refused");
        assert_eq!(
            err.to_string(),
            "video service unreachable: connection refused"
        );

        let err = GatewayError::timeout(Service::Video);
        assert_eq!(err.to_string(), "video service request timed out");

        let err = GatewayError::MissingParameter("query");
        assert_eq!(err.to_string(), "missing required parameter: query");
    }

    #[test]
    fn test_not_found_detection() {
        assert!(GatewayError::upstream_status(Service::Odds, 404).is_not_found());
        assert!(!GatewayError::upstream_status(Service::Odds, 500).is_not_found());
        assert!(!GatewayError::timeout(Service::Odds).is_not_found());
    }

    #[test]
    fn test_upstream_vs_client_classification() {
        assert!(GatewayError::upstream_status(Service::Odds, 500).is_upstream());
        assert!(GatewayError::unreachable(Service::Odds, "x").is_upstream());
        assert!(GatewayError::timeout(Service::Video).is_upstream());
        assert!(GatewayError::malformed(Service::Video, "no contents").is_upstream());

        let client_err = GatewayError::MissingParameter("id");
        assert!(client_err.is_client_error());
        assert!(!client_err.is_upstream());

        let config_err = GatewayError::configuration("empty url list");
        assert!(!config_err.is_client_error());
        assert!(!config_err.is_upstream());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope }").unwrap_err();
        let err: GatewayError = json_err.into();
        assert!(matches!(err, GatewayError::JsonError(_)));
    }
}
