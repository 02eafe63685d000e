// ── Core error types ──
//
// User-facing errors from zhome-core. Consumers never see raw HTTP
// status codes or JSON parse failures; the `From<zhome_api::Error>`
// impl translates transport-layer errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("No device selected")]
    NoDeviceSelected,

    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether a later attempt could succeed without user action.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => true,
            Self::Api { status, .. } => status.is_some_and(|s| s >= 500),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<zhome_api::Error> for CoreError {
    fn from(err: zhome_api::Error) -> Self {
        match err {
            zhome_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            zhome_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            zhome_api::Error::ClientBuild(message) => CoreError::Config { message },
            zhome_api::Error::NotFound { path } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: path,
            },
            zhome_api::Error::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            zhome_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_maps_to_api_with_status() {
        let err: CoreError = zhome_api::Error::Http {
            status: 502,
            message: "bad gateway".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Api { status: Some(502), .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn timeout_is_transient_and_names_no_duration() {
        let err = CoreError::Timeout;
        assert_eq!(err.to_string(), "Backend request timed out");
        assert!(err.is_transient());
    }

    #[test]
    fn missing_path_maps_to_not_found() {
        let err: CoreError = zhome_api::Error::NotFound {
            path: "/api/home/devices/x".into(),
        }
        .into();
        assert!(matches!(err, CoreError::NotFound { ref identifier, .. } if identifier == "/api/home/devices/x"));
        assert!(!err.is_transient());
    }
}
