use thiserror::Error;

/// Top-level error type for the `netsketch-api` crate.
///
/// `netsketch-core` never lets these escape to the user: analysis turns
/// each of them into an explanatory message.
#[derive(Debug, Error)]
pub enum Error {
    // ── Credentials ─────────────────────────────────────────────────
    /// No API key was configured.
    #[error("No API key configured for the analysis service")]
    MissingCredentials,

    /// The service rejected the API key.
    #[error("Invalid API key")]
    InvalidApiKey,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup error (unreadable or invalid CA bundle).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Service ─────────────────────────────────────────────────────
    /// Non-success status from the service.
    #[error("Analysis service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The service answered but produced no text.
    #[error("The analysis service returned an empty answer")]
    EmptyResponse,
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Service { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the failure is about the API key.
    pub fn is_credentials(&self) -> bool {
        matches!(self, Self::MissingCredentials | Self::InvalidApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limits_and_server_errors_are_transient() {
        for status in [429, 500, 503] {
            let err = Error::Service {
                status,
                message: String::new(),
            };
            assert!(err.is_transient(), "{status}");
        }
        let bad_request = Error::Service {
            status: 400,
            message: String::new(),
        };
        assert!(!bad_request.is_transient());
        assert!(!Error::EmptyResponse.is_transient());
    }

    #[test]
    fn credential_errors() {
        assert!(Error::MissingCredentials.is_credentials());
        assert!(Error::InvalidApiKey.is_credentials());
        assert!(!Error::EmptyResponse.is_credentials());
    }
}
