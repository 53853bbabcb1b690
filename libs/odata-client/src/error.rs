use thiserror::Error;

/// Errors surfaced to table views.
///
/// Views do not distinguish the kinds; every variant is shown as a generic
/// "query failed" message. The kinds exist for logs and retry decisions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("server returned HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("undecodable response: {message}")]
    Decode { message: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Query(#[from] odata_core::Error),
}

impl ClientError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Every kind maps to the same user-facing failure state.
    #[must_use]
    pub fn is_query_failed(&self) -> bool {
        match self {
            Self::Network { .. }
            | Self::Server { .. }
            | Self::Decode { .. }
            | Self::InvalidUrl(_)
            | Self::Query(_) => true,
        }
    }

    /// HTTP status for server errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Transport failures and 5xx are worth retrying; the rest will fail again.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Message for the view layer.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        "Query failed"
    }
}
