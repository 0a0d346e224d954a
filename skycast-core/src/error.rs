use thiserror::Error;

/// Normalized failure produced by the weather source or the rendering layer.
///
/// `Upstream` and `Transport` render as their bare message; callers are
/// not expected to branch on the variant, which exists for logging and
/// tests only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The API answered with a non-success status and (usually) an error body.
    #[error("{message}")]
    Upstream { message: String, code: Option<String> },

    /// The request never completed (DNS, connect, TLS, body read, ...).
    #[error("{message}")]
    Transport { message: String },

    /// A successful response carried no usable record. Raised by the
    /// consuming layer, never by the client itself.
    #[error("no weather data available")]
    EmptyResult,
}

impl ApiError {
    pub fn upstream(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Upstream { message: message.into(), code }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_displays_bare_message() {
        let err = ApiError::upstream("City not found", Some("404".into()));
        assert_eq!(err.to_string(), "City not found");
    }

    #[test]
    fn transport_message_passes_through_unchanged() {
        let err = ApiError::transport("Network error");
        assert_eq!(err.to_string(), "Network error");
    }
}
