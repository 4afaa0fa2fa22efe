//! Error types for the Zotero client.

use thiserror::Error;

/// Errors returned by [`super::ZoteroClient`] operations.
///
/// "Not found" on a single item is not an error (`Ok(None)`), and attachment
/// downloads never error; see [`super::AttachmentDownload`].
#[derive(Debug, Error)]
pub enum ZoteroError {
    /// Invalid credentials or library identity, raised before any network activity.
    #[error("invalid Zotero configuration: {0}")]
    Config(String),

    /// HTTP client could not be constructed.
    #[error("HTTP client construction failed: {0}")]
    Client(String),

    /// Transport-level failure (DNS, connect, TLS, timeout).
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The request URL.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status from the Zotero API.
    #[error("Zotero API returned HTTP {status} for {url}: {body}")]
    HttpStatus {
        /// The request URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Response body text, when it could be read.
        body: String,
    },

    /// Response body was not the expected JSON shape.
    #[error("unexpected Zotero response from {url}: {message}")]
    Decode {
        /// The request URL.
        url: String,
        /// Parser error text.
        message: String,
    },
}

impl ZoteroError {
    /// Creates a `Config` error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns the HTTP status for `HttpStatus` errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for configuration errors.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_error_carries_status_and_body() {
        let err = ZoteroError::HttpStatus {
            url: "https://api.zotero.org/users/1/items/ABC".to_string(),
            status: 403,
            body: "Forbidden".to_string(),
        };
        assert_eq!(err.status(), Some(403));
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("Forbidden"));
        assert!(!err.is_config());
    }

    #[test]
    fn test_config_error_message() {
        let err = ZoteroError::config("Zotero API key is required");
        assert!(err.is_config());
        assert!(err.status().is_none());
        assert!(err.to_string().contains("API key is required"));
    }
}
