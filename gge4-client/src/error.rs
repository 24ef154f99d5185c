//! Error types for the Global Gateway e4 client.
//!
//! Only conditions that stop a transaction *before* it reaches the gateway are
//! reported through [`GatewayError`]. Everything the gateway says back,
//! including HTTP failures, unparseable bodies and processor declines, is
//! classified into a [`GatewayResponse`](crate::response::GatewayResponse)
//! instead.
//!
//! # Error Categories
//!
//! - **Network Errors** ([`GatewayError::HttpError`], [`GatewayError::TransportError`]):
//!   the request never produced an HTTP response
//! - **Request Errors** ([`GatewayError::SerializationError`]): the outgoing payload could
//!   not be encoded
//! - **Configuration Errors** ([`GatewayError::ConfigError`],
//!   [`GatewayError::InvalidGatewayUrl`]): client setup is unusable
//!
//! # Examples
//!
//! ```
//! use gge4_client::error::{GatewayError, Result};
//!
//! fn require_https(url: &str) -> Result<&str> {
//!     if !url.starts_with("https://") {
//!         return Err(GatewayError::InvalidGatewayUrl("URL must use HTTPS".to_owned()));
//!     }
//!     Ok(url)
//! }
//!
//! assert!(require_https("http://example.com").is_err());
//! ```

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Curl-compatible code for a failed connection attempt.
pub const TRANSPORT_CODE_CONNECT: u32 = 7;
/// Curl-compatible code for an operation that timed out.
pub const TRANSPORT_CODE_TIMEOUT: u32 = 28;
/// Curl-compatible code for TLS and other request-level failures.
pub const TRANSPORT_CODE_REQUEST: u32 = 35;
/// Curl-compatible code for a failure while reading the response.
pub const TRANSPORT_CODE_RECEIVE: u32 = 56;

/// Errors that abort a transaction before or during transmission.
///
/// # Error Recovery
///
/// - **Transient errors** ([`HttpError`](Self::HttpError)): the caller owns retry policy;
///   this crate never retries
/// - **Validation errors** ([`InvalidGatewayUrl`](Self::InvalidGatewayUrl),
///   [`TransportError`](Self::TransportError)): fix the configuration or headers
/// - **Encoding errors** ([`SerializationError`](Self::SerializationError)): a field value
///   could not be represented as JSON
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: DNS failures, refused connections, TLS
    /// handshake errors, connect or total timeouts (30 s / 60 s by default).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Transport refused to send the request.
    ///
    /// Raised by transport-level validation, e.g. a header containing control
    /// characters or a non-HTTPS endpoint.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The gateway endpoint URL is malformed or not allowed.
    #[error("Invalid gateway URL: {0}")]
    InvalidGatewayUrl(String),

    /// The transaction payload could not be encoded as JSON.
    #[error("Request serialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Client configuration is invalid or could not be loaded.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl GatewayError {
    /// Returns the numeric code recorded on the response when this error
    /// ends a submission.
    ///
    /// Codes follow libcurl numbering so they line up with what other
    /// integrations of the same gateway report.
    ///
    /// # Examples
    ///
    /// ```
    /// use gge4_client::error::{GatewayError, TRANSPORT_CODE_REQUEST};
    ///
    /// let err = GatewayError::TransportError("bad header".to_owned());
    /// assert_eq!(err.transport_code(), TRANSPORT_CODE_REQUEST);
    /// ```
    #[must_use]
    pub fn transport_code(&self) -> u32 {
        match self {
            Self::HttpError(e) if e.is_timeout() => TRANSPORT_CODE_TIMEOUT,
            Self::HttpError(e) if e.is_connect() => TRANSPORT_CODE_CONNECT,
            Self::HttpError(e) if e.is_body() || e.is_decode() => TRANSPORT_CODE_RECEIVE,
            Self::HttpError(_)
            | Self::TransportError(_)
            | Self::InvalidGatewayUrl(_)
            | Self::SerializationError(_)
            | Self::ConfigError(_) => TRANSPORT_CODE_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::{SocketAddr, TcpListener},
        thread,
        time::Duration,
    };

    use super::*;

    fn unused_local_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    }

    /// Answers one request with headers promising more body than is sent.
    fn serve_truncated_body() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut seen = Vec::new();
            let mut buf = [0_u8; 1024];
            while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                seen.extend_from_slice(&buf[..n]);
            }
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 64\r\n\r\n{\"partial\"")
                .unwrap();
        });
        addr
    }

    async fn fetch(client: &reqwest::Client, addr: SocketAddr) -> Result<Vec<u8>> {
        let response = client.get(format!("http://{addr}/transaction/v12")).send().await?;
        Ok(response.bytes().await?.to_vec())
    }

    #[test]
    fn test_error_display() {
        let error = GatewayError::TransportError("test error".into());
        assert_eq!(error.to_string(), "Transport error: test error");
    }

    #[test]
    fn test_invalid_gateway_url_error() {
        let error = GatewayError::InvalidGatewayUrl("http://example.com".to_owned());
        assert_eq!(error.to_string(), "Invalid gateway URL: http://example.com");
    }

    #[test]
    fn test_config_error() {
        let error = GatewayError::ConfigError("gateway_id is empty".into());
        assert!(error.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_serialization_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: GatewayError = serde_err.into();
        assert!(matches!(error, GatewayError::SerializationError(_)));
        assert!(error.to_string().starts_with("Request serialization failed"));
    }

    #[test]
    fn test_transport_code_for_validation_errors() {
        let error = GatewayError::TransportError("CRLF in header".into());
        assert_eq!(error.transport_code(), TRANSPORT_CODE_REQUEST);

        let error = GatewayError::InvalidGatewayUrl("ftp://x".into());
        assert_eq!(error.transport_code(), TRANSPORT_CODE_REQUEST);
    }

    #[tokio::test]
    async fn test_transport_code_connection_refused() {
        let error = fetch(&reqwest::Client::new(), unused_local_addr()).await.unwrap_err();

        assert!(matches!(error, GatewayError::HttpError(ref e) if e.is_connect()));
        assert_eq!(error.transport_code(), TRANSPORT_CODE_CONNECT);
    }

    #[tokio::test]
    async fn test_transport_code_timeout() {
        // Accepted by the kernel backlog, never answered.
        let silent = TcpListener::bind("127.0.0.1:0").unwrap();
        let client =
            reqwest::Client::builder().timeout(Duration::from_millis(200)).build().unwrap();

        let error = fetch(&client, silent.local_addr().unwrap()).await.unwrap_err();

        assert!(matches!(error, GatewayError::HttpError(ref e) if e.is_timeout()));
        assert_eq!(error.transport_code(), TRANSPORT_CODE_TIMEOUT);
    }

    #[tokio::test]
    async fn test_transport_code_truncated_body() {
        let addr = serve_truncated_body();

        let error = fetch(&reqwest::Client::new(), addr).await.unwrap_err();

        assert_eq!(error.transport_code(), TRANSPORT_CODE_RECEIVE);
    }
}
