//! Transport abstraction.
//!
//! The client hands a fully built [`GatewayRequest`] (URL, headers, signed
//! body) to a [`Transport`] and gets back whatever the server answered.
//! Transports do not interpret status codes: a 4xx or 5xx is a normal
//! [`TransportResponse`]. Only failures to obtain a response at all are
//! errors.
//!
//! [`HttpTransport`] is the reqwest implementation. Tests and alternative
//! HTTP stacks implement the trait directly.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gge4_client::transport::{GatewayRequest, HttpTransport, Transport};
//!
//! # async fn example() -> gge4_client::error::Result<()> {
//! let transport = HttpTransport::new()?;
//!
//! let request = GatewayRequest {
//!     url: "https://api.demo.globalgatewaye4.firstdata.com/transaction/v12".to_owned(),
//!     headers: vec![("Accept".to_owned(), "application/json".to_owned())],
//!     body: b"{}".to_vec(),
//! };
//!
//! let response = transport.submit(&request).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use crate::error::Result;

pub mod config;
pub mod http;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// A request ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    /// Full endpoint URL including the API version.
    pub url: String,
    /// Request headers in send order.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Vec<u8>,
}

impl GatewayRequest {
    /// Returns the first header value with the given name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response from transport operations.
///
/// Contains the raw response body, HTTP status code, and response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: Vec<(String, String)>,
}

/// Sends gateway requests.
///
/// # Errors
///
/// Implementations return an error only when no HTTP response was obtained:
/// connection failure, timeout, TLS failure, body read failure, or a request
/// the transport refuses to send. The error's
/// [`transport_code`](crate::error::GatewayError::transport_code) ends up on
/// the classified response.
pub trait Transport: Send + Sync {
    /// POSTs the request and returns the server's answer.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent or the response could
    /// not be read.
    fn submit<'a>(
        &'a self,
        request: &'a GatewayRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Returns the protocol name for logging.
    fn protocol_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_request_header_lookup_ignores_case() {
        let request = GatewayRequest {
            url: "https://example.com/transaction/v12".to_owned(),
            headers: vec![
                ("Accept".to_owned(), "application/json".to_owned()),
                ("X-GGe4-Date".to_owned(), "2024-01-02T03:04:05Z".to_owned()),
            ],
            body: Vec::new(),
        };

        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("x-gge4-date"), Some("2024-01-02T03:04:05Z"));
        assert_eq!(request.header("Authorization"), None);
    }

    #[test]
    fn test_transport_response_clone() {
        let response = TransportResponse {
            status: 201,
            body: b"{}".to_vec(),
            headers: vec![("content-type".to_owned(), "application/json".to_owned())],
        };
        assert_eq!(response.clone(), response);
    }
}
