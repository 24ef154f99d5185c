//! HTTP transport implementation.
//!
//! POSTs gateway requests over HTTPS using reqwest. Redirects are never
//! followed and non-2xx statuses are returned to the caller unchanged.

use reqwest::{Client, redirect};
use tracing::instrument;
use url::{Host, Url};

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{GatewayError, Result},
    transport::{GatewayRequest, Transport, TransportResponse},
};

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("gge4-client/", env!("CARGO_PKG_VERSION"));

/// Validates URL for security constraints.
///
/// Ensures the URL uses HTTPS and does not point to localhost.
pub(crate) fn validate_url(url: &Url) -> Result<()> {
    if url.scheme() != "https" {
        return Err(GatewayError::TransportError("Only HTTPS URLs are allowed".to_owned()));
    }

    if is_loopback_host(url) {
        return Err(GatewayError::TransportError("Localhost URLs are not allowed".to_owned()));
    }

    Ok(())
}

/// Returns true for `localhost` and any IPv4 or IPv6 loopback address.
pub(crate) fn is_loopback_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> Result<()> {
    if name.contains('\r') || name.contains('\n') || name.contains('\0') {
        return Err(GatewayError::TransportError(
            "Invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if value.contains('\r') || value.contains('\n') || value.contains('\0') {
        return Err(GatewayError::TransportError(
            "Invalid header value: control characters not allowed".to_owned(),
        ));
    }
    Ok(())
}

/// reqwest-backed transport.
///
/// # Examples
///
/// ```
/// use gge4_client::transport::{HttpConfig, HttpTransport, HttpVersion};
///
/// let config = HttpConfig {
///     pool_max_idle_per_host: 2,
///     timeout_secs: 60,
///     connect_timeout_secs: 30,
///     http_version: HttpVersion::Http1,
/// };
///
/// let transport = HttpTransport::with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl HttpTransport {
    /// Creates a transport with default settings: 60 s total timeout,
    /// 30 s connect timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created (TLS backend failure).
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates a transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client creation fails.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .redirect(redirect::Policy::none())
            .user_agent(USER_AGENT);

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder.build().map_err(GatewayError::HttpError)?;

        Ok(Self { client, http_version: config.http_version })
    }

    #[instrument(skip(self, request), fields(url = %request.url, body_len = request.body.len()))]
    async fn execute(&self, request: &GatewayRequest) -> Result<TransportResponse> {
        let url = Url::parse(&request.url)
            .map_err(|e| GatewayError::InvalidGatewayUrl(format!("{}: {e}", request.url)))?;

        validate_url(&url)?;

        for (key, value) in &request.headers {
            validate_header(key, value)?;
        }

        let mut builder = self.client.post(url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder.body(request.body.clone()).send().await?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();

        let body = response.bytes().await.map_err(GatewayError::HttpError)?.to_vec();

        tracing::debug!(status, response_len = body.len(), "gateway responded");

        Ok(TransportResponse { status, body, headers })
    }
}

impl Transport for HttpTransport {
    async fn submit<'a>(&'a self, request: &'a GatewayRequest) -> Result<TransportResponse> {
        self.execute(request).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str, headers: Vec<(&str, &str)>) -> GatewayRequest {
        GatewayRequest {
            url: url.to_owned(),
            headers: headers.into_iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect(),
            body: b"{}".to_vec(),
        }
    }

    #[test]
    fn test_http_transport_new() {
        let transport = HttpTransport::new();
        assert!(transport.is_ok());
    }

    #[test]
    fn test_http_transport_protocol_name() {
        let config_http1 = HttpConfig { http_version: HttpVersion::Http1, ..Default::default() };
        let transport_http1 = HttpTransport::with_config(&config_http1).unwrap();
        assert_eq!(transport_http1.protocol_name(), "http/1.1");

        let config_http2 = HttpConfig { http_version: HttpVersion::Http2, ..Default::default() };
        let transport_http2 = HttpTransport::with_config(&config_http2).unwrap();
        assert_eq!(transport_http2.protocol_name(), "http/2");

        let transport_auto = HttpTransport::new().unwrap();
        assert_eq!(transport_auto.protocol_name(), "http");
    }

    #[test]
    fn test_http_transport_with_zero_pool_size() {
        let config = HttpConfig { pool_max_idle_per_host: 0, ..Default::default() };
        assert!(HttpTransport::with_config(&config).is_ok());
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("gge4-client/"));
        assert!(USER_AGENT.len() > "gge4-client/".len());
    }

    #[test]
    fn test_validate_url_https_required() {
        let https_url = Url::parse("https://example.com").unwrap();
        assert!(validate_url(&https_url).is_ok());

        let http_url = Url::parse("http://example.com").unwrap();
        let result = validate_url(&http_url);
        assert!(matches!(result.unwrap_err(), GatewayError::TransportError(_)));
    }

    #[test]
    fn test_validate_url_localhost_blocked() {
        for url in [
            "https://localhost/api",
            "https://LOCALHOST/api",
            "https://127.0.0.1/api",
            "https://127.0.0.2:1/api",
            "https://127.255.255.254/api",
            "https://[::1]/api",
        ] {
            let url = Url::parse(url).unwrap();
            assert!(validate_url(&url).is_err(), "{url} should be rejected");
        }
    }

    #[test]
    fn test_is_loopback_host() {
        let loopback = |s: &str| is_loopback_host(&Url::parse(s).unwrap());
        assert!(loopback("https://127.0.0.2/"));
        assert!(loopback("https://[::1]/"));
        assert!(!loopback("https://128.0.0.1/"));
        assert!(!loopback("https://localhost.example.com/"));
        assert!(!loopback("https://api.globalgatewaye4.firstdata.com/"));
    }

    #[test]
    fn test_validate_header_valid() {
        assert!(validate_header("Content-Type", "application/json; charset=UTF-8;").is_ok());
        assert!(validate_header("Authorization", "GGE4_API 1:abc=").is_ok());
    }

    #[test]
    fn test_validate_header_crlf_injection_blocked() {
        assert!(validate_header("X-Evil\r\n", "value").is_err());
        assert!(validate_header("X-Custom", "value\r\nEvil-Header: injected").is_err());
        assert!(validate_header("X-Evil\0", "value").is_err());
        assert!(validate_header("X-Custom", "value\0evil").is_err());
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_url() {
        let transport = HttpTransport::new().unwrap();
        let result = transport.submit(&request("not-a-url", vec![])).await;
        assert!(matches!(result.unwrap_err(), GatewayError::InvalidGatewayUrl(_)));
    }

    #[tokio::test]
    async fn test_submit_rejects_http_url() {
        let transport = HttpTransport::new().unwrap();
        let result = transport.submit(&request("http://example.com/transaction/v12", vec![])).await;
        assert!(matches!(result.unwrap_err(), GatewayError::TransportError(_)));
    }

    #[tokio::test]
    async fn test_submit_rejects_localhost() {
        let transport = HttpTransport::new().unwrap();
        let result = transport.submit(&request("https://localhost/transaction/v12", vec![])).await;
        assert!(matches!(result.unwrap_err(), GatewayError::TransportError(_)));
    }

    #[tokio::test]
    async fn test_submit_rejects_crlf_header() {
        let transport = HttpTransport::new().unwrap();
        let result = transport
            .submit(&request("https://example.com/transaction/v12", vec![("X-Evil\r\n", "v")]))
            .await;
        assert!(matches!(result.unwrap_err(), GatewayError::TransportError(_)));
    }

    #[test]
    fn test_http_transport_debug_format() {
        let transport = HttpTransport::new().unwrap();
        assert!(format!("{transport:?}").contains("HttpTransport"));
    }
}
