//! GGE4 HMAC request signing.
//!
//! From API version `v12` on, every request carries a keyed hash over the
//! payload digest, a UTC timestamp and the endpoint path. The gateway
//! recomputes it with the merchant's HMAC key and rejects mismatches.

use std::fmt;

use base64::Engine;
use chrono::{DateTime, Utc};
use ring::{digest, hmac};
use tracing::instrument;
use zeroize::Zeroizing;

/// Content type sent with every request and covered by the signature.
pub const CONTENT_TYPE: &str = "application/json; charset=UTF-8;";

/// First API version that requires signed requests.
///
/// Compared as a plain string, so `"v9"` sorts after `"v12"`.
pub const SIGNING_MIN_VERSION: &str = "v12";

/// Header carrying the hex SHA-1 of the payload.
pub const HEADER_CONTENT_SHA1: &str = "X-GGe4-Content-SHA1";
/// Header carrying the signing timestamp.
pub const HEADER_DATE: &str = "X-GGe4-Date";

/// Returns true when requests for `api_version` must be signed.
///
/// # Examples
///
/// ```
/// use gge4_client::signing::signing_applies;
///
/// assert!(signing_applies("v12"));
/// assert!(signing_applies("v14"));
/// assert!(!signing_applies("v11"));
/// assert!(!signing_applies("v1"));
/// ```
#[must_use]
pub fn signing_applies(api_version: &str) -> bool {
    api_version >= SIGNING_MIN_VERSION
}

/// Per-request inputs to the signature.
#[derive(Debug, Clone, Copy)]
pub struct SigningContext<'a> {
    /// API version, part of the signed path.
    pub api_version: &'a str,
    /// Signing time.
    pub timestamp: DateTime<Utc>,
    /// Exact payload bytes that will be sent.
    pub payload: &'a [u8],
}

/// Authentication headers for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// Lowercase hex SHA-1 of the payload.
    pub content_digest: String,
    /// Timestamp in `YYYY-MM-DDTHH:MM:SSZ` form.
    pub date: String,
    /// `GGE4_API <key id>:<base64 signature>`.
    pub authorization: String,
    /// Payload length in bytes.
    pub content_length: usize,
}

impl SignedHeaders {
    /// Converts into header name/value pairs in send order.
    #[must_use]
    pub fn into_headers(self) -> Vec<(String, String)> {
        vec![
            (HEADER_CONTENT_SHA1.to_owned(), self.content_digest),
            (HEADER_DATE.to_owned(), self.date),
            ("Authorization".to_owned(), self.authorization),
            ("Content-Length".to_owned(), self.content_length.to_string()),
        ]
    }
}

/// Signs gateway requests with a key id and HMAC secret.
pub struct RequestSigner {
    key_id: String,
    secret: Zeroizing<String>,
}

impl RequestSigner {
    /// Creates a new signer.
    ///
    /// Empty key ids and secrets are accepted; the gateway rejects them.
    ///
    /// # Examples
    ///
    /// ```
    /// use gge4_client::signing::RequestSigner;
    ///
    /// let signer = RequestSigner::new("12345", "hmac-secret");
    /// assert_eq!(signer.key_id(), "12345");
    /// ```
    #[must_use]
    pub fn new(key_id: &str, secret: &str) -> Self {
        Self { key_id: key_id.to_owned(), secret: Zeroizing::new(secret.to_owned()) }
    }

    /// Returns the key id.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Computes the authentication headers for a request.
    ///
    /// The result depends only on the context and the signer's key pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use gge4_client::signing::{RequestSigner, SigningContext};
    ///
    /// let signer = RequestSigner::new("12345", "secret");
    /// let headers = signer.sign(&SigningContext {
    ///     api_version: "v12",
    ///     timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
    ///     payload: b"",
    /// });
    ///
    /// assert_eq!(headers.date, "2024-01-02T03:04:05Z");
    /// assert_eq!(headers.content_digest, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    /// assert!(headers.authorization.starts_with("GGE4_API 12345:"));
    /// ```
    #[instrument(skip(self, ctx), fields(key_id = %self.key_id, api_version = ctx.api_version, payload_len = ctx.payload.len()))]
    pub fn sign(&self, ctx: &SigningContext<'_>) -> SignedHeaders {
        let content_digest = Self::content_digest(ctx.payload);
        let date = Self::format_timestamp(&ctx.timestamp);
        let signing_string = Self::build_signing_string(&content_digest, &date, ctx.api_version);

        let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, self.secret.as_bytes());
        let tag = hmac::sign(&key, signing_string.as_bytes());
        let signature = base64::engine::general_purpose::STANDARD.encode(tag.as_ref());

        SignedHeaders {
            content_digest,
            date,
            authorization: format!("GGE4_API {}:{signature}", self.key_id),
            content_length: ctx.payload.len(),
        }
    }

    /// Signs a payload at the current time.
    pub fn sign_now(&self, api_version: &str, payload: &[u8]) -> SignedHeaders {
        self.sign(&SigningContext { api_version, timestamp: Utc::now(), payload })
    }

    /// Returns the lowercase hex SHA-1 of `payload`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gge4_client::signing::RequestSigner;
    ///
    /// assert_eq!(
    ///     RequestSigner::content_digest(b""),
    ///     "da39a3ee5e6b4b0d3255bfef95601890afd80709"
    /// );
    /// ```
    #[must_use]
    pub fn content_digest(payload: &[u8]) -> String {
        hex::encode(digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, payload))
    }

    fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
        timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    pub(crate) fn build_signing_string(digest: &str, date: &str, api_version: &str) -> String {
        format!("POST\n{CONTENT_TYPE}\n{digest}\n{date}\n/transaction/{api_version}")
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key_id", &self.key_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const PAYLOAD: &[u8] =
        br#"{"amount":"10.00","gateway_id":"gw","password":"pw","transaction_type":"00"}"#;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_signing_applies_lexical_order() {
        assert!(signing_applies("v12"));
        assert!(signing_applies("v13"));
        assert!(signing_applies("v2"));
        assert!(signing_applies("v9"));
        assert!(!signing_applies("v11"));
        assert!(!signing_applies("v10"));
        assert!(!signing_applies("v1"));
        assert!(!signing_applies(""));
    }

    #[test]
    fn test_content_digest_known_value() {
        assert_eq!(
            RequestSigner::content_digest(PAYLOAD),
            "deaa27e415d5dd5c065dff5440d4381a8059fa76"
        );
    }

    #[test]
    fn test_build_signing_string_format() {
        let s = RequestSigner::build_signing_string("abc", "2024-01-02T03:04:05Z", "v12");
        assert_eq!(
            s,
            "POST\napplication/json; charset=UTF-8;\nabc\n2024-01-02T03:04:05Z\n/transaction/v12"
        );
    }

    #[test]
    fn test_sign_known_vector() {
        let signer = RequestSigner::new("key-1", "secret");
        let headers = signer.sign(&SigningContext {
            api_version: "v12",
            timestamp: timestamp(),
            payload: PAYLOAD,
        });

        assert_eq!(headers.content_digest, "deaa27e415d5dd5c065dff5440d4381a8059fa76");
        assert_eq!(headers.date, "2024-01-02T03:04:05Z");
        assert_eq!(headers.authorization, "GGE4_API key-1:R9eT85iF64Zc4Ff3Byp0tQt3C3g=");
        assert_eq!(headers.content_length, 76);
    }

    #[test]
    fn test_sign_empty_credentials() {
        let signer = RequestSigner::new("", "");
        let headers =
            signer.sign(&SigningContext { api_version: "v12", timestamp: timestamp(), payload: b"" });

        assert_eq!(headers.authorization, "GGE4_API :P+PxbwSnpixfmOZ+vKwCMrVTj5U=");
        assert_eq!(headers.content_length, 0);
    }

    #[test]
    fn test_sign_depends_on_version() {
        let signer = RequestSigner::new("key-1", "secret");
        let v12 = signer.sign(&SigningContext {
            api_version: "v12",
            timestamp: timestamp(),
            payload: PAYLOAD,
        });
        let v14 = signer.sign(&SigningContext {
            api_version: "v14",
            timestamp: timestamp(),
            payload: PAYLOAD,
        });
        assert_ne!(v12.authorization, v14.authorization);
        assert_eq!(v12.content_digest, v14.content_digest);
    }

    #[test]
    fn test_into_headers_order() {
        let signer = RequestSigner::new("key-1", "secret");
        let headers = signer
            .sign(&SigningContext { api_version: "v12", timestamp: timestamp(), payload: PAYLOAD })
            .into_headers();

        let names: Vec<&str> = headers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["X-GGe4-Content-SHA1", "X-GGe4-Date", "Authorization", "Content-Length"]);
        assert_eq!(headers[3].1, "76");
    }

    #[test]
    fn test_sign_now_timestamp_format() {
        let signer = RequestSigner::new("key-1", "secret");
        let headers = signer.sign_now("v12", PAYLOAD);
        assert_eq!(headers.date.len(), 20);
        assert!(headers.date.ends_with('Z'));
        assert_eq!(&headers.date[10..11], "T");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", RequestSigner::new("key-1", "top-secret"));
        assert!(debug.contains("key-1"));
        assert!(!debug.contains("top-secret"));
    }
}

#[cfg(test)]
mod proptest_signing;
