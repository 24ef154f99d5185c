//! Gateway response classification.
//!
//! A [`GatewayResponse`] is built once per submission, either from the HTTP
//! exchange via [`GatewayResponse::classify`] or from a transport failure via
//! [`GatewayResponse::from_transport_error`]. Classification reduces the
//! exchange to an error code and message:
//!
//! | Outcome | `error_code` | `error_message` |
//! |---|---|---|
//! | success | `0` | `""` |
//! | processor reject/decline | `42` | table name of `bank_resp_code`, or `""` |
//! | unparseable body with `(NNN)` | `NNN` (or `42` if unknown) | table name |
//! | unparseable body otherwise | HTTP status | raw body |
//! | transport failure | curl-style code | error text |
//!
//! # Examples
//!
//! ```
//! use gge4_client::response::{GatewayResponse, OutcomeKind};
//!
//! let body = br#"{"transaction_approved":1,"bank_resp_code":"100"}"#.to_vec();
//! let response = GatewayResponse::classify(200, Vec::new(), body);
//!
//! assert!(response.is_success());
//! assert_eq!(response.error_code(), 0);
//! assert_eq!(response.outcome(), OutcomeKind::Success);
//! ```

pub mod lookup;

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

pub use self::lookup::FieldAccessor;
use crate::{
    codes::{self, UNMAPPED_CODE},
    error::GatewayError,
};

/// HTTP statuses the gateway uses for a processed transaction.
pub const ACCEPTED_STATUSES: [u16; 3] = [200, 201, 202];

static EMBEDDED_CODE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\((\d+)\)")
        .map_err(|error| tracing::error!(%error, "embedded code pattern failed to compile"))
        .ok()
});

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// Approved or otherwise accepted; error code 0.
    Success,
    /// No HTTP response was received.
    Transport,
    /// The body was not a JSON object or array.
    Format,
    /// A JSON body that reports a rejection, decline or HTTP failure.
    Processor,
}

/// Transport-level failure recorded on a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    /// Curl-compatible error number.
    pub code: u32,
    /// Error description.
    pub message: String,
}

/// Result of one submission.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    status: u16,
    headers: Vec<(String, String)>,
    raw_body: String,
    tree: Value,
    transport_failure: Option<TransportFailure>,
    error_code: u32,
    error_message: String,
    outcome: OutcomeKind,
}

impl GatewayResponse {
    /// Classifies an HTTP exchange.
    ///
    /// Any status code and body are accepted; non-UTF-8 bytes are replaced.
    #[must_use]
    pub fn classify(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        let tree = parse_tree(&body);
        let raw_body = match String::from_utf8(body) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        let mut response = Self {
            status,
            headers,
            raw_body,
            tree,
            transport_failure: None,
            error_code: 0,
            error_message: String::new(),
            outcome: OutcomeKind::Success,
        };
        response.apply_classification();
        response
    }

    /// Records a submission that never produced an HTTP response.
    #[must_use]
    pub fn from_transport_error(error: &GatewayError) -> Self {
        let failure = TransportFailure { code: error.transport_code(), message: error.to_string() };
        Self {
            status: 0,
            headers: Vec::new(),
            raw_body: String::new(),
            tree: Value::Null,
            error_code: failure.code,
            error_message: failure.message.clone(),
            transport_failure: Some(failure),
            outcome: OutcomeKind::Transport,
        }
    }

    fn apply_classification(&mut self) {
        if !self.has_tree() {
            self.outcome = OutcomeKind::Format;
            match embedded_code(&self.raw_body) {
                Some(code) => {
                    let entry = codes::lookup_or_unmapped(code);
                    self.error_code = entry.code;
                    self.error_message = entry.name.to_owned();
                }
                None => {
                    self.error_code = u32::from(self.status);
                    self.error_message.clone_from(&self.raw_body);
                }
            }
        } else if self.is_error() {
            self.outcome = OutcomeKind::Processor;
            self.error_code = UNMAPPED_CODE;
            self.error_message = self
                .fields()
                .bank_response_entry()
                .map(|e| e.name.to_owned())
                .unwrap_or_default();
        } else {
            self.outcome = OutcomeKind::Success;
            self.error_code = 0;
            self.error_message.clear();
        }
    }

    /// Returns true when the exchange did not produce an approved transaction.
    #[must_use]
    pub fn is_error(&self) -> bool {
        if !ACCEPTED_STATUSES.contains(&self.status) || !self.has_tree() {
            return true;
        }
        if self.transport_failure.is_some() {
            return true;
        }
        let fields = self.fields();
        if let Some(class) = fields.bank_response_type()
            && !class.is_success()
        {
            return true;
        }
        fields.exact_response_code().is_some_and(|code| code > 0)
    }

    /// Negation of [`is_error`](Self::is_error).
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.is_error()
    }

    /// Typed accessors over the parsed body.
    #[must_use]
    pub const fn fields(&self) -> FieldAccessor<'_> {
        FieldAccessor::new(&self.tree)
    }

    /// HTTP status, or 0 after a transport failure.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers as received.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Response body as text.
    #[must_use]
    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    /// Parsed body; `Value::Null` when the body was not a non-empty object or array.
    #[must_use]
    pub const fn tree(&self) -> &Value {
        &self.tree
    }

    /// Returns true when the body parsed into a non-empty object or array.
    #[must_use]
    pub fn has_tree(&self) -> bool {
        !self.tree.is_null()
    }

    /// Transport failure, if the request never got a response.
    #[must_use]
    pub const fn transport_failure(&self) -> Option<&TransportFailure> {
        self.transport_failure.as_ref()
    }

    /// Final error code; 0 on success.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        self.error_code
    }

    /// Final error message; empty on success.
    #[must_use]
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Outcome kind.
    #[must_use]
    pub const fn outcome(&self) -> OutcomeKind {
        self.outcome
    }
}

/// Parses a body into a non-empty container, or `Null`.
fn parse_tree(body: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Value::Object(map),
        Ok(Value::Array(items)) if !items.is_empty() => Value::Array(items),
        Ok(_) => Value::Null,
        Err(e) => {
            tracing::debug!(error = %e, body_len = body.len(), "response body is not JSON");
            Value::Null
        }
    }
}

/// Extracts the first parenthesized number, e.g. `204` from `"Error (204)"`.
///
/// Numbers too large for `u32` map to the unmapped code.
fn embedded_code(text: &str) -> Option<u32> {
    let digits = EMBEDDED_CODE.as_ref()?.captures(text)?.get(1)?.as_str();
    Some(digits.parse().unwrap_or(UNMAPPED_CODE))
}
