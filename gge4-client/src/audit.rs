//! Audit logging for gateway submissions.
//!
//! Every call to [`GatewayClient::process`](crate::client::GatewayClient::process)
//! that reaches the transport emits exactly one [`AuditEvent`] on the `audit`
//! tracing target. Card numbers are masked and error text is scrubbed before
//! it is recorded.

use std::{
    sync::LazyLock,
    time::{Duration, SystemTime},
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::OutcomeKind;

static CARD_NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b\d(?:[ -]?\d){12,18}\b")
        .map_err(|error| tracing::error!(%error, "card number pattern failed to compile"))
        .ok()
});

static CVV: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(cvv2?|cvc|cid|cc_verification_str2)(\W{0,3})\d{3,4}\b")
        .map_err(|error| tracing::error!(%error, "cvv pattern failed to compile"))
        .ok()
});

static PASSWORD: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?i)("?password"?\s*[:=]\s*"?)[^",\s}]+"#)
        .map_err(|error| tracing::error!(%error, "password pattern failed to compile"))
        .ok()
});

/// Types of auditable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// Gateway accepted the transaction.
    TransactionApproved,
    /// Gateway answered with a reject, decline or HTTP error.
    TransactionDeclined,
    /// Gateway answered with something that is not a JSON document.
    MalformedResponse,
    /// No response was received.
    TransportFailed,
}

impl From<OutcomeKind> for AuditEventType {
    fn from(outcome: OutcomeKind) -> Self {
        match outcome {
            OutcomeKind::Success => Self::TransactionApproved,
            OutcomeKind::Processor => Self::TransactionDeclined,
            OutcomeKind::Format => Self::MalformedResponse,
            OutcomeKind::Transport => Self::TransportFailed,
        }
    }
}

/// Details for audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AuditDetails {
    /// Transaction type code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    /// Endpoint URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Masked card number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    /// HTTP status, if a response arrived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// Classified error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u32>,
    /// Error message (sensitive data redacted).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Gateway transaction tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_tag: Option<u64>,
    /// Duration of the submission in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Audit log entry.
///
/// # Examples
///
/// ```
/// use gge4_client::audit::{AuditEvent, AuditEventType, audit_log};
/// use uuid::Uuid;
///
/// let event = AuditEvent::new(AuditEventType::TransactionApproved, "AD1234-56", Uuid::new_v4())
///     .with_transaction_type("00")
///     .with_card_number("4111111111111111");
///
/// assert_eq!(event.details.card.as_deref(), Some("************1111"));
/// audit_log(&event);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event timestamp.
    pub timestamp: SystemTime,
    /// Event type.
    pub event_type: AuditEventType,
    /// Gateway ID that submitted the transaction.
    pub gateway_id: String,
    /// Request correlation ID.
    pub request_id: Uuid,
    /// Event details.
    pub details: AuditDetails,
}

impl AuditEvent {
    /// Creates a new audit event.
    #[must_use]
    pub fn new(event_type: AuditEventType, gateway_id: &str, request_id: Uuid) -> Self {
        Self {
            timestamp: SystemTime::now(),
            event_type,
            gateway_id: gateway_id.to_owned(),
            request_id,
            details: AuditDetails::default(),
        }
    }

    /// Adds the transaction type code.
    #[must_use]
    pub fn with_transaction_type(mut self, code: &str) -> Self {
        self.details.transaction_type = Some(code.to_owned());
        self
    }

    /// Adds the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, url: &str) -> Self {
        self.details.endpoint = Some(url.to_owned());
        self
    }

    /// Adds the card number, masked to its last four digits.
    #[must_use]
    pub fn with_card_number(mut self, number: &str) -> Self {
        self.details.card = Some(mask_card_number(number));
        self
    }

    /// Adds the HTTP status.
    #[must_use]
    pub const fn with_http_status(mut self, status: u16) -> Self {
        self.details.http_status = Some(status);
        self
    }

    /// Adds the classified error code and message.
    ///
    /// The message is scrubbed with [`redact_sensitive`]. Empty messages are
    /// not recorded.
    #[must_use]
    pub fn with_error(mut self, code: u32, message: &str) -> Self {
        self.details.error_code = Some(code);
        if !message.is_empty() {
            self.details.error = Some(redact_sensitive(message));
        }
        self
    }

    /// Adds the gateway transaction tag.
    #[must_use]
    pub const fn with_transaction_tag(mut self, tag: u64) -> Self {
        self.details.transaction_tag = Some(tag);
        self
    }

    /// Adds duration to details.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "duration in ms fits u64 for practical values"
    )]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.details.duration_ms = Some(duration.as_millis() as u64);
        self
    }
}

/// Logs audit event to tracing with target "audit".
pub fn audit_log(event: &AuditEvent) {
    tracing::info!(
        target: "audit",
        timestamp = ?event.timestamp,
        event_type = ?event.event_type,
        gateway_id = %event.gateway_id,
        request_id = %event.request_id,
        details = ?event.details,
        "AUDIT"
    );
}

/// Masks all but the last four digits of a card number.
///
/// Non-digit characters are dropped.
///
/// # Examples
///
/// ```
/// use gge4_client::audit::mask_card_number;
///
/// assert_eq!(mask_card_number("4111 1111 1111 1111"), "************1111");
/// assert_eq!(mask_card_number("123"), "***");
/// ```
#[must_use]
pub fn mask_card_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
    if digits.len() <= 4 {
        return "*".repeat(digits.len());
    }
    let visible: String = digits[digits.len() - 4..].iter().collect();
    format!("{}{visible}", "*".repeat(digits.len() - 4))
}

/// Redacts card numbers, CVVs and passwords from free text.
///
/// - card numbers (13-19 digits, optional space or dash separators) become `XXXX-XXXX-XXXX-XXXX`
/// - digits after a CVV keyword become `XXX`
/// - password values become `[REDACTED]`
///
/// # Examples
///
/// ```
/// use gge4_client::audit::redact_sensitive;
///
/// let msg = "Payment failed for card 4111-1111-1111-1111";
/// let redacted = redact_sensitive(msg);
/// assert!(redacted.contains("XXXX-XXXX-XXXX-XXXX"));
/// assert!(!redacted.contains("4111-1111-1111-1111"));
/// ```
#[must_use]
pub fn redact_sensitive(input: &str) -> String {
    let mut result = input.to_owned();

    if let Some(re) = CARD_NUMBER.as_ref() {
        result = re.replace_all(&result, "XXXX-XXXX-XXXX-XXXX").into_owned();
    }
    if let Some(re) = CVV.as_ref() {
        result = re.replace_all(&result, "${1}${2}XXX").into_owned();
    }
    if let Some(re) = PASSWORD.as_ref() {
        result = re.replace_all(&result, "${1}[REDACTED]").into_owned();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_credit_card() {
        let inputs = [
            ("Card: 4111-1111-1111-1111", "Card: XXXX-XXXX-XXXX-XXXX"),
            ("Card: 4111 1111 1111 1111", "Card: XXXX-XXXX-XXXX-XXXX"),
            ("Card: 4111111111111111", "Card: XXXX-XXXX-XXXX-XXXX"),
            ("Amex 378282246310005 rejected", "Amex XXXX-XXXX-XXXX-XXXX rejected"),
        ];

        for (input, expected) in &inputs {
            assert_eq!(&redact_sensitive(input), expected, "Failed to redact: {input}");
        }
    }

    #[test]
    fn test_redact_cvv() {
        for input in ["CVV: 123", "cvv=1234", "CVC 456", "cc_verification_str2\":\"789"] {
            let result = redact_sensitive(input);
            assert!(result.ends_with("XXX") || result.contains("XXX\""), "not redacted: {result}");
            assert!(!result.chars().any(|c| c.is_ascii_digit() && c != '2'), "digits left: {result}");
        }
    }

    #[test]
    fn test_redact_password() {
        let result = redact_sensitive(r#"{"gateway_id":"AD1234-56","password":"s3cret"}"#);
        assert!(!result.contains("s3cret"));
        assert!(result.contains("[REDACTED]"));
        assert!(result.contains("AD1234-56"));
    }

    #[test]
    fn test_redact_sensitive_preserves_safe_data() {
        let input = "Error (204) Other Error, Amount: 67.89, Tag: 902006933";
        assert_eq!(redact_sensitive(input), input);
    }

    #[test]
    fn test_redact_sensitive_empty_string() {
        assert_eq!(redact_sensitive(""), "");
    }

    #[test]
    fn test_mask_card_number() {
        assert_eq!(mask_card_number("4111111111111111"), "************1111");
        assert_eq!(mask_card_number("3782-822463-10005"), "***********0005");
        assert_eq!(mask_card_number("1234"), "****");
        assert_eq!(mask_card_number(""), "");
    }

    #[test]
    fn test_event_type_from_outcome() {
        assert_eq!(AuditEventType::from(OutcomeKind::Success), AuditEventType::TransactionApproved);
        assert_eq!(AuditEventType::from(OutcomeKind::Processor), AuditEventType::TransactionDeclined);
        assert_eq!(AuditEventType::from(OutcomeKind::Format), AuditEventType::MalformedResponse);
        assert_eq!(AuditEventType::from(OutcomeKind::Transport), AuditEventType::TransportFailed);
    }

    #[test]
    fn test_audit_event_builder() {
        let request_id = Uuid::new_v4();
        let event = AuditEvent::new(AuditEventType::TransactionDeclined, "AD1234-56", request_id)
            .with_transaction_type("00")
            .with_endpoint("https://api.demo.globalgatewaye4.firstdata.com/transaction/v12")
            .with_card_number("4111111111111111")
            .with_http_status(201)
            .with_error(42, "Processor Decline")
            .with_transaction_tag(902_006_933)
            .with_duration(Duration::from_millis(1500));

        assert_eq!(event.gateway_id, "AD1234-56");
        assert_eq!(event.request_id, request_id);
        assert_eq!(event.details.card.as_deref(), Some("************1111"));
        assert_eq!(event.details.http_status, Some(201));
        assert_eq!(event.details.error_code, Some(42));
        assert_eq!(event.details.error.as_deref(), Some("Processor Decline"));
        assert_eq!(event.details.transaction_tag, Some(902_006_933));
        assert_eq!(event.details.duration_ms, Some(1500));
    }

    #[test]
    fn test_audit_event_with_error_redacts() {
        let event = AuditEvent::new(AuditEventType::MalformedResponse, "gw", Uuid::new_v4())
            .with_error(400, "Invalid card 4111-1111-1111-1111");

        let error = event.details.error.unwrap();
        assert!(!error.contains("4111-1111-1111-1111"));
        assert!(error.contains("XXXX-XXXX-XXXX-XXXX"));
    }

    #[test]
    fn test_audit_event_with_empty_error_message() {
        let event = AuditEvent::new(AuditEventType::TransactionApproved, "gw", Uuid::new_v4())
            .with_error(0, "");
        assert_eq!(event.details.error_code, Some(0));
        assert_eq!(event.details.error, None);
    }

    #[test]
    fn test_audit_event_serialization() {
        let event = AuditEvent::new(AuditEventType::TransportFailed, "AD1234-56", Uuid::new_v4())
            .with_error(28, "operation timed out");

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("transport_failed"));
        assert!(json.contains("AD1234-56"));
        assert!(!json.contains("transaction_tag"));
    }
}
