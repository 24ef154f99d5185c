//! Transaction request construction.
//!
//! A [`TransactionRequest`] accumulates the caller's fields for a single
//! transaction. [`TransactionRequest::build`] merges in the gateway
//! credentials and the transaction type and produces the exact JSON bytes
//! that are signed and sent.
//!
//! Field values are not validated here; the gateway owns validation.
//!
//! # Examples
//!
//! ```
//! use gge4_client::request::{Credentials, TransactionRequest, TransactionType};
//! use rust_decimal::Decimal;
//!
//! # fn example() -> gge4_client::error::Result<()> {
//! let mut request = TransactionRequest::new();
//! request
//!     .set_amount(Decimal::new(1999, 2))
//!     .set_credit_card_number("4111111111111111")
//!     .set_credit_card_expiration("1230")
//!     .set_cardholder_name("Jane Doe");
//!
//! let credentials = Credentials::new("AD1234-56", "secret");
//! let payload = request.build(&credentials, TransactionType::Purchase)?;
//!
//! let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();
//! assert_eq!(json["amount"], "19.99");
//! assert_eq!(json["transaction_type"], "00");
//! # Ok(())
//! # }
//! ```

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use zeroize::Zeroizing;

use crate::error::{GatewayError, Result};

/// Gateway transaction type, sent as the two-digit `transaction_type` code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Authorize and capture (`00`).
    #[default]
    Purchase,
    /// Authorize only (`01`).
    PreAuth,
    /// Complete a pre-authorization by authorization number (`02`).
    PreAuthComplete,
    /// Forced post with a voice authorization (`03`).
    ForcedPost,
    /// Refund (`04`).
    Refund,
    /// Pre-authorization without capture, zero-dollar verification (`05`).
    PreAuthOnly,
    /// `PayPal` order (`07`).
    PaypalOrder,
    /// Void (`13`).
    Void,
    /// Complete a pre-authorization by transaction tag (`32`).
    TaggedPreAuthComplete,
    /// Void by transaction tag (`33`).
    TaggedVoid,
    /// Refund by transaction tag (`34`).
    TaggedRefund,
    /// Gift card cash out (`83`).
    CashOut,
    /// Gift card activation (`85`).
    Activation,
    /// Gift card balance inquiry (`86`).
    BalanceInquiry,
    /// Gift card reload (`88`).
    Reload,
    /// Gift card deactivation (`89`).
    Deactivation,
}

impl TransactionType {
    /// All transaction types in code order.
    pub const ALL: [Self; 16] = [
        Self::Purchase,
        Self::PreAuth,
        Self::PreAuthComplete,
        Self::ForcedPost,
        Self::Refund,
        Self::PreAuthOnly,
        Self::PaypalOrder,
        Self::Void,
        Self::TaggedPreAuthComplete,
        Self::TaggedVoid,
        Self::TaggedRefund,
        Self::CashOut,
        Self::Activation,
        Self::BalanceInquiry,
        Self::Reload,
        Self::Deactivation,
    ];

    /// Returns the wire code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Purchase => "00",
            Self::PreAuth => "01",
            Self::PreAuthComplete => "02",
            Self::ForcedPost => "03",
            Self::Refund => "04",
            Self::PreAuthOnly => "05",
            Self::PaypalOrder => "07",
            Self::Void => "13",
            Self::TaggedPreAuthComplete => "32",
            Self::TaggedVoid => "33",
            Self::TaggedRefund => "34",
            Self::CashOut => "83",
            Self::Activation => "85",
            Self::BalanceInquiry => "86",
            Self::Reload => "88",
            Self::Deactivation => "89",
        }
    }

    /// Finds the transaction type for a wire code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TransactionType {
    type Err = GatewayError;

    /// Accepts either the wire code (`"04"`) or the snake-case name (`"refund"`).
    fn from_str(s: &str) -> Result<Self> {
        if let Some(kind) = Self::from_code(s) {
            return Ok(kind);
        }
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        serde_json::from_value(Value::String(normalized))
            .map_err(|_| GatewayError::ConfigError(format!("unknown transaction type: {s}")))
    }
}

/// Gateway login credentials merged into every payload.
#[derive(Clone)]
pub struct Credentials {
    /// Gateway ID (`gateway_id`), e.g. `AD1234-56`.
    pub gateway_id: String,
    /// Terminal password (`password`).
    pub password: Zeroizing<String>,
}

impl Credentials {
    /// Creates credentials from a gateway ID and password.
    #[must_use]
    pub fn new(gateway_id: &str, password: &str) -> Self {
        Self { gateway_id: gateway_id.to_owned(), password: Zeroizing::new(password.to_owned()) }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("gateway_id", &self.gateway_id)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Request field names.
///
/// Known gateway fields have their own variant; anything else goes through
/// [`Field::Other`] unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    /// `amount`
    Amount,
    /// `cc_number`
    CcNumber,
    /// `credit_card_type`
    CreditCardType,
    /// `track1`
    Track1,
    /// `track2`
    Track2,
    /// `cardholder_name`
    CardholderName,
    /// `cc_expiry`
    CcExpiry,
    /// `transarmor_token`
    TransarmorToken,
    /// `authorization_num`
    AuthorizationNum,
    /// `cc_verification_str1`
    CcVerificationStr1,
    /// `cc_verification_str2`
    CcVerificationStr2,
    /// `cvd_presence_ind`
    CvdPresenceInd,
    /// `address`
    Address,
    /// `cavv`
    Cavv,
    /// `zip_code`
    ZipCode,
    /// `currency_code`
    CurrencyCode,
    /// `client_ip`
    ClientIp,
    /// `client_email`
    ClientEmail,
    /// `reference_no`
    ReferenceNo,
    /// `transaction_tag`
    TransactionTag,
    /// `customer_ref`
    CustomerRef,
    /// Any other wire key.
    Other(String),
}

impl Field {
    const KNOWN: [Self; 21] = [
        Self::Amount,
        Self::CcNumber,
        Self::CreditCardType,
        Self::Track1,
        Self::Track2,
        Self::CardholderName,
        Self::CcExpiry,
        Self::TransarmorToken,
        Self::AuthorizationNum,
        Self::CcVerificationStr1,
        Self::CcVerificationStr2,
        Self::CvdPresenceInd,
        Self::Address,
        Self::Cavv,
        Self::ZipCode,
        Self::CurrencyCode,
        Self::ClientIp,
        Self::ClientEmail,
        Self::ReferenceNo,
        Self::TransactionTag,
        Self::CustomerRef,
    ];

    /// Returns the JSON key sent to the gateway.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Amount => "amount",
            Self::CcNumber => "cc_number",
            Self::CreditCardType => "credit_card_type",
            Self::Track1 => "track1",
            Self::Track2 => "track2",
            Self::CardholderName => "cardholder_name",
            Self::CcExpiry => "cc_expiry",
            Self::TransarmorToken => "transarmor_token",
            Self::AuthorizationNum => "authorization_num",
            Self::CcVerificationStr1 => "cc_verification_str1",
            Self::CcVerificationStr2 => "cc_verification_str2",
            Self::CvdPresenceInd => "cvd_presence_ind",
            Self::Address => "address",
            Self::Cavv => "cavv",
            Self::ZipCode => "zip_code",
            Self::CurrencyCode => "currency_code",
            Self::ClientIp => "client_ip",
            Self::ClientEmail => "client_email",
            Self::ReferenceNo => "reference_no",
            Self::TransactionTag => "transaction_tag",
            Self::CustomerRef => "customer_ref",
            Self::Other(name) => name,
        }
    }

    /// Maps a wire key to its field, using [`Field::Other`] for unknown keys.
    #[must_use]
    pub fn from_wire(name: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|f| f.as_str() == name)
            .unwrap_or_else(|| Self::Other(name.to_owned()))
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Self::from_wire(name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured billing address (`address` object, API v12 and later).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    /// Street line 2.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    /// City.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State or province.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// ZIP or postal code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// ISO country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Phone type (`H`ome, `W`ork, `D`ay, `N`ight).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_type: Option<String>,
}

/// A request field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// JSON string.
    Text(String),
    /// JSON number.
    Number(Number),
    /// Nested address object.
    Address(Address),
    /// JSON `null`.
    Null,
}

impl FieldValue {
    /// Creates a numeric value from a float.
    ///
    /// Returns `None` for NaN and infinities, which JSON cannot represent.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        Number::from_f64(value).map(Self::Number)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<Address> for FieldValue {
    fn from(value: Address) -> Self {
        Self::Address(value)
    }
}

/// Key argument of [`TransactionRequest::set_post_data`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKey {
    /// A single field name.
    Name(Field),
    /// A batch of fields to merge.
    Map(Vec<(Field, FieldValue)>),
}

impl From<Field> for FieldKey {
    fn from(field: Field) -> Self {
        Self::Name(field)
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        Self::Name(Field::from_wire(name))
    }
}

impl From<Vec<(Field, FieldValue)>> for FieldKey {
    fn from(fields: Vec<(Field, FieldValue)>) -> Self {
        Self::Map(fields)
    }
}

/// Accumulated fields for one transaction.
///
/// Fields keep their first insertion position; setting an existing field
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionRequest {
    fields: Vec<(Field, FieldValue)>,
}

impl TransactionRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single field, overwriting any previous value.
    pub fn set_field(&mut self, field: impl Into<Field>, value: impl Into<FieldValue>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(f, _)| *f == field) {
            slot.1 = value;
        } else {
            self.fields.push((field, value));
        }
        self
    }

    /// Merges several fields, later entries overwriting earlier ones.
    pub fn merge_fields<I>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (Field, FieldValue)>,
    {
        for (field, value) in fields {
            self.set_field(field, value);
        }
        self
    }

    /// Sets fields from either a single key/value pair or a batch.
    ///
    /// - `Name` with `Some(value)` stores the value.
    /// - `Name` with `None` stores an explicit `null`; use
    ///   [`remove`](Self::remove) to drop a field.
    /// - `Map` with `None` merges every pair.
    /// - `Map` with `Some(value)` is a conflicting call: the batch is not
    ///   merged and nothing is stored.
    pub fn set_post_data(
        &mut self,
        key: impl Into<FieldKey>,
        value: Option<FieldValue>,
    ) -> &mut Self {
        match (key.into(), value) {
            (FieldKey::Name(field), Some(value)) => {
                self.set_field(field, value);
            }
            (FieldKey::Name(field), None) => {
                self.set_field(field, FieldValue::Null);
            }
            (FieldKey::Map(fields), None) => {
                self.merge_fields(fields);
            }
            (FieldKey::Map(fields), Some(_)) => {
                tracing::warn!(
                    skipped = fields.len(),
                    "batch field update combined with a single value; batch not merged"
                );
            }
        }
        self
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, field: &Field) -> Option<FieldValue> {
        let idx = self.fields.iter().position(|(f, _)| f == field)?;
        Some(self.fields.remove(idx).1)
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, field: &Field) -> Option<&FieldValue> {
        self.fields.iter().find(|(f, _)| f == field).map(|(_, v)| v)
    }

    /// Returns all fields in insertion order.
    #[must_use]
    pub fn post_data(&self) -> &[(Field, FieldValue)] {
        &self.fields
    }

    /// Returns the number of fields set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Removes every field.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Sets the card number. Always sent as a string.
    pub fn set_credit_card_number(&mut self, number: &str) -> &mut Self {
        self.set_field(Field::CcNumber, number)
    }

    /// Sets the card brand (`Visa`, `Mastercard`, ...).
    pub fn set_credit_card_type(&mut self, card_type: &str) -> &mut Self {
        self.set_field(Field::CreditCardType, card_type)
    }

    /// Sets magnetic stripe track 1 data from a card reader.
    pub fn set_track1(&mut self, track: &str) -> &mut Self {
        self.set_field(Field::Track1, track)
    }

    /// Sets magnetic stripe track 2 data from a card reader.
    pub fn set_track2(&mut self, track: &str) -> &mut Self {
        self.set_field(Field::Track2, track)
    }

    /// Sets the cardholder name.
    pub fn set_cardholder_name(&mut self, name: &str) -> &mut Self {
        self.set_field(Field::CardholderName, name)
    }

    /// Sets the expiry date (`MMYY`).
    pub fn set_credit_card_expiration(&mut self, expiry: &str) -> &mut Self {
        self.set_field(Field::CcExpiry, expiry)
    }

    /// Sets the amount, rendered with two decimal places.
    pub fn set_amount(&mut self, amount: Decimal) -> &mut Self {
        self.set_field(Field::Amount, format!("{amount:.2}"))
    }

    /// Sets a TransArmor token in place of the card number.
    pub fn set_transarmor_token(&mut self, token: &str) -> &mut Self {
        self.set_field(Field::TransarmorToken, token)
    }

    /// Sets the authorization number of a previous transaction.
    pub fn set_authorization_number(&mut self, number: &str) -> &mut Self {
        self.set_field(Field::AuthorizationNum, number)
    }

    /// Sets the legacy address verification string.
    ///
    /// Format: `Street Address|Zip/Postal|City|State/Prov|Country`.
    pub fn set_verification_address(&mut self, address: &str) -> &mut Self {
        self.set_field(Field::CcVerificationStr1, address)
    }

    /// Sets the structured billing address.
    pub fn set_address(&mut self, address: Address) -> &mut Self {
        self.set_field(Field::Address, address)
    }

    /// Sets the card verification value and flags it as present.
    pub fn set_cvv(&mut self, cvv: &str) -> &mut Self {
        self.set_field(Field::CcVerificationStr2, cvv);
        self.set_field(Field::CvdPresenceInd, 1_u32)
    }

    /// Sets the 3-D Secure CAVV.
    pub fn set_cavv(&mut self, cavv: &str) -> &mut Self {
        self.set_field(Field::Cavv, cavv)
    }

    /// Sets the billing ZIP code.
    pub fn set_zip_code(&mut self, zip: &str) -> &mut Self {
        self.set_field(Field::ZipCode, zip)
    }

    /// Sets the ISO currency code.
    pub fn set_currency(&mut self, code: &str) -> &mut Self {
        self.set_field(Field::CurrencyCode, code)
    }

    /// Sets the customer's IP address.
    pub fn set_client_ip(&mut self, ip: &str) -> &mut Self {
        self.set_field(Field::ClientIp, ip)
    }

    /// Sets the customer's email.
    pub fn set_client_email(&mut self, email: &str) -> &mut Self {
        self.set_field(Field::ClientEmail, email)
    }

    /// Sets the merchant reference number.
    pub fn set_reference_number(&mut self, number: &str) -> &mut Self {
        self.set_field(Field::ReferenceNo, number)
    }

    /// Sets the transaction tag of a previous transaction.
    pub fn set_transaction_tag(&mut self, tag: u64) -> &mut Self {
        self.set_field(Field::TransactionTag, tag)
    }

    /// Sets the customer reference number.
    pub fn set_customer_reference(&mut self, reference: &str) -> &mut Self {
        self.set_field(Field::CustomerRef, reference)
    }

    /// Produces the JSON payload for this request.
    ///
    /// Keys appear in insertion order followed by `gateway_id`, `password`
    /// and `transaction_type`. Credentials replace same-named caller fields
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SerializationError`] if a value cannot be encoded.
    pub fn build(
        &self,
        credentials: &Credentials,
        transaction_type: TransactionType,
    ) -> Result<Vec<u8>> {
        let mut payload = Map::with_capacity(self.fields.len() + 3);
        for (field, value) in &self.fields {
            payload.insert(field.as_str().to_owned(), serde_json::to_value(value)?);
        }
        payload.insert("gateway_id".to_owned(), Value::String(credentials.gateway_id.clone()));
        payload.insert("password".to_owned(), Value::String(credentials.password.to_string()));
        payload.insert(
            "transaction_type".to_owned(),
            Value::String(transaction_type.code().to_owned()),
        );

        Ok(serde_json::to_vec(&Value::Object(payload))?)
    }
}
