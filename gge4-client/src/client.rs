//! Gateway client.
//!
//! [`GatewayClient`] owns the configuration, the pending transaction fields
//! and the last response. One [`process`](GatewayClient::process) call runs
//! build, sign, submit and classify; afterwards the typed getters read from
//! the new response and the field accumulator is empty again.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gge4_client::{ClientConfig, GatewayClient, TransactionType};
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> gge4_client::error::Result<()> {
//! let mut config = ClientConfig::new("AD1234-56", "password", "123456", "hmac-key");
//! config.test_mode = true;
//!
//! let mut client = GatewayClient::new(config)?;
//! client.set_transaction_type(TransactionType::Purchase);
//! client
//!     .request_mut()
//!     .set_amount(Decimal::new(1000, 2))
//!     .set_credit_card_number("4111111111111111")
//!     .set_credit_card_expiration("1230")
//!     .set_cardholder_name("Jane Doe");
//!
//! client.process().await?;
//!
//! if client.is_success() {
//!     println!("approved, tag {:?}", client.transaction_tag());
//! } else {
//!     println!("error {}: {}", client.error_code(), client.error_message());
//! }
//! # Ok(())
//! # }
//! ```

use std::{borrow::Cow, fmt, time::Instant};

use chrono::{DateTime, Utc};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    audit::{AuditEvent, AuditEventType, audit_log},
    codes::Classification,
    config::ClientConfig,
    error::Result,
    request::{Field, FieldKey, FieldValue, TransactionRequest, TransactionType},
    response::{FieldAccessor, GatewayResponse},
    signing::{CONTENT_TYPE, SigningContext, signing_applies},
    transport::{GatewayRequest, HttpTransport, Transport},
};

/// Client for the Global Gateway e4 transaction API.
///
/// Not meant to be shared between concurrent submissions:
/// [`process`](Self::process) takes `&mut self`.
pub struct GatewayClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
    transaction_type: TransactionType,
    request: TransactionRequest,
    response: Option<GatewayResponse>,
}

impl GatewayClient<HttpTransport> {
    /// Creates a client using the reqwest transport configured by `config.http`.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::with_config(&config.http)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> GatewayClient<T> {
    /// Creates a client with a custom transport.
    ///
    /// The configuration is not validated here; invalid endpoints surface as
    /// transport failures.
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            transaction_type: TransactionType::default(),
            request: TransactionRequest::new(),
            response: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Sets the API version used in the endpoint and signature.
    pub fn set_api_version(&mut self, version: &str) -> &mut Self {
        version.clone_into(&mut self.config.api_version);
        self
    }

    /// Sets the gateway ID and terminal password.
    pub fn set_credentials(&mut self, gateway_id: &str, password: &str) -> &mut Self {
        gateway_id.clone_into(&mut self.config.gateway_id);
        self.config.password = password.to_owned().into();
        self
    }

    /// Sets the HMAC key id and key.
    pub fn set_api_key(&mut self, key_id: &str, hmac_key: &str) -> &mut Self {
        key_id.clone_into(&mut self.config.key_id);
        self.config.hmac_key = hmac_key.to_owned().into();
        self
    }

    /// Selects the demo (`true`) or live (`false`) endpoint.
    pub fn set_test_mode(&mut self, test_mode: bool) -> &mut Self {
        self.config.test_mode = test_mode;
        self
    }

    /// Sets the transaction type for the next submission.
    pub fn set_transaction_type(&mut self, transaction_type: TransactionType) -> &mut Self {
        self.transaction_type = transaction_type;
        self
    }

    /// Returns the transaction type for the next submission.
    #[must_use]
    pub const fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Pending transaction fields.
    #[must_use]
    pub const fn request(&self) -> &TransactionRequest {
        &self.request
    }

    /// Mutable access to the pending transaction fields.
    pub fn request_mut(&mut self) -> &mut TransactionRequest {
        &mut self.request
    }

    /// Pending fields in insertion order.
    #[must_use]
    pub fn post_data(&self) -> &[(Field, FieldValue)] {
        self.request.post_data()
    }

    /// Sets one field or merges a batch; see [`TransactionRequest::set_post_data`].
    pub fn set_post_data(
        &mut self,
        key: impl Into<FieldKey>,
        value: Option<FieldValue>,
    ) -> &mut Self {
        self.request.set_post_data(key, value);
        self
    }

    /// Builds the signed request that [`process`](Self::process) would send now.
    ///
    /// # Errors
    ///
    /// Same as [`build_request_at`](Self::build_request_at).
    pub fn build_request(&self) -> Result<GatewayRequest> {
        self.build_request_at(Utc::now())
    }

    /// Builds the signed request with an explicit signing time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`](crate::error::GatewayError::ConfigError)
    /// if the API version is not a plain version string, and
    /// [`GatewayError::SerializationError`](crate::error::GatewayError::SerializationError)
    /// if the payload cannot be encoded.
    pub fn build_request_at(&self, timestamp: DateTime<Utc>) -> Result<GatewayRequest> {
        self.config.validate_api_version()?;
        let body = self.request.build(&self.config.credentials(), self.transaction_type)?;

        let mut headers = vec![
            ("Content-Type".to_owned(), CONTENT_TYPE.to_owned()),
            ("Accept".to_owned(), "application/json".to_owned()),
        ];

        if signing_applies(&self.config.api_version) {
            let signed = self.config.signer().sign(&SigningContext {
                api_version: &self.config.api_version,
                timestamp,
                payload: &body,
            });
            headers.extend(signed.into_headers());
        } else {
            tracing::debug!(api_version = %self.config.api_version, "request signing skipped");
        }

        Ok(GatewayRequest { url: self.config.endpoint(), headers, body })
    }

    /// Submits the pending transaction and returns the raw response body.
    ///
    /// Every outcome the gateway or network produces, including timeouts and
    /// declines, is recorded on the response and read through
    /// [`is_success`](Self::is_success), [`error_code`](Self::error_code) and
    /// the typed getters. Pending fields are cleared once the submission
    /// completes.
    ///
    /// # Errors
    ///
    /// Returns error only if the request could not be built; nothing is sent
    /// and the pending fields are kept.
    #[instrument(
        skip(self),
        fields(
            transaction_type = %self.transaction_type,
            api_version = %self.config.api_version,
            protocol = self.transport.protocol_name()
        )
    )]
    pub async fn process(&mut self) -> Result<&str> {
        let request_id = Uuid::new_v4();
        let request = self.build_request()?;
        let card = self.pending_card_number();
        let started = Instant::now();

        let response = match self.transport.submit(&request).await {
            Ok(reply) => GatewayResponse::classify(reply.status, reply.headers, reply.body),
            Err(e) => {
                tracing::warn!(error = %e, code = e.transport_code(), "gateway request failed");
                GatewayResponse::from_transport_error(&e)
            }
        };
        let elapsed = started.elapsed();

        self.request.clear();

        tracing::info!(
            %request_id,
            status = response.status(),
            error_code = response.error_code(),
            outcome = ?response.outcome(),
            duration_ms = elapsed.as_millis(),
            "transaction processed"
        );

        let mut event = AuditEvent::new(
            AuditEventType::from(response.outcome()),
            &self.config.gateway_id,
            request_id,
        )
        .with_transaction_type(self.transaction_type.code())
        .with_endpoint(&request.url)
        .with_error(response.error_code(), response.error_message())
        .with_duration(elapsed);
        if response.transport_failure().is_none() {
            event = event.with_http_status(response.status());
        }
        if let Some(number) = card {
            event = event.with_card_number(&number);
        }
        if let Some(tag) = response.fields().transaction_tag() {
            event = event.with_transaction_tag(tag);
        }
        audit_log(&event);

        Ok(self.response.insert(response).raw_body())
    }

    fn pending_card_number(&self) -> Option<String> {
        match self.request.get(&Field::CcNumber)? {
            FieldValue::Text(number) => Some(number.clone()),
            FieldValue::Number(number) => Some(number.to_string()),
            FieldValue::Address(_) | FieldValue::Null => None,
        }
    }

    /// Last response, if any submission completed.
    #[must_use]
    pub const fn response(&self) -> Option<&GatewayResponse> {
        self.response.as_ref()
    }

    /// Typed accessors over the last response body.
    #[must_use]
    pub fn fields(&self) -> Option<FieldAccessor<'_>> {
        self.response.as_ref().map(GatewayResponse::fields)
    }

    /// Returns true if the last submission failed, or nothing was submitted yet.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.response.as_ref().is_none_or(GatewayResponse::is_error)
    }

    /// Returns true if the last submission succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.is_error()
    }

    /// Error code of the last submission; 0 on success or before any submission.
    #[must_use]
    pub fn error_code(&self) -> u32 {
        self.response.as_ref().map_or(0, GatewayResponse::error_code)
    }

    /// Error message of the last submission; empty on success or before any submission.
    #[must_use]
    pub fn error_message(&self) -> &str {
        self.response.as_ref().map_or("", GatewayResponse::error_message)
    }

    /// `transaction_approved` of the last response.
    #[must_use]
    pub fn is_approved(&self) -> Option<bool> {
        self.fields()?.is_approved()
    }

    /// `transaction_tag` of the last response.
    #[must_use]
    pub fn transaction_tag(&self) -> Option<u64> {
        self.fields()?.transaction_tag()
    }

    /// `ctr` of the last response.
    #[must_use]
    pub fn transaction_record(&self) -> Option<Cow<'_, str>> {
        self.fields()?.transaction_record()
    }

    /// `authorization_num` of the last response.
    #[must_use]
    pub fn authorization_number(&self) -> Option<Cow<'_, str>> {
        self.fields()?.authorization_number()
    }

    /// `transarmor_token` of the last response.
    #[must_use]
    pub fn transarmor_token(&self) -> Option<Cow<'_, str>> {
        self.fields()?.transarmor_token()
    }

    /// `bank_resp_code` of the last response.
    #[must_use]
    pub fn bank_response_code(&self) -> Option<u32> {
        self.fields()?.bank_response_code()
    }

    /// `bank_message` of the last response.
    #[must_use]
    pub fn bank_response_message(&self) -> Option<Cow<'_, str>> {
        self.fields()?.bank_response_message()
    }

    /// Table classification of the last bank response code.
    #[must_use]
    pub fn bank_response_type(&self) -> Option<Classification> {
        self.fields()?.bank_response_type()
    }

    /// Table comments for the last bank response code.
    #[must_use]
    pub fn bank_response_comments(&self) -> Option<&'static str> {
        self.fields()?.bank_response_comments()
    }

    /// `exact_resp_code` of the last response.
    #[must_use]
    pub fn exact_response_code(&self) -> Option<u32> {
        self.fields()?.exact_response_code()
    }

    /// `exact_message` of the last response.
    #[must_use]
    pub fn exact_response_message(&self) -> Option<Cow<'_, str>> {
        self.fields()?.exact_response_message()
    }

    /// `avs` of the last response.
    #[must_use]
    pub fn avs(&self) -> Option<Cow<'_, str>> {
        self.fields()?.avs()
    }

    /// `cavv` of the last response.
    #[must_use]
    pub fn cavv(&self) -> Option<Cow<'_, str>> {
        self.fields()?.cavv()
    }
}

impl<T: fmt::Debug> fmt::Debug for GatewayClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .field("transaction_type", &self.transaction_type)
            .field("pending_fields", &self.request.len())
            .field("response", &self.response.as_ref().map(GatewayResponse::error_code))
            .finish()
    }
}
