//! GGE4 client: First Data Global Gateway e4 transaction API
//!
//! A Rust client for submitting card transactions (purchases, authorizations,
//! refunds, voids, tagged follow-ups) to the Global Gateway e4 REST endpoint
//! and interpreting what comes back.
//!
//! # Flow
//!
//! ```text
//! TransactionRequest ──build──▶ JSON body ──sign (HMAC-SHA1)──▶ GatewayRequest
//!                                                                    │
//!                                                              Transport::submit
//!                                                                    │
//! FieldAccessor ◀── GatewayResponse::classify ◀── status + body ◀────┘
//! ```
//!
//! - [`request`]: transaction types and field accumulation
//! - [`signing`]: `X-GGe4-*` headers and the `GGE4_API` authorization
//! - [`transport`]: the [`Transport`](transport::Transport) trait and the reqwest implementation
//! - [`response`]: error classification and recursive field lookup
//! - [`codes`]: bank response code table
//! - [`audit`]: structured audit events with card numbers masked
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gge4_client::{ClientConfig, GatewayClient, TransactionType};
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> gge4_client::Result<()> {
//! let mut config = ClientConfig::from_env()?;
//! config.test_mode = true;
//!
//! let mut client = GatewayClient::new(config)?;
//! client.set_transaction_type(TransactionType::Purchase);
//! client
//!     .request_mut()
//!     .set_amount(Decimal::new(2599, 2))
//!     .set_credit_card_number("4111111111111111")
//!     .set_credit_card_expiration("1230")
//!     .set_cardholder_name("Jane Doe");
//!
//! client.process().await?;
//!
//! if client.is_success() {
//!     println!("approved: {:?}", client.authorization_number());
//! } else {
//!     eprintln!("{}: {}", client.error_code(), client.error_message());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! [`process`](GatewayClient::process) only fails when the request cannot be
//! built. Network failures, HTTP errors, malformed bodies and declines are
//! recorded on the [`GatewayResponse`] and exposed through
//! [`GatewayClient::error_code`] and [`GatewayClient::error_message`].
//!
//! # Security
//!
//! - HTTPS only; redirects are not followed
//! - Passwords and HMAC keys are held in [`zeroize::Zeroizing`] buffers and
//!   never appear in `Debug` output
//! - Audit events carry masked card numbers only

pub mod audit;
pub mod client;
pub mod codes;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod signing;
pub mod transport;

pub use client::GatewayClient;
pub use codes::{Classification, ResponseCodeEntry};
pub use config::ClientConfig;
pub use error::{GatewayError, Result};
pub use request::{Address, Field, FieldKey, FieldValue, TransactionRequest, TransactionType};
pub use response::{FieldAccessor, GatewayResponse, OutcomeKind};
pub use signing::{RequestSigner, SignedHeaders, SigningContext};
pub use transport::{GatewayRequest, HttpTransport, Transport, TransportResponse};
