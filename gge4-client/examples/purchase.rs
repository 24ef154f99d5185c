//! Purchase against the demo gateway.
//!
//! # Running this example
//!
//! ```bash
//! export GGE4_GATEWAY_ID=AD1234-56
//! export GGE4_PASSWORD=...
//! export GGE4_KEY_ID=...
//! export GGE4_HMAC_KEY=...
//! cargo run --example purchase
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "examples are allowed to use println"
)]

use gge4_client::{ClientConfig, GatewayClient, TransactionType};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env()?;
    config.test_mode = true;

    let mut client = GatewayClient::new(config)?;
    client.set_transaction_type(TransactionType::Purchase);
    client
        .request_mut()
        .set_amount(Decimal::new(1000, 2))
        .set_credit_card_number("4111111111111111")
        .set_credit_card_expiration("1230")
        .set_cardholder_name("Test Customer")
        .set_cvv("123");

    client.process().await?;

    if client.is_success() {
        println!("Approved");
        println!("  Transaction tag: {:?}", client.transaction_tag());
        println!("  Authorization:   {:?}", client.authorization_number());
        if let Some(receipt) = client.transaction_record() {
            println!("\n{receipt}");
        }
    } else {
        eprintln!("Failed ({}): {}", client.error_code(), client.error_message());
        if let Some(message) = client.bank_response_message() {
            eprintln!("  Bank: {message}");
        }
        if let Some(comments) = client.bank_response_comments() {
            eprintln!("  {comments}");
        }
    }

    Ok(())
}
