//! `gge4`: submit a single Global Gateway e4 transaction from the shell.
//!
//! ```bash
//! export GGE4_GATEWAY_ID=AD1234-56 GGE4_PASSWORD=... GGE4_KEY_ID=... GGE4_HMAC_KEY=...
//! gge4 --demo --amount 10.00 --card 4111111111111111 --expiry 1230 --name "Jane Doe"
//! gge4 --demo --type tagged-refund --tag 901 --auth-num ET1234 --amount 10.00
//! ```
//!
//! Exit status is 0 when the gateway accepted the transaction and 1 otherwise.

#![allow(clippy::print_stdout, reason = "stdout carries the transaction result")]

mod cli;
mod observability;

use std::{fmt, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use gge4_client::{ClientConfig, GatewayClient, Transport};

use crate::{
    cli::Cli,
    observability::{LogFormat, init_observability},
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_observability(cli.log_format.unwrap_or_else(LogFormat::from_env), cli.verbose);

    let config = load_config(&cli)?;
    let mut client = GatewayClient::new(config).context("invalid gateway configuration")?;

    client.set_transaction_type(cli.transaction_type);
    apply_fields(&mut client, &cli);

    let raw = client.process().await.context("failed to build transaction request")?.to_owned();

    println!("{}", Summary::from_client(&client));
    if cli.raw {
        println!("{raw}");
    }

    Ok(if client.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = ClientConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            config.apply_env_overrides().context("invalid GGE4_* environment")?;
            config
        }
        None => ClientConfig::from_env().context("invalid GGE4_* environment")?,
    };

    if cli.demo {
        config.test_mode = true;
    }

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn apply_fields<T: Transport>(client: &mut GatewayClient<T>, cli: &Cli) {
    let request = client.request_mut();

    if let Some(amount) = cli.amount {
        request.set_amount(amount);
    }
    if let Some(card) = &cli.card {
        request.set_credit_card_number(card);
    }
    if let Some(expiry) = &cli.expiry {
        request.set_credit_card_expiration(expiry);
    }
    if let Some(name) = &cli.name {
        request.set_cardholder_name(name);
    }
    if let Some(cvv) = &cli.cvv {
        request.set_cvv(cvv);
    }
    if let Some(tag) = cli.tag {
        request.set_transaction_tag(tag);
    }
    if let Some(number) = &cli.authorization_number {
        request.set_authorization_number(number);
    }
    if let Some(reference) = &cli.reference_number {
        request.set_reference_number(reference);
    }
}

/// One-line outcome printed on stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Summary {
    approved: bool,
    error_code: u32,
    error_message: String,
    authorization_number: Option<String>,
    transaction_tag: Option<u64>,
}

impl Summary {
    fn from_client<T: Transport>(client: &GatewayClient<T>) -> Self {
        Self {
            approved: client.is_success(),
            error_code: client.error_code(),
            error_message: client.error_message().to_owned(),
            authorization_number: client.authorization_number().map(|a| a.into_owned()),
            transaction_tag: client.transaction_tag(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.approved {
            f.write_str("APPROVED")?;
        } else {
            write!(f, "ERROR {}", self.error_code)?;
            if !self.error_message.is_empty() {
                write!(f, " {}", self.error_message)?;
            }
        }
        if let Some(auth) = &self.authorization_number {
            write!(f, " auth={auth}")?;
        }
        if let Some(tag) = self.transaction_tag {
            write!(f, " tag={tag}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_approved() {
        let summary = Summary {
            approved: true,
            error_code: 0,
            error_message: String::new(),
            authorization_number: Some("ET1234".to_owned()),
            transaction_tag: Some(901),
        };
        assert_eq!(summary.to_string(), "APPROVED auth=ET1234 tag=901");
    }

    #[test]
    fn test_summary_error() {
        let summary = Summary {
            approved: false,
            error_code: 42,
            error_message: "Processor Decline".to_owned(),
            authorization_number: None,
            transaction_tag: Some(902),
        };
        assert_eq!(summary.to_string(), "ERROR 42 Processor Decline tag=902");
    }

    #[test]
    fn test_summary_error_without_message() {
        let summary = Summary {
            approved: false,
            error_code: 500,
            error_message: String::new(),
            authorization_number: None,
            transaction_tag: None,
        };
        assert_eq!(summary.to_string(), "ERROR 500");
    }

    #[test]
    fn test_apply_fields_sets_request() {
        let cli = Cli::try_parse_from([
            "gge4", "--amount", "5", "--card", "4111111111111111", "--cvv", "123", "--reference",
            "INV-7",
        ])
        .unwrap();
        let mut client = GatewayClient::new(ClientConfig::new("gw", "pw", "1", "k")).unwrap();

        apply_fields(&mut client, &cli);

        let fields: Vec<&str> = client.post_data().iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(
            fields,
            ["amount", "cc_number", "cc_verification_str2", "cvd_presence_ind", "reference_no"]
        );
    }
}
