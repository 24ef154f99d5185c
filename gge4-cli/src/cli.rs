//! Command-line arguments for `gge4`.

use std::path::PathBuf;

use clap::Parser;
use gge4_client::TransactionType;
use rust_decimal::Decimal;

use crate::observability::LogFormat;

/// Submit one transaction to Global Gateway e4.
///
/// Credentials come from `--config` and the `GGE4_*` environment variables,
/// which override values from the file.
#[derive(Parser, Debug)]
#[command(name = "gge4", version, about = "Global Gateway e4 transaction client")]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, short = 'c', env = "GGE4_CONFIG")]
    pub config: Option<PathBuf>,

    /// Transaction type: wire code ("00", "34") or name ("purchase", "tagged-refund").
    #[arg(long = "type", short = 't', default_value = "purchase")]
    pub transaction_type: TransactionType,

    /// Amount in the transaction currency, e.g. 10.50.
    #[arg(long, short = 'a')]
    pub amount: Option<Decimal>,

    /// Card number.
    #[arg(long)]
    pub card: Option<String>,

    /// Expiry as MMYY.
    #[arg(long)]
    pub expiry: Option<String>,

    /// Cardholder name.
    #[arg(long)]
    pub name: Option<String>,

    /// Card verification value; also sets the presence indicator.
    #[arg(long)]
    pub cvv: Option<String>,

    /// Transaction tag of the transaction being completed, voided or refunded.
    #[arg(long)]
    pub tag: Option<u64>,

    /// Authorization number of the original transaction.
    #[arg(long = "auth-num")]
    pub authorization_number: Option<String>,

    /// Merchant reference number.
    #[arg(long = "reference")]
    pub reference_number: Option<String>,

    /// Send to the demo endpoint.
    #[arg(long)]
    pub demo: bool,

    /// Print the raw response body after the summary.
    #[arg(long)]
    pub raw: bool,

    /// Log format on stderr; defaults to `LOG_FORMAT` or pretty.
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// More log output (-v debug, -vv trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_purchase() {
        let cli = Cli::try_parse_from([
            "gge4", "--amount", "10.50", "--card", "4111111111111111", "--expiry", "1230",
            "--name", "Jane Doe", "--demo",
        ])
        .unwrap();

        assert_eq!(cli.transaction_type, TransactionType::Purchase);
        assert_eq!(cli.amount, Some(Decimal::new(1050, 2)));
        assert_eq!(cli.card.as_deref(), Some("4111111111111111"));
        assert!(cli.demo);
        assert!(!cli.raw);
    }

    #[test]
    fn test_parse_tagged_refund_by_code_and_name() {
        let by_code =
            Cli::try_parse_from(["gge4", "-t", "34", "--tag", "901", "--auth-num", "ET1234"])
                .unwrap();
        assert_eq!(by_code.transaction_type, TransactionType::TaggedRefund);
        assert_eq!(by_code.tag, Some(901));
        assert_eq!(by_code.authorization_number.as_deref(), Some("ET1234"));

        let by_name = Cli::try_parse_from(["gge4", "--type", "tagged-refund"]).unwrap();
        assert_eq!(by_name.transaction_type, TransactionType::TaggedRefund);
    }

    #[test]
    fn test_rejects_unknown_type_and_bad_amount() {
        assert!(Cli::try_parse_from(["gge4", "--type", "teleport"]).is_err());
        assert!(Cli::try_parse_from(["gge4", "--amount", "ten"]).is_err());
    }

    #[test]
    fn test_verbose_and_log_format() {
        let cli = Cli::try_parse_from(["gge4", "-vv", "--log-format", "json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }
}
