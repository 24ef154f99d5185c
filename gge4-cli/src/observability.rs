//! Logging setup for the `gge4` binary.
//!
//! Everything goes to stderr so stdout carries only the transaction result.

use std::io;

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Environment variable selecting the log format.
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name; anything other than `json` is pretty.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("json") { Self::Json } else { Self::Pretty }
    }

    /// Reads `LOG_FORMAT`, defaulting to pretty.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_VAR).map(|v| Self::from_name(&v)).unwrap_or_default()
    }
}

/// Default directive when `RUST_LOG` is unset.
///
/// `verbose` raises the client crate to `debug` (1) or `trace` (2+); audit
/// events stay at `info`.
#[must_use]
pub fn default_directive(verbose: u8) -> String {
    match verbose {
        0 => "warn,gge4=info,gge4_client=info,audit=info".to_owned(),
        1 => "warn,gge4=debug,gge4_client=debug,audit=info".to_owned(),
        _ => "info,gge4=trace,gge4_client=trace,audit=info".to_owned(),
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init_observability(format: LogFormat, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Json => {
            subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
}
