//! # Innkeep Invoice Preview
//!
//! Calculates one invoice document and prints the breakdown.
//!
//! ## Usage
//! ```text
//! invoice-preview invoice.json                 # text table
//! invoice-preview invoice.json --json          # engine output as JSON
//! cat invoice.json | invoice-preview -         # read stdin
//! invoice-preview quote.json --no-tax          # estimate without tax
//! RUST_LOG=debug invoice-preview invoice.json  # engine logs on stderr
//! ```

mod config;
mod document;
mod error;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use innkeep_core::{InvoiceCalculator, SupplyType, TaxMode, TracingObserver};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::BillingConfig;
use crate::document::InvoiceDocument;
use crate::error::PreviewResult;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "invoice-preview", version, about = "Preview an Innkeep invoice")]
struct Cli {
    /// Invoice JSON document, or `-` for stdin
    input: PathBuf,

    /// Path to billing.toml (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Calculate without tax (quotes and estimates)
    #[arg(long)]
    no_tax: bool,

    /// Treat the supply as inter-state (IGST)
    #[arg(long)]
    inter_state: bool,

    /// Print the calculated invoice as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Invoice preview failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only the invoice.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn run(cli: Cli) -> PreviewResult<()> {
    let mut config = BillingConfig::load(cli.config)?;
    if cli.no_tax {
        config.tax.mode = TaxMode::NoTax;
    }
    if cli.inter_state {
        config.tax.supply_type = SupplyType::InterState;
    }

    info!(
        hotel = %config.hotel.name,
        tax_mode = %config.tax.mode,
        supply_type = %config.tax.supply_type,
        "Configuration loaded"
    );

    let document = InvoiceDocument::read(&cli.input)?;
    let calculator = InvoiceCalculator::new()
        .with_tax_mode(config.tax.mode)
        .with_observer(Arc::new(TracingObserver));

    let preview = document.calculate(&calculator, config.tax.supply_type)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        print!("{}", render::render_text(&preview, &config));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "invoice-preview",
            "-",
            "--no-tax",
            "--inter-state",
            "--json",
            "--config",
            "billing.toml",
        ]);
        assert_eq!(cli.input, PathBuf::from("-"));
        assert!(cli.no_tax && cli.inter_state && cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("billing.toml")));
    }
}
