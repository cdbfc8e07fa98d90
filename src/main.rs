use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, warn};

use address_enrich::app::ports::AddressLookup;
use address_enrich::config::{RunOptions, UspsConfig};
use address_enrich::constants::{DEFAULT_ENDPOINT, ENDPOINT_ENV, STDIN_PATH, USER_AGENT};
use address_enrich::infra::UspsClient;
use address_enrich::logging;
use address_enrich::pipeline::{self, open_input, RunSummary, Sinks};

#[derive(Parser, Debug)]
#[command(name = "address-enrich")]
#[command(about = "Appends USPS-normalized street addresses to delimited address records")]
#[command(version = "0.1.0")]
struct Cli {
    /// Input file ("-" reads standard input)
    #[arg(long, default_value = STDIN_PATH)]
    input_file: String,

    /// Verbose mode: dump each normalized address to stderr
    #[arg(short = 'v')]
    verbose: bool,

    /// Rows to skip at the start of the input
    #[arg(long, default_value_t = 1)]
    skip_rows: usize,

    /// Column index of the street field
    #[arg(long, default_value_t = 0)]
    start_column: usize,

    /// Number of concurrent lookups
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    concurrency: u16,

    /// Lookup endpoint
    #[arg(long, env = ENDPOINT_ENV, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            verbose: self.verbose,
            skip_rows: self.skip_rows,
            start_column: self.start_column,
            concurrency: usize::from(self.concurrency),
        }
    }
}

async fn enrich(cli: Cli) -> anyhow::Result<RunSummary> {
    let reader = open_input(&cli.input_file)?;

    let config = UspsConfig::from_env().with_endpoint(cli.endpoint.clone());
    if !config.has_username() {
        warn!("USPS username not set; every lookup will fail");
    }
    let http = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build HTTP client")?;
    let lookup: Arc<dyn AddressLookup> = Arc::new(UspsClient::new(config, http));

    let options = cli.run_options();
    debug!(
        "enriching {} (skip_rows={}, start_column={}, concurrency={})",
        cli.input_file, options.skip_rows, options.start_column, options.concurrency
    );
    let summary = pipeline::run(reader, &options, lookup, Sinks::stdio())
        .await
        .context("address enrichment failed")?;
    Ok(summary)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before parsing so env-backed flags see .env
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    logging::init_logging();

    match enrich(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["address-enrich"]).unwrap();
        assert_eq!(cli.input_file, "-");
        let options = cli.run_options();
        assert!(!options.verbose);
        assert_eq!(options.skip_rows, 1);
        assert_eq!(options.start_column, 0);
        assert_eq!(options.concurrency, 1);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "address-enrich",
            "--input-file",
            "addresses.csv",
            "-v",
            "--skip-rows",
            "0",
            "--start-column",
            "2",
            "--concurrency",
            "8",
        ])
        .unwrap();
        assert_eq!(cli.input_file, "addresses.csv");
        let options = cli.run_options();
        assert!(options.verbose);
        assert_eq!(options.skip_rows, 0);
        assert_eq!(options.start_column, 2);
        assert_eq!(options.concurrency, 8);
    }

    #[test]
    fn test_cli_rejects_zero_concurrency() {
        assert!(Cli::try_parse_from(["address-enrich", "--concurrency", "0"]).is_err());
    }
}
