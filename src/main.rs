use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use pxorder::application::client::OrderGatewayClient;
use pxorder::domain::parameters::ParamValue;
use pxorder::domain::ports::SoapClientBox;
use pxorder::infrastructure::http::HttpSoapClient;
use pxorder::interfaces::cli::{load_options, parse_param, resolve_config, to_parameters};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with accountNumber, encryptionKey and sandbox options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Merchant account number (overrides the config file)
    #[arg(long)]
    account_number: Option<String>,

    /// Shared encryption key (overrides the config file)
    #[arg(long)]
    encryption_key: Option<String>,

    /// Use the PayEx test environment (`--sandbox=false` forces production)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    sandbox: Option<bool>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Print the signed parameters instead of calling the service
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an order
    Initialize8 {
        /// Call parameters as KEY=VALUE
        #[arg(value_parser = parse_param)]
        params: Vec<(String, ParamValue)>,
    },
    /// Complete an order
    Complete {
        /// Call parameters as KEY=VALUE
        #[arg(value_parser = parse_param)]
        params: Vec<(String, ParamValue)>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file_options = match &cli.config {
        Some(path) => Some(load_options(path).into_diagnostic()?),
        None => None,
    };
    let config = resolve_config(file_options, cli.account_number, cli.encryption_key, cli.sandbox)
        .into_diagnostic()?;

    let soap: SoapClientBox = Box::new(
        HttpSoapClient::with_timeout(Duration::from_secs(cli.timeout_secs)).into_diagnostic()?,
    );
    let client = OrderGatewayClient::new(soap, config).into_diagnostic()?;

    let output = match (cli.command, cli.dry_run) {
        (Command::Initialize8 { params }, true) => {
            serde_json::to_string_pretty(&client.prepare_initialize8(to_parameters(params)))
        }
        (Command::Complete { params }, true) => {
            serde_json::to_string_pretty(&client.prepare_complete(to_parameters(params)))
        }
        (Command::Initialize8 { params }, false) => {
            let response = client.initialize8(to_parameters(params)).await.into_diagnostic()?;
            serde_json::to_string_pretty(&response)
        }
        (Command::Complete { params }, false) => {
            let response = client.complete(to_parameters(params)).await.into_diagnostic()?;
            serde_json::to_string_pretty(&response)
        }
    }
    .into_diagnostic()?;

    println!("{output}");
    Ok(())
}
