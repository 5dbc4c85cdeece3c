//! JupiterOne CLI - run a J1QL query and export the results as CSV or JSON lines.

use std::io::{self, BufWriter};
use std::process::ExitCode;

use jupiterone_cli::cli::Cli;
use jupiterone_cli::client::JupiterOneClient;
use jupiterone_cli::config::Config;
use jupiterone_cli::error::{J1Error, Result, TREE_QUERY_MESSAGE};
use jupiterone_cli::{logging, pipeline};
use tracing::{debug, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Credentials may live in a .env file next to the caller
    dotenvy::dotenv().ok();

    logging::init_stderr_logging();

    let cli = Cli::parse_args();

    match run(cli).await {
        Ok(rows) => {
            debug!(rows, "done");
            ExitCode::SUCCESS
        }
        Err(J1Error::TreeQuery) => {
            eprintln!("{TREE_QUERY_MESSAGE}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}: {}", e.category(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<usize> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let client_config = cli.client_config(&config)?;
    info!(api_url = %client_config.api_url, "Using JupiterOne API");
    let client = JupiterOneClient::new(client_config)?;

    let request = cli.query_request(&config);
    let stdout = io::stdout();
    pipeline::run(&client, &request, BufWriter::new(stdout.lock())).await
}
