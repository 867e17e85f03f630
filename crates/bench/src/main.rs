use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use tally_client::Client;
use tally_runtime::logging;

mod report;
mod trial;

use report::ReportFormat;

#[derive(Debug, Parser)]
#[command(
    name = "tally-bench",
    version,
    about = "Throughput and latency benchmark for a tally accounting service"
)]
pub struct Cli {
    /// Service endpoints to try in order, as comma-separated host:port
    #[arg(long, value_delimiter = ',', default_value = "127.0.0.1:3000")]
    pub addresses: Vec<String>,

    /// Cluster id (0 = default configuration)
    #[arg(long, default_value_t = 0)]
    pub cluster: u32,

    /// Synthetic transfers submitted per trial
    #[arg(long, default_value_t = 1_000_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub samples: u64,

    /// Maximum transfers per request
    #[arg(long, default_value_t = 8191, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: u64,

    /// Number of trials; each is timed and reported independently
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub trials: u32,

    /// Emit one JSON object per trial instead of human-readable lines
    #[arg(long)]
    pub json: bool,
}

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(1)
        }
    }
}

/// Runs all trials over one connection. Any anomaly aborts the whole run;
/// the connection is released on every exit path when `client` drops.
fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut client = Client::connect(&cli.addresses, cli.cluster)
        .context("failed to connect to the accounting service")?;

    let format = if cli.json {
        ReportFormat::Json
    } else {
        ReportFormat::Human
    };

    info!(
        "running {} trials of {} samples in batches of {}",
        cli.trials, cli.samples, cli.batch_size
    );

    // Repeat the same test and let the operator pick the best execution.
    let mut out = io::stdout().lock();
    for _ in 0..cli.trials {
        let stats = trial::run_trial(&mut client, cli.samples, cli.batch_size)?;
        report::print_trial(&mut out, format, &stats, cli.samples)?;
        out.flush()?;
    }

    Ok(())
}
