use dotenvy::dotenv;
use std::process::ExitCode;
use tracing::{error, info};
use txfetch::{
    AppError, cli::Args, fetcher::FetchStatus, logging::setup_tracing, output::WriteOutcome, run,
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let config = Args::init().unwrap_or_else(|e| {
        eprintln!("\n{e}");
        std::process::exit(1);
    });

    setup_tracing(config.log_level);

    info!(
        "Starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    match run(&config).await {
        Ok(report) => match report.write {
            WriteOutcome::Written(count) => {
                println!(
                    "Transaction ids for {} written to {} ({count} total)",
                    report.address,
                    config.output.display()
                );
                if report.fetch.status != FetchStatus::Complete {
                    println!("Warning: history is incomplete, see the log for details.");
                }
                ExitCode::SUCCESS
            },
            WriteOutcome::Empty => {
                println!("No transaction ids retrieved for {}", report.address);
                ExitCode::SUCCESS
            },
        },
        Err(AppError::InvalidAddress(address)) => {
            error!(%address, "invalid Bitcoin address");
            eprintln!("Invalid Bitcoin address: {address}");
            ExitCode::from(1)
        },
        Err(e) => {
            error!(error = %e, "unexpected failure");
            eprintln!("An error occurred: {e}");
            ExitCode::from(2)
        },
    }
}
