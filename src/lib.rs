pub mod address;
pub mod cli;
pub mod config;
pub mod errors;
pub mod explorer;
pub mod fetcher;
pub mod logging;
pub mod output;
pub mod retry;

pub use errors::AppError;

use crate::address::AddressInfo;
use crate::config::Config;
use crate::explorer::ExplorerClient;
use crate::fetcher::{FetchOutcome, fetch_all};
use crate::output::{WriteOutcome, write_tx_ids};
use tracing::info;

#[derive(Debug)]
pub struct RunReport {
    pub address: String,
    pub fetch: FetchOutcome,
    pub write: WriteOutcome,
}

/// Full pipeline for one address: validate, page through the explorer API,
/// write the collected ids. The HTTP client lives for exactly this call.
pub async fn run(config: &Config) -> Result<RunReport, AppError> {
    let address_info = AddressInfo::from_address(&config.address)?;

    info!(
        address = %config.address,
        address_type = ?address_info.address_type,
        "starting history fetch"
    );

    let client = ExplorerClient::new(config.api_base_url.clone(), config.request_timeout)?;
    let fetch = fetch_all(
        &client,
        &config.address,
        &config.retry_policy(),
        config.page_delay,
    )
    .await;

    let write = write_tx_ids(&config.output, &fetch.tx_ids)?;

    Ok(RunReport {
        address: config.address.clone(),
        fetch,
        write,
    })
}
