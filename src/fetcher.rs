use crate::explorer::TransactionSource;
use crate::retry::RetryPolicy;

use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Every transaction the server reported was collected.
    Complete,
    /// A page failed all retry attempts; the ids collected before it are kept.
    TruncatedByError,
    /// The server returned an empty page while still reporting more
    /// transactions than were collected. Aborted instead of re-requesting the
    /// same offset forever.
    Stalled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub tx_ids: Vec<String>,
    pub status: FetchStatus,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == FetchStatus::Complete
    }
}

/// Walks the address's history page by page, advancing the offset by the
/// number of ids each page returned, until the accumulated count reaches the
/// server-reported total. Pages are fetched under `policy`; once a page
/// exhausts its retries the loop stops and whatever accumulated so far is
/// returned as a partial result.
pub async fn fetch_all<S: TransactionSource>(
    source: &S,
    address: &str,
    policy: &RetryPolicy,
    page_delay: Duration,
) -> FetchOutcome {
    let mut tx_ids: Vec<String> = Vec::new();
    let mut offset: u64 = 0;

    loop {
        let page = match policy.run(|| source.fetch_page(address, offset)).await {
            Ok(page) => page,
            Err(err) => {
                error!(
                    address,
                    offset,
                    collected = tx_ids.len(),
                    error = %err,
                    "page fetch failed after retries, keeping partial results"
                );
                return FetchOutcome {
                    tx_ids,
                    status: FetchStatus::TruncatedByError,
                };
            },
        };

        let received = page.tx_ids.len() as u64;
        tx_ids.extend(page.tx_ids);

        if tx_ids.len() as u64 >= page.n_tx {
            info!(address, total = tx_ids.len(), "history fetch complete");
            return FetchOutcome {
                tx_ids,
                status: FetchStatus::Complete,
            };
        }

        if received == 0 {
            warn!(
                address,
                offset,
                collected = tx_ids.len(),
                reported_total = page.n_tx,
                "empty page before the reported total was reached, aborting"
            );
            return FetchOutcome {
                tx_ids,
                status: FetchStatus::Stalled,
            };
        }

        offset += received;
        sleep(page_delay).await;
    }
}
