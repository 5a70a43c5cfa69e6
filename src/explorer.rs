use crate::errors::{AppError, FetchError};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

/// One page of an address's transaction history: the ids returned at the
/// requested offset plus the server-reported total for the whole address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressPage {
    pub tx_ids: Vec<String>,
    pub n_tx: u64,
}

#[derive(Debug, Deserialize)]
struct TxRef {
    hash: String,
}

/// Wire shape of the `rawaddr` response. Anything beyond `txs` and `n_tx` is
/// ignored; either field missing means an empty page, not a parse failure.
#[derive(Debug, Deserialize)]
struct RawAddrBody {
    #[serde(default)]
    txs: Vec<TxRef>,
    #[serde(default)]
    n_tx: u64,
}

/// Per-page source of transaction history, so the pagination loop does not
/// care whether pages come from the network or from a test script.
#[async_trait]
pub trait TransactionSource {
    async fn fetch_page(&self, address: &str, offset: u64) -> Result<AddressPage, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ExplorerClient {
    base_url: Url,
    client: Client,
}

impl ExplorerClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl TransactionSource for ExplorerClient {
    async fn fetch_page(&self, address: &str, offset: u64) -> Result<AddressPage, FetchError> {
        let url = format!(
            "{}/{address}?offset={offset}",
            self.base_url.as_str().trim_end_matches('/')
        );

        debug!(%url, "explorer GET");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body_text = response.text().await?;
        let body: RawAddrBody = serde_json::from_str(&body_text).map_err(|e| {
            error!(
                %url,
                status = %status,
                response_body = %body_text,
                error = %e,
                "failed to parse explorer response"
            );
            e
        })?;

        Ok(AddressPage {
            tx_ids: body.txs.into_iter().map(|tx| tx.hash).collect(),
            n_tx: body.n_tx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RawAddrBody;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_rawaddr_body() {
        let body: RawAddrBody = serde_json::from_str(
            r#"{ "txs": [ { "hash": "aa", "fee": 1 }, { "hash": "bb" } ], "n_tx": 2, "final_balance": 0 }"#,
        )
        .expect("valid body");

        let hashes: Vec<String> = body.txs.into_iter().map(|tx| tx.hash).collect();
        assert_eq!(hashes, vec!["aa".to_string(), "bb".to_string()]);
        assert_eq!(body.n_tx, 2);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let body: RawAddrBody = serde_json::from_str("{}").expect("empty object");

        assert!(body.txs.is_empty());
        assert_eq!(body.n_tx, 0);
    }

    #[test]
    fn tx_without_hash_is_a_parse_error() {
        let result: Result<RawAddrBody, _> =
            serde_json::from_str(r#"{ "txs": [ { "fee": 1 } ], "n_tx": 1 }"#);

        assert!(result.is_err());
    }
}
