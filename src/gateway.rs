//! Gateway boundary - fetching raw blocks over the Cosmos REST API
//!
//! The pipeline only ever asks for "latest" or a specific height; everything else
//! (badge provisioning, transport retries) belongs to the gateway itself and stays
//! outside this crate.
//!
//! ## Endpoints
//!
//! - `GET /cosmos/base/tendermint/v1beta1/blocks/latest`
//! - `GET /cosmos/base/tendermint/v1beta1/blocks/{height}`

use crate::error::FetchError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// One fetched block: its height and the raw base64 transaction strings
#[derive(Debug, Clone)]
pub struct BlockData {
    pub height: u64,
    pub txs: Vec<String>,
}

/// Boundary trait for fetching raw block data by height or "latest"
#[async_trait]
pub trait BlockFetcher: Send + Sync {
    async fn fetch_latest(&self) -> Result<BlockData, FetchError>;

    async fn fetch_by_height(&self, height: u64) -> Result<BlockData, FetchError>;
}

/// Tendermint block response structures (only the fields this crate reads)
#[derive(Debug, Deserialize)]
struct BlockResponse {
    block: Block,
}

#[derive(Debug, Deserialize)]
struct Block {
    header: BlockHeader,
    data: BlockTxs,
}

#[derive(Debug, Deserialize)]
struct BlockHeader {
    // The REST API serializes heights as decimal strings
    height: String,
}

#[derive(Debug, Deserialize)]
struct BlockTxs {
    #[serde(default)]
    txs: Vec<String>,
}

/// REST gateway client
///
/// The project id, when configured, is appended to the gateway base path and is
/// otherwise uninterpreted.
pub struct RestBlockFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl RestBlockFetcher {
    pub fn new(
        gateway_url: &str,
        project_id: Option<&str>,
        request_timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;

        let mut base_url = gateway_url.trim_end_matches('/').to_string();
        if let Some(project) = project_id {
            base_url.push('/');
            base_url.push_str(project);
        }

        Ok(Self { client, base_url })
    }

    async fn fetch_block(&self, path: &str) -> Result<BlockData, FetchError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await?;
        let parsed: BlockResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::BadPayload(format!("unparseable block response: {}", e)))?;

        let height: u64 = parsed.block.header.height.parse().map_err(|_| {
            FetchError::BadPayload(format!(
                "non-numeric block height: {:?}",
                parsed.block.header.height
            ))
        })?;

        Ok(BlockData {
            height,
            txs: parsed.block.data.txs,
        })
    }
}

#[async_trait]
impl BlockFetcher for RestBlockFetcher {
    async fn fetch_latest(&self) -> Result<BlockData, FetchError> {
        self.fetch_block("/cosmos/base/tendermint/v1beta1/blocks/latest")
            .await
    }

    async fn fetch_by_height(&self, height: u64) -> Result<BlockData, FetchError> {
        self.fetch_block(&format!(
            "/cosmos/base/tendermint/v1beta1/blocks/{}",
            height
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_json(height: u64, txs: &[&str]) -> String {
        serde_json::json!({
            "block_id": {},
            "block": {
                "header": { "height": height.to_string(), "chain_id": "lava-testnet-2" },
                "data": { "txs": txs }
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_fetch_latest_parses_block() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cosmos/base/tendermint/v1beta1/blocks/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(block_json(1042, &["dGVzdA==", "c2Vjb25k"]))
            .create_async()
            .await;

        let fetcher =
            RestBlockFetcher::new(&server.url(), None, Duration::from_secs(5)).unwrap();
        let block = fetcher.fetch_latest().await.unwrap();

        assert_eq!(block.height, 1042);
        assert_eq!(block.txs.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_by_height_uses_project_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                "/myproject/cosmos/base/tendermint/v1beta1/blocks/99",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(block_json(99, &[]))
            .create_async()
            .await;

        let fetcher =
            RestBlockFetcher::new(&server.url(), Some("myproject"), Duration::from_secs(5))
                .unwrap();
        let block = fetcher.fetch_by_height(99).await.unwrap();

        assert_eq!(block.height, 99);
        assert!(block.txs.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_error_is_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cosmos/base/tendermint/v1beta1/blocks/latest")
            .with_status(502)
            .create_async()
            .await;

        let fetcher =
            RestBlockFetcher::new(&server.url(), None, Duration::from_secs(5)).unwrap();

        match fetcher.fetch_latest().await {
            Err(FetchError::Status(code)) => assert_eq!(code.as_u16(), 502),
            other => panic!("expected status error, got {:?}", other.map(|b| b.height)),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_bad_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cosmos/base/tendermint/v1beta1/blocks/latest")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let fetcher =
            RestBlockFetcher::new(&server.url(), None, Duration::from_secs(5)).unwrap();

        assert!(matches!(
            fetcher.fetch_latest().await,
            Err(FetchError::BadPayload(_))
        ));
    }

    #[tokio::test]
    async fn test_bad_height_string_is_bad_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cosmos/base/tendermint/v1beta1/blocks/latest")
            .with_status(200)
            .with_body(
                r#"{"block": {"header": {"height": "not-a-number"}, "data": {"txs": []}}}"#,
            )
            .create_async()
            .await;

        let fetcher =
            RestBlockFetcher::new(&server.url(), None, Duration::from_secs(5)).unwrap();

        assert!(matches!(
            fetcher.fetch_latest().await,
            Err(FetchError::BadPayload(_))
        ));
    }
}
