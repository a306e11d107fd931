//! Error taxonomy for the ingestion pipeline
//!
//! Two failure families cross the external boundaries: fetching a block from the
//! gateway and decoding its transactions. A block with zero relay-payment messages
//! is NOT an error anywhere in this crate; it aggregates to an empty chain map.

use thiserror::Error;

/// Gateway/network failure while fetching a block
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("unexpected block payload: {0}")]
    BadPayload(String),
}

/// Malformed transaction bytes or unrecognized message schema
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64 transaction encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("protobuf decode failed: {0}")]
    Protobuf(#[from] prost::DecodeError),
}
