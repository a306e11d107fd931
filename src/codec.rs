//! Transaction decoding for relay-payment extraction
//!
//! Blocks arrive from the gateway as base64 transaction strings. Each transaction is
//! a Cosmos `TxRaw` envelope whose body carries `Any`-packed messages; the one this
//! crate cares about is `lavanet.lava.pairing.MsgRelayPayment`, which records the
//! number of relays a provider served per chain.
//!
//! Message structs are declared by hand with prost field tags matching the upstream
//! protos; fields this crate does not read are left undeclared and skipped by the
//! decoder.

use crate::error::DecodeError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use prost::Message;

/// Type URL identifying a relay-payment message inside a transaction body
pub const RELAY_PAYMENT_TYPE_URL: &str = "/lavanet.lava.pairing.MsgRelayPayment";

/// Outer transaction envelope (cosmos.tx.v1beta1.TxRaw)
#[derive(Clone, PartialEq, Message)]
pub struct TxRaw {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
}

/// Transaction body holding the packed messages (cosmos.tx.v1beta1.TxBody)
#[derive(Clone, PartialEq, Message)]
pub struct TxBody {
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<AnyMessage>,
}

/// Type-tagged opaque payload (google.protobuf.Any)
#[derive(Clone, PartialEq, Message)]
pub struct AnyMessage {
    #[prost(string, tag = "1")]
    pub type_url: String,

    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// Relay-payment message (lavanet.lava.pairing.MsgRelayPayment)
#[derive(Clone, PartialEq, Message)]
pub struct MsgRelayPayment {
    #[prost(string, tag = "1")]
    pub creator: String,

    #[prost(message, repeated, tag = "2")]
    pub relays: Vec<RelaySession>,
}

/// One relay session inside a payment (lavanet.lava.pairing.RelaySession)
///
/// Only the fields this pipeline reads are declared; the upstream message
/// carries several more (content hash, signatures, QoS reports).
#[derive(Clone, PartialEq, Message)]
pub struct RelaySession {
    /// Chain the relays were served for (e.g. "ETH1", "COS3")
    #[prost(string, tag = "1")]
    pub spec_id: String,

    #[prost(uint64, tag = "4")]
    pub cu_sum: u64,

    #[prost(string, tag = "5")]
    pub provider: String,

    #[prost(uint64, tag = "6")]
    pub relay_num: u64,
}

/// One chain's relay contribution extracted from a relay-payment message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRecord {
    pub chain_id: String,
    pub relay_count: u64,
    pub provider: String,
}

/// Decode a raw transaction into its body
pub fn decode_tx(tx_bytes: &[u8]) -> Result<TxBody, DecodeError> {
    let raw = TxRaw::decode(tx_bytes)?;
    let body = TxBody::decode(raw.body_bytes.as_slice())?;
    Ok(body)
}

/// Decode the `Any` value of a relay-payment message
pub fn decode_relay_payment(value: &[u8]) -> Result<MsgRelayPayment, DecodeError> {
    Ok(MsgRelayPayment::decode(value)?)
}

/// Extract all relay records from one raw transaction
///
/// Filters the body's messages to the relay-payment type URL. A message that
/// matches the type URL but fails to decode is logged and skipped; it does not
/// fail the transaction.
pub fn relay_records_from_tx(tx_bytes: &[u8]) -> Result<Vec<RelayRecord>, DecodeError> {
    let body = decode_tx(tx_bytes)?;

    let mut records = Vec::new();
    for msg in &body.messages {
        if msg.type_url != RELAY_PAYMENT_TYPE_URL {
            continue;
        }

        match decode_relay_payment(&msg.value) {
            Ok(payment) => {
                for relay in payment.relays {
                    records.push(RelayRecord {
                        chain_id: relay.spec_id,
                        relay_count: relay.relay_num,
                        provider: relay.provider,
                    });
                }
            }
            Err(e) => {
                log::warn!("⚠️  Skipping undecodable relay-payment message: {}", e);
            }
        }
    }

    Ok(records)
}

/// Extract relay records from a base64 transaction string, as blocks carry them
pub fn relay_records_from_base64_tx(tx_b64: &str) -> Result<Vec<RelayRecord>, DecodeError> {
    let tx_bytes = BASE64.decode(tx_b64)?;
    relay_records_from_tx(&tx_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build the raw bytes of a transaction carrying the given messages
    fn encode_tx(messages: Vec<AnyMessage>) -> Vec<u8> {
        let body = TxBody { messages };
        let raw = TxRaw {
            body_bytes: body.encode_to_vec(),
        };
        raw.encode_to_vec()
    }

    fn relay_payment_msg(relays: Vec<(&str, u64)>) -> AnyMessage {
        let payment = MsgRelayPayment {
            creator: "lava@provider1".to_string(),
            relays: relays
                .into_iter()
                .map(|(chain, num)| RelaySession {
                    spec_id: chain.to_string(),
                    cu_sum: num * 10,
                    provider: "lava@provider1".to_string(),
                    relay_num: num,
                })
                .collect(),
        };
        AnyMessage {
            type_url: RELAY_PAYMENT_TYPE_URL.to_string(),
            value: payment.encode_to_vec(),
        }
    }

    #[test]
    fn test_extracts_relay_records() {
        let tx = encode_tx(vec![relay_payment_msg(vec![("ETH1", 42), ("COS3", 7)])]);

        let records = relay_records_from_tx(&tx).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].chain_id, "ETH1");
        assert_eq!(records[0].relay_count, 42);
        assert_eq!(records[1].chain_id, "COS3");
        assert_eq!(records[1].relay_count, 7);
    }

    #[test]
    fn test_ignores_other_message_types() {
        let other = AnyMessage {
            type_url: "/cosmos.bank.v1beta1.MsgSend".to_string(),
            value: vec![1, 2, 3],
        };
        let tx = encode_tx(vec![other, relay_payment_msg(vec![("NEAR", 3)])]);

        let records = relay_records_from_tx(&tx).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].chain_id, "NEAR");
    }

    #[test]
    fn test_empty_body_yields_no_records() {
        let tx = encode_tx(vec![]);
        assert!(relay_records_from_tx(&tx).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_tx_is_decode_error() {
        let result = relay_records_from_tx(&[0xff, 0xff, 0xff, 0xff]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_relay_payment_value_is_skipped() {
        // Type URL matches but the Any value is not a valid MsgRelayPayment;
        // the message is skipped rather than failing the transaction
        let bad = AnyMessage {
            type_url: RELAY_PAYMENT_TYPE_URL.to_string(),
            value: vec![0xff, 0xff, 0xff, 0xff],
        };
        let tx = encode_tx(vec![bad, relay_payment_msg(vec![("ETH1", 1)])]);

        let records = relay_records_from_tx(&tx).unwrap();
        assert_eq!(records.len(), 1);
    }
}
