//! Per-block aggregation of relay records into a chain map

use crate::codec::RelayRecord;
use indexmap::IndexMap;

/// Per-chain relay counts, insertion-ordered
///
/// Insertion order matters downstream: ranking breaks count ties by the order
/// chains were first seen, so the map must not reshuffle its keys.
pub type ChainMap = IndexMap<String, u64>;

/// Reduce one block's relay records into a per-chain count map
///
/// Chains absent from the input are absent from the output (no zero-fill).
/// An empty input yields an empty map. Pure function, never fails.
pub fn aggregate_block(records: &[RelayRecord]) -> ChainMap {
    let mut map = ChainMap::new();
    for record in records {
        *map.entry(record.chain_id.clone()).or_insert(0) += record.relay_count;
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(chain: &str, count: u64) -> RelayRecord {
        RelayRecord {
            chain_id: chain.to_string(),
            relay_count: count,
            provider: "lava@provider1".to_string(),
        }
    }

    #[test]
    fn test_sums_per_chain() {
        let records = vec![
            record("ETH1", 10),
            record("COS3", 4),
            record("ETH1", 5),
        ];

        let map = aggregate_block(&records);

        assert_eq!(map.len(), 2);
        assert_eq!(map["ETH1"], 15);
        assert_eq!(map["COS3"], 4);
    }

    #[test]
    fn test_empty_input_empty_output() {
        assert!(aggregate_block(&[]).is_empty());
    }

    #[test]
    fn test_preserves_first_seen_order() {
        let records = vec![record("COS3", 1), record("ETH1", 1), record("COS3", 1)];

        let map = aggregate_block(&records);
        let keys: Vec<&String> = map.keys().collect();

        assert_eq!(keys, ["COS3", "ETH1"]);
    }

    #[test]
    fn test_zero_count_records_kept() {
        // A chain that served zero relays still appears; no error, no filtering
        let map = aggregate_block(&[record("NEAR", 0)]);
        assert_eq!(map["NEAR"], 0);
    }
}
