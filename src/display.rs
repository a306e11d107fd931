//! Presentation boundary - leaderboard formatting
//!
//! The core ranks opaque chain ids; mapping an id to a human-readable name is a
//! lookup table injected here, never consulted inside the pipeline.

use crate::pipeline::RankedRow;
use std::collections::HashMap;

/// Injected `chain id -> display name` lookup
///
/// Unknown ids fall back to the raw id.
#[derive(Debug, Clone, Default)]
pub struct ChainNames {
    names: HashMap<String, String>,
}

impl ChainNames {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            names: pairs
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
        }
    }

    pub fn display_name<'a>(&'a self, chain_id: &'a str) -> &'a str {
        self.names.get(chain_id).map(String::as_str).unwrap_or(chain_id)
    }
}

/// Render the ranked rows as a plain text table
pub fn render_leaderboard(rows: &[RankedRow], names: &ChainNames) -> String {
    let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    let mut out = String::new();
    out.push_str(&format!("Top chains by relays (updated {})\n", now));
    out.push_str(&format!("{:<4} {:<24} {:>12}\n", "#", "CHAIN", "RELAYS"));

    if rows.is_empty() {
        out.push_str("(no relay activity in window)\n");
        return out;
    }

    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<24} {:>12}\n",
            i + 1,
            names.display_name(&row.chain_id),
            row.total_relays
        ));
    }
    out
}
