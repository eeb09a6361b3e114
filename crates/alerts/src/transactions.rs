//! Transaction job: post roster moves exactly once, keyed by id.

use std::collections::{BTreeMap, BTreeSet};

use common::Transaction;
use serde::{Deserialize, Serialize};

use crate::pipeline::AlertJob;

#[derive(Debug, Clone, Default)]
pub struct TransactionSnapshot {
    pub transactions: Vec<Transaction>,
}

/// Durable record: every transaction id ever seen. Grows, never shrinks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionState {
    #[serde(default)]
    pub transaction_ids: BTreeSet<String>,
}

pub struct TransactionJob;

impl AlertJob for TransactionJob {
    type Snapshot = TransactionSnapshot;
    type State = TransactionState;
    type Event = Transaction;

    fn name(&self) -> &'static str {
        "transaction"
    }

    /// A transaction is new iff its id is unseen. Every fetched id joins
    /// the persisted set, so status edits to an old transaction never
    /// re-alert.
    fn detect(&self, snapshot: &Self::Snapshot, state: &mut Self::State) -> Vec<Self::Event> {
        snapshot
            .transactions
            .iter()
            .filter(|tx| !tx.transaction_id.is_empty())
            .filter(|tx| state.transaction_ids.insert(tx.transaction_id.clone()))
            .cloned()
            .collect()
    }

    fn format(&self, tx: &Self::Event) -> String {
        // Sorted for stable output; the wire maps are unordered.
        let adds: BTreeMap<&String, &i64> = tx.adds.iter().flatten().collect();
        let drops: BTreeMap<&String, &i64> = tx.drops.iter().flatten().collect();

        let mut msg = match tx.kind.as_str() {
            "trade" => {
                let mut msg = format!("🔄 **TRADE** (Week {})\n", tx.leg);
                msg.push_str(&format!("Status: {}\n", tx.status));
                for (player_id, roster_id) in &adds {
                    msg.push_str(&format!("  • Player {} → Roster {}\n", player_id, roster_id));
                }
                return msg;
            }
            "waiver" => {
                let mut msg = format!("📋 **WAIVER CLAIM** (Week {})\n", tx.leg);
                msg.push_str(&format!("Status: {}\n", tx.status));
                msg
            }
            "free_agent" => format!("🆓 **FREE AGENT** (Week {})\n", tx.leg),
            other => {
                let label = if other.is_empty() { "UNKNOWN" } else { other };
                let mut msg = format!("❓ **{}** (Week {})\n", label.to_uppercase(), tx.leg);
                msg.push_str(&format!("Status: {}\n", tx.status));
                return msg;
            }
        };

        for (player_id, roster_id) in &adds {
            msg.push_str(&format!(
                "  • Added: Player {} to Roster {}\n",
                player_id, roster_id
            ));
        }
        for (player_id, roster_id) in &drops {
            msg.push_str(&format!(
                "  • Dropped: Player {} from Roster {}\n",
                player_id, roster_id
            ));
        }

        msg
    }
}
