use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Identity of a swap record: one per exchange log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwapEventId {
    pub tx_hash: String,
    pub log_index: u32,
}

impl SwapEventId {
    pub fn new(tx_hash: impl Into<String>, log_index: u32) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            log_index,
        }
    }
}

impl fmt::Display for SwapEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.tx_hash, self.log_index)
    }
}

impl Serialize for SwapEventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Normalized, USD-priced record of one exchange. Immutable once saved.
///
/// Primary Key: (tx_hash, log_index)
#[derive(Debug, Clone, Serialize)]
pub struct SwapEvent {
    pub id: SwapEventId,

    // Topology
    pub pool: String,
    pub token_sold: String,
    pub token_bought: String,

    // Transaction context
    pub block_number: u64,
    pub buyer: String,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: DateTime<Utc>,

    // Amounts (raw, as logged)
    pub tokens_sold: String,
    pub tokens_bought: String,

    // Amounts (decimal adjusted)
    pub amount_sold: BigDecimal,
    pub amount_bought: BigDecimal,

    // Values
    pub amount_sold_usd: BigDecimal,
    pub amount_bought_usd: BigDecimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_joins_hash_and_log_index() {
        let id = SwapEventId::new("0xabc", 7);
        assert_eq!(id.to_string(), "0xabc-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"0xabc-7\"");
    }

    #[test]
    fn test_ids_in_same_tx_differ_by_log_index() {
        assert_ne!(SwapEventId::new("0xabc", 1), SwapEventId::new("0xabc", 2));
    }
}
