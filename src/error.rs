use std::fmt;

use thiserror::Error;

/// Which leg of an exchange an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Sold,
    Bought,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Sold => f.write_str("sold"),
            Side::Bought => f.write_str("bought"),
        }
    }
}

/// Reasons a single exchange event is skipped.
///
/// None of these are fatal: the event is dropped without touching any
/// entity and processing continues with the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Pool {pool} is not indexed")]
    PoolNotFound { pool: String },

    #[error("Base pool {base_pool:?} of pool {pool} not found at tx {tx_hash}")]
    BasePoolNotFound {
        pool: String,
        base_pool: Option<String>,
        tx_hash: String,
    },

    #[error("Undefined {side} id {index} for pool {pool} at tx {tx_hash}")]
    IndexOutOfRange {
        side: Side,
        pool: String,
        index: i128,
        tx_hash: String,
    },

    #[error("Timestamp {timestamp} of tx {tx_hash} is out of range")]
    InvalidTimestamp { timestamp: u64, tx_hash: String },

    #[error("Undefined {side} token for pool {pool} at tx {tx_hash}")]
    UndefinedToken {
        side: Side,
        pool: String,
        tx_hash: String,
    },
}

impl SwapError {
    /// Only an unknown pool is expected in normal operation.
    pub fn is_expected(&self) -> bool {
        matches!(self, SwapError::PoolNotFound { .. })
    }
}
