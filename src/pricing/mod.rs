//! USD pricing of swapped tokens.
//!
//! The swap pipeline only consumes prices; where they come from is behind
//! [`PriceOracle`]. [`SnapshotPriceTable`] is the implementation backed by
//! pre-computed price snapshots.

mod snapshot_table;

use bigdecimal::BigDecimal;

use crate::db::models::Pool;

pub use snapshot_table::{PriceSnapshot, PricingCurve, SnapshotPriceTable};

/// USD price per unit of a pool token at a point in time.
pub trait PriceOracle {
    /// Price for a token of a stableswap (constant-sum style) pool.
    fn stable_swap_price(&self, pool: &Pool, token: &str, timestamp: u64) -> BigDecimal;

    /// Price for a token of a cryptoswap (constant-product style) pool.
    fn crypto_swap_price(&self, pool: &Pool, token: &str, timestamp: u64) -> BigDecimal;

    /// Price through the variant matching the pool design.
    fn token_price(&self, pool: &Pool, token: &str, timestamp: u64) -> BigDecimal {
        if pool.is_v2 {
            self.crypto_swap_price(pool, token, timestamp)
        } else {
            self.stable_swap_price(pool, token, timestamp)
        }
    }
}
