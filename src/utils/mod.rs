//! Utility functions for the volume indexer.
//!
//! - [`conversion`] - Type conversions (U256, BigInt, BigDecimal, timestamps, hex encoding)

mod conversion;

use bigdecimal::BigDecimal;
use once_cell::sync::Lazy;

// ============================================
// Common Constants
// ============================================

/// The Ethereum zero address (0x0000000000000000000000000000000000000000)
/// A coin slot holding it is an unset coin.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Decimal exponent forced on the sold side of some metapool underlying swaps.
pub const FORCED_SOLD_DECIMALS: u8 = 18;

pub static BIG_DECIMAL_TWO: Lazy<BigDecimal> = Lazy::new(|| BigDecimal::from(2));

// ============================================
// Re-exports
// ============================================

pub use conversion::{
    hex_encode, normalize_address, normalize_amount, timestamp_to_datetime, u256_to_bigint,
};
