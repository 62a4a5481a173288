//! Type conversion and formatting utilities.
//!
//! Functions for converting raw on-chain integers into exact decimal amounts
//! and for encoding addresses and hashes consistently.

use alloy::primitives::{hex, U256};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use num_bigint::{BigInt, Sign};

// ============================================
// Hex Encoding
// ============================================

/// Encode bytes as a lowercase hex string with 0x prefix.
pub fn hex_encode(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Lowercase an address or hash string so map lookups are case-insensitive.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

// ============================================
// U256 Conversions
// ============================================

/// Convert alloy U256 to an arbitrary precision BigInt.
pub fn u256_to_bigint(value: U256) -> BigInt {
    let bytes: [u8; 32] = value.to_le_bytes();
    BigInt::from_bytes_le(Sign::Plus, &bytes)
}

/// Convert a raw token amount into its human-scale decimal amount.
///
/// `raw / 10^decimals`, computed exactly: the raw integer becomes the
/// unscaled value of a BigDecimal with `decimals` as its scale, so no
/// division (and no rounding) ever takes place.
///
/// # Example
/// ```ignore
/// let amount = normalize_amount(U256::from(1_000_000u64), 6); // 1.000000
/// ```
pub fn normalize_amount(raw: U256, decimals: u8) -> BigDecimal {
    BigDecimal::new(u256_to_bigint(raw), i64::from(decimals))
}

// ============================================
// Timestamps
// ============================================

/// Convert block unix seconds to a UTC datetime, or None when out of range.
pub fn timestamp_to_datetime(timestamp: u64) -> Option<DateTime<Utc>> {
    let seconds = i64::try_from(timestamp).ok()?;
    DateTime::from_timestamp(seconds, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_normalize_six_decimals() {
        let amount = normalize_amount(U256::from(1_000_000u64), 6);
        assert_eq!(amount, BigDecimal::from(1));
    }

    #[test]
    fn test_normalize_eighteen_decimals() {
        let raw = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(normalize_amount(raw, 18), BigDecimal::from_str("1.5").unwrap());
    }

    #[test]
    fn test_normalize_zero_decimals_is_identity() {
        assert_eq!(normalize_amount(U256::from(42u64), 0), BigDecimal::from(42));
    }

    #[test]
    fn test_normalize_keeps_full_precision() {
        // 2^256 - 1 has 78 digits, far beyond f64 precision
        let amount = normalize_amount(U256::MAX, 18);
        let expected = BigDecimal::from_str(
            "115792089237316195423570985008687907853269984665640564039457.584007913129639935",
        )
        .unwrap();
        assert_eq!(amount, expected);
    }

    #[test]
    fn test_normalize_sub_unit_amount() {
        let amount = normalize_amount(U256::from(1u64), 18);
        assert_eq!(amount, BigDecimal::from_str("0.000000000000000001").unwrap());
    }

    #[test]
    fn test_hex_encode_lowercase_prefixed() {
        assert_eq!(hex_encode(&[0xAB, 0x01]), "0xab01");
        assert_eq!(normalize_address(" 0xABcd "), "0xabcd");
    }

    #[test]
    fn test_timestamp_to_datetime() {
        let time = timestamp_to_datetime(1_700_000_000).unwrap();
        assert_eq!(time.timestamp(), 1_700_000_000);
        assert!(timestamp_to_datetime(u64::MAX).is_none());
        // fits in i64 but is past chrono's last representable year
        assert!(timestamp_to_datetime(i64::MAX as u64).is_none());
    }
}
