use std::collections::BTreeMap;

use anyhow::Context;
use bigdecimal::BigDecimal;
use log::debug;
use num_traits::Zero;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{db::models::Pool, pricing::PriceOracle, utils::normalize_address};

/// Which oracle variant a snapshot was taken for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingCurve {
    #[default]
    Stable,
    Crypto,
}

/// USD price of one pool token observed at `timestamp`.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceSnapshot {
    pub pool: String,
    pub token: String,
    pub timestamp: u64,
    pub price: BigDecimal,
    #[serde(default)]
    pub curve: PricingCurve,
}

type PriceKey = (PricingCurve, String, String);

/// Price oracle answering with the latest snapshot at or before the query time.
///
/// A token with no snapshot yet is priced at zero, so its swaps still count
/// towards token volume but add nothing to USD volume.
#[derive(Debug, Default)]
pub struct SnapshotPriceTable {
    prices: FxHashMap<PriceKey, BTreeMap<u64, BigDecimal>>,
}

impl SnapshotPriceTable {
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = PriceSnapshot>) -> Self {
        let mut table = Self::default();
        for snapshot in snapshots {
            table.insert(snapshot);
        }
        table
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let snapshots: Vec<PriceSnapshot> =
            serde_json::from_str(json).context("Failed to parse price snapshots")?;
        Ok(Self::from_snapshots(snapshots))
    }

    pub fn insert(&mut self, snapshot: PriceSnapshot) {
        let key = (
            snapshot.curve,
            normalize_address(&snapshot.pool),
            normalize_address(&snapshot.token),
        );
        self.prices
            .entry(key)
            .or_default()
            .insert(snapshot.timestamp, snapshot.price);
    }

    pub fn len(&self) -> usize {
        self.prices.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    fn latest(&self, curve: PricingCurve, pool: &Pool, token: &str, timestamp: u64) -> BigDecimal {
        let key = (curve, pool.address.clone(), normalize_address(token));
        let price = self
            .prices
            .get(&key)
            .and_then(|series| series.range(..=timestamp).next_back())
            .map(|(_, price)| price.clone());

        match price {
            Some(price) => price,
            None => {
                debug!(
                    "No {:?} price snapshot for token {} in pool {} at {}",
                    curve, token, pool.address, timestamp
                );
                BigDecimal::zero()
            },
        }
    }
}

impl PriceOracle for SnapshotPriceTable {
    fn stable_swap_price(&self, pool: &Pool, token: &str, timestamp: u64) -> BigDecimal {
        self.latest(PricingCurve::Stable, pool, token, timestamp)
    }

    fn crypto_swap_price(&self, pool: &Pool, token: &str, timestamp: u64) -> BigDecimal {
        self.latest(PricingCurve::Crypto, pool, token, timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{AssetType, CoinList, PoolType};
    use std::str::FromStr;

    fn pool(is_v2: bool) -> Pool {
        let coins = CoinList::new(vec!["0xa".into(), "0xb".into()], vec![18, 18]).unwrap();
        let pool_type = if is_v2 { PoolType::CryptoV2 } else { PoolType::Plain };
        Pool::new("0xpool", coins, pool_type, AssetType::Usd, is_v2, None)
    }

    const PRICES: &str = r#"[
        { "pool": "0xPOOL", "token": "0xA", "timestamp": 100, "price": "1.00" },
        { "pool": "0xpool", "token": "0xa", "timestamp": 200, "price": "1.02" },
        { "pool": "0xpool", "token": "0xa", "timestamp": 150, "price": "2500", "curve": "crypto" }
    ]"#;

    #[test]
    fn test_latest_snapshot_at_or_before() {
        let table = SnapshotPriceTable::from_json(PRICES).unwrap();
        let pool = pool(false);

        assert_eq!(table.stable_swap_price(&pool, "0xa", 100), BigDecimal::from(1));
        assert_eq!(table.stable_swap_price(&pool, "0xA", 199), BigDecimal::from(1));
        assert_eq!(
            table.stable_swap_price(&pool, "0xa", 10_000),
            BigDecimal::from_str("1.02").unwrap()
        );
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_missing_snapshot_prices_zero() {
        let table = SnapshotPriceTable::from_json(PRICES).unwrap();
        let pool = pool(false);

        assert!(table.stable_swap_price(&pool, "0xa", 99).is_zero());
        assert!(table.stable_swap_price(&pool, "0xb", 500).is_zero());
    }

    #[test]
    fn test_token_price_selects_variant_by_pool_design() {
        let table = SnapshotPriceTable::from_json(PRICES).unwrap();

        assert_eq!(table.token_price(&pool(true), "0xa", 160), BigDecimal::from(2500));
        assert_eq!(table.token_price(&pool(false), "0xa", 160), BigDecimal::from(1));
    }
}
