use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::Serialize;
use thiserror::Error;

use crate::utils::normalize_address;

/// Pool family, deciding how underlying coin indices are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolType {
    /// Plain stableswap pool, coins indexed directly
    Plain,
    /// Pool holding lending-wrapped coins (cTokens, aTokens, yTokens)
    Lending,
    /// Stableswap factory pool, possibly a metapool over a base pool
    StableFactory,
    /// Any other factory deployment
    Factory,
    /// Constant-product (cryptoswap) pool
    CryptoV2,
}

/// Asset class of a pool, as recorded by the registry (integer code 0..=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Usd,
    Eth,
    Btc,
    Other,
    Crypto,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown asset type code {0}")]
pub struct UnknownAssetType(pub u8);

impl TryFrom<u8> for AssetType {
    type Error = UnknownAssetType;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AssetType::Usd),
            1 => Ok(AssetType::Eth),
            2 => Ok(AssetType::Btc),
            3 => Ok(AssetType::Other),
            4 => Ok(AssetType::Crypto),
            other => Err(UnknownAssetType(other)),
        }
    }
}

impl AssetType {
    pub fn code(self) -> u8 {
        match self {
            AssetType::Usd => 0,
            AssetType::Eth => 1,
            AssetType::Btc => 2,
            AssetType::Other => 3,
            AssetType::Crypto => 4,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("coin list has {coins} coins but {decimals} decimals")]
pub struct CoinListMismatch {
    pub coins: usize,
    pub decimals: usize,
}

/// Ordered coins of a pool with their decimal exponents.
///
/// Index `i` of `coins` and index `i` of `coin_decimals` always describe the
/// same token; the constructor refuses lists of different lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinList {
    coins: Vec<String>,
    coin_decimals: Vec<u8>,
}

impl CoinList {
    pub fn new(coins: Vec<String>, coin_decimals: Vec<u8>) -> Result<Self, CoinListMismatch> {
        if coins.len() != coin_decimals.len() {
            return Err(CoinListMismatch {
                coins: coins.len(),
                decimals: coin_decimals.len(),
            });
        }

        Ok(Self {
            coins: coins.iter().map(|c| normalize_address(c)).collect(),
            coin_decimals,
        })
    }

    /// Token address and decimals at `index`, or None when out of range.
    pub fn get(&self, index: usize) -> Option<(&str, u8)> {
        let coin = self.coins.get(index)?;
        Some((coin.as_str(), self.coin_decimals[index]))
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}

/// Liquidity pool metadata and all-time volume totals.
///
/// Primary Key: address
/// Owned by the registry; only the cumulative fields are written here.
#[derive(Debug, Clone, Serialize)]
pub struct Pool {
    // Primary key
    pub address: String,
    pub name: Option<String>,

    // Topology
    pub coins: CoinList,
    pub pool_type: PoolType,
    pub asset_type: AssetType,
    pub is_v2: bool,
    /// Base pool (metapools) or lending wrapper reference used for underlying swaps
    pub base_pool: Option<String>,

    // Lifetime stats
    pub cumulative_volume: BigDecimal,
    pub cumulative_volume_usd: BigDecimal,
}

impl Pool {
    pub fn new(
        address: &str,
        coins: CoinList,
        pool_type: PoolType,
        asset_type: AssetType,
        is_v2: bool,
        base_pool: Option<&str>,
    ) -> Self {
        Self {
            address: normalize_address(address),
            name: None,
            coins,
            pool_type,
            asset_type,
            is_v2,
            base_pool: base_pool.map(normalize_address),
            cumulative_volume: BigDecimal::zero(),
            cumulative_volume_usd: BigDecimal::zero(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Fold one swap's averaged volume into the all-time totals.
    pub fn add_volume(&mut self, volume: &BigDecimal, volume_usd: &BigDecimal) {
        self.cumulative_volume += volume;
        self.cumulative_volume_usd += volume_usd;
    }
}

/// Pool referenced by a metapool or lending wrapper for underlying swaps.
///
/// Virtual base-lending pools share this shape: they list the underlying
/// coins of a lending pool even when no such pool exists on chain.
#[derive(Debug, Clone, Serialize)]
pub struct BasePool {
    pub address: String,
    pub coins: CoinList,
}

impl BasePool {
    pub fn new(address: &str, coins: CoinList) -> Self {
        Self {
            address: normalize_address(address),
            coins,
        }
    }
}
