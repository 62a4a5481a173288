//! Pool registry: pools, base pools and virtual base-lending pools.
//!
//! The registry is read-only from the swap pipeline's point of view. It is
//! loaded once from a JSON document of the form:
//!
//! ```json
//! {
//!   "pools": [{ "address": "0x..", "coins": [..], "coin_decimals": [..],
//!               "pool_type": "stable_factory", "asset_type": 2,
//!               "is_v2": false, "base_pool": "0x.." }],
//!   "base_pools": [{ "address": "0x..", "coins": [..], "coin_decimals": [..] }],
//!   "virtual_lending_pools": [{ "address": "0x..", "coins": [..], "coin_decimals": [..] }]
//! }
//! ```

use anyhow::Context;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    db::models::{AssetType, BasePool, CoinList, Pool, PoolType},
    utils::normalize_address,
};

/// Lookup of the pools a metapool or lending wrapper points at.
pub trait PoolRegistry {
    /// Literal base pool of a metapool.
    fn base_pool(&self, address: &str) -> Option<&BasePool>;
    /// Underlying-coin view of a lending pool.
    fn virtual_lending_pool(&self, address: &str) -> Option<&BasePool>;
}

/// In-memory registry keyed by lowercase address.
#[derive(Debug, Default)]
pub struct Registry {
    base_pools: FxHashMap<String, BasePool>,
    virtual_lending_pools: FxHashMap<String, BasePool>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_base_pool(&mut self, pool: BasePool) {
        self.base_pools.insert(pool.address.clone(), pool);
    }

    pub fn add_virtual_lending_pool(&mut self, pool: BasePool) {
        self.virtual_lending_pools.insert(pool.address.clone(), pool);
    }

    pub fn base_pool_count(&self) -> usize {
        self.base_pools.len() + self.virtual_lending_pools.len()
    }

    /// Parse a registry document into the registry and the pools to seed the store with.
    pub fn from_json(json: &str) -> anyhow::Result<LoadedRegistry> {
        let file: RegistryFile =
            serde_json::from_str(json).context("Failed to parse pool registry")?;

        let mut registry = Registry::new();
        for entry in file.base_pools {
            registry.add_base_pool(entry.into_base_pool()?);
        }
        for entry in file.virtual_lending_pools {
            registry.add_virtual_lending_pool(entry.into_base_pool()?);
        }

        let pools = file
            .pools
            .into_iter()
            .map(PoolEntry::into_pool)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(LoadedRegistry { registry, pools })
    }
}

impl PoolRegistry for Registry {
    fn base_pool(&self, address: &str) -> Option<&BasePool> {
        self.base_pools.get(&normalize_address(address))
    }

    fn virtual_lending_pool(&self, address: &str) -> Option<&BasePool> {
        self.virtual_lending_pools.get(&normalize_address(address))
    }
}

/// Result of loading a registry document.
pub struct LoadedRegistry {
    pub registry: Registry,
    pub pools: Vec<Pool>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    pools: Vec<PoolEntry>,
    #[serde(default)]
    base_pools: Vec<BasePoolEntry>,
    #[serde(default)]
    virtual_lending_pools: Vec<BasePoolEntry>,
}

#[derive(Debug, Deserialize)]
struct PoolEntry {
    address: String,
    #[serde(default)]
    name: Option<String>,
    coins: Vec<String>,
    coin_decimals: Vec<u8>,
    pool_type: PoolType,
    #[serde(default)]
    asset_type: u8,
    #[serde(default)]
    is_v2: bool,
    #[serde(default)]
    base_pool: Option<String>,
}

impl PoolEntry {
    fn into_pool(self) -> anyhow::Result<Pool> {
        let coins = CoinList::new(self.coins, self.coin_decimals)
            .with_context(|| format!("Invalid coin list for pool {}", self.address))?;
        anyhow::ensure!(!coins.is_empty(), "Pool {} has no coins", self.address);
        let asset_type = AssetType::try_from(self.asset_type)
            .with_context(|| format!("Invalid asset type for pool {}", self.address))?;

        let pool = Pool::new(
            &self.address,
            coins,
            self.pool_type,
            asset_type,
            self.is_v2,
            self.base_pool.as_deref(),
        );

        Ok(match self.name {
            Some(name) => pool.with_name(name),
            None => pool,
        })
    }
}

#[derive(Debug, Deserialize)]
struct BasePoolEntry {
    address: String,
    coins: Vec<String>,
    coin_decimals: Vec<u8>,
}

impl BasePoolEntry {
    fn into_base_pool(self) -> anyhow::Result<BasePool> {
        let coins = CoinList::new(self.coins, self.coin_decimals)
            .with_context(|| format!("Invalid coin list for base pool {}", self.address))?;
        Ok(BasePool::new(&self.address, coins))
    }
}
