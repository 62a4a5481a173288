//! Token resolution for exchange events.
//!
//! An exchange only carries coin indices. Which token an index designates
//! depends on the pool family and on whether the exchange was made in the
//! pool's underlying coins:
//!
//! - underlying swap on a lending pool: index into the virtual base-lending
//!   pool (the unwrapped coins)
//! - underlying swap on any other pool with a non-zero index: `index - 1`
//!   into the base pool (index 0 is the metapool's own coin)
//! - everything else: index into the pool's own coins

use log::error;
use rustc_hash::FxHashSet;

use crate::{
    db::{
        models::{AssetType, CoinList, Pool, PoolType},
        PoolRegistry,
    },
    error::{Side, SwapError},
    utils::{FORCED_SOLD_DECIMALS, ZERO_ADDRESS},
    worker::ExchangeEvent,
};

/// Tokens and decimal exponents of both legs of an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTokens {
    pub token_sold: String,
    pub sold_decimals: u8,
    pub token_bought: String,
    pub bought_decimals: u8,
}

/// Where the coin list for one side of an exchange comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoinSource {
    Pool,
    BasePool,
    VirtualLendingPool,
}

impl CoinSource {
    fn for_index(pool_type: PoolType, underlying: bool, index: i128) -> Self {
        if !underlying {
            return CoinSource::Pool;
        }
        match pool_type {
            PoolType::Lending => CoinSource::VirtualLendingPool,
            PoolType::Plain | PoolType::StableFactory | PoolType::Factory | PoolType::CryptoV2 => {
                if index != 0 {
                    CoinSource::BasePool
                } else {
                    CoinSource::Pool
                }
            },
        }
    }
}

/// Resolves coin indices to token addresses and decimals.
pub struct TokenResolver<'a, R: PoolRegistry> {
    registry: &'a R,
    rebasing_metapools: &'a FxHashSet<String>,
}

impl<'a, R: PoolRegistry> TokenResolver<'a, R> {
    pub fn new(registry: &'a R, rebasing_metapools: &'a FxHashSet<String>) -> Self {
        Self {
            registry,
            rebasing_metapools,
        }
    }

    /// Resolve both legs of `event` on `pool`.
    ///
    /// The sold side is resolved and checked first; any failure aborts the
    /// whole exchange.
    pub fn resolve(&self, pool: &Pool, event: &ExchangeEvent) -> Result<ResolvedTokens, SwapError> {
        let (token_sold, sold_decimals) = self.resolve_side(pool, event, Side::Sold)?;
        let (token_bought, bought_decimals) = self.resolve_side(pool, event, Side::Bought)?;

        Ok(ResolvedTokens {
            token_sold,
            sold_decimals,
            token_bought,
            bought_decimals,
        })
    }

    fn resolve_side(
        &self,
        pool: &Pool,
        event: &ExchangeEvent,
        side: Side,
    ) -> Result<(String, u8), SwapError> {
        let index = match side {
            Side::Sold => event.sold_id,
            Side::Bought => event.bought_id,
        };

        let source = CoinSource::for_index(pool.pool_type, event.exchange_underlying, index);
        let (coins, offset) = match source {
            CoinSource::Pool => (&pool.coins, Some(index)),
            CoinSource::BasePool => (self.base_pool_coins(pool, event)?, index.checked_sub(1)),
            CoinSource::VirtualLendingPool => (self.lending_pool_coins(pool, event)?, Some(index)),
        };

        let Some((token, mut decimals)) = offset.and_then(|offset| lookup(coins, offset)) else {
            let err = SwapError::IndexOutOfRange {
                side,
                pool: pool.address.clone(),
                index,
                tx_hash: event.tx_hash.clone(),
            };
            error!("{}", err);
            return Err(err);
        };

        if side == Side::Sold
            && source == CoinSource::BasePool
            && self.forces_sold_decimals(pool, event.bought_id)
        {
            decimals = FORCED_SOLD_DECIMALS;
        }

        if token == ZERO_ADDRESS {
            let err = SwapError::UndefinedToken {
                side,
                pool: pool.address.clone(),
                tx_hash: event.tx_hash.clone(),
            };
            error!("{}", err);
            return Err(err);
        }

        Ok((token.to_string(), decimals))
    }

    /// USD and BTC stable-factory metapools log the underlying sold amount
    /// with 18 decimals when buying the metapool's own coin, whatever the
    /// base coin's real decimals. Rebasing metapools do not.
    fn forces_sold_decimals(&self, pool: &Pool, bought_id: i128) -> bool {
        matches!(pool.asset_type, AssetType::Usd | AssetType::Btc)
            && pool.pool_type == PoolType::StableFactory
            && bought_id == 0
            && !self.rebasing_metapools.contains(&pool.address)
    }

    fn base_pool_coins(&self, pool: &Pool, event: &ExchangeEvent) -> Result<&'a CoinList, SwapError> {
        pool.base_pool
            .as_deref()
            .and_then(|address| self.registry.base_pool(address))
            .map(|base| &base.coins)
            .ok_or_else(|| base_pool_not_found(pool, event))
    }

    fn lending_pool_coins(&self, pool: &Pool, event: &ExchangeEvent) -> Result<&'a CoinList, SwapError> {
        pool.base_pool
            .as_deref()
            .and_then(|address| self.registry.virtual_lending_pool(address))
            .map(|base| &base.coins)
            .ok_or_else(|| base_pool_not_found(pool, event))
    }
}

fn lookup(coins: &CoinList, index: i128) -> Option<(&str, u8)> {
    let index = usize::try_from(index).ok()?;
    coins.get(index)
}

fn base_pool_not_found(pool: &Pool, event: &ExchangeEvent) -> SwapError {
    let err = SwapError::BasePoolNotFound {
        pool: pool.address.clone(),
        base_pool: pool.base_pool.clone(),
        tx_hash: event.tx_hash.clone(),
    };
    error!("{}", err);
    err
}
