use bigdecimal::BigDecimal;
use log::debug;

use crate::db::models::Pool;

/// Resolved facts of one exchange handed to downstream updaters.
#[derive(Debug, Clone)]
pub struct SwapFacts<'a> {
    pub pool: &'a Pool,
    pub token_sold: &'a str,
    pub token_bought: &'a str,
    pub amount_sold: &'a BigDecimal,
    pub amount_bought: &'a BigDecimal,
    pub sold_id: i128,
    pub bought_id: i128,
    pub exchange_underlying: bool,
    pub block_number: u64,
    pub timestamp: u64,
}

/// Candle and price-feed maintenance, called once per persisted swap.
pub trait SwapNotifier {
    fn update_candles(&mut self, facts: &SwapFacts<'_>);
    fn update_price_feed(&mut self, facts: &SwapFacts<'_>);
}

/// Notifier that only traces what it is given.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl SwapNotifier for LogNotifier {
    fn update_candles(&mut self, facts: &SwapFacts<'_>) {
        debug!(
            "Candle update for pool {} at {}: {} {} -> {} {}",
            facts.pool.address,
            facts.timestamp,
            facts.amount_sold,
            facts.token_sold,
            facts.amount_bought,
            facts.token_bought
        );
    }

    fn update_price_feed(&mut self, facts: &SwapFacts<'_>) {
        debug!(
            "Price feed update for pool {} at block {}: ids {} -> {} (underlying: {})",
            facts.pool.address,
            facts.block_number,
            facts.sold_id,
            facts.bought_id,
            facts.exchange_underlying
        );
    }
}
