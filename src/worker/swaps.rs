use log::{debug, error, info};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::{
    db::{
        models::{SwapEvent, SwapEventId, VolumeContribution},
        PoolRegistry, SwapStore,
    },
    error::SwapError,
    pricing::PriceOracle,
    utils::{normalize_address, normalize_amount, timestamp_to_datetime},
    worker::{aggregator, ExchangeEvent, SwapFacts, SwapNotifier, TokenResolver},
};

/// Interval (in events) between progress log lines.
const PROGRESS_LOG_INTERVAL: u64 = 10_000;

/// Counters for a processing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub processed: u64,
    pub skipped_pool_not_found: u64,
    pub skipped_base_pool_not_found: u64,
    pub skipped_index_out_of_range: u64,
    pub skipped_invalid_timestamp: u64,
    pub skipped_undefined_token: u64,
}

impl ProcessStats {
    fn record_error(&mut self, err: &SwapError) {
        match err {
            SwapError::PoolNotFound { .. } => self.skipped_pool_not_found += 1,
            SwapError::BasePoolNotFound { .. } => self.skipped_base_pool_not_found += 1,
            SwapError::IndexOutOfRange { .. } => self.skipped_index_out_of_range += 1,
            SwapError::InvalidTimestamp { .. } => self.skipped_invalid_timestamp += 1,
            SwapError::UndefinedToken { .. } => self.skipped_undefined_token += 1,
        }
    }

    pub fn skipped(&self) -> u64 {
        self.skipped_pool_not_found
            + self.skipped_base_pool_not_found
            + self.skipped_index_out_of_range
            + self.skipped_invalid_timestamp
            + self.skipped_undefined_token
    }
}

/// Turns exchange events into swap records, snapshots and pool totals.
///
/// Events must be fed in (block number, log index) order. An event that
/// fails to resolve leaves every entity untouched.
pub struct SwapProcessor<S, R, O, N> {
    store: S,
    registry: R,
    oracle: O,
    notifier: N,
    rebasing_metapools: FxHashSet<String>,
    stats: ProcessStats,
}

impl<S, R, O, N> SwapProcessor<S, R, O, N>
where
    S: SwapStore,
    R: PoolRegistry,
    O: PriceOracle,
    N: SwapNotifier,
{
    pub fn new(store: S, registry: R, oracle: O, notifier: N) -> Self {
        Self {
            store,
            registry,
            oracle,
            notifier,
            rebasing_metapools: FxHashSet::default(),
            stats: ProcessStats::default(),
        }
    }

    /// Metapools whose underlying sold amounts are logged with their real decimals.
    pub fn with_rebasing_metapools<I, T>(mut self, pools: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.rebasing_metapools = pools
            .into_iter()
            .map(|p| normalize_address(p.as_ref()))
            .collect();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn stats(&self) -> &ProcessStats {
        &self.stats
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Process every event in order, logging and counting the skipped ones.
    pub fn process_all(&mut self, events: impl IntoIterator<Item = ExchangeEvent>) {
        for event in events {
            self.process(&event);

            let seen = self.stats.processed + self.stats.skipped();
            if seen % PROGRESS_LOG_INTERVAL == 0 {
                info!(
                    "Processed {} exchanges ({} skipped), last block {}",
                    seen,
                    self.stats.skipped(),
                    event.block_number
                );
            }
        }
    }

    /// Process one event. Returns false when it was skipped.
    pub fn process(&mut self, event: &ExchangeEvent) -> bool {
        match self.handle_exchange(event) {
            Ok(_) => {
                self.stats.processed += 1;
                true
            },
            Err(err) => {
                if err.is_expected() {
                    debug!("Skipping exchange at tx {}: {}", event.tx_hash, err);
                }
                self.stats.record_error(&err);
                false
            },
        }
    }

    /// Resolve, normalise, price, persist and aggregate one exchange.
    ///
    /// This is the stats-free entry point: [`ProcessStats`] is only updated
    /// by [`SwapProcessor::process`] and [`SwapProcessor::process_all`].
    pub fn handle_exchange(&mut self, event: &ExchangeEvent) -> Result<SwapEventId, SwapError> {
        let pool_address = normalize_address(&event.pool_address);
        let mut pool = self
            .store
            .load_pool(&pool_address)
            .ok_or(SwapError::PoolNotFound { pool: pool_address })?;

        let Some(time) = timestamp_to_datetime(event.timestamp) else {
            let err = SwapError::InvalidTimestamp {
                timestamp: event.timestamp,
                tx_hash: event.tx_hash.clone(),
            };
            error!("{}", err);
            return Err(err);
        };

        let tokens = TokenResolver::new(&self.registry, &self.rebasing_metapools).resolve(&pool, event)?;

        let amount_sold = normalize_amount(event.tokens_sold, tokens.sold_decimals);
        let amount_bought = normalize_amount(event.tokens_bought, tokens.bought_decimals);

        debug!("Getting token snapshot for {}", pool.address);
        let bought_price = self.oracle.token_price(&pool, &tokens.token_bought, event.timestamp);
        let sold_price = self.oracle.token_price(&pool, &tokens.token_sold, event.timestamp);
        let amount_bought_usd = &amount_bought * &bought_price;
        let amount_sold_usd = &amount_sold * &sold_price;

        let id = SwapEventId::new(event.tx_hash.clone(), event.log_index);
        self.store.save_swap(SwapEvent {
            id: id.clone(),
            pool: pool.address.clone(),
            token_sold: tokens.token_sold.clone(),
            token_bought: tokens.token_bought.clone(),
            block_number: event.block_number,
            buyer: event.buyer.clone(),
            gas_limit: event.gas_limit,
            gas_used: event.gas_used.unwrap_or(0),
            timestamp: time,
            tokens_sold: event.tokens_sold.to_string(),
            tokens_bought: event.tokens_bought.to_string(),
            amount_sold: amount_sold.clone(),
            amount_bought: amount_bought.clone(),
            amount_sold_usd: amount_sold_usd.clone(),
            amount_bought_usd: amount_bought_usd.clone(),
        });

        let facts = SwapFacts {
            pool: &pool,
            token_sold: &tokens.token_sold,
            token_bought: &tokens.token_bought,
            amount_sold: &amount_sold,
            amount_bought: &amount_bought,
            sold_id: event.sold_id,
            bought_id: event.bought_id,
            exchange_underlying: event.exchange_underlying,
            block_number: event.block_number,
            timestamp: event.timestamp,
        };
        self.notifier.update_candles(&facts);
        self.notifier.update_price_feed(&facts);

        let contribution =
            VolumeContribution::new(amount_sold, amount_bought, amount_sold_usd, amount_bought_usd);
        aggregator::record_volume(&mut self.store, &pool.address, event.timestamp, &contribution);

        pool.add_volume(&contribution.volume, &contribution.volume_usd);
        self.store.save_pool(pool);

        Ok(id)
    }
}

/// Log the end-of-run summary.
pub fn log_summary(stats: &ProcessStats) {
    info!(
        "Processed {} exchanges, skipped {} (unknown pool: {}, missing base pool: {}, bad index: {}, bad timestamp: {}, undefined token: {})",
        stats.processed,
        stats.skipped(),
        stats.skipped_pool_not_found,
        stats.skipped_base_pool_not_found,
        stats.skipped_index_out_of_range,
        stats.skipped_invalid_timestamp,
        stats.skipped_undefined_token
    );
    if stats.skipped() > stats.skipped_pool_not_found {
        error!(
            "{} exchanges on indexed pools could not be resolved",
            stats.skipped() - stats.skipped_pool_not_found
        );
    }
}
