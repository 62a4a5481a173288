use std::fs;

use anyhow::Context;
use jemallocator::Jemalloc;
use log::{info, warn};
use serde::Serialize;
use simple_logger::SimpleLogger;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use curve_volume::{
    db::models::{Pool, SwapEvent, SwapSnapshot},
    worker::{log_summary, parse_logs, read_raw_logs, LogNotifier, ProcessStats},
    MemoryStore, Registry, Settings, SnapshotPriceTable, SwapProcessor,
};

/// Everything written to the output file.
#[derive(Serialize)]
struct VolumeExport<'a> {
    stats: &'a ProcessStats,
    pools: Vec<&'a Pool>,
    swaps: Vec<&'a SwapEvent>,
    snapshots: Vec<&'a SwapSnapshot>,
}

fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new()
        .context("Failed to load config.yaml. Please ensure it exists and is valid")?;

    SimpleLogger::new()
        .with_level(settings.logging.level_filter())
        .init()
        .context("Failed to initialise logger")?;

    let indexer = &settings.indexer;

    let registry_json = fs::read_to_string(&indexer.registry_path)
        .with_context(|| format!("Failed to read registry {}", indexer.registry_path))?;
    let loaded = Registry::from_json(&registry_json)?;
    info!(
        "Loaded {} pools and {} base pools from {}",
        loaded.pools.len(),
        loaded.registry.base_pool_count(),
        indexer.registry_path
    );

    let prices_json = fs::read_to_string(&indexer.prices_path)
        .with_context(|| format!("Failed to read prices {}", indexer.prices_path))?;
    let prices = SnapshotPriceTable::from_json(&prices_json)?;
    if prices.is_empty() {
        warn!("No price snapshots in {}, USD volumes will be zero", indexer.prices_path);
    } else {
        info!("Loaded {} price snapshots", prices.len());
    }

    let logs_jsonl = fs::read_to_string(&indexer.logs_path)
        .with_context(|| format!("Failed to read logs {}", indexer.logs_path))?;
    let raw_logs = read_raw_logs(&logs_jsonl)?;
    let raw_count = raw_logs.len();
    let events = parse_logs(raw_logs);
    info!("Decoded {} exchanges from {} logs", events.len(), raw_count);

    let store = MemoryStore::with_pools(loaded.pools);
    let mut processor = SwapProcessor::new(store, loaded.registry, prices, LogNotifier)
        .with_rebasing_metapools(&indexer.rebasing_factory_metapools);

    processor.process_all(events);
    log_summary(processor.stats());

    let stats = processor.stats().clone();
    let store = processor.into_store();
    let (pools, swaps, snapshots) = store.sorted_entities();
    let export = VolumeExport {
        stats: &stats,
        pools,
        swaps,
        snapshots,
    };

    let json = serde_json::to_string_pretty(&export).context("Failed to serialise output")?;
    fs::write(&indexer.output_path, json)
        .with_context(|| format!("Failed to write {}", indexer.output_path))?;

    info!(
        "Wrote {} swaps and {} snapshots to {}",
        store.swap_count(),
        store.snapshot_count(),
        indexer.output_path
    );
    Ok(())
}
