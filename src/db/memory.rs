use rustc_hash::FxHashMap;

use crate::db::{
    models::{Pool, SnapshotKey, SwapEvent, SwapEventId, SwapSnapshot},
    SwapStore,
};

/// In-memory entity store.
///
/// Pools are keyed by lowercase address, swaps by (tx_hash, log_index) and
/// snapshots by (pool, period, bucket).
#[derive(Debug, Default)]
pub struct MemoryStore {
    pools: FxHashMap<String, Pool>,
    swaps: FxHashMap<SwapEventId, SwapEvent>,
    snapshots: FxHashMap<SnapshotKey, SwapSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with registry pools.
    pub fn with_pools(pools: impl IntoIterator<Item = Pool>) -> Self {
        let mut store = Self::default();
        for pool in pools {
            store.pools.insert(pool.address.clone(), pool);
        }
        store
    }

    pub fn swaps(&self) -> impl Iterator<Item = &SwapEvent> {
        self.swaps.values()
    }

    pub fn swap(&self, id: &SwapEventId) -> Option<&SwapEvent> {
        self.swaps.get(id)
    }

    pub fn snapshot(&self, key: &SnapshotKey) -> Option<&SwapSnapshot> {
        self.snapshots.get(key)
    }

    pub fn pool(&self, address: &str) -> Option<&Pool> {
        self.pools.get(address)
    }

    pub fn swap_count(&self) -> usize {
        self.swaps.len()
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Pools, swaps and snapshots in a stable order for export.
    pub fn sorted_entities(&self) -> (Vec<&Pool>, Vec<&SwapEvent>, Vec<&SwapSnapshot>) {
        let mut pools: Vec<&Pool> = self.pools.values().collect();
        pools.sort_by(|a, b| a.address.cmp(&b.address));

        let mut swaps: Vec<&SwapEvent> = self.swaps.values().collect();
        swaps.sort_by(|a, b| {
            (a.block_number, a.id.log_index, &a.id.tx_hash).cmp(&(
                b.block_number,
                b.id.log_index,
                &b.id.tx_hash,
            ))
        });

        let mut snapshots: Vec<&SwapSnapshot> = self.snapshots.values().collect();
        snapshots.sort_by_key(|s| s.key());

        (pools, swaps, snapshots)
    }
}

impl SwapStore for MemoryStore {
    fn load_pool(&self, address: &str) -> Option<Pool> {
        self.pools.get(address).cloned()
    }

    fn save_pool(&mut self, pool: Pool) {
        self.pools.insert(pool.address.clone(), pool);
    }

    fn save_swap(&mut self, swap: SwapEvent) {
        self.swaps.insert(swap.id.clone(), swap);
    }

    fn load_snapshot(&self, key: &SnapshotKey) -> Option<SwapSnapshot> {
        self.snapshots.get(key).cloned()
    }

    fn save_snapshot(&mut self, snapshot: SwapSnapshot) {
        self.snapshots.insert(snapshot.key(), snapshot);
    }
}
