pub mod memory;
pub mod models;
pub mod registry;

pub use memory::MemoryStore;
pub use registry::{PoolRegistry, Registry};

use models::{Pool, SnapshotKey, SwapEvent, SwapSnapshot};

/// Load / save access to the entities the swap pipeline reads and writes.
///
/// Pools are read-mostly (only their cumulative totals change), swaps are
/// append-only and snapshots are upserted.
pub trait SwapStore {
    fn load_pool(&self, address: &str) -> Option<Pool>;
    fn save_pool(&mut self, pool: Pool);
    fn save_swap(&mut self, swap: SwapEvent);
    fn load_snapshot(&self, key: &SnapshotKey) -> Option<SwapSnapshot>;
    fn save_snapshot(&mut self, snapshot: SwapSnapshot);
}
