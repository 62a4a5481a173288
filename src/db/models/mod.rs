pub mod pool;
pub mod swap_event;
pub mod swap_snapshot;

pub use pool::{AssetType, BasePool, CoinList, CoinListMismatch, Pool, PoolType, UnknownAssetType};
pub use swap_event::{SwapEvent, SwapEventId};
pub use swap_snapshot::{SnapshotKey, SnapshotPeriod, SwapSnapshot, VolumeContribution};
