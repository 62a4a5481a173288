pub mod abis;
pub mod config;
pub mod db;
pub mod error;
pub mod pricing;
pub mod utils;
pub mod worker;

pub use config::Settings;
pub use db::{MemoryStore, Registry};
pub use error::{Side, SwapError};
pub use pricing::{PriceOracle, SnapshotPriceTable};
pub use worker::{ExchangeEvent, SwapProcessor};
