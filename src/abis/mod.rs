pub mod cryptoswap;
pub mod stableswap;

pub use stableswap::{TokenExchange as StableTokenExchange, TokenExchangeUnderlying};
