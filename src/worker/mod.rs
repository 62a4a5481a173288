pub mod aggregator;
pub mod notifier;
pub mod parser;
pub mod resolver;
pub mod swaps;

pub use notifier::{LogNotifier, SwapFacts, SwapNotifier};
pub use parser::{parse_log, parse_logs, read_raw_logs, ExchangeEvent, RawLog};
pub use resolver::{ResolvedTokens, TokenResolver};
pub use swaps::{log_summary, ProcessStats, SwapProcessor};
