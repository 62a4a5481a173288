//! Log parsing module for exchange logs.
//!
//! Decodes raw pool logs into [`ExchangeEvent`] values, the only input the
//! swap pipeline understands. Logs with an unknown topic0 or undecodable data
//! are skipped.

use std::str::FromStr;

use alloy::{
    primitives::{hex, Bytes, LogData, B256, U256},
    sol_types::SolEvent,
};
use anyhow::Context;
use log::debug;
use serde::Deserialize;

use crate::{
    abis::{cryptoswap, stableswap},
    utils::{hex_encode, normalize_address},
};

/// A pool log as delivered by the block source, with its transaction context.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLog {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    pub block_number: u64,
    pub timestamp: u64,
    pub tx_hash: String,
    pub log_index: u32,
    #[serde(default)]
    pub gas_limit: u64,
    #[serde(default)]
    pub gas_used: Option<u64>,
}

/// One decoded exchange, stable or crypto, direct or underlying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeEvent {
    pub buyer: String,
    /// Raw coin indices as logged (int128 on stableswap pools)
    pub sold_id: i128,
    pub bought_id: i128,
    pub tokens_sold: U256,
    pub tokens_bought: U256,
    pub timestamp: u64,
    pub block_number: u64,
    pub log_index: u32,
    pub pool_address: String,
    pub tx_hash: String,
    pub gas_limit: u64,
    pub gas_used: Option<u64>,
    pub exchange_underlying: bool,
}

/// Read a JSON-lines document of raw logs. Blank lines are ignored.
pub fn read_raw_logs(jsonl: &str) -> anyhow::Result<Vec<RawLog>> {
    jsonl
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str::<RawLog>(line)
                .with_context(|| format!("Invalid raw log on line {}", n + 1))
        })
        .collect()
}

/// Decode raw logs into exchange events ordered by (block number, log index).
pub fn parse_logs(logs: impl IntoIterator<Item = RawLog>) -> Vec<ExchangeEvent> {
    let mut events: Vec<ExchangeEvent> = logs.into_iter().filter_map(|log| parse_log(&log)).collect();
    events.sort_by_key(|e| (e.block_number, e.log_index));
    events
}

/// Decode a single log, or None if it is not an exchange log.
pub fn parse_log(log: &RawLog) -> Option<ExchangeEvent> {
    let topics: Vec<B256> = log
        .topics
        .iter()
        .map(|t| B256::from_str(t))
        .collect::<Result<_, _>>()
        .ok()?;
    let data: Bytes = hex::decode(&log.data).ok()?.into();

    let log_data = LogData::new_unchecked(topics, data);
    let topic0 = *log_data.topics().first()?;

    let event = |buyer: String,
                 sold_id: i128,
                 tokens_sold: U256,
                 bought_id: i128,
                 tokens_bought: U256,
                 underlying: bool| {
        ExchangeEvent {
            buyer,
            sold_id,
            bought_id,
            tokens_sold,
            tokens_bought,
            timestamp: log.timestamp,
            block_number: log.block_number,
            log_index: log.log_index,
            pool_address: normalize_address(&log.address),
            tx_hash: normalize_address(&log.tx_hash),
            gas_limit: log.gas_limit,
            gas_used: log.gas_used,
            exchange_underlying: underlying,
        }
    };

    let decoded = match topic0 {
        t if t == stableswap::TokenExchange::SIGNATURE_HASH => {
            stableswap::TokenExchange::decode_log_data(&log_data).ok().map(|e| {
                event(
                    hex_encode(e.buyer.as_slice()),
                    e.sold_id,
                    e.tokens_sold,
                    e.bought_id,
                    e.tokens_bought,
                    false,
                )
            })
        },
        t if t == stableswap::TokenExchangeUnderlying::SIGNATURE_HASH => {
            stableswap::TokenExchangeUnderlying::decode_log_data(&log_data).ok().map(|e| {
                event(
                    hex_encode(e.buyer.as_slice()),
                    e.sold_id,
                    e.tokens_sold,
                    e.bought_id,
                    e.tokens_bought,
                    true,
                )
            })
        },
        t if t == cryptoswap::TokenExchange::SIGNATURE_HASH => {
            cryptoswap::TokenExchange::decode_log_data(&log_data).ok().map(|e| {
                event(
                    hex_encode(e.buyer.as_slice()),
                    uint_index(e.sold_id),
                    e.tokens_sold,
                    uint_index(e.bought_id),
                    e.tokens_bought,
                    false,
                )
            })
        },
        _ => return None,
    };

    if decoded.is_none() {
        debug!(
            "Skipping undecodable exchange log {}-{}",
            log.tx_hash, log.log_index
        );
    }
    decoded
}

/// uint256 coin index; anything beyond i128 is out of range for every pool.
fn uint_index(index: U256) -> i128 {
    i128::try_from(index).unwrap_or(i128::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;

    fn raw_log(address: &str, log_data: &LogData, block_number: u64, log_index: u32) -> RawLog {
        RawLog {
            address: address.to_string(),
            topics: log_data.topics().iter().map(|t| format!("{t:#x}")).collect(),
            data: hex_encode(&log_data.data),
            block_number,
            timestamp: 1_700_000_000,
            tx_hash: "0xAB".to_string(),
            log_index,
            gas_limit: 300_000,
            gas_used: Some(120_000),
        }
    }

    fn stable_exchange(sold_id: i128, bought_id: i128) -> LogData {
        stableswap::TokenExchange {
            buyer: Address::repeat_byte(0x11),
            sold_id,
            tokens_sold: U256::from(1_000_000u64),
            bought_id,
            tokens_bought: U256::from(999_000_000_000_000_000u128),
        }
        .encode_log_data()
    }

    #[test]
    fn test_parses_stable_exchange() {
        let log = raw_log("0xPOOL", &stable_exchange(0, 1), 10, 3);
        let event = parse_log(&log).unwrap();

        assert_eq!(event.pool_address, "0xpool");
        assert_eq!(event.buyer, hex_encode(Address::repeat_byte(0x11).as_slice()));
        assert_eq!(event.sold_id, 0);
        assert_eq!(event.bought_id, 1);
        assert_eq!(event.tokens_sold, U256::from(1_000_000u64));
        assert_eq!(event.tx_hash, "0xab");
        assert_eq!(event.gas_used, Some(120_000));
        assert!(!event.exchange_underlying);
    }

    #[test]
    fn test_underlying_exchange_sets_flag() {
        let data = stableswap::TokenExchangeUnderlying {
            buyer: Address::ZERO,
            sold_id: 2,
            tokens_sold: U256::from(5u64),
            bought_id: 0,
            tokens_bought: U256::from(4u64),
        }
        .encode_log_data();
        let event = parse_log(&raw_log("0xpool", &data, 1, 0)).unwrap();

        assert!(event.exchange_underlying);
        assert_eq!(event.sold_id, 2);
    }

    #[test]
    fn test_parses_crypto_exchange_indices() {
        let data = cryptoswap::TokenExchange {
            buyer: Address::ZERO,
            sold_id: U256::from(2u64),
            tokens_sold: U256::from(5u64),
            bought_id: U256::MAX,
            tokens_bought: U256::from(4u64),
        }
        .encode_log_data();
        let event = parse_log(&raw_log("0xpool", &data, 1, 0)).unwrap();

        assert_eq!(event.sold_id, 2);
        assert_eq!(event.bought_id, i128::MAX);
    }

    #[test]
    fn test_skips_unknown_topic() {
        let mut log = raw_log("0xpool", &stable_exchange(0, 1), 1, 0);
        log.topics[0] = format!("{:#x}", B256::repeat_byte(0x42));
        assert!(parse_log(&log).is_none());
    }

    #[test]
    fn test_orders_by_block_then_log_index() {
        let data = stable_exchange(0, 1);
        let logs = vec![
            raw_log("0xpool", &data, 2, 0),
            raw_log("0xpool", &data, 1, 5),
            raw_log("0xpool", &data, 1, 2),
        ];
        let order: Vec<(u64, u32)> =
            parse_logs(logs).iter().map(|e| (e.block_number, e.log_index)).collect();
        assert_eq!(order, vec![(1, 2), (1, 5), (2, 0)]);
    }

    #[test]
    fn test_reads_jsonl_skipping_blank_lines() {
        let jsonl = r#"{"address":"0xa","topics":[],"data":"0x","block_number":1,"timestamp":2,"tx_hash":"0x1","log_index":0}

{"address":"0xb","topics":[],"data":"0x","block_number":3,"timestamp":4,"tx_hash":"0x2","log_index":1,"gas_used":null}"#;
        let logs = read_raw_logs(jsonl).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1].gas_used, None);
        assert!(parse_log(&logs[0]).is_none());
    }
}
