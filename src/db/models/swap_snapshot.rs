use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::Serialize;

use crate::utils::BIG_DECIMAL_TWO;

/// Bucket resolution of a swap snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPeriod {
    Hourly,
    Daily,
    Weekly,
}

impl SnapshotPeriod {
    pub const ALL: [SnapshotPeriod; 3] = [
        SnapshotPeriod::Hourly,
        SnapshotPeriod::Daily,
        SnapshotPeriod::Weekly,
    ];

    /// Bucket length in seconds.
    pub const fn seconds(self) -> u64 {
        match self {
            SnapshotPeriod::Hourly => 3_600,
            SnapshotPeriod::Daily => 86_400,
            SnapshotPeriod::Weekly => 604_800,
        }
    }

    /// Index of the bucket containing `timestamp`: floor(timestamp / length).
    pub const fn bucket(self, timestamp: u64) -> u64 {
        timestamp / self.seconds()
    }
}

/// Snapshot primary key: (pool, period, bucket index).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotKey {
    pub pool: String,
    pub period: SnapshotPeriod,
    pub bucket: u64,
}

impl SnapshotKey {
    pub fn new(pool: &str, period: SnapshotPeriod, timestamp: u64) -> Self {
        Self {
            pool: pool.to_string(),
            period,
            bucket: period.bucket(timestamp),
        }
    }

    /// First second of the bucket. Never past the timestamp the key was built from.
    pub fn start(&self) -> u64 {
        self.bucket * self.period.seconds()
    }
}

/// What one swap adds to every snapshot and to the pool totals.
///
/// `volume` is the mean of both legs so an exchange is not counted twice.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeContribution {
    pub amount_sold: BigDecimal,
    pub amount_bought: BigDecimal,
    pub amount_sold_usd: BigDecimal,
    pub amount_bought_usd: BigDecimal,
    pub volume: BigDecimal,
    pub volume_usd: BigDecimal,
}

impl VolumeContribution {
    pub fn new(
        amount_sold: BigDecimal,
        amount_bought: BigDecimal,
        amount_sold_usd: BigDecimal,
        amount_bought_usd: BigDecimal,
    ) -> Self {
        let volume = (&amount_sold + &amount_bought) / &*BIG_DECIMAL_TWO;
        let volume_usd = (&amount_sold_usd + &amount_bought_usd) / &*BIG_DECIMAL_TWO;

        Self {
            amount_sold,
            amount_bought,
            amount_sold_usd,
            amount_bought_usd,
            volume,
            volume_usd,
        }
    }
}

/// Per-pool swap activity for one hour, day or week.
///
/// Created zeroed on the first swap of its bucket, then only ever added to.
#[derive(Debug, Clone, Serialize)]
pub struct SwapSnapshot {
    // Identifiers
    pub pool: String,
    pub period: SnapshotPeriod,
    pub bucket: u64,
    /// Start of the bucket, unix seconds
    pub timestamp: u64,

    // Period metrics
    pub count: u64,
    pub amount_sold: BigDecimal,
    pub amount_bought: BigDecimal,
    pub amount_sold_usd: BigDecimal,
    pub amount_bought_usd: BigDecimal,
    pub volume: BigDecimal,
    pub volume_usd: BigDecimal,
}

impl SwapSnapshot {
    pub fn new(key: &SnapshotKey) -> Self {
        Self {
            pool: key.pool.clone(),
            period: key.period,
            bucket: key.bucket,
            timestamp: key.start(),
            count: 0,
            amount_sold: BigDecimal::zero(),
            amount_bought: BigDecimal::zero(),
            amount_sold_usd: BigDecimal::zero(),
            amount_bought_usd: BigDecimal::zero(),
            volume: BigDecimal::zero(),
            volume_usd: BigDecimal::zero(),
        }
    }

    pub fn key(&self) -> SnapshotKey {
        SnapshotKey {
            pool: self.pool.clone(),
            period: self.period,
            bucket: self.bucket,
        }
    }

    pub fn add(&mut self, contribution: &VolumeContribution) {
        self.count += 1;
        self.amount_sold += &contribution.amount_sold;
        self.amount_bought += &contribution.amount_bought;
        self.amount_sold_usd += &contribution.amount_sold_usd;
        self.amount_bought_usd += &contribution.amount_bought_usd;
        self.volume += &contribution.volume;
        self.volume_usd += &contribution.volume_usd;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(SnapshotPeriod::Hourly.bucket(3_599), 0);
        assert_eq!(SnapshotPeriod::Hourly.bucket(3_600), 1);
        assert_eq!(SnapshotPeriod::Daily.bucket(86_399), 0);
        assert_eq!(SnapshotPeriod::Daily.bucket(86_400), 1);
        assert_eq!(SnapshotPeriod::Weekly.bucket(604_799), 0);
        assert_eq!(SnapshotPeriod::Weekly.bucket(1_209_600), 2);
    }

    #[test]
    fn test_last_bucket_start_does_not_overflow() {
        for period in SnapshotPeriod::ALL {
            let key = SnapshotKey::new("0xpool", period, u64::MAX);
            assert!(u64::MAX - key.start() < period.seconds());
            assert_eq!(SwapSnapshot::new(&key).timestamp, key.start());
        }
    }

    #[test]
    fn test_contribution_averages_both_legs() {
        let c = VolumeContribution::new(dec("1"), dec("2"), dec("1.1"), dec("2.2"));
        assert_eq!(c.volume, dec("1.5"));
        assert_eq!(c.volume_usd, dec("1.65"));
    }

    #[test]
    fn test_new_snapshot_is_zeroed_at_bucket_start() {
        let key = SnapshotKey::new("0xpool", SnapshotPeriod::Daily, 1_700_000_123);
        let snapshot = SwapSnapshot::new(&key);

        assert_eq!(snapshot.count, 0);
        assert!(snapshot.volume.is_zero());
        assert_eq!(snapshot.timestamp, 1_699_920_000);
        assert_eq!(snapshot.key(), key);
    }

    #[test]
    fn test_add_accumulates_every_field() {
        let key = SnapshotKey::new("0xpool", SnapshotPeriod::Hourly, 0);
        let mut snapshot = SwapSnapshot::new(&key);
        let c = VolumeContribution::new(dec("1"), dec("3"), dec("2"), dec("4"));
        snapshot.add(&c);
        snapshot.add(&c);

        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.amount_sold, dec("2"));
        assert_eq!(snapshot.amount_bought, dec("6"));
        assert_eq!(snapshot.amount_sold_usd, dec("4"));
        assert_eq!(snapshot.amount_bought_usd, dec("8"));
        assert_eq!(snapshot.volume, dec("4"));
        assert_eq!(snapshot.volume_usd, dec("6"));
    }
}
