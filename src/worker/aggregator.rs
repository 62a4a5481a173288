//! Swap snapshot aggregation.
//!
//! Every resolution (hourly, daily, weekly) goes through the same
//! get-or-create-then-add step, parameterised only by its bucket length.

use crate::db::{
    models::{SnapshotKey, SnapshotPeriod, SwapSnapshot, VolumeContribution},
    SwapStore,
};

/// Add one swap to the hourly, daily and weekly snapshots of `pool`.
pub fn record_volume<S: SwapStore + ?Sized>(
    store: &mut S,
    pool: &str,
    timestamp: u64,
    contribution: &VolumeContribution,
) {
    for period in SnapshotPeriod::ALL {
        let key = SnapshotKey::new(pool, period, timestamp);
        add_to_snapshot(store, &key, contribution);
    }
}

fn add_to_snapshot<S: SwapStore + ?Sized>(
    store: &mut S,
    key: &SnapshotKey,
    contribution: &VolumeContribution,
) {
    let mut snapshot = store
        .load_snapshot(key)
        .unwrap_or_else(|| SwapSnapshot::new(key));
    snapshot.add(contribution);
    store.save_snapshot(snapshot);
}
