//! Snapshot retention.

use tracing::info;

use crate::snapshot::Snapshot;

/// Keeps the `max` most recently captured snapshots.
///
/// Orders by capture time, not list position: a restore appends a backup
/// that can be newer than snapshots listed after it. The sort is stable, so
/// snapshots captured at the same instant keep their relative order. The
/// survivors are left sorted oldest first. A `max` of 0 is treated as 1.
///
/// Returns the evicted snapshots, oldest first.
pub fn enforce(snapshots: &mut Vec<Snapshot>, max: usize) -> Vec<Snapshot> {
    let max = max.max(1);
    if snapshots.len() <= max {
        return Vec::new();
    }

    snapshots.sort_by_key(|s| s.captured_at);
    let excess = snapshots.len() - max;
    let evicted: Vec<Snapshot> = snapshots.drain(..excess).collect();
    for snapshot in &evicted {
        info!(snapshot = %snapshot.id, captured_at = %snapshot.captured_at, "snapshot evicted");
    }
    evicted
}
