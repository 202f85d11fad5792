//! Snapshot capture, restore and listing.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::info;
use worldbible_foundation::{ChapterId, Error, Result, SnapshotId};
use worldbible_storage::{Snapshot, World};

use crate::state;

/// Tag carried by snapshots taken automatically.
pub const AUTO_BACKUP_TAG: &str = "auto-backup";

/// Tag carried by the backup taken before a restore.
pub const PRE_RESTORE_TAG: &str = "pre-restore";

// =============================================================================
// Snapshot Request
// =============================================================================

/// Parameters for a new snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotRequest {
    /// Free-text description.
    pub description: String,
    /// Chapter to associate the snapshot with.
    pub chapter_id: Option<ChapterId>,
    /// Tags.
    pub tags: Vec<String>,
    /// Capture time; now when `None`.
    pub captured_at: Option<DateTime<Utc>>,
}

impl SnapshotRequest {
    /// Creates a request with a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Associates the snapshot with a chapter.
    #[must_use]
    pub fn with_chapter(mut self, chapter: ChapterId) -> Self {
        self.chapter_id = Some(chapter);
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Overrides the capture time.
    #[must_use]
    pub fn captured_at(mut self, at: DateTime<Utc>) -> Self {
        self.captured_at = Some(at);
        self
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Captures the world's elements and chapters without storing the result.
///
/// # Errors
///
/// Returns `NotFound` if the request names an absent chapter and
/// `SerializationFailure` if encoding fails.
pub fn capture(world: &World, request: SnapshotRequest) -> Result<Snapshot> {
    if let Some(chapter) = request.chapter_id {
        if world.chapter(chapter).is_none() {
            return Err(Error::not_found("chapter", chapter));
        }
    }
    Ok(Snapshot {
        id: SnapshotId::new(),
        captured_at: request.captured_at.unwrap_or_else(Utc::now),
        description: request.description,
        world_state: state::encode(world)?,
        chapter_id: request.chapter_id,
        tags: request.tags,
    })
}

/// Captures the world, appends the snapshot and enforces `maxSnapshots`.
///
/// The new snapshot itself may be evicted if it is older than every
/// retained one.
///
/// # Errors
///
/// See [`capture`].
pub fn create_snapshot(world: &mut World, request: SnapshotRequest) -> Result<SnapshotId> {
    let snapshot = capture(world, request)?;
    let id = snapshot.id;
    info!(snapshot = %id, description = %snapshot.description, "snapshot created");
    world.store_snapshot(snapshot);
    Ok(id)
}

/// Replaces the world's elements and chapters with a snapshot's, after
/// which the pre-restore state is appended as a new backup snapshot.
///
/// Returns the backup's id; restoring it undoes this restore.
///
/// # Errors
///
/// Returns `NotFound` if the snapshot is absent and `SerializationFailure`
/// if its blob cannot be decoded. The world is unchanged on error.
pub fn restore_snapshot(world: &mut World, id: SnapshotId) -> Result<SnapshotId> {
    let snapshot = world
        .snapshot(id)
        .ok_or_else(|| Error::not_found("snapshot", id))?;
    let restored = state::decode(&snapshot.world_state)?;
    let backup = capture(
        world,
        SnapshotRequest::new(format!(
            "Automatic backup before restoring \"{}\"",
            snapshot.description
        ))
        .with_tag(AUTO_BACKUP_TAG)
        .with_tag(PRE_RESTORE_TAG)
        .captured_at(backup_time(world)),
    )?;

    world.replace_contents(restored.elements, restored.chapters);
    let backup_id = backup.id;
    info!(snapshot = %id, backup = %backup_id, "snapshot restored");
    world.store_snapshot(backup);
    Ok(backup_id)
}

/// Snapshots newest first.
#[must_use]
pub fn list_snapshots(world: &World) -> Vec<&Snapshot> {
    let mut list: Vec<&Snapshot> = world.snapshots().iter().collect();
    list.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
    list
}

/// Now, or just after the newest retained snapshot if that lies ahead, so
/// the backup always outlives retention.
fn backup_time(world: &World) -> DateTime<Utc> {
    let now = Utc::now();
    world
        .snapshots()
        .iter()
        .map(|s| s.captured_at + TimeDelta::nanoseconds(1))
        .max()
        .map_or(now, |after_newest| after_newest.max(now))
}
