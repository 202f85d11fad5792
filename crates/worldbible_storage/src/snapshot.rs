//! Snapshot records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use worldbible_foundation::{ChapterId, SnapshotId};

/// A point-in-time capture of a world's elements and chapters.
///
/// `world_state` is an opaque blob produced and consumed by the timeline
/// crate; storage never looks inside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Snapshot identity.
    pub id: SnapshotId,
    /// Capture time; retention orders by this, not by list position.
    #[serde(rename = "date")]
    pub captured_at: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
    /// Serialized elements and chapters.
    pub world_state: String,
    /// Optional chapter association.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<ChapterId>,
    /// Tags, e.g. `auto-backup`.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Snapshot {
    /// Returns true if the snapshot carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
