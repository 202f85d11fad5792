//! Snapshot and versioning for worldbible.
//!
//! Provides point-in-time capture and restore of a world's elements and
//! chapters.
//!
//! # Features
//!
//! - **Capture**: serialize elements and chapters into a snapshot blob
//! - **Retention**: stored through `World::store_snapshot`, which keeps at most
//!   `maxSnapshots`, evicting by capture time
//! - **Restore**: all-or-nothing overwrite that first backs up the current state
//!
//! # Example
//!
//! ```text
//! let id = create_snapshot(&mut world, SnapshotRequest::new("before act II"))?;
//! // ... edits ...
//! let undo = restore_snapshot(&mut world, id)?;
//! restore_snapshot(&mut world, undo)?; // back to the edited state
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod history;
pub mod state;

pub use history::{
    AUTO_BACKUP_TAG, PRE_RESTORE_TAG, SnapshotRequest, capture, create_snapshot, list_snapshots,
    restore_snapshot,
};
pub use state::WorldState;
