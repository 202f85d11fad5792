//! Snapshot blob codec.
//!
//! A blob is the JSON encoding of `{elements, chapters}`, the mutable extent
//! of a world. Everything else (rules, settings, snapshots themselves) is
//! outside a snapshot.

use im::OrdMap;
use serde::{Deserialize, Serialize};
use worldbible_foundation::{ElementId, Error, Result};
use worldbible_storage::{Chapter, World, WorldElement};

/// Decoded contents of a snapshot blob.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldState {
    /// Elements by id.
    pub elements: OrdMap<ElementId, WorldElement>,
    /// Chapters in order.
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WorldStateRef<'a> {
    elements: &'a OrdMap<ElementId, WorldElement>,
    chapters: &'a [Chapter],
}

impl WorldState {
    /// Copies the current contents of `world`.
    #[must_use]
    pub fn of(world: &World) -> Self {
        Self {
            elements: world.element_map().clone(),
            chapters: world.chapters().to_vec(),
        }
    }
}

/// Encodes the elements and chapters of `world`.
///
/// # Errors
///
/// Returns `SerializationFailure` if encoding fails.
pub fn encode(world: &World) -> Result<String> {
    let state = WorldStateRef {
        elements: world.element_map(),
        chapters: world.chapters(),
    };
    serde_json::to_string(&state).map_err(|e| Error::serialization(e.to_string()))
}

/// Decodes a blob.
///
/// # Errors
///
/// Returns `SerializationFailure` if the blob is not a valid world state.
pub fn decode(blob: &str) -> Result<WorldState> {
    serde_json::from_str(blob).map_err(|e| Error::serialization(e.to_string()))
}
