//! Chapters: ordered organizational units.
//!
//! Chapters reference elements by id through `new_elements` and
//! `modified_elements`; elements point back through `appearances`. Neither
//! side owns the other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use worldbible_foundation::{ChapterId, ElementId};

/// An ordered chapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Chapter identity.
    pub id: ChapterId,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Position, 1-based.
    pub order: u32,
    /// Elements introduced in this chapter.
    #[serde(default)]
    pub new_elements: Vec<ElementId>,
    /// Elements modified in this chapter.
    #[serde(default)]
    pub modified_elements: Vec<ElementId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub modified_at: DateTime<Utc>,
}

impl Chapter {
    /// Returns true if the chapter lists `element` as new or modified.
    #[must_use]
    pub fn mentions(&self, element: ElementId) -> bool {
        self.new_elements.contains(&element) || self.modified_elements.contains(&element)
    }

    /// Drops `element` from both membership lists. Returns true if anything was removed.
    pub(crate) fn forget(&mut self, element: ElementId) -> bool {
        let before = self.new_elements.len() + self.modified_elements.len();
        self.new_elements.retain(|e| *e != element);
        self.modified_elements.retain(|e| *e != element);
        before != self.new_elements.len() + self.modified_elements.len()
    }
}

/// Partial update of a chapter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChapterPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New position; the chapter list is re-sorted when set.
    pub order: Option<u32>,
}

impl ChapterPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the position.
    #[must_use]
    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}
