//! World elements and the records they own.
//!
//! A [`WorldElement`] owns its outgoing [`Relationship`]s and the
//! [`Conflict`]s it reports. Counterparts are referenced by id only and may
//! dangle after a deletion; readers treat a missing counterpart as deleted.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use worldbible_foundation::{
    Attribute, CanonTier, ChapterId, ConflictId, ConflictStatus, ElementId, ElementKind, Severity,
};

// =============================================================================
// Relationship
// =============================================================================

/// A directed, typed edge owned by its source element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Element this edge points at.
    pub target_id: ElementId,
    /// Free-text relationship label ("parent", "located in", ...).
    #[serde(rename = "type")]
    pub rel_type: String,
    /// Optional free-text description; empty when absent.
    #[serde(default)]
    pub description: String,
}

impl Relationship {
    /// Creates a relationship.
    #[must_use]
    pub fn new(target_id: ElementId, rel_type: impl Into<String>) -> Self {
        Self {
            target_id,
            rel_type: rel_type.into(),
            description: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Case-insensitive substring match against the label.
    #[must_use]
    pub fn label_contains(&self, needle: &str) -> bool {
        self.rel_type.to_lowercase().contains(&needle.to_lowercase())
    }
}

// =============================================================================
// Conflict
// =============================================================================

/// A recorded candidate contradiction, owned by the reporting element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// Conflict identity.
    pub id: ConflictId,
    /// The other side of the contradiction.
    pub with_element_id: ElementId,
    /// Human-readable description.
    pub description: String,
    /// Lifecycle status.
    pub status: ConflictStatus,
    /// Resolution narrative, set only when resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// When the conflict was detected.
    pub detected_at: DateTime<Utc>,
    /// When the conflict was resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    /// Detected severity.
    #[serde(default)]
    pub severity: Severity,
}

impl Conflict {
    /// Creates a fresh unresolved conflict.
    #[must_use]
    pub fn unresolved(
        with_element_id: ElementId,
        description: impl Into<String>,
        severity: Severity,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ConflictId::new(),
            with_element_id,
            description: description.into(),
            status: ConflictStatus::Unresolved,
            resolution: None,
            detected_at,
            resolved_at: None,
            severity,
        }
    }
}

// =============================================================================
// WorldElement
// =============================================================================

/// A typed narrative element.
///
/// Fields are public for reading; all writes go through
/// [`World`](crate::World) so that `version` and `modified_at` stay honest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldElement {
    /// Immutable identity.
    pub id: ElementId,
    /// Immutable kind.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Kind-specific attributes.
    #[serde(rename = "properties", default)]
    pub attributes: BTreeMap<String, Attribute>,
    /// How authoritative this element is.
    #[serde(default)]
    pub canon_tier: CanonTier,
    /// Chapters this element appears in, in order.
    #[serde(default)]
    pub appearances: Vec<ChapterId>,
    /// Outgoing relationships, in insertion order.
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub modified_at: DateTime<Utc>,
    /// Mutation counter, starting at 1.
    pub version: u64,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Author notes.
    #[serde(default)]
    pub notes: String,
    /// Conflicts this element reports.
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
    /// Optional illustration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl WorldElement {
    /// Looks up an attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key)
    }

    /// Returns a text attribute, if present and textual.
    #[must_use]
    pub fn text_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Attribute::as_text)
    }

    /// Returns a list attribute, or an empty slice.
    #[must_use]
    pub fn list_attribute(&self, key: &str) -> &[String] {
        self.attributes
            .get(key)
            .and_then(Attribute::as_list)
            .unwrap_or_default()
    }

    /// Looks up one of this element's conflicts.
    #[must_use]
    pub fn conflict(&self, id: ConflictId) -> Option<&Conflict> {
        self.conflicts.iter().find(|c| c.id == id)
    }

    /// Iterates relationships pointing at `target`.
    pub fn relationships_to(&self, target: ElementId) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .iter()
            .filter(move |r| r.target_id == target)
    }

    /// Returns true if this element reports any unresolved conflict.
    #[must_use]
    pub fn has_unresolved_conflicts(&self) -> bool {
        self.conflicts
            .iter()
            .any(|c| c.status == ConflictStatus::Unresolved)
    }

    pub(crate) fn bump(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.modified_at = now;
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Input for creating an element.
#[derive(Clone, Debug, PartialEq)]
pub struct NewElement {
    /// Kind of the new element.
    pub kind: ElementKind,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Canon tier; the world's default when `None`.
    pub canon_tier: Option<CanonTier>,
    /// Attributes, validated against the kind's schema.
    pub attributes: BTreeMap<String, Attribute>,
    /// Chapter appearances.
    pub appearances: Vec<ChapterId>,
    /// Tags.
    pub tags: BTreeSet<String>,
    /// Notes.
    pub notes: String,
    /// Illustration.
    pub image_url: Option<String>,
}

impl NewElement {
    /// Starts a new element of the given kind.
    #[must_use]
    pub fn new(kind: ElementKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: String::new(),
            canon_tier: None,
            attributes: BTreeMap::new(),
            appearances: Vec::new(),
            tags: BTreeSet::new(),
            notes: String::new(),
            image_url: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the canon tier.
    #[must_use]
    pub fn with_canon_tier(mut self, tier: CanonTier) -> Self {
        self.canon_tier = Some(tier);
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Attribute>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Adds a chapter appearance.
    #[must_use]
    pub fn with_appearance(mut self, chapter: ChapterId) -> Self {
        self.appearances.push(chapter);
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Sets the illustration.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// Partial update of an element. `None` fields are left untouched.
///
/// Identity, kind, creation time and version are not patchable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New canon tier.
    pub canon_tier: Option<CanonTier>,
    /// Replacement attribute map.
    pub attributes: Option<BTreeMap<String, Attribute>>,
    /// Replacement tag set.
    pub tags: Option<BTreeSet<String>>,
    /// Replacement appearance list.
    pub appearances: Option<Vec<ChapterId>>,
    /// New illustration; `Some(None)` clears it.
    pub image_url: Option<Option<String>>,
}

impl ElementPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the notes.
    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Sets the canon tier.
    #[must_use]
    pub fn canon_tier(mut self, tier: CanonTier) -> Self {
        self.canon_tier = Some(tier);
        self
    }

    /// Replaces the attribute map.
    #[must_use]
    pub fn attributes(mut self, attributes: BTreeMap<String, Attribute>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Replaces the tag set.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the appearance list.
    #[must_use]
    pub fn appearances(mut self, appearances: Vec<ChapterId>) -> Self {
        self.appearances = Some(appearances);
        self
    }

    /// Sets or clears the illustration.
    #[must_use]
    pub fn image_url(mut self, url: Option<String>) -> Self {
        self.image_url = Some(url);
        self
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, element: &mut WorldElement) {
        if let Some(name) = self.name {
            element.name = name;
        }
        if let Some(description) = self.description {
            element.description = description;
        }
        if let Some(notes) = self.notes {
            element.notes = notes;
        }
        if let Some(tier) = self.canon_tier {
            element.canon_tier = tier;
        }
        if let Some(attributes) = self.attributes {
            element.attributes = attributes;
        }
        if let Some(tags) = self.tags {
            element.tags = tags;
        }
        if let Some(appearances) = self.appearances {
            element.appearances = appearances;
        }
        if let Some(url) = self.image_url {
            element.image_url = url;
        }
    }
}
