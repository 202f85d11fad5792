//! The World aggregate.
//!
//! A `World` owns the element map, chapters, snapshots, rules and settings of
//! one world bible. Every mutation is a method on `World` so that element
//! versions, timestamps and referential cleanup stay consistent.
//!
//! Elements live in a persistent ordered map: cloning a world is O(1) and
//! iteration order is the id order, which keeps analysis and serialization
//! deterministic.

use chrono::{DateTime, Utc};
use im::OrdMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use worldbible_foundation::{
    ChapterId, ConflictId, ConflictStatus, ElementId, ElementKind, Error, Result, RuleId,
    Severity, SnapshotId, TemplateId, WorldId,
};

use crate::brief::{BriefSection, BriefTemplate, BriefTemplatePatch, validate_sections};
use crate::chapter::{Chapter, ChapterPatch};
use crate::element::{Conflict, ElementPatch, NewElement, Relationship, WorldElement};
use crate::retention;
use crate::rule::{RulePatch, WorldRule};
use crate::schema::validate_attributes;
use crate::settings::{SettingsPatch, WorldSettings};
use crate::snapshot::Snapshot;

/// Summary of a world for listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldMetadata {
    /// World identity.
    pub id: WorldId,
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Number of elements.
    pub elements_count: usize,
    /// Number of chapters.
    pub chapters_count: usize,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub modified_at: DateTime<Utc>,
    /// Last time the world was opened.
    pub last_opened_at: DateTime<Utc>,
}

/// The aggregate root of a world bible.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    id: WorldId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    elements: OrdMap<ElementId, WorldElement>,
    #[serde(default)]
    chapters: Vec<Chapter>,
    #[serde(default)]
    snapshots: Vec<Snapshot>,
    #[serde(default)]
    rules: Vec<WorldRule>,
    #[serde(default)]
    brief_templates: Vec<BriefTemplate>,
    #[serde(default)]
    settings: WorldSettings,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    last_opened_at: DateTime<Utc>,
}

impl World {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Creates an empty world with default settings.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: WorldId::new(),
            name: name.into(),
            description: description.into(),
            elements: OrdMap::new(),
            chapters: Vec::new(),
            snapshots: Vec::new(),
            rules: Vec::new(),
            brief_templates: Vec::new(),
            settings: WorldSettings::default(),
            created_at: now,
            modified_at: now,
            last_opened_at: now,
        }
    }

    /// Returns the world id.
    #[must_use]
    pub fn id(&self) -> WorldId {
        self.id
    }

    /// Returns the world name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the world description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification time.
    #[must_use]
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Returns the last time the world was opened.
    #[must_use]
    pub fn last_opened_at(&self) -> DateTime<Utc> {
        self.last_opened_at
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Returns a listing summary.
    #[must_use]
    pub fn metadata(&self) -> WorldMetadata {
        WorldMetadata {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            elements_count: self.elements.len(),
            chapters_count: self.chapters.len(),
            created_at: self.created_at,
            modified_at: self.modified_at,
            last_opened_at: self.last_opened_at,
        }
    }

    /// Renames or re-describes the world.
    pub fn update_properties(&mut self, name: Option<String>, description: Option<String>) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        self.modified_at = Utc::now();
    }

    /// Records that the world was opened.
    pub fn touch_opened(&mut self) {
        self.last_opened_at = Utc::now();
    }

    /// Applies a settings patch.
    ///
    /// Lowering `maxSnapshots` evicts the oldest snapshots immediately.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for out-of-range values; nothing changes then.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<()> {
        patch.apply(&mut self.settings)?;
        retention::enforce(&mut self.snapshots, self.settings.max_snapshots);
        self.modified_at = Utc::now();
        Ok(())
    }

    // =========================================================================
    // Element queries
    // =========================================================================

    /// Checks if an element exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Looks up an element.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&WorldElement> {
        self.elements.get(&id)
    }

    /// Looks up an element, failing if absent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no element has this id.
    pub fn get_element(&self, id: ElementId) -> Result<&WorldElement> {
        self.elements
            .get(&id)
            .ok_or_else(|| Error::not_found("element", id))
    }

    /// Iterates all elements in id order.
    pub fn elements(&self) -> impl Iterator<Item = &WorldElement> + '_ {
        self.elements.values()
    }

    /// Iterates all element ids in order.
    pub fn element_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.keys().copied()
    }

    /// Iterates elements of one kind.
    pub fn elements_of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &WorldElement> + '_ {
        self.elements.values().filter(move |e| e.kind == kind)
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Returns the element map.
    #[must_use]
    pub fn element_map(&self) -> &OrdMap<ElementId, WorldElement> {
        &self.elements
    }

    /// Iterates relationships anywhere in the world that point at `target`.
    pub fn incoming(
        &self,
        target: ElementId,
    ) -> impl Iterator<Item = (&WorldElement, &Relationship)> + '_ {
        self.elements.values().flat_map(move |source| {
            source
                .relationships
                .iter()
                .filter(move |r| r.target_id == target)
                .map(move |r| (source, r))
        })
    }

    /// Lists every unresolved conflict with its reporting element.
    #[must_use]
    pub fn unresolved_conflicts(&self) -> Vec<(ElementId, &Conflict)> {
        self.elements
            .values()
            .flat_map(|e| {
                e.conflicts
                    .iter()
                    .filter(|c| c.status == ConflictStatus::Unresolved)
                    .map(move |c| (e.id, c))
            })
            .collect()
    }

    // =========================================================================
    // Element mutations
    // =========================================================================

    /// Creates an element and returns its fresh id.
    ///
    /// The new element starts at version 1 with no relationships or conflicts.
    /// Omitted canon tier falls back to the world default.
    ///
    /// # Errors
    ///
    /// Returns `SchemaViolation` if an attribute does not fit the kind's schema.
    pub fn create_element(&mut self, new_element: NewElement) -> Result<ElementId> {
        validate_attributes(new_element.kind, &new_element.attributes)?;

        let now = Utc::now();
        let id = ElementId::new();
        let element = WorldElement {
            id,
            kind: new_element.kind,
            name: new_element.name,
            description: new_element.description,
            attributes: new_element.attributes,
            canon_tier: new_element
                .canon_tier
                .unwrap_or(self.settings.default_canon_tier),
            appearances: new_element.appearances,
            relationships: Vec::new(),
            created_at: now,
            modified_at: now,
            version: 1,
            tags: new_element.tags,
            notes: new_element.notes,
            conflicts: Vec::new(),
            image_url: new_element.image_url,
        };
        debug!(element = %id, kind = %element.kind, name = %element.name, "element created");
        self.elements.insert(id, element);
        self.modified_at = now;
        Ok(id)
    }

    /// Applies a partial update to an element.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the element is absent, or `SchemaViolation` if
    /// replacement attributes do not fit the kind's schema.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> Result<()> {
        let kind = self.get_element(id)?.kind;
        if let Some(attributes) = &patch.attributes {
            validate_attributes(kind, attributes)?;
        }

        let now = Utc::now();
        let element = self.element_mut(id)?;
        patch.apply(element);
        element.bump(now);
        debug!(element = %id, version = element.version, "element updated");
        self.modified_at = now;
        Ok(())
    }

    /// Deletes an element and returns it.
    ///
    /// Every relationship targeting the element and every conflict naming it
    /// as counterpart is removed from the remaining elements, whatever the
    /// conflict's status. Chapter membership lists are scrubbed as well.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the element is absent.
    pub fn delete_element(&mut self, id: ElementId) -> Result<WorldElement> {
        let removed = self
            .elements
            .remove(&id)
            .ok_or_else(|| Error::not_found("element", id))?;

        let now = Utc::now();
        let mut relationships_pruned = 0;
        let mut conflicts_pruned = 0;
        let others: Vec<ElementId> = self.elements.keys().copied().collect();
        for other in others {
            let Some(element) = self.elements.get_mut(&other) else {
                continue;
            };
            let rels_before = element.relationships.len();
            let conflicts_before = element.conflicts.len();
            element.relationships.retain(|r| r.target_id != id);
            element.conflicts.retain(|c| c.with_element_id != id);
            let rels_removed = rels_before - element.relationships.len();
            let conflicts_removed = conflicts_before - element.conflicts.len();
            if rels_removed + conflicts_removed > 0 {
                element.bump(now);
                relationships_pruned += rels_removed;
                conflicts_pruned += conflicts_removed;
            }
        }

        for chapter in &mut self.chapters {
            if chapter.forget(id) {
                chapter.modified_at = now;
            }
        }

        debug!(
            element = %id,
            relationships_pruned,
            conflicts_pruned,
            "element deleted"
        );
        self.modified_at = now;
        Ok(removed)
    }

    /// Appends a relationship from `source` to `target`.
    ///
    /// Duplicates are allowed and no mirror edge is created.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if either element is absent.
    pub fn add_relationship(
        &mut self,
        source: ElementId,
        target: ElementId,
        rel_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        if !self.contains(target) {
            return Err(Error::not_found("element", target));
        }
        let now = Utc::now();
        let element = self.element_mut(source)?;
        element
            .relationships
            .push(Relationship::new(target, rel_type).with_description(description));
        element.bump(now);
        debug!(source = %source, target = %target, "relationship added");
        self.modified_at = now;
        Ok(())
    }

    /// Removes every relationship on `source` matching both `target` and
    /// `rel_type`, returning how many were removed.
    ///
    /// Removing nothing is not an error.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the source element is absent.
    pub fn remove_relationship(
        &mut self,
        source: ElementId,
        target: ElementId,
        rel_type: &str,
    ) -> Result<usize> {
        let now = Utc::now();
        let element = self.element_mut(source)?;
        let before = element.relationships.len();
        element
            .relationships
            .retain(|r| !(r.target_id == target && r.rel_type == rel_type));
        let removed = before - element.relationships.len();
        if removed > 0 {
            element.bump(now);
            self.modified_at = now;
            debug!(source = %source, target = %target, removed, "relationships removed");
        }
        Ok(removed)
    }

    /// Records a new unresolved conflict on `source` naming `target`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if either element is absent.
    pub fn add_conflict(
        &mut self,
        source: ElementId,
        target: ElementId,
        description: impl Into<String>,
        severity: Severity,
    ) -> Result<ConflictId> {
        if !self.contains(target) {
            return Err(Error::not_found("element", target));
        }
        let now = Utc::now();
        let conflict = Conflict::unresolved(target, description, severity, now);
        let conflict_id = conflict.id;
        let element = self.element_mut(source)?;
        element.conflicts.push(conflict);
        element.bump(now);
        debug!(source = %source, target = %target, conflict = %conflict_id, %severity, "conflict recorded");
        self.modified_at = now;
        Ok(conflict_id)
    }

    /// Moves a conflict out of the unresolved state.
    ///
    /// Only `unresolved -> resolved` (optionally with resolution text) and
    /// `unresolved -> ignored` are accepted. Settled conflicts stay settled.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the element or conflict is absent, and
    /// `InvalidTransition` for resolution text on a non-resolved status or
    /// any other transition. Nothing changes on error.
    pub fn set_conflict_status(
        &mut self,
        element_id: ElementId,
        conflict_id: ConflictId,
        status: ConflictStatus,
        resolution: Option<String>,
    ) -> Result<()> {
        let current = self
            .get_element(element_id)?
            .conflict(conflict_id)
            .ok_or_else(|| Error::not_found("conflict", conflict_id))?
            .status;

        if resolution.is_some() && status != ConflictStatus::Resolved {
            return Err(Error::invalid_transition(
                current.as_str(),
                status.as_str(),
                "resolution text requires resolved status",
            ));
        }
        if current.is_settled() {
            return Err(Error::invalid_transition(
                current.as_str(),
                status.as_str(),
                "conflict is already settled",
            ));
        }
        if status == ConflictStatus::Unresolved {
            return Err(Error::invalid_transition(
                current.as_str(),
                status.as_str(),
                "conflict is already unresolved",
            ));
        }

        let now = Utc::now();
        let element = self.element_mut(element_id)?;
        if let Some(conflict) = element.conflicts.iter_mut().find(|c| c.id == conflict_id) {
            conflict.status = status;
            if status == ConflictStatus::Resolved {
                conflict.resolution = resolution;
                conflict.resolved_at = Some(now);
            }
        }
        element.bump(now);
        debug!(element = %element_id, conflict = %conflict_id, %status, "conflict status changed");
        self.modified_at = now;
        Ok(())
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut WorldElement> {
        self.elements
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("element", id))
    }

    // =========================================================================
    // Chapters
    // =========================================================================

    /// Returns the chapters sorted by order.
    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Looks up a chapter.
    #[must_use]
    pub fn chapter(&self, id: ChapterId) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    /// Adds a chapter. Order defaults to one past the current count.
    pub fn add_chapter(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        order: Option<u32>,
    ) -> ChapterId {
        let now = Utc::now();
        let id = ChapterId::new();
        let next = u32::try_from(self.chapters.len()).map_or(u32::MAX, |n| n.saturating_add(1));
        self.chapters.push(Chapter {
            id,
            title: title.into(),
            description: description.unwrap_or_default(),
            order: order.unwrap_or(next),
            new_elements: Vec::new(),
            modified_elements: Vec::new(),
            created_at: now,
            modified_at: now,
        });
        self.chapters.sort_by_key(|c| c.order);
        debug!(chapter = %id, "chapter added");
        self.modified_at = now;
        id
    }

    /// Applies a partial update to a chapter, re-sorting when the order changes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the chapter is absent.
    pub fn update_chapter(&mut self, id: ChapterId, patch: ChapterPatch) -> Result<()> {
        let now = Utc::now();
        let chapter = self
            .chapters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found("chapter", id))?;
        if let Some(title) = patch.title {
            chapter.title = title;
        }
        if let Some(description) = patch.description {
            chapter.description = description;
        }
        chapter.modified_at = now;
        if let Some(order) = patch.order {
            chapter.order = order;
            self.chapters.sort_by_key(|c| c.order);
        }
        self.modified_at = now;
        Ok(())
    }

    /// Deletes a chapter, renumbers the rest to `1..=N` and drops the chapter
    /// from every element's appearances.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the chapter is absent.
    pub fn delete_chapter(&mut self, id: ChapterId) -> Result<Chapter> {
        let index = self
            .chapters
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Error::not_found("chapter", id))?;
        let removed = self.chapters.remove(index);

        let now = Utc::now();
        for (order, chapter) in (1..).zip(self.chapters.iter_mut()) {
            chapter.order = order;
        }

        let appearing: Vec<ElementId> = self
            .elements
            .values()
            .filter(|e| e.appearances.contains(&id))
            .map(|e| e.id)
            .collect();
        for element_id in appearing {
            if let Some(element) = self.elements.get_mut(&element_id) {
                element.appearances.retain(|c| *c != id);
                element.bump(now);
            }
        }

        debug!(chapter = %id, "chapter deleted");
        self.modified_at = now;
        Ok(removed)
    }

    /// Records that `element` is introduced (`is_new`) or modified in `chapter`.
    ///
    /// Idempotent on both sides.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the chapter or element is absent.
    pub fn add_element_to_chapter(
        &mut self,
        chapter_id: ChapterId,
        element_id: ElementId,
        is_new: bool,
    ) -> Result<()> {
        let chapter_index = self
            .chapters
            .iter()
            .position(|c| c.id == chapter_id)
            .ok_or_else(|| Error::not_found("chapter", chapter_id))?;
        let now = Utc::now();
        let element = self.element_mut(element_id)?;
        if !element.appearances.contains(&chapter_id) {
            element.appearances.push(chapter_id);
            element.bump(now);
        }

        let chapter = &mut self.chapters[chapter_index];
        let list = if is_new {
            &mut chapter.new_elements
        } else {
            &mut chapter.modified_elements
        };
        if !list.contains(&element_id) {
            list.push(element_id);
            chapter.modified_at = now;
        }
        self.modified_at = now;
        Ok(())
    }

    /// Removes `element` from `chapter` on both sides.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the chapter or element is absent.
    pub fn remove_element_from_chapter(
        &mut self,
        chapter_id: ChapterId,
        element_id: ElementId,
    ) -> Result<()> {
        let chapter_index = self
            .chapters
            .iter()
            .position(|c| c.id == chapter_id)
            .ok_or_else(|| Error::not_found("chapter", chapter_id))?;
        let now = Utc::now();
        let element = self.element_mut(element_id)?;
        let before = element.appearances.len();
        element.appearances.retain(|c| *c != chapter_id);
        if element.appearances.len() != before {
            element.bump(now);
        }

        let chapter = &mut self.chapters[chapter_index];
        if chapter.forget(element_id) {
            chapter.modified_at = now;
        }
        self.modified_at = now;
        Ok(())
    }

    // =========================================================================
    // Rules
    // =========================================================================

    /// Returns all rules in insertion order.
    #[must_use]
    pub fn rules(&self) -> &[WorldRule] {
        &self.rules
    }

    /// Iterates active rules.
    pub fn active_rules(&self) -> impl Iterator<Item = &WorldRule> + '_ {
        self.rules.iter().filter(|r| r.active)
    }

    /// Looks up a rule.
    #[must_use]
    pub fn rule(&self, id: RuleId) -> Option<&WorldRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Adds an active rule. The condition is stored verbatim.
    pub fn add_rule(
        &mut self,
        description: impl Into<String>,
        condition: impl Into<String>,
        severity: Severity,
    ) -> RuleId {
        let now = Utc::now();
        let id = RuleId::new();
        self.rules.push(WorldRule {
            id,
            description: description.into(),
            condition: condition.into(),
            severity,
            active: true,
            created_at: now,
            modified_at: now,
        });
        debug!(rule = %id, "rule added");
        self.modified_at = now;
        id
    }

    /// Applies a partial update to a rule.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the rule is absent.
    pub fn update_rule(&mut self, id: RuleId, patch: RulePatch) -> Result<()> {
        let now = Utc::now();
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::not_found("rule", id))?;
        patch.apply(rule);
        rule.modified_at = now;
        self.modified_at = now;
        Ok(())
    }

    /// Toggles a rule.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the rule is absent.
    pub fn set_rule_active(&mut self, id: RuleId, active: bool) -> Result<()> {
        self.update_rule(id, RulePatch::new().active(active))
    }

    /// Deletes a rule.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the rule is absent.
    pub fn delete_rule(&mut self, id: RuleId) -> Result<WorldRule> {
        let index = self
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::not_found("rule", id))?;
        self.modified_at = Utc::now();
        Ok(self.rules.remove(index))
    }

    // =========================================================================
    // Brief templates
    // =========================================================================

    /// Returns all brief templates in insertion order.
    #[must_use]
    pub fn brief_templates(&self) -> &[BriefTemplate] {
        &self.brief_templates
    }

    /// Looks up a brief template.
    #[must_use]
    pub fn brief_template(&self, id: TemplateId) -> Option<&BriefTemplate> {
        self.brief_templates.iter().find(|t| t.id == id)
    }

    /// Adds a brief template.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a section allows no elements or names an
    /// element type that is neither built in nor a custom type.
    pub fn add_brief_template(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        sections: Vec<BriefSection>,
    ) -> Result<TemplateId> {
        validate_sections(&sections, &self.settings)?;
        let now = Utc::now();
        let id = TemplateId::new();
        self.brief_templates.push(BriefTemplate {
            id,
            name: name.into(),
            description: description.into(),
            sections,
            created_at: now,
            modified_at: now,
        });
        debug!(template = %id, "brief template added");
        self.modified_at = now;
        Ok(id)
    }

    /// Applies a partial update to a brief template.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the template is absent and `InvalidArgument` if
    /// replacement sections are invalid.
    pub fn update_brief_template(&mut self, id: TemplateId, patch: BriefTemplatePatch) -> Result<()> {
        if let Some(sections) = &patch.sections {
            validate_sections(sections, &self.settings)?;
        }
        let now = Utc::now();
        let template = self
            .brief_templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::not_found("brief template", id))?;
        patch.apply(template);
        template.modified_at = now;
        self.modified_at = now;
        Ok(())
    }

    /// Deletes a brief template.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the template is absent.
    pub fn delete_brief_template(&mut self, id: TemplateId) -> Result<BriefTemplate> {
        let index = self
            .brief_templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::not_found("brief template", id))?;
        self.modified_at = Utc::now();
        Ok(self.brief_templates.remove(index))
    }

    // =========================================================================
    // Snapshot storage
    // =========================================================================

    /// Returns the retained snapshots.
    #[must_use]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Looks up a snapshot.
    #[must_use]
    pub fn snapshot(&self, id: SnapshotId) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.id == id)
    }

    /// Appends a snapshot and evicts down to `maxSnapshots`.
    ///
    /// Returns the evicted snapshots, oldest first. The new snapshot is
    /// among them if it is older than every retained one.
    pub fn store_snapshot(&mut self, snapshot: Snapshot) -> Vec<Snapshot> {
        self.snapshots.push(snapshot);
        retention::enforce(&mut self.snapshots, self.settings.max_snapshots)
    }

    /// Mutable access to the snapshot list for the versioning layer.
    ///
    /// Callers that grow the list go through [`World::store_snapshot`].
    pub fn snapshots_mut(&mut self) -> &mut Vec<Snapshot> {
        &mut self.snapshots
    }

    /// Replaces elements and chapters wholesale.
    pub fn replace_contents(
        &mut self,
        elements: OrdMap<ElementId, WorldElement>,
        chapters: Vec<Chapter>,
    ) {
        self.elements = elements;
        self.chapters = chapters;
        self.modified_at = Utc::now();
    }
}
