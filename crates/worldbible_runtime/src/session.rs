//! Editing session over one world.
//!
//! A [`Session`] wraps a [`World`] and exposes every editing operation. It
//! adds two behaviours on top of the raw aggregate:
//!
//! - Rule conditions are compiled before they are stored, so syntax errors
//!   surface at write time instead of during analysis.
//! - With [`SessionConfig::auto_analyze`] set, creating or updating an element
//!   and adding a relationship re-analyze the touched element and merge the
//!   findings into its conflict list.

use std::path::Path;

use tracing::debug;
use worldbible_engine::{
    Analysis, DetectorConfig, MergeOutcome, RelationshipGraph, analyze_element, analyze_world,
    apply_candidates, build_graph,
};
use worldbible_foundation::{
    ChapterId, ConflictId, ConflictStatus, ElementId, Result, RuleId, Severity, SnapshotId,
    TemplateId,
};
use worldbible_language::compile;
use worldbible_storage::{
    BriefSection, BriefTemplate, BriefTemplatePatch, Chapter, ChapterPatch, ElementPatch,
    NewElement, RulePatch, SettingsPatch, Snapshot, World, WorldElement, WorldRule,
};
use worldbible_timeline::{SnapshotRequest, create_snapshot, list_snapshots, restore_snapshot};

use crate::document;

/// Session behaviour switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Re-analyze and merge after each element mutation.
    pub auto_analyze: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { auto_analyze: true }
    }
}

impl SessionConfig {
    /// Sets [`auto_analyze`](Self::auto_analyze).
    #[must_use]
    pub const fn with_auto_analyze(mut self, enabled: bool) -> Self {
        self.auto_analyze = enabled;
        self
    }
}

/// An editing session.
#[derive(Clone, Debug)]
pub struct Session {
    world: World,
    config: SessionConfig,
    last_merge: MergeOutcome,
}

impl Session {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Opens a session on `world` with the default configuration.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self::with_config(world, SessionConfig::default())
    }

    /// Opens a session on `world`.
    #[must_use]
    pub fn with_config(world: World, config: SessionConfig) -> Self {
        Self {
            world,
            config,
            last_merge: MergeOutcome::default(),
        }
    }

    /// Loads a world document and marks it opened.
    ///
    /// # Errors
    ///
    /// See [`document::load_from_file`].
    pub fn open<P: AsRef<Path>>(path: P, config: SessionConfig) -> Result<Self> {
        let mut world = document::load_from_file(path)?;
        world.touch_opened();
        Ok(Self::with_config(world, config))
    }

    /// Saves the world document.
    ///
    /// # Errors
    ///
    /// See [`document::save_to_file`].
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        document::save_to_file(&self.world, path)
    }

    /// The world being edited.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Ends the session, returning the world.
    #[must_use]
    pub fn into_world(self) -> World {
        self.world
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> SessionConfig {
        self.config
    }

    /// What the most recent automatic or explicit merge did.
    #[must_use]
    pub const fn last_merge(&self) -> &MergeOutcome {
        &self.last_merge
    }

    /// Detector settings derived from the world's strictness level.
    #[must_use]
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig::from_settings(self.world.settings())
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// Creates an element.
    ///
    /// # Errors
    ///
    /// See [`World::create_element`].
    pub fn create_element(&mut self, new_element: NewElement) -> Result<ElementId> {
        let id = self.world.create_element(new_element)?;
        self.after_mutation(id)?;
        Ok(id)
    }

    /// Applies a partial update to an element.
    ///
    /// # Errors
    ///
    /// See [`World::update_element`].
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> Result<()> {
        self.world.update_element(id, patch)?;
        self.after_mutation(id)
    }

    /// Deletes an element and every reference to it.
    ///
    /// # Errors
    ///
    /// See [`World::delete_element`].
    pub fn delete_element(&mut self, id: ElementId) -> Result<WorldElement> {
        self.world.delete_element(id)
    }

    /// Adds a relationship from `source` to `target`.
    ///
    /// # Errors
    ///
    /// See [`World::add_relationship`].
    pub fn add_relationship(
        &mut self,
        source: ElementId,
        target: ElementId,
        rel_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        self.world
            .add_relationship(source, target, rel_type, description)?;
        self.after_mutation(source)
    }

    /// Removes relationships of `rel_type` from `source` to `target`.
    ///
    /// # Errors
    ///
    /// See [`World::remove_relationship`].
    pub fn remove_relationship(
        &mut self,
        source: ElementId,
        target: ElementId,
        rel_type: &str,
    ) -> Result<usize> {
        self.world.remove_relationship(source, target, rel_type)
    }

    /// Records a conflict by hand.
    ///
    /// # Errors
    ///
    /// See [`World::add_conflict`].
    pub fn add_conflict(
        &mut self,
        source: ElementId,
        target: ElementId,
        description: impl Into<String>,
        severity: Severity,
    ) -> Result<ConflictId> {
        self.world.add_conflict(source, target, description, severity)
    }

    /// Moves a conflict to a new status.
    ///
    /// # Errors
    ///
    /// See [`World::set_conflict_status`].
    pub fn set_conflict_status(
        &mut self,
        element: ElementId,
        conflict: ConflictId,
        status: ConflictStatus,
        resolution: Option<String>,
    ) -> Result<()> {
        self.world
            .set_conflict_status(element, conflict, status, resolution)
    }

    // =========================================================================
    // Chapters
    // =========================================================================

    /// Adds a chapter.
    pub fn add_chapter(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        order: Option<u32>,
    ) -> ChapterId {
        self.world.add_chapter(title, description, order)
    }

    /// Updates a chapter.
    ///
    /// # Errors
    ///
    /// See [`World::update_chapter`].
    pub fn update_chapter(&mut self, id: ChapterId, patch: ChapterPatch) -> Result<()> {
        self.world.update_chapter(id, patch)
    }

    /// Deletes a chapter.
    ///
    /// # Errors
    ///
    /// See [`World::delete_chapter`].
    pub fn delete_chapter(&mut self, id: ChapterId) -> Result<Chapter> {
        self.world.delete_chapter(id)
    }

    /// Links an element into a chapter.
    ///
    /// # Errors
    ///
    /// See [`World::add_element_to_chapter`].
    pub fn add_element_to_chapter(
        &mut self,
        chapter: ChapterId,
        element: ElementId,
        is_new: bool,
    ) -> Result<()> {
        self.world.add_element_to_chapter(chapter, element, is_new)
    }

    /// Unlinks an element from a chapter.
    ///
    /// # Errors
    ///
    /// See [`World::remove_element_from_chapter`].
    pub fn remove_element_from_chapter(
        &mut self,
        chapter: ChapterId,
        element: ElementId,
    ) -> Result<()> {
        self.world.remove_element_from_chapter(chapter, element)
    }

    // =========================================================================
    // Rules
    // =========================================================================

    /// Adds a rule after checking that its condition compiles.
    ///
    /// # Errors
    ///
    /// Returns the compile error (`ParseError`, `UndefinedSymbol`,
    /// `ArityMismatch`) without storing anything.
    pub fn add_rule(
        &mut self,
        description: impl Into<String>,
        condition: impl Into<String>,
        severity: Severity,
    ) -> Result<RuleId> {
        let condition = condition.into();
        compile(&condition)?;
        Ok(self.world.add_rule(description, condition, severity))
    }

    /// Updates a rule, compiling a replacement condition first.
    ///
    /// # Errors
    ///
    /// Returns the compile error for a bad condition, or `NotFound`.
    pub fn update_rule(&mut self, id: RuleId, patch: RulePatch) -> Result<()> {
        if let Some(condition) = &patch.condition {
            compile(condition)?;
        }
        self.world.update_rule(id, patch)
    }

    /// Enables or disables a rule.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the rule is absent.
    pub fn set_rule_active(&mut self, id: RuleId, active: bool) -> Result<()> {
        self.world.set_rule_active(id, active)
    }

    /// Deletes a rule.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the rule is absent.
    pub fn delete_rule(&mut self, id: RuleId) -> Result<WorldRule> {
        self.world.delete_rule(id)
    }

    // =========================================================================
    // Brief templates
    // =========================================================================

    /// Adds a brief template.
    ///
    /// # Errors
    ///
    /// See [`World::add_brief_template`].
    pub fn add_brief_template(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        sections: Vec<BriefSection>,
    ) -> Result<TemplateId> {
        self.world.add_brief_template(name, description, sections)
    }

    /// Updates a brief template.
    ///
    /// # Errors
    ///
    /// See [`World::update_brief_template`].
    pub fn update_brief_template(&mut self, id: TemplateId, patch: BriefTemplatePatch) -> Result<()> {
        self.world.update_brief_template(id, patch)
    }

    /// Deletes a brief template.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the template is absent.
    pub fn delete_brief_template(&mut self, id: TemplateId) -> Result<BriefTemplate> {
        self.world.delete_brief_template(id)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Renames or redescribes the world.
    pub fn update_properties(&mut self, name: Option<String>, description: Option<String>) {
        self.world.update_properties(name, description);
    }

    /// Updates world settings.
    ///
    /// # Errors
    ///
    /// See [`World::update_settings`].
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<()> {
        self.world.update_settings(patch)
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    /// Analyzes the whole world without recording anything.
    #[must_use]
    pub fn analyze(&self) -> Analysis {
        analyze_world(&self.world, &self.detector_config())
    }

    /// Merges an analysis into the world's conflict lists.
    pub fn apply(&mut self, analysis: Analysis) -> &MergeOutcome {
        self.last_merge = apply_candidates(&mut self.world, analysis.candidates);
        &self.last_merge
    }

    /// Builds the relationship graph.
    ///
    /// # Errors
    ///
    /// See [`build_graph`].
    pub fn graph(&self, root: Option<ElementId>, depth: u32) -> Result<RelationshipGraph> {
        build_graph(&self.world, root, depth)
    }

    fn after_mutation(&mut self, id: ElementId) -> Result<()> {
        if !self.config.auto_analyze {
            return Ok(());
        }
        let analysis = analyze_element(&self.world, id, &self.detector_config())?;
        self.last_merge = apply_candidates(&mut self.world, analysis.candidates);
        debug!(element = %id, added = self.last_merge.added.len(), "auto-analysis merged");
        Ok(())
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Captures a snapshot.
    ///
    /// # Errors
    ///
    /// See [`create_snapshot`].
    pub fn create_snapshot(&mut self, request: SnapshotRequest) -> Result<SnapshotId> {
        create_snapshot(&mut self.world, request)
    }

    /// Restores a snapshot, returning the id of the automatic backup.
    ///
    /// # Errors
    ///
    /// See [`restore_snapshot`].
    pub fn restore_snapshot(&mut self, id: SnapshotId) -> Result<SnapshotId> {
        restore_snapshot(&mut self.world, id)
    }

    /// Snapshots newest first.
    #[must_use]
    pub fn snapshots(&self) -> Vec<&Snapshot> {
        list_snapshots(&self.world)
    }
}
