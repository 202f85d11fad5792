//! Per-world settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use worldbible_foundation::{CanonTier, ElementKind, Error, Result, Strictness};

/// Settings persisted inside the world document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSettings {
    /// Canon tier given to new elements that do not specify one.
    #[serde(default)]
    pub default_canon_tier: CanonTier,
    /// Autosave interval in minutes, consumed by the host.
    #[serde(default = "default_auto_save_interval")]
    pub auto_save_interval: u32,
    /// Color scheme preferred by the host.
    #[serde(default)]
    pub theme: Theme,
    /// Retention cap for snapshots; always at least 1.
    #[serde(default = "default_max_snapshots")]
    pub max_snapshots: usize,
    /// How eagerly structural checks flag candidates.
    #[serde(default)]
    pub conflict_detection_level: Strictness,
    /// Author-defined element types, keyed by type name. Brief template
    /// sections may name them next to the built-in kinds.
    #[serde(default)]
    pub custom_element_types: BTreeMap<String, CustomElementType>,
}

/// Host color scheme.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light.
    Light,
    /// Dark.
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

/// An author-defined element type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomElementType {
    /// Display name.
    pub name: String,
    /// Icon name understood by the host.
    #[serde(default)]
    pub icon: String,
    /// Attribute names suggested for new elements of this type.
    #[serde(default)]
    pub default_properties: Vec<String>,
}

const fn default_auto_save_interval() -> u32 {
    5
}

const fn default_max_snapshots() -> usize {
    50
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            default_canon_tier: CanonTier::default(),
            auto_save_interval: default_auto_save_interval(),
            theme: Theme::default(),
            max_snapshots: default_max_snapshots(),
            conflict_detection_level: Strictness::default(),
            custom_element_types: BTreeMap::new(),
        }
    }
}

impl WorldSettings {
    /// Returns true if `name` is a built-in kind or a custom element type.
    #[must_use]
    pub fn knows_element_type(&self, name: &str) -> bool {
        name.parse::<ElementKind>().is_ok() || self.custom_element_types.contains_key(name)
    }
}

/// Partial update of [`WorldSettings`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    /// New default canon tier.
    pub default_canon_tier: Option<CanonTier>,
    /// New autosave interval.
    pub auto_save_interval: Option<u32>,
    /// New theme.
    pub theme: Option<Theme>,
    /// New snapshot cap.
    pub max_snapshots: Option<usize>,
    /// New strictness.
    pub conflict_detection_level: Option<Strictness>,
    /// Replacement set of custom element types.
    pub custom_element_types: Option<BTreeMap<String, CustomElementType>>,
}

impl SettingsPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default canon tier.
    #[must_use]
    pub fn default_canon_tier(mut self, tier: CanonTier) -> Self {
        self.default_canon_tier = Some(tier);
        self
    }

    /// Sets the autosave interval.
    #[must_use]
    pub fn auto_save_interval(mut self, minutes: u32) -> Self {
        self.auto_save_interval = Some(minutes);
        self
    }

    /// Sets the theme.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Replaces the custom element types.
    #[must_use]
    pub fn custom_element_types(mut self, types: BTreeMap<String, CustomElementType>) -> Self {
        self.custom_element_types = Some(types);
        self
    }

    /// Sets the snapshot cap.
    #[must_use]
    pub fn max_snapshots(mut self, max: usize) -> Self {
        self.max_snapshots = Some(max);
        self
    }

    /// Sets the strictness.
    #[must_use]
    pub fn conflict_detection_level(mut self, level: Strictness) -> Self {
        self.conflict_detection_level = Some(level);
        self
    }

    /// Applies the patch, validating first so that a bad patch changes nothing.
    pub(crate) fn apply(self, settings: &mut WorldSettings) -> Result<()> {
        if self.max_snapshots == Some(0) {
            return Err(Error::invalid_argument("maxSnapshots must be at least 1"));
        }
        if self.auto_save_interval == Some(0) {
            return Err(Error::invalid_argument("autoSaveInterval must be at least 1 minute"));
        }
        if let Some(types) = &self.custom_element_types {
            if let Some(name) = types.keys().find(|n| n.parse::<ElementKind>().is_ok()) {
                return Err(Error::invalid_argument(format!(
                    "custom element type '{name}' shadows a built-in kind"
                )));
            }
        }
        if let Some(tier) = self.default_canon_tier {
            settings.default_canon_tier = tier;
        }
        if let Some(minutes) = self.auto_save_interval {
            settings.auto_save_interval = minutes;
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(max) = self.max_snapshots {
            settings.max_snapshots = max;
        }
        if let Some(level) = self.conflict_detection_level {
            settings.conflict_detection_level = level;
        }
        if let Some(types) = self.custom_element_types {
            settings.custom_element_types = types;
        }
        Ok(())
    }
}
