//! Brief templates.
//!
//! A template describes the outline of a brief: ordered sections, each
//! drawing up to `maxElements` elements of the listed types. Rendering a
//! brief from a template is left to the host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use worldbible_foundation::{Error, Result, TemplateId};

use crate::settings::WorldSettings;

/// One section of a brief outline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefSection {
    /// Section heading.
    pub title: String,
    /// Element kinds or custom type names included in the section.
    #[serde(default)]
    pub element_types: Vec<String>,
    /// Upper bound on elements listed in the section.
    pub max_elements: u32,
    /// Whether the section must be present in every brief.
    #[serde(default)]
    pub required: bool,
}

impl BriefSection {
    /// Creates an optional section.
    #[must_use]
    pub fn new(title: impl Into<String>, max_elements: u32) -> Self {
        Self {
            title: title.into(),
            element_types: Vec::new(),
            max_elements,
            required: false,
        }
    }

    /// Adds an element type to the section.
    #[must_use]
    pub fn with_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_types.push(element_type.into());
        self
    }

    /// Marks the section as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A named brief outline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefTemplate {
    /// Template identity.
    pub id: TemplateId,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Sections in output order.
    #[serde(default)]
    pub sections: Vec<BriefSection>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub modified_at: DateTime<Utc>,
}

/// Partial update of a brief template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BriefTemplatePatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement sections.
    pub sections: Option<Vec<BriefSection>>,
}

impl BriefTemplatePatch {
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

    /// Replaces the sections.
    #[must_use]
    pub fn sections(mut self, sections: Vec<BriefSection>) -> Self {
        self.sections = Some(sections);
        self
    }

    pub(crate) fn apply(self, template: &mut BriefTemplate) {
        if let Some(name) = self.name {
            template.name = name;
        }
        if let Some(description) = self.description {
            template.description = description;
        }
        if let Some(sections) = self.sections {
            template.sections = sections;
        }
    }
}

/// Checks that every section lists at least one element and names only
/// known element types.
///
/// # Errors
///
/// Returns `InvalidArgument` naming the first offending section.
pub fn validate_sections(sections: &[BriefSection], settings: &WorldSettings) -> Result<()> {
    for section in sections {
        if section.max_elements == 0 {
            return Err(Error::invalid_argument(format!(
                "section '{}' must allow at least one element",
                section.title
            )));
        }
        if let Some(unknown) = section
            .element_types
            .iter()
            .find(|t| !settings.knows_element_type(t))
        {
            return Err(Error::invalid_argument(format!(
                "section '{}' names unknown element type '{unknown}'",
                section.title
            )));
        }
    }
    Ok(())
}
