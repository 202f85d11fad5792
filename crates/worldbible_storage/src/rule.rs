//! User-authored world rules.
//!
//! The storage layer keeps the condition as source text. Compilation and
//! evaluation live in the language and engine crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use worldbible_foundation::{RuleId, Severity};

/// A named consistency rule evaluated per element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldRule {
    /// Rule identity.
    pub id: RuleId,
    /// Human-readable name of the rule.
    pub description: String,
    /// Condition source in the rule language.
    pub condition: String,
    /// Severity assigned to everything this rule reports.
    pub severity: Severity,
    /// Inactive rules are skipped by analysis.
    pub active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub modified_at: DateTime<Utc>,
}

/// Partial update of a rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RulePatch {
    /// New description.
    pub description: Option<String>,
    /// New condition source.
    pub condition: Option<String>,
    /// New severity.
    pub severity: Option<Severity>,
    /// New active flag.
    pub active: Option<bool>,
}

impl RulePatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the condition source.
    #[must_use]
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Sets the severity.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub(crate) fn apply(self, rule: &mut WorldRule) {
        if let Some(description) = self.description {
            rule.description = description;
        }
        if let Some(condition) = self.condition {
            rule.condition = condition;
        }
        if let Some(severity) = self.severity {
            rule.severity = severity;
        }
        if let Some(active) = self.active {
            rule.active = active;
        }
    }
}
