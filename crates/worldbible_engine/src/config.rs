//! Conflict detector configuration.

use worldbible_foundation::Strictness;
use worldbible_language::EvalLimits;
use worldbible_storage::WorldSettings;

/// Tuning for one analysis pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Name similarity strictly above which the generic checker reports.
    pub name_similarity_threshold: f64,
    /// Per rule and element evaluation limits.
    pub limits: EvalLimits,
    /// Whether rule failures are kept in the returned analysis.
    pub collect_rule_failures: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::for_strictness(Strictness::default())
    }
}

impl DetectorConfig {
    /// Configuration for a strictness level.
    #[must_use]
    pub fn for_strictness(level: Strictness) -> Self {
        Self {
            name_similarity_threshold: level.name_similarity_threshold(),
            limits: EvalLimits::default(),
            collect_rule_failures: true,
        }
    }

    /// Configuration derived from a world's settings.
    #[must_use]
    pub fn from_settings(settings: &WorldSettings) -> Self {
        Self::for_strictness(settings.conflict_detection_level)
    }

    /// Overrides the name similarity threshold.
    #[must_use]
    pub fn with_name_similarity_threshold(mut self, threshold: f64) -> Self {
        self.name_similarity_threshold = threshold;
        self
    }

    /// Overrides the step budget per rule evaluation.
    #[must_use]
    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.limits.max_steps = steps;
        self
    }

    /// Overrides the report cap per rule evaluation.
    #[must_use]
    pub fn with_max_reports(mut self, reports: usize) -> Self {
        self.limits.max_reports = reports;
        self
    }

    /// Sets whether rule failures are collected.
    #[must_use]
    pub fn with_rule_failures(mut self, collect: bool) -> Self {
        self.collect_rule_failures = collect;
        self
    }
}
