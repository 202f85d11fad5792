//! Conflict detection.
//!
//! Two independent tracks run per pass:
//! - structural pairwise checks over element pairs ([`checkers`])
//! - active world rules evaluated per element ([`rules`])
//!
//! Analysis never mutates the world. [`apply_candidates`] merges the
//! candidates it produces back into element conflict lists.

pub mod checkers;
pub mod labels;
pub mod merge;
pub mod rules;
pub mod similarity;

use tracing::debug;
use worldbible_foundation::{ElementId, Error, Result, Severity};
use worldbible_storage::{World, WorldElement};

use crate::config::DetectorConfig;
use checkers::{CheckContext, check_pair};
use rules::RuleSet;

pub use merge::{MergeOutcome, apply_candidates};
pub use rules::RuleFailure;

// =============================================================================
// Candidates
// =============================================================================

/// A detected contradiction not yet recorded on any element.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConflictCandidate {
    /// Reporting element.
    pub source_id: ElementId,
    /// Other side of the contradiction.
    pub target_id: ElementId,
    /// Human-readable description.
    pub description: String,
    /// How serious it is.
    pub severity: Severity,
}

impl ConflictCandidate {
    /// Creates a candidate.
    #[must_use]
    pub fn new(
        source_id: ElementId,
        target_id: ElementId,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            source_id,
            target_id,
            description: description.into(),
            severity,
        }
    }
}

/// Result of an analysis pass.
#[derive(Debug, Default)]
pub struct Analysis {
    /// Candidates from both tracks, pairwise first.
    pub candidates: Vec<ConflictCandidate>,
    /// Rules that could not contribute.
    pub failures: Vec<RuleFailure>,
}

impl Analysis {
    /// Returns true if nothing was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates with `error` severity.
    pub fn errors(&self) -> impl Iterator<Item = &ConflictCandidate> + '_ {
        self.candidates
            .iter()
            .filter(|c| c.severity == Severity::Error)
    }
}

// =============================================================================
// Analysis passes
// =============================================================================

/// Analyzes every element pair and every element against the active rules.
#[must_use]
pub fn analyze_world(world: &World, config: &DetectorConfig) -> Analysis {
    let ctx = CheckContext {
        world,
        name_threshold: config.name_similarity_threshold,
    };
    let elements: Vec<&WorldElement> = world.elements().collect();
    let mut analysis = Analysis::default();

    for (i, a) in elements.iter().enumerate() {
        for b in &elements[i + 1..] {
            analysis.candidates.extend(check_pair(a, b, &ctx));
        }
    }

    let rules = RuleSet::compile(world, &mut analysis.failures);
    if !rules.is_empty() {
        for element in &elements {
            rules.run(
                world,
                element.id,
                config.limits,
                &mut analysis.candidates,
                &mut analysis.failures,
            );
        }
    }

    finish(analysis, config, elements.len())
}

/// Analyzes one element: pairs it with every other element and runs the
/// active rules against it alone.
///
/// # Errors
///
/// Returns `NotFound` if the element is absent.
pub fn analyze_element(world: &World, id: ElementId, config: &DetectorConfig) -> Result<Analysis> {
    let element = world
        .element(id)
        .ok_or_else(|| Error::not_found("element", id))?;
    let ctx = CheckContext {
        world,
        name_threshold: config.name_similarity_threshold,
    };
    let mut analysis = Analysis::default();

    for other in world.elements().filter(|e| e.id != id) {
        analysis.candidates.extend(check_pair(element, other, &ctx));
    }

    let rules = RuleSet::compile(world, &mut analysis.failures);
    rules.run(
        world,
        id,
        config.limits,
        &mut analysis.candidates,
        &mut analysis.failures,
    );

    Ok(finish(analysis, config, 1))
}

fn finish(mut analysis: Analysis, config: &DetectorConfig, examined: usize) -> Analysis {
    if !config.collect_rule_failures {
        analysis.failures.clear();
    }
    debug!(
        examined,
        candidates = analysis.candidates.len(),
        failures = analysis.failures.len(),
        "conflict analysis finished"
    );
    analysis
}
