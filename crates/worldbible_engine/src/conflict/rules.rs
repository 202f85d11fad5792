//! Rule-based detection track.
//!
//! Active world rules are compiled once per pass and evaluated per element.
//! A rule that fails to compile or evaluate contributes nothing for that
//! element; the failure is logged and recorded, and the pass continues.

use tracing::warn;
use worldbible_foundation::{ElementId, Error, RuleId};
use worldbible_language::{CompiledRule, EvalLimits, compile, evaluate};
use worldbible_storage::{World, WorldRule};

use super::ConflictCandidate;

/// A rule that could not contribute to an analysis pass.
#[derive(Debug)]
pub struct RuleFailure {
    /// The failing rule.
    pub rule_id: RuleId,
    /// The element under evaluation; `None` when the rule did not compile.
    pub element_id: Option<ElementId>,
    /// A `RuleEvaluationFailure` wrapping the cause.
    pub error: Error,
}

/// Active rules of one world, compiled.
pub(crate) struct RuleSet<'w> {
    compiled: Vec<(&'w WorldRule, CompiledRule)>,
}

impl<'w> RuleSet<'w> {
    /// Compiles every active rule. Rules that fail to compile are reported
    /// through `failures` and skipped.
    pub(crate) fn compile(world: &'w World, failures: &mut Vec<RuleFailure>) -> Self {
        let mut compiled = Vec::new();
        for rule in world.active_rules() {
            match compile(&rule.condition) {
                Ok(code) => compiled.push((rule, code)),
                Err(e) => {
                    warn!(rule = %rule.id, error = %e, "rule does not compile");
                    failures.push(RuleFailure {
                        rule_id: rule.id,
                        element_id: None,
                        error: Error::rule_failure(&rule.description, e.to_string()),
                    });
                }
            }
        }
        Self { compiled }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Evaluates every rule against `element`.
    pub(crate) fn run(
        &self,
        world: &World,
        element: ElementId,
        limits: EvalLimits,
        candidates: &mut Vec<ConflictCandidate>,
        failures: &mut Vec<RuleFailure>,
    ) {
        for (rule, code) in &self.compiled {
            match evaluate(code, world, element, limits) {
                Ok(reports) => candidates.extend(reports.into_iter().map(|report| {
                    ConflictCandidate::new(element, report.target, report.message, rule.severity)
                })),
                Err(e) => {
                    warn!(rule = %rule.id, element = %element, error = %e, "rule evaluation failed");
                    failures.push(RuleFailure {
                        rule_id: rule.id,
                        element_id: Some(element),
                        error: Error::rule_failure(&rule.description, e.to_string()),
                    });
                }
            }
        }
    }
}
