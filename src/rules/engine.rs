//! Fixed-point rule application and the explain trace it produces.

use crate::error::{OptError, Result};
use crate::plan::LogicalPlan;
use serde::{Deserialize, Serialize};

/// A single tree-rewrite rule: a pure function `plan -> (new_plan, changed)`.
/// Implementations walk the whole tree in one call (the engine applies each
/// rule "top-down recursively").
pub trait Rule {
    fn name(&self) -> &'static str;
    fn apply(&self, plan: LogicalPlan) -> Result<(LogicalPlan, bool)>;
}

/// One recorded rewrite: before/after snapshots plus a human-readable note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainStep {
    pub rule_name: String,
    pub before: LogicalPlan,
    pub after: LogicalPlan,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplainStatistics {
    pub total_rules_applied: usize,
}

/// The rule engine's output: which rules fired, each step taken, and a
/// summary. Always returned on success, even if no rule fired.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplainResult {
    pub applied_rules: Vec<String>,
    pub steps: Vec<ExplainStep>,
    pub statistics: ExplainStatistics,
}

pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Applies an ordered list of rules to fixed point: each pass runs every
/// rule in order; if any rule changed the tree, the whole sequence repeats,
/// bounded by `max_iterations`.
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
    max_iterations: usize,
}

impl RuleEngine {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        RuleEngine {
            rules,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn optimize(&self, plan: LogicalPlan) -> Result<(LogicalPlan, ExplainResult)> {
        let mut current = plan;
        let mut result = ExplainResult::default();

        for pass in 0..self.max_iterations {
            let mut pass_changed = false;
            for rule in &self.rules {
                let before = current.deep_clone();
                let (rewritten, changed) = match rule.apply(current) {
                    Ok(v) => v,
                    Err(err) => {
                        result.statistics.total_rules_applied = result.steps.len();
                        return Err(OptError::rule_failed(rule.name(), err.to_string(), result));
                    }
                };
                current = rewritten;
                if changed {
                    pass_changed = true;
                    tracing::debug!(rule = rule.name(), pass, "rule applied a structural change");
                    result.applied_rules.push(rule.name().to_string());
                    result.steps.push(ExplainStep {
                        rule_name: rule.name().to_string(),
                        after: current.deep_clone(),
                        before,
                        description: format!("{} rewrote the plan", rule.name()),
                    });
                }
            }
            if !pass_changed {
                break;
            }
        }

        result.statistics.total_rules_applied = result.steps.len();
        Ok((current, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptError;

    struct AlwaysRenames;

    impl Rule for AlwaysRenames {
        fn name(&self) -> &'static str {
            "AlwaysRenames"
        }

        fn apply(&self, plan: LogicalPlan) -> Result<(LogicalPlan, bool)> {
            Ok((plan, true))
        }
    }

    struct FailsOnSight;

    impl Rule for FailsOnSight {
        fn name(&self) -> &'static str {
            "FailsOnSight"
        }

        fn apply(&self, _plan: LogicalPlan) -> Result<(LogicalPlan, bool)> {
            Err(OptError::internal("rule deliberately failed"))
        }
    }

    #[test]
    fn a_failing_rule_preserves_the_explain_trace_built_so_far() {
        let engine = RuleEngine::new(vec![Box::new(AlwaysRenames), Box::new(FailsOnSight)]).with_max_iterations(1);
        let err = engine.optimize(LogicalPlan::scan("orders", None)).unwrap_err();
        match err {
            OptError::RuleFailed { rule, partial_trace, .. } => {
                assert_eq!(rule, "FailsOnSight");
                assert_eq!(partial_trace.applied_rules, vec!["AlwaysRenames".to_string()]);
                assert_eq!(partial_trace.steps.len(), 1);
            }
            other => panic!("expected RuleFailed, got {other:?}"),
        }
    }
}
