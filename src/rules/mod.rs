//! Fixed-point application of tree-rewrite rules, producing an explain
//! trace of which rule changed what.

mod engine;
mod noop_rules;
mod predicate_pushdown;
mod projection_pushdown;

pub use engine::{
    ExplainResult, ExplainStatistics, ExplainStep, Rule, RuleEngine, DEFAULT_MAX_ITERATIONS,
};
pub use noop_rules::{ConstantFolding, JoinReordering};
pub use predicate_pushdown::PredicatePushdown;
pub use projection_pushdown::ProjectionPushdown;

/// The default rule order: predicate pushdown first (maximizes early
/// filtering before later rules see the tree), then projection cleanup,
/// then the two reserved no-op rules.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(PredicatePushdown),
        Box::new(ProjectionPushdown),
        Box::new(ConstantFolding),
        Box::new(JoinReordering),
    ]
}
