//! A relational query optimizer core: logical plan algebra, a catalog of
//! table/column statistics, a bottom-up cost model, a fixed-point
//! rule-based rewriter, cost-guided join-order search, and an execution
//! simulator that estimates runtime metrics without running anything.
//!
//! [`optimize`] is the single entry point for turning an input plan into an
//! optimized one; [`simulate`] estimates what running a plan against a
//! given connector would cost.

pub mod catalog;
pub mod cost;
pub mod enumerator;
pub mod error;
pub mod optimizer;
pub mod physical;
pub mod plan;
pub mod rules;
pub mod simulator;

pub use error::{OptError, Result};
pub use simulator::{simulate, Connector, ExecutionMetrics, SimulationOptions};

use catalog::Catalog;
use plan::LogicalPlan;
use rules::{default_rules, ExplainResult, RuleEngine};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which optimization path `optimize` should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationStrategy {
    Rule,
    Cost,
}

/// Runtime knobs for the optimizer. `enable_rule_based_optimizer = false`
/// makes `Rule` a no-op; `enable_cost_based_optimizer = false` makes `Cost`
/// fall back to `Rule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub max_query_plans: usize,
    pub optimization_timeout: Duration,
    pub enable_cost_based_optimizer: bool,
    pub enable_rule_based_optimizer: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_query_plans: 1000,
            optimization_timeout: Duration::from_secs(30),
            enable_cost_based_optimizer: true,
            enable_rule_based_optimizer: true,
        }
    }
}

/// Optimizes `plan` against `catalog` under `strategy`, honoring `config`'s
/// feature toggles. Returns the optimized plan plus an explain trace of
/// every step taken, even when no rule or search pass actually fired.
pub fn optimize(
    plan: LogicalPlan,
    catalog: &Catalog,
    strategy: OptimizationStrategy,
    config: &Config,
) -> Result<(LogicalPlan, ExplainResult)> {
    if !plan.is_valid_tree() {
        return Err(OptError::invalid_argument("plan tree has inconsistent operator arity"));
    }

    match strategy {
        OptimizationStrategy::Rule => {
            if !config.enable_rule_based_optimizer {
                tracing::debug!("rule-based optimizer disabled, returning plan unchanged");
                return Ok((plan, ExplainResult::default()));
            }
            RuleEngine::new(default_rules()).optimize(plan)
        }
        OptimizationStrategy::Cost => {
            if !config.enable_cost_based_optimizer {
                tracing::debug!("cost-based optimizer disabled, reducing to rule-based strategy");
                return optimize(plan, catalog, OptimizationStrategy::Rule, config);
            }

            let (rule_optimized, mut explain) = if config.enable_rule_based_optimizer {
                RuleEngine::new(default_rules()).optimize(plan)?
            } else {
                (plan, ExplainResult::default())
            };

            let enumeration = enumerator::enumerate_with_limits(
                &rule_optimized,
                catalog,
                enumerator::GreedyStrategy::Mixed,
                config.max_query_plans,
            );
            tracing::debug!(
                strategy = ?enumeration.strategy,
                cost = enumeration.best_cost,
                plans_evaluated = enumeration.plan_count,
                "join-order search complete"
            );

            let (final_plan, swap_step) = optimizer::run_cost_based(enumeration.best_plan, catalog);
            explain.applied_rules.push(swap_step.rule_name.clone());
            explain.statistics.total_rules_applied += 1;
            explain.steps.push(swap_step);

            Ok((final_plan, explain))
        }
    }
}
