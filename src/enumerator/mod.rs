//! Join-order search: builds the join graph underlying a plan, then picks
//! between an exact bitmask DP (small table counts) and a greedy heuristic
//! (larger ones), deduplicating by canonical plan signature along the way.

mod bitset;
mod dp;
mod greedy;
mod join_graph;

pub use bitset::BitSet;
pub use greedy::GreedyStrategy;
pub use join_graph::{JoinEdge, JoinGraph, TableInfo};

use crate::catalog::Catalog;
use crate::cost;
use crate::physical;
use crate::plan::LogicalPlan;
use serde::{Deserialize, Serialize};

/// Above this table count, exhaustive bitmask search is skipped in favor of
/// a greedy heuristic — the search space grows too fast for a teaching-grade
/// optimizer to explore exactly.
pub const DP_TABLE_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnumerationStrategy {
    SingleTable,
    BitmaskDp,
    Greedy(GreedyStrategy),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PruningStatistics {
    pub generated: usize,
    pub evaluated: usize,
    pub pruned: usize,
}

pub struct EnumerationResult {
    pub best_plan: LogicalPlan,
    pub best_cost: f64,
    pub plan_count: usize,
    pub strategy: EnumerationStrategy,
    pub search_space: String,
    pub pruning_stats: PruningStatistics,
}

/// Dispatches on table count, using `GreedyStrategy::Mixed` and the default
/// plan-count cap. Use `enumerate_with_greedy_strategy` to pin a specific
/// heuristic, or `enumerate_with_limits` to also pin the plan-count cap
/// (`Config::max_query_plans` feeds in through that entry point).
pub fn enumerate(plan: &LogicalPlan, catalog: &Catalog) -> EnumerationResult {
    enumerate_with_greedy_strategy(plan, catalog, GreedyStrategy::Mixed)
}

pub fn enumerate_with_greedy_strategy(
    plan: &LogicalPlan,
    catalog: &Catalog,
    greedy_strategy: GreedyStrategy,
) -> EnumerationResult {
    enumerate_with_limits(plan, catalog, greedy_strategy, dp::DEFAULT_MAX_PLANS)
}

pub fn enumerate_with_limits(
    plan: &LogicalPlan,
    catalog: &Catalog,
    greedy_strategy: GreedyStrategy,
    max_plans: usize,
) -> EnumerationResult {
    let graph = join_graph::extract(plan, catalog);
    let n = graph.table_count();

    if n <= 1 {
        let mut best_plan = plan.deep_clone();
        physical::stamp_physical_operators(&mut best_plan, catalog);
        physical::propagate_estimates(&mut best_plan, catalog);
        let best_cost = cost::cost(&best_plan, catalog).total;
        return EnumerationResult {
            best_plan,
            best_cost,
            plan_count: 1,
            strategy: EnumerationStrategy::SingleTable,
            search_space: "single table: physical alternatives only".to_string(),
            pruning_stats: PruningStatistics {
                generated: 1,
                evaluated: 1,
                pruned: 0,
            },
        };
    }

    if n <= DP_TABLE_LIMIT {
        let outcome = dp::enumerate(&graph, catalog, max_plans);
        EnumerationResult {
            best_plan: outcome.best_plan,
            best_cost: outcome.best_cost,
            plan_count: outcome.plans_evaluated,
            strategy: EnumerationStrategy::BitmaskDp,
            search_space: format!("bitmask dp over {n} tables"),
            pruning_stats: PruningStatistics {
                generated: outcome.plans_evaluated + outcome.plans_pruned,
                evaluated: outcome.plans_evaluated,
                pruned: outcome.plans_pruned,
            },
        }
    } else {
        let outcome = greedy::enumerate(&graph, catalog, greedy_strategy);
        EnumerationResult {
            best_plan: outcome.best_plan,
            best_cost: outcome.best_cost,
            plan_count: outcome.plans_evaluated,
            strategy: EnumerationStrategy::Greedy(greedy_strategy),
            search_space: format!("greedy {greedy_strategy:?} over {n} tables"),
            pruning_stats: PruningStatistics {
                generated: outcome.plans_evaluated,
                evaluated: outcome.plans_evaluated,
                pruned: 0,
            },
        }
    }
}
