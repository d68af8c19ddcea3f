//! Bitmask dynamic-programming join-order search: exact for the table
//! counts small enough to brute force (see `mod.rs` for the threshold
//! against the greedy heuristics).

use super::bitset::BitSet;
use super::join_graph::JoinGraph;
use crate::catalog::Catalog;
use crate::cost;
use crate::plan::{plan_signature, Expression, JoinType, LiteralValue, LogicalPlan};
use std::collections::{HashMap, HashSet};

pub struct DpOutcome {
    pub best_plan: LogicalPlan,
    pub best_cost: f64,
    pub plans_evaluated: usize,
    pub plans_pruned: usize,
}

/// Caps the number of join candidates actually costed when a caller
/// doesn't hand `enumerate` its own limit; `enumerator::enumerate_with_limits`
/// feeds `Config::max_query_plans` in instead.
pub const DEFAULT_MAX_PLANS: usize = 1000;

pub fn enumerate(graph: &JoinGraph, catalog: &Catalog, max_plans: usize) -> DpOutcome {
    let n = graph.table_count();
    assert!(n >= 2, "bitmask DP requires at least two tables");
    assert!(n <= 16, "bitmask DP is exact only up to 16 tables");

    let mut dp: HashMap<u32, (LogicalPlan, f64)> = HashMap::new();
    let mut seen_signatures: HashSet<String> = HashSet::new();
    let mut evaluated = 0usize;
    let mut pruned = 0usize;

    for (i, table) in graph.tables.iter().enumerate() {
        let scan = LogicalPlan::scan(table.name.clone(), table.alias.clone());
        let scan_cost = cost::cost(&scan, catalog).total;
        seen_signatures.insert(plan_signature(&scan));
        dp.insert(BitSet::singleton(i).bits(), (scan, scan_cost));
        evaluated += 1;
    }

    for size in 2..=n {
        for subset in BitSet::enumerate_subsets(n, size) {
            let mut best: Option<(LogicalPlan, f64)> = None;
            // Cheapest bipartition by children's cost alone, kept in case
            // this subset has no connected bipartition at all — it still
            // has to resolve to one plan, via a synthesized cross join.
            let mut fallback: Option<(BitSet, BitSet, f64)> = None;

            for (left, right) in subset.enumerate_bipartitions() {
                let (left_plan, left_cost) = match dp.get(&left.bits()) {
                    Some(v) => v.clone(),
                    None => continue,
                };
                let (right_plan, right_cost) = match dp.get(&right.bits()) {
                    Some(v) => v.clone(),
                    None => continue,
                };

                let sum = left_cost + right_cost;
                if fallback.as_ref().map_or(true, |(_, _, c)| sum < *c) {
                    fallback = Some((left, right, sum));
                }

                if !graph.is_connected(left.bits(), right.bits()) {
                    continue;
                }

                for edge in graph.edges_between(left.bits(), right.bits()) {
                    if evaluated >= max_plans {
                        pruned += 1;
                    } else {
                        let forward = LogicalPlan::join(
                            edge.join_type,
                            edge.condition.clone(),
                            left_plan.clone(),
                            right_plan.clone(),
                        );
                        if seen_signatures.insert(plan_signature(&forward)) {
                            let forward_cost =
                                left_cost + right_cost + cost::cost(&forward, catalog).total;
                            evaluated += 1;
                            if best.as_ref().map_or(true, |(_, c)| forward_cost < *c) {
                                best = Some((forward, forward_cost));
                            }
                        } else {
                            pruned += 1;
                        }
                    }

                    if evaluated >= max_plans {
                        pruned += 1;
                    } else {
                        let mirrored = LogicalPlan::join(
                            edge.join_type.swapped(),
                            edge.condition.clone(),
                            right_plan.clone(),
                            left_plan.clone(),
                        );
                        if seen_signatures.insert(plan_signature(&mirrored)) {
                            let mirrored_cost =
                                left_cost + right_cost + cost::cost(&mirrored, catalog).total;
                            evaluated += 1;
                            if best.as_ref().map_or(true, |(_, c)| mirrored_cost < *c) {
                                best = Some((mirrored, mirrored_cost));
                            }
                        } else {
                            pruned += 1;
                        }
                    }
                }
            }

            let candidate = best.or_else(|| {
                fallback.map(|(left, right, sum)| {
                    let (left_plan, _) = dp.get(&left.bits()).cloned().unwrap();
                    let (right_plan, _) = dp.get(&right.bits()).cloned().unwrap();
                    let cross = LogicalPlan::join(
                        JoinType::Cross,
                        Expression::literal(LiteralValue::Bool(true)),
                        left_plan,
                        right_plan,
                    );
                    let cross_cost = sum + cost::cost(&cross, catalog).total;
                    (cross, cross_cost)
                })
            });

            if let Some(candidate) = candidate {
                dp.insert(subset.bits(), candidate);
            }
        }
    }

    let full = BitSet::full(n).bits();
    let (best_plan, best_cost) = dp
        .remove(&full)
        .expect("every subset is covered by either a connected join or the cross-join fallback");

    DpOutcome {
        best_plan,
        best_cost,
        plans_evaluated: evaluated,
        plans_pruned: pruned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Column, TableSchema};
    use crate::plan::{BinOp, DataType, Expression, JoinType};

    fn two_table_graph() -> (JoinGraph, Catalog) {
        let catalog = Catalog::new();
        catalog
            .add_table(TableSchema::new("small", vec![Column::new("id", DataType::Int, false)], 10))
            .unwrap();
        catalog
            .add_table(TableSchema::new(
                "large",
                vec![Column::new("small_id", DataType::Int, false)],
                1_000_000,
            ))
            .unwrap();

        let plan = LogicalPlan::join(
            JoinType::Inner,
            Expression::binary(
                BinOp::Eq,
                Expression::qualified_column("small", "id"),
                Expression::qualified_column("large", "small_id"),
            ),
            LogicalPlan::scan("small", None),
            LogicalPlan::scan("large", None),
        );
        (super::super::join_graph::extract(&plan, &catalog), catalog)
    }

    #[test]
    fn two_table_search_joins_both() {
        let (graph, catalog) = two_table_graph();
        let outcome = enumerate(&graph, &catalog, DEFAULT_MAX_PLANS);
        assert!(matches!(outcome.best_plan, LogicalPlan::Join { .. }));
        assert_eq!(outcome.best_plan.scan_table_names().len(), 2);
        assert!(outcome.plans_evaluated > 0);
    }

    fn disconnected_graph() -> (JoinGraph, Catalog) {
        let catalog = Catalog::new();
        for (name, rows) in [("a", 10), ("b", 20), ("c", 30)] {
            catalog
                .add_table(TableSchema::new(name, vec![Column::new("id", DataType::Int, false)], rows))
                .unwrap();
        }
        let plan = LogicalPlan::join(
            JoinType::Cross,
            Expression::literal(crate::plan::LiteralValue::Bool(true)),
            LogicalPlan::join(
                JoinType::Cross,
                Expression::literal(crate::plan::LiteralValue::Bool(true)),
                LogicalPlan::scan("a", None),
                LogicalPlan::scan("b", None),
            ),
            LogicalPlan::scan("c", None),
        );
        (super::super::join_graph::extract(&plan, &catalog), catalog)
    }

    #[test]
    fn disconnected_tables_fall_back_to_a_cross_join_instead_of_panicking() {
        let (graph, catalog) = disconnected_graph();
        assert!(graph.edges.is_empty());
        let outcome = enumerate(&graph, &catalog, DEFAULT_MAX_PLANS);
        assert_eq!(outcome.best_plan.scan_table_names().len(), 3);
        assert!(outcome.best_cost > 0.0);
    }

    #[test]
    fn a_low_max_plans_cap_prunes_candidates_instead_of_costing_them_all() {
        let (graph, catalog) = two_table_graph();
        let outcome = enumerate(&graph, &catalog, 1);
        assert!(outcome.plans_pruned > 0);
    }
}
