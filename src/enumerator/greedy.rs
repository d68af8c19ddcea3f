//! Greedy join-order heuristics used once the table count is too large for
//! exhaustive bitmask search. Builds a single left-deep plan by repeatedly
//! picking the next table to fold in rather than exploring every order.

use super::bitset::BitSet;
use super::join_graph::JoinGraph;
use crate::catalog::Catalog;
use crate::cost;
use crate::plan::{plan_signature, Expression, JoinType, LiteralValue, LogicalPlan};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GreedyStrategy {
    /// Smallest estimated row count joins first.
    Cardinality,
    /// Most selective available join edge chooses the next table.
    Selectivity,
    /// Cardinality weighted by incident selectivity.
    Mixed,
}

pub struct GreedyOutcome {
    pub best_plan: LogicalPlan,
    pub best_cost: f64,
    pub plans_evaluated: usize,
}

fn best_incident_selectivity(graph: &JoinGraph, table: usize) -> f64 {
    graph
        .edges
        .iter()
        .filter(|e| e.left == table || e.right == table)
        .map(|e| e.selectivity)
        .fold(1.0, f64::min)
}

fn score(graph: &JoinGraph, table: usize, strategy: GreedyStrategy) -> f64 {
    let cardinality = graph.tables[table].cardinality as f64;
    match strategy {
        GreedyStrategy::Cardinality => cardinality,
        GreedyStrategy::Selectivity => best_incident_selectivity(graph, table),
        GreedyStrategy::Mixed => cardinality * best_incident_selectivity(graph, table),
    }
}

pub fn enumerate(graph: &JoinGraph, catalog: &Catalog, strategy: GreedyStrategy) -> GreedyOutcome {
    let n = graph.table_count();
    assert!(n >= 2, "greedy join ordering requires at least two tables");

    let start = (0..n)
        .min_by(|&a, &b| score(graph, a, strategy).total_cmp(&score(graph, b, strategy)))
        .expect("table count checked above");

    let mut current = LogicalPlan::scan(graph.tables[start].name.clone(), graph.tables[start].alias.clone());
    let mut joined_mask = BitSet::singleton(start).bits();
    let mut seen_signatures: HashSet<String> = HashSet::new();
    seen_signatures.insert(plan_signature(&current));
    let mut evaluated = 1usize;

    while (joined_mask.count_ones() as usize) < n {
        let remaining: Vec<usize> = (0..n).filter(|i| joined_mask & (1 << i) == 0).collect();
        let next = remaining
            .iter()
            .copied()
            .min_by(|&a, &b| score(graph, a, strategy).total_cmp(&score(graph, b, strategy)))
            .expect("remaining is non-empty inside the loop condition");

        let next_plan = LogicalPlan::scan(graph.tables[next].name.clone(), graph.tables[next].alias.clone());
        let next_bit = 1u32 << next;
        let edge = graph
            .edges
            .iter()
            .find(|e| {
                let (lb, rb) = (1u32 << e.left, 1u32 << e.right);
                (joined_mask & lb != 0 && next_bit & rb != 0) || (joined_mask & rb != 0 && next_bit & lb != 0)
            });

        current = match edge {
            Some(e) => LogicalPlan::join(e.join_type, e.condition.clone(), current, next_plan),
            None => LogicalPlan::join(
                JoinType::Cross,
                Expression::literal(LiteralValue::Bool(true)),
                current,
                next_plan,
            ),
        };
        joined_mask |= next_bit;
        if seen_signatures.insert(plan_signature(&current)) {
            evaluated += 1;
        }
    }

    let best_cost = cost::cost(&current, catalog).total;
    GreedyOutcome {
        best_plan: current,
        best_cost,
        plans_evaluated: evaluated,
    }
}
