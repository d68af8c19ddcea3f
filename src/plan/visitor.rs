//! Visitor protocol with one hook per operator variant. `walk` drives a
//! pre-order traversal; implementers override only the hooks they care
//! about and rely on the no-op defaults for the rest.

use super::expression::{Expression, Predicate};
use super::node::{AggregateExpr, JoinType, LogicalPlan, NodeMeta, SortKey};

#[allow(unused_variables)]
pub trait PlanVisitor {
    fn visit_scan(&mut self, meta: &NodeMeta, depth: usize, table_name: &str, alias: Option<&str>) {}
    fn visit_filter(&mut self, meta: &NodeMeta, depth: usize, predicate: &Predicate) {}
    fn visit_project(&mut self, meta: &NodeMeta, depth: usize, columns: &[Expression]) {}
    fn visit_join(
        &mut self,
        meta: &NodeMeta,
        depth: usize,
        join_type: JoinType,
        condition: &Expression,
    ) {
    }
    fn visit_aggregate(
        &mut self,
        meta: &NodeMeta,
        depth: usize,
        group_by: &[Expression],
        aggregates: &[AggregateExpr],
    ) {
    }
    fn visit_sort(&mut self, meta: &NodeMeta, depth: usize, order_by: &[SortKey]) {}
    fn visit_limit(&mut self, meta: &NodeMeta, depth: usize, limit: Option<i64>, offset: Option<i64>) {}
    fn visit_union(&mut self, meta: &NodeMeta, depth: usize, num_inputs: usize) {}
    fn visit_subquery(&mut self, meta: &NodeMeta, depth: usize, alias: Option<&str>) {}
}

/// Pre-order traversal: calls the matching hook for `plan`, then recurses
/// into its children at `depth + 1`.
pub fn walk(plan: &LogicalPlan, depth: usize, visitor: &mut impl PlanVisitor) {
    match plan {
        LogicalPlan::Scan {
            meta,
            table_name,
            alias,
        } => visitor.visit_scan(meta, depth, table_name, alias.as_deref()),
        LogicalPlan::Filter {
            meta,
            predicate,
            input,
        } => {
            visitor.visit_filter(meta, depth, predicate);
            walk(input, depth + 1, visitor);
        }
        LogicalPlan::Project {
            meta,
            columns,
            input,
        } => {
            visitor.visit_project(meta, depth, columns);
            walk(input, depth + 1, visitor);
        }
        LogicalPlan::Join {
            meta,
            join_type,
            condition,
            left,
            right,
        } => {
            visitor.visit_join(meta, depth, *join_type, condition);
            walk(left, depth + 1, visitor);
            walk(right, depth + 1, visitor);
        }
        LogicalPlan::Aggregate {
            meta,
            group_by,
            aggregates,
            input,
        } => {
            visitor.visit_aggregate(meta, depth, group_by, aggregates);
            walk(input, depth + 1, visitor);
        }
        LogicalPlan::Sort {
            meta,
            order_by,
            input,
        } => {
            visitor.visit_sort(meta, depth, order_by);
            walk(input, depth + 1, visitor);
        }
        LogicalPlan::Limit {
            meta,
            limit,
            offset,
            input,
        } => {
            visitor.visit_limit(meta, depth, *limit, *offset);
            walk(input, depth + 1, visitor);
        }
        LogicalPlan::Union { meta, inputs } => {
            visitor.visit_union(meta, depth, inputs.len());
            for i in inputs {
                walk(i, depth + 1, visitor);
            }
        }
        LogicalPlan::Subquery {
            meta,
            alias,
            input,
        } => {
            visitor.visit_subquery(meta, depth, alias.as_deref());
            walk(input, depth + 1, visitor);
        }
    }
}

/// Collects every distinct table name scanned in the plan, in first-seen
/// order, using the visitor protocol instead of a bespoke recursive match.
#[derive(Default)]
pub struct TableCollector {
    pub tables: Vec<String>,
}

impl PlanVisitor for TableCollector {
    fn visit_scan(&mut self, _meta: &NodeMeta, _depth: usize, table_name: &str, _alias: Option<&str>) {
        if !self.tables.iter().any(|t| t == table_name) {
            self.tables.push(table_name.to_string());
        }
    }
}

pub fn collect_tables(plan: &LogicalPlan) -> Vec<String> {
    let mut collector = TableCollector::default();
    walk(plan, 0, &mut collector);
    collector.tables
}
