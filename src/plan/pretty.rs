//! Indented textual pretty-printer, with per-node row/cost annotations when
//! present. Implemented against the visitor protocol rather than a bespoke
//! recursive `match`.

use super::expression::{Expression, Predicate};
use super::node::{AggregateExpr, JoinType, LogicalPlan, NodeMeta, SortKey};
use super::visitor::{walk, PlanVisitor};
use std::fmt::Write as _;

#[derive(Default)]
struct PrettyPrinter {
    out: String,
}

impl PrettyPrinter {
    fn line(&mut self, depth: usize, meta: &NodeMeta, body: &str) {
        let indent = "  ".repeat(depth);
        let _ = write!(self.out, "{indent}{body}");
        if let Some(rows) = meta.estimated_rows {
            let _ = write!(self.out, "  [rows={rows}");
            if let Some(cost) = meta.estimated_cost {
                let _ = write!(self.out, ", cost={:.2}", cost.total);
            }
            self.out.push(']');
        } else if let Some(cost) = meta.estimated_cost {
            let _ = write!(self.out, "  [cost={:.2}]", cost.total);
        }
        self.out.push('\n');
    }
}

impl PlanVisitor for PrettyPrinter {
    fn visit_scan(&mut self, meta: &NodeMeta, depth: usize, table_name: &str, alias: Option<&str>) {
        let body = match alias {
            Some(a) => format!("Scan({table_name} AS {a})"),
            None => format!("Scan({table_name})"),
        };
        self.line(depth, meta, &body);
    }

    fn visit_filter(&mut self, meta: &NodeMeta, depth: usize, predicate: &Predicate) {
        self.line(depth, meta, &format!("Filter({predicate})"));
    }

    fn visit_project(&mut self, meta: &NodeMeta, depth: usize, columns: &[Expression]) {
        let cols = columns
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        self.line(depth, meta, &format!("Project([{cols}])"));
    }

    fn visit_join(&mut self, meta: &NodeMeta, depth: usize, join_type: JoinType, condition: &Expression) {
        self.line(depth, meta, &format!("Join({join_type:?}, {condition})"));
    }

    fn visit_aggregate(
        &mut self,
        meta: &NodeMeta,
        depth: usize,
        group_by: &[Expression],
        aggregates: &[AggregateExpr],
    ) {
        let gb = group_by
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let aggs = aggregates
            .iter()
            .map(|a| format!("{:?}({})", a.agg_type, a.column.as_ref().map(|c| c.to_string()).unwrap_or_default()))
            .collect::<Vec<_>>()
            .join(", ");
        self.line(depth, meta, &format!("Aggregate(group_by=[{gb}], aggs=[{aggs}])"));
    }

    fn visit_sort(&mut self, meta: &NodeMeta, depth: usize, order_by: &[SortKey]) {
        let keys = order_by
            .iter()
            .map(|k| format!("{} {}", k.expression, if k.ascending { "ASC" } else { "DESC" }))
            .collect::<Vec<_>>()
            .join(", ");
        self.line(depth, meta, &format!("Sort([{keys}])"));
    }

    fn visit_limit(&mut self, meta: &NodeMeta, depth: usize, limit: Option<i64>, offset: Option<i64>) {
        self.line(
            depth,
            meta,
            &format!("Limit(limit={limit:?}, offset={offset:?})"),
        );
    }

    fn visit_union(&mut self, meta: &NodeMeta, depth: usize, num_inputs: usize) {
        self.line(depth, meta, &format!("Union(inputs={num_inputs})"));
    }

    fn visit_subquery(&mut self, meta: &NodeMeta, depth: usize, alias: Option<&str>) {
        self.line(depth, meta, &format!("Subquery(alias={alias:?})"));
    }
}

/// Renders `plan` as indented text, one line per node, with
/// `[rows=.., cost=..]` annotations where estimates have been stamped.
pub fn pretty_print(plan: &LogicalPlan) -> String {
    let mut printer = PrettyPrinter::default();
    walk(plan, 0, &mut printer);
    printer.out
}
