//! `ProjectionPushdown` removes identity (`select *`) projections. Full
//! column-pruning pushdown is left as a reserved extension point.

use super::engine::Rule;
use crate::error::Result;
use crate::plan::{Expression, LogicalPlan};

pub struct ProjectionPushdown;

impl Rule for ProjectionPushdown {
    fn name(&self) -> &'static str {
        "ProjectionPushdown"
    }

    fn apply(&self, plan: LogicalPlan) -> Result<(LogicalPlan, bool)> {
        Ok(rewrite(plan))
    }
}

fn is_identity(columns: &[Expression]) -> bool {
    matches!(
        columns,
        [Expression::Column { qualifier: None, name }] if name == "*"
    )
}

fn rewrite(plan: LogicalPlan) -> (LogicalPlan, bool) {
    match plan {
        LogicalPlan::Project {
            columns, input, ..
        } => {
            let (input, child_changed) = rewrite(*input);
            if is_identity(&columns) {
                (input, true)
            } else {
                (
                    LogicalPlan::Project {
                        meta: crate::plan::NodeMeta::fresh(),
                        columns,
                        input: Box::new(input),
                    },
                    child_changed,
                )
            }
        }
        LogicalPlan::Filter {
            meta,
            predicate,
            input,
        } => {
            let (input, changed) = rewrite(*input);
            (
                LogicalPlan::Filter {
                    meta,
                    predicate,
                    input: Box::new(input),
                },
                changed,
            )
        }
        LogicalPlan::Join {
            meta,
            join_type,
            condition,
            left,
            right,
        } => {
            let (left, left_changed) = rewrite(*left);
            let (right, right_changed) = rewrite(*right);
            (
                LogicalPlan::Join {
                    meta,
                    join_type,
                    condition,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                left_changed || right_changed,
            )
        }
        LogicalPlan::Aggregate {
            meta,
            group_by,
            aggregates,
            input,
        } => {
            let (input, changed) = rewrite(*input);
            (
                LogicalPlan::Aggregate {
                    meta,
                    group_by,
                    aggregates,
                    input: Box::new(input),
                },
                changed,
            )
        }
        LogicalPlan::Sort {
            meta,
            order_by,
            input,
        } => {
            let (input, changed) = rewrite(*input);
            (
                LogicalPlan::Sort {
                    meta,
                    order_by,
                    input: Box::new(input),
                },
                changed,
            )
        }
        LogicalPlan::Limit {
            meta,
            limit,
            offset,
            input,
        } => {
            let (input, changed) = rewrite(*input);
            (
                LogicalPlan::Limit {
                    meta,
                    limit,
                    offset,
                    input: Box::new(input),
                },
                changed,
            )
        }
        LogicalPlan::Subquery { meta, alias, input } => {
            let (input, changed) = rewrite(*input);
            (
                LogicalPlan::Subquery {
                    meta,
                    alias,
                    input: Box::new(input),
                },
                changed,
            )
        }
        other @ (LogicalPlan::Scan { .. } | LogicalPlan::Union { .. }) => (other, false),
    }
}
