//! `PredicatePushdown` moves filters closer to the scans they constrain.
//!
//! Two shapes are rewritten:
//! - `Filter(p, Project(π, c))` → `Project(π, Filter(p, c))` when none of
//!   `π`'s entries rename or compute the columns `p` references.
//! - `Filter(p, Join(...))` → push `p` below whichever child produces every
//!   column it references; leave predicates that straddle both sides above
//!   the join.
//!
//! `changed` is reported true only when a structural rewrite actually
//! occurred, never merely because a predicate was *found* pushable.

use super::engine::Rule;
use crate::error::Result;
use crate::plan::{walk, Expression, LogicalPlan, PlanVisitor};
use std::collections::HashSet;

pub struct PredicatePushdown;

impl Rule for PredicatePushdown {
    fn name(&self) -> &'static str {
        "PredicatePushdown"
    }

    fn apply(&self, plan: LogicalPlan) -> Result<(LogicalPlan, bool)> {
        Ok(rewrite(plan))
    }
}

/// Every qualifier (table name or alias) a subtree could produce columns
/// under — used to test whether a predicate is entirely satisfied by one
/// side of a join.
#[derive(Default)]
struct QualifierCollector {
    qualifiers: HashSet<String>,
}

impl PlanVisitor for QualifierCollector {
    fn visit_scan(
        &mut self,
        _meta: &crate::plan::NodeMeta,
        _depth: usize,
        table_name: &str,
        alias: Option<&str>,
    ) {
        self.qualifiers.insert(table_name.to_string());
        if let Some(a) = alias {
            self.qualifiers.insert(a.to_string());
        }
    }
}

fn producible_qualifiers(plan: &LogicalPlan) -> HashSet<String> {
    let mut collector = QualifierCollector::default();
    walk(plan, 0, &mut collector);
    collector.qualifiers
}

/// True when every column `predicate`'s expression references is a direct
/// passthrough entry in `columns` (or `columns` is the `[*]` identity).
fn pushable_through_project(expr: &Expression, columns: &[Expression]) -> bool {
    if is_identity_projection(columns) {
        return true;
    }
    let mut refs = HashSet::new();
    expr.referenced_columns(&mut refs);
    refs.iter().all(|(qualifier, name)| {
        columns.iter().any(|c| match c {
            Expression::Column {
                qualifier: cq,
                name: cn,
            } => cn == name && (cq == qualifier || cq.is_none() || qualifier.is_none()),
            _ => false,
        })
    })
}

fn is_identity_projection(columns: &[Expression]) -> bool {
    matches!(
        columns,
        [Expression::Column { qualifier: None, name }] if name == "*"
    )
}

fn qualifiers_of(expr: &Expression) -> HashSet<String> {
    let mut refs = HashSet::new();
    expr.referenced_columns(&mut refs);
    refs.into_iter().filter_map(|(q, _)| q).collect()
}

fn rewrite(plan: LogicalPlan) -> (LogicalPlan, bool) {
    match plan {
        LogicalPlan::Filter {
            meta,
            predicate,
            input,
        } => {
            let (input, mut changed) = rewrite(*input);
            match input {
                LogicalPlan::Project {
                    meta: project_meta,
                    columns,
                    input: project_input,
                } if pushable_through_project(&predicate.expr, &columns) => {
                    changed = true;
                    let new_filter = LogicalPlan::Filter {
                        meta,
                        predicate,
                        input: project_input,
                    };
                    (
                        LogicalPlan::Project {
                            meta: project_meta,
                            columns,
                            input: Box::new(new_filter),
                        },
                        changed,
                    )
                }
                LogicalPlan::Join {
                    meta: join_meta,
                    join_type,
                    condition,
                    left,
                    right,
                } => {
                    let predicate_qualifiers = qualifiers_of(&predicate.expr);
                    if predicate_qualifiers.is_empty() {
                        return (
                            LogicalPlan::Filter {
                                meta,
                                predicate,
                                input: Box::new(LogicalPlan::Join {
                                    meta: join_meta,
                                    join_type,
                                    condition,
                                    left,
                                    right,
                                }),
                            },
                            changed,
                        );
                    }
                    let left_qualifiers = producible_qualifiers(&left);
                    let right_qualifiers = producible_qualifiers(&right);
                    if predicate_qualifiers.is_subset(&left_qualifiers) {
                        let new_left = LogicalPlan::Filter {
                            meta,
                            predicate,
                            input: left,
                        };
                        (
                            LogicalPlan::Join {
                                meta: join_meta,
                                join_type,
                                condition,
                                left: Box::new(new_left),
                                right,
                            },
                            true,
                        )
                    } else if predicate_qualifiers.is_subset(&right_qualifiers) {
                        let new_right = LogicalPlan::Filter {
                            meta,
                            predicate,
                            input: right,
                        };
                        (
                            LogicalPlan::Join {
                                meta: join_meta,
                                join_type,
                                condition,
                                left,
                                right: Box::new(new_right),
                            },
                            true,
                        )
                    } else {
                        (
                            LogicalPlan::Filter {
                                meta,
                                predicate,
                                input: Box::new(LogicalPlan::Join {
                                    meta: join_meta,
                                    join_type,
                                    condition,
                                    left,
                                    right,
                                }),
                            },
                            changed,
                        )
                    }
                }
                other => (
                    LogicalPlan::Filter {
                        meta,
                        predicate,
                        input: Box::new(other),
                    },
                    changed,
                ),
            }
        }
        LogicalPlan::Project {
            meta,
            columns,
            input,
        } => {
            let (input, changed) = rewrite(*input);
            (
                LogicalPlan::Project {
                    meta,
                    columns,
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
