//! Canonical plan signatures: variant tag plus table name (for scans) plus
//! parenthesized signatures of children, in order. Used for dedup during
//! join-order enumeration — never a substitute for node ids.

use super::node::LogicalPlan;

fn variant_tag(plan: &LogicalPlan) -> &'static str {
    match plan {
        LogicalPlan::Scan { .. } => "Scan",
        LogicalPlan::Filter { .. } => "Filter",
        LogicalPlan::Project { .. } => "Project",
        LogicalPlan::Join { .. } => "Join",
        LogicalPlan::Aggregate { .. } => "Aggregate",
        LogicalPlan::Sort { .. } => "Sort",
        LogicalPlan::Limit { .. } => "Limit",
        LogicalPlan::Union { .. } => "Union",
        LogicalPlan::Subquery { .. } => "Subquery",
    }
}

pub fn plan_signature(plan: &LogicalPlan) -> String {
    let mut sig = String::from(variant_tag(plan));
    if let LogicalPlan::Scan { table_name, .. } = plan {
        sig.push(':');
        sig.push_str(table_name);
    }
    let children = plan.children();
    if !children.is_empty() {
        sig.push('(');
        for (i, c) in children.iter().enumerate() {
            if i > 0 {
                sig.push(',');
            }
            sig.push_str(&plan_signature(c));
        }
        sig.push(')');
    }
    sig
}
