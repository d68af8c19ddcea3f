//! Cost-based optimization pipeline: join-order swap pass, physical-operator
//! selection, and estimate propagation, producing one explain step that
//! summarizes the final plan's total cost.

mod swap;

use crate::catalog::Catalog;
use crate::cost;
use crate::physical;
use crate::plan::LogicalPlan;
use crate::rules::ExplainStep;

pub use swap::swap_pass;

/// Runs steps 2–5 of the cost-based pipeline against an already
/// rule-optimized plan: join-order swap, physical selection, estimate
/// propagation, then one summarizing `ExplainStep`.
pub fn run_cost_based(plan: LogicalPlan, catalog: &Catalog) -> (LogicalPlan, ExplainStep) {
    let before = plan.deep_clone();

    let mut optimized = swap_pass(plan, catalog);
    physical::stamp_physical_operators(&mut optimized, catalog);
    physical::propagate_estimates(&mut optimized, catalog);

    let total_cost = cost::cost(&optimized, catalog).total;
    let step = ExplainStep {
        rule_name: "CostBasedOptimization".to_string(),
        before,
        after: optimized.deep_clone(),
        description: format!("join-order swap + physical selection, final cost {total_cost:.2}"),
    };

    tracing::debug!(total_cost, "cost-based optimization complete");
    (optimized, step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Column, TableSchema};
    use crate::plan::{BinOp, DataType, Expression, JoinType};

    #[test]
    fn stamps_physical_hints_and_estimates_on_output() {
        let catalog = Catalog::new();
        catalog
            .add_table(TableSchema::new("a", vec![Column::new("id", DataType::Int, false)], 10))
            .unwrap();
        catalog
            .add_table(TableSchema::new("b", vec![Column::new("a_id", DataType::Int, false)], 20))
            .unwrap();

        let plan = LogicalPlan::join(
            JoinType::Inner,
            Expression::binary(
                BinOp::Eq,
                Expression::qualified_column("a", "id"),
                Expression::qualified_column("b", "a_id"),
            ),
            LogicalPlan::scan("a", None),
            LogicalPlan::scan("b", None),
        );
        let (optimized, step) = run_cost_based(plan, &catalog);
        assert!(optimized.estimated_rows().is_some());
        assert_eq!(step.rule_name, "CostBasedOptimization");
    }
}
