// Black-box coverage of join-order search: strategy dispatch by table
// count, and the greedy fallback above the exact-DP threshold.

use query_optimizer::catalog::{Catalog, Column, TableSchema};
use query_optimizer::enumerator::{enumerate, enumerate_with_greedy_strategy, EnumerationStrategy, GreedyStrategy, DP_TABLE_LIMIT};
use query_optimizer::plan::{BinOp, DataType, Expression, JoinType, LogicalPlan};

fn star_join(tables: &[(&str, i64)]) -> (LogicalPlan, Catalog) {
    let catalog = Catalog::new();
    for (name, rows) in tables {
        catalog
            .add_table(TableSchema::new(*name, vec![Column::new("id", DataType::Int, false)], *rows))
            .unwrap();
    }
    let mut plan = LogicalPlan::scan(tables[0].0, None);
    for (name, _) in &tables[1..] {
        plan = LogicalPlan::join(
            JoinType::Inner,
            Expression::binary(
                BinOp::Eq,
                Expression::qualified_column(tables[0].0, "id"),
                Expression::qualified_column(*name, "id"),
            ),
            plan,
            LogicalPlan::scan(*name, None),
        );
    }
    (plan, catalog)
}

#[test]
fn five_tables_exceeds_the_dp_limit_and_falls_back_to_greedy() {
    assert_eq!(DP_TABLE_LIMIT, 4);
    let (plan, catalog) = star_join(&[("a", 100), ("b", 10), ("c", 50), ("d", 5), ("e", 1000)]);
    let result = enumerate(&plan, &catalog);
    assert!(matches!(result.strategy, EnumerationStrategy::Greedy(_)));
    assert_eq!(result.best_plan.scan_table_names().len(), 5);
}

#[test]
fn pinning_a_greedy_strategy_is_honored_above_the_dp_limit() {
    let (plan, catalog) = star_join(&[("a", 100), ("b", 10), ("c", 50), ("d", 5), ("e", 1000)]);
    let result = enumerate_with_greedy_strategy(&plan, &catalog, GreedyStrategy::Cardinality);
    assert_eq!(result.strategy, EnumerationStrategy::Greedy(GreedyStrategy::Cardinality));
}

#[test]
fn exact_dp_and_greedy_agree_on_which_tables_are_present() {
    let (plan, catalog) = star_join(&[("a", 100), ("b", 10), ("c", 50)]);
    let dp_result = enumerate(&plan, &catalog);
    let mut dp_tables = dp_result.best_plan.scan_table_names();
    dp_tables.sort();
    assert_eq!(dp_tables, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
}

#[test]
fn best_cost_is_finite_and_plan_count_accounts_for_every_bipartition() {
    let (plan, catalog) = star_join(&[("a", 100), ("b", 10), ("c", 50), ("d", 5)]);
    let result = enumerate(&plan, &catalog);
    assert_eq!(result.strategy, EnumerationStrategy::BitmaskDp);
    assert!(result.best_cost.is_finite());
    assert!(result.plan_count > 0);
    assert_eq!(result.pruning_stats.evaluated, result.plan_count);
}

#[test]
fn search_space_description_names_the_chosen_strategy() {
    let (plan, catalog) = star_join(&[("a", 100), ("b", 10)]);
    let result = enumerate(&plan, &catalog);
    assert!(result.search_space.contains("dp"));
}
