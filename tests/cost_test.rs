// Black-box coverage of bottom-up cardinality/cost estimation across the
// full operator set.

use query_optimizer::catalog::{Catalog, Column, TableSchema};
use query_optimizer::cost::{cardinality, cost};
use query_optimizer::plan::{AggregateExpr, AggregateType, BinOp, DataType, Expression, JoinType, LogicalPlan};

fn catalog_with_two_tables(small_rows: i64, big_rows: i64) -> Catalog {
    let catalog = Catalog::new();
    catalog
        .add_table(TableSchema::new("small", vec![Column::new("id", DataType::Int, false)], small_rows))
        .unwrap();
    catalog
        .add_table(TableSchema::new("big", vec![Column::new("small_id", DataType::Int, false)], big_rows))
        .unwrap();
    catalog
}

#[test]
fn cross_join_multiplies_row_counts_exactly() {
    let catalog = catalog_with_two_tables(10, 20);
    let plan = LogicalPlan::join(
        JoinType::Cross,
        Expression::literal(query_optimizer::plan::LiteralValue::Bool(true)),
        LogicalPlan::scan("small", None),
        LogicalPlan::scan("big", None),
    );
    assert_eq!(cardinality(&plan, &catalog), 200);
}

#[test]
fn left_join_cardinality_equals_left_side_row_count() {
    let catalog = catalog_with_two_tables(10, 20);
    let plan = LogicalPlan::join(
        JoinType::Left,
        Expression::binary(
            BinOp::Eq,
            Expression::qualified_column("small", "id"),
            Expression::qualified_column("big", "small_id"),
        ),
        LogicalPlan::scan("small", None),
        LogicalPlan::scan("big", None),
    );
    assert_eq!(cardinality(&plan, &catalog), 10);
}

#[test]
fn full_join_cardinality_is_the_sum_of_both_sides() {
    let catalog = catalog_with_two_tables(10, 20);
    let plan = LogicalPlan::join(
        JoinType::Full,
        Expression::binary(
            BinOp::Eq,
            Expression::qualified_column("small", "id"),
            Expression::qualified_column("big", "small_id"),
        ),
        LogicalPlan::scan("small", None),
        LogicalPlan::scan("big", None),
    );
    assert_eq!(cardinality(&plan, &catalog), 30);
}

#[test]
fn project_does_not_change_row_count() {
    let catalog = catalog_with_two_tables(10, 20);
    let plan = LogicalPlan::project(vec![Expression::column("id")], LogicalPlan::scan("small", None));
    assert_eq!(cardinality(&plan, &catalog), 10);
}

#[test]
fn aggregate_without_group_by_is_always_a_single_row() {
    let catalog = catalog_with_two_tables(10, 20);
    let plan = LogicalPlan::aggregate(
        vec![],
        vec![AggregateExpr {
            agg_type: AggregateType::Count,
            column: None,
            alias: Some("n".to_string()),
        }],
        LogicalPlan::scan("big", None),
    );
    assert_eq!(cardinality(&plan, &catalog), 1);
}

#[test]
fn union_cardinality_sums_every_input() {
    let catalog = catalog_with_two_tables(10, 20);
    let plan = LogicalPlan::Union {
        meta: query_optimizer::plan::NodeMeta::fresh(),
        inputs: vec![LogicalPlan::scan("small", None), LogicalPlan::scan("big", None)],
    };
    assert_eq!(cardinality(&plan, &catalog), 30);
}

#[test]
fn subquery_cardinality_passes_through_its_input() {
    let catalog = catalog_with_two_tables(10, 20);
    let plan = LogicalPlan::Subquery {
        meta: query_optimizer::plan::NodeMeta::fresh(),
        alias: Some("s".to_string()),
        input: Box::new(LogicalPlan::scan("small", None)),
    };
    assert_eq!(cardinality(&plan, &catalog), 10);
}

#[test]
fn join_cost_dominates_over_its_childrens_cost() {
    let catalog = catalog_with_two_tables(10, 20);
    let left = LogicalPlan::scan("small", None);
    let right = LogicalPlan::scan("big", None);
    let left_cost = cost(&left, &catalog).total;
    let right_cost = cost(&right, &catalog).total;

    let join = LogicalPlan::join(
        JoinType::Inner,
        Expression::binary(
            BinOp::Eq,
            Expression::qualified_column("small", "id"),
            Expression::qualified_column("big", "small_id"),
        ),
        left,
        right,
    );
    assert!(cost(&join, &catalog).total > left_cost + right_cost);
}

#[test]
fn sort_adds_no_cpu_cost_for_a_single_row_input() {
    let catalog = Catalog::new();
    catalog
        .add_table(TableSchema::new("one_row", vec![Column::new("id", DataType::Int, false)], 1))
        .unwrap();
    let scan_cost = cost(&LogicalPlan::scan("one_row", None), &catalog);
    let sort_cost = cost(&LogicalPlan::sort(vec![], LogicalPlan::scan("one_row", None)), &catalog);
    assert_eq!(scan_cost.cpu, sort_cost.cpu);
}
