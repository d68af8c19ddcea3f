//! Physical-operator selection: pure threshold rules that turn a logical
//! node into a concrete scan/join/aggregate/sort algorithm, plus the
//! bottom-up passes that stamp those choices and the cardinality/cost
//! estimates onto a finished tree.
//!
//! Kept as a standalone module (rather than folded into the cost-based
//! optimizer) because the enumerator also needs the scan-strategy choice
//! for its single-table base case, and neither side should depend on the
//! other.

use crate::catalog::Catalog;
use crate::cost;
use crate::plan::{
    AggregateOperator, JoinOperator, LogicalPlan, PhysicalHint, ScanType, SortOperator,
};

const NESTED_LOOP_ROW_THRESHOLD: i64 = 1_000;
const SORT_MERGE_ROW_THRESHOLD: i64 = 1_000_000;
const HASH_AGGREGATE_OUTPUT_THRESHOLD: i64 = 10_000;
const QUICKSORT_ROW_THRESHOLD: i64 = 100_000;

/// Sequential unless the catalog has at least one index on the table, in
/// which case its leading index is used.
pub fn choose_scan_type(table_name: &str, catalog: &Catalog) -> ScanType {
    match catalog.get_table(table_name) {
        Ok(schema) => match schema.indexes.first() {
            Some(index) => ScanType::Index {
                index_name: index.name.clone(),
            },
            None => ScanType::Sequential,
        },
        Err(_) => ScanType::Sequential,
    }
}

/// Nested loop when both sides are small, sort-merge when both sides are
/// huge, hash join (building on the smaller side) otherwise.
pub fn select_join_operator(left_rows: i64, right_rows: i64) -> JoinOperator {
    if left_rows < NESTED_LOOP_ROW_THRESHOLD && right_rows < NESTED_LOOP_ROW_THRESHOLD {
        JoinOperator::NestedLoop
    } else if left_rows > SORT_MERGE_ROW_THRESHOLD && right_rows > SORT_MERGE_ROW_THRESHOLD {
        JoinOperator::SortMerge
    } else {
        JoinOperator::Hash {
            build_left: left_rows < right_rows,
        }
    }
}

/// Hash aggregation unless there's a grouping key and the expected number
/// of groups is large enough that a sorted sweep is cheaper.
pub fn select_aggregate_operator(has_group_by: bool, estimated_output_rows: i64) -> AggregateOperator {
    if !has_group_by || estimated_output_rows < HASH_AGGREGATE_OUTPUT_THRESHOLD {
        AggregateOperator::Hash
    } else {
        AggregateOperator::Sort
    }
}

/// In-memory quicksort below the threshold, external merge sort above it.
pub fn select_sort_operator(input_rows: i64) -> SortOperator {
    if input_rows < QUICKSORT_ROW_THRESHOLD {
        SortOperator::Quicksort
    } else {
        SortOperator::ExternalSort
    }
}

/// Bottom-up pass stamping each node's `PhysicalHint` in place. Children are
/// visited first since join/aggregate/sort selection depends on child
/// cardinalities.
pub fn stamp_physical_operators(plan: &mut LogicalPlan, catalog: &Catalog) {
    for child in plan.children_mut() {
        stamp_physical_operators(child, catalog);
    }
    match plan {
        LogicalPlan::Scan { meta, table_name, .. } => {
            meta.physical = PhysicalHint::Scan {
                scan_type: choose_scan_type(table_name, catalog),
            };
        }
        LogicalPlan::Join { meta, left, right, .. } => {
            let left_rows = cost::cardinality(left, catalog);
            let right_rows = cost::cardinality(right, catalog);
            meta.physical = PhysicalHint::Join {
                operator: select_join_operator(left_rows, right_rows),
            };
        }
        LogicalPlan::Aggregate {
            meta,
            group_by,
            input,
            ..
        } => {
            let has_group_by = !group_by.is_empty();
            let output_rows = if has_group_by {
                (cost::cardinality(input, catalog) as f64 * 0.1).max(1.0) as i64
            } else {
                1
            };
            meta.physical = PhysicalHint::Aggregate {
                operator: select_aggregate_operator(has_group_by, output_rows),
            };
        }
        LogicalPlan::Sort { meta, input, .. } => {
            let input_rows = cost::cardinality(input, catalog);
            meta.physical = PhysicalHint::Sort {
                operator: select_sort_operator(input_rows),
            };
        }
        _ => {}
    }
}

/// Bottom-up pass stamping each node's `estimated_rows`/`estimated_cost`
/// from the cost model. Run after physical selection, though the two are
/// independent: cost formulas don't read `PhysicalHint`.
pub fn propagate_estimates(plan: &mut LogicalPlan, catalog: &Catalog) {
    for child in plan.children_mut() {
        propagate_estimates(child, catalog);
    }
    let (rows, node_cost) = cost::estimate(plan, catalog);
    plan.set_estimates(rows, node_cost);
}
