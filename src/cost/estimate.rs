//! Cardinality and cost estimation, bottom-up over the plan tree.

use super::selectivity::predicate_selectivity;
use crate::catalog::Catalog;
use crate::plan::{collect_tables, Cost, JoinType, LogicalPlan};

/// Per-tuple and per-page cost constants.
pub const CSEQ: f64 = 1.0;
pub const CRAND: f64 = 4.0;
pub const CTUP: f64 = 0.01;
pub const FJOIN: f64 = 1.5;
pub const FSORT: f64 = 2.0;
pub const FHASH: f64 = 1.2;

const UNKNOWN_SCAN_ROWS: i64 = 1000;

/// Output cardinality of `plan`, using `catalog` for row counts and the
/// selectivity oracle.
pub fn cardinality(plan: &LogicalPlan, catalog: &Catalog) -> i64 {
    estimate(plan, catalog).0
}

/// Cost tuple for `plan`.
pub fn cost(plan: &LogicalPlan, catalog: &Catalog) -> Cost {
    estimate(plan, catalog).1
}

/// Computes cardinality and cost together in one bottom-up pass, since the
/// cost of every operator depends on its children's cardinalities.
pub fn estimate(plan: &LogicalPlan, catalog: &Catalog) -> (i64, Cost) {
    match plan {
        LogicalPlan::Scan { table_name, .. } => {
            let rows = catalog
                .get_table(table_name)
                .map(|t| t.row_count)
                .unwrap_or(UNKNOWN_SCAN_ROWS);
            let pages = (rows as f64 / 100.0).max(1.0);
            let io = pages * CSEQ;
            let cpu = rows as f64 * CTUP;
            (rows, Cost::new(cpu, io, 0.0, 0.0))
        }
        LogicalPlan::Filter {
            predicate, input, ..
        } => {
            let (child_rows, child_cost) = estimate(input, catalog);
            let tables = collect_tables(input);
            let sel = predicate_selectivity(predicate, &tables, catalog);
            let rows = (child_rows as f64 * sel).round() as i64;
            let extra_cpu = child_rows as f64 * CTUP * 0.5;
            (rows, child_cost.add(Cost::new(extra_cpu, 0.0, 0.0, 0.0)))
        }
        LogicalPlan::Project { input, .. } => {
            let (child_rows, child_cost) = estimate(input, catalog);
            let extra_cpu = child_rows as f64 * CTUP * 0.1;
            (child_rows, child_cost.add(Cost::new(extra_cpu, 0.0, 0.0, 0.0)))
        }
        LogicalPlan::Join {
            join_type,
            left,
            right,
            ..
        } => {
            let (l_rows, l_cost) = estimate(left, catalog);
            let (r_rows, r_cost) = estimate(right, catalog);
            let l = l_rows as f64;
            let r = r_rows as f64;
            let rows = match join_type {
                JoinType::Inner => 0.1 * l * r,
                JoinType::Cross => l * r,
                JoinType::Left => l,
                JoinType::Right => r,
                JoinType::Full => l + r,
            };
            let extra_cpu = l * r * CTUP * FJOIN;
            let combined = l_cost.add(r_cost).add(Cost::new(extra_cpu, 0.0, 0.0, 0.0));
            (rows.round() as i64, combined)
        }
        LogicalPlan::Aggregate {
            group_by, input, ..
        } => {
            let (child_rows, child_cost) = estimate(input, catalog);
            let rows = if group_by.is_empty() {
                1
            } else {
                let estimate = 0.1 * child_rows as f64;
                estimate.max(1.0).min(child_rows as f64).round() as i64
            };
            let extra_cpu = child_rows as f64 * CTUP * FHASH;
            let extra_mem = 0.1 * child_rows as f64;
            (
                rows,
                child_cost.add(Cost::new(extra_cpu, 0.0, 0.0, extra_mem)),
            )
        }
        LogicalPlan::Sort { input, .. } => {
            let (child_rows, child_cost) = estimate(input, catalog);
            let n = child_rows as f64;
            let extra_cpu = if child_rows > 1 {
                n * n.log2() * CTUP * FSORT
            } else {
                0.0
            };
            let extra_mem = 0.2 * n;
            (
                child_rows,
                child_cost.add(Cost::new(extra_cpu, 0.0, 0.0, extra_mem)),
            )
        }
        LogicalPlan::Limit { limit, input, .. } => {
            let (child_rows, child_cost) = estimate(input, catalog);
            match limit {
                Some(k) if *k < child_rows => {
                    let factor = if child_rows > 0 {
                        *k as f64 / child_rows as f64
                    } else {
                        1.0
                    };
                    (*k, child_cost.scale(factor))
                }
                Some(_) => (child_rows, child_cost),
                None => (child_rows, child_cost),
            }
        }
        LogicalPlan::Union { inputs, .. } => {
            let mut rows = 0i64;
            let mut total = Cost::ZERO;
            for i in inputs {
                let (r, c) = estimate(i, catalog);
                rows += r;
                total = total.add(c);
            }
            (rows, total)
        }
        LogicalPlan::Subquery { input, .. } => estimate(input, catalog),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Column as CatColumn, TableSchema};
    use crate::plan::{BinOp, DataType, Expression, LiteralValue, Predicate};

    fn catalog_with(name: &str, row_count: i64, ndv: Option<u64>) -> Catalog {
        let catalog = Catalog::new();
        let mut col = CatColumn::new("age", DataType::Int, true);
        if let Some(n) = ndv {
            col = col.with_ndv(n);
        }
        catalog
            .add_table(TableSchema::new(name, vec![col], row_count))
            .unwrap();
        catalog
    }

    #[test]
    fn scan_cardinality_is_catalog_row_count() {
        let catalog = catalog_with("orders", 2000, None);
        let plan = LogicalPlan::scan("orders", None);
        assert_eq!(cardinality(&plan, &catalog), 2000);
    }

    #[test]
    fn scan_unknown_table_defaults_to_1000() {
        let catalog = Catalog::new();
        let plan = LogicalPlan::scan("ghost", None);
        assert_eq!(cardinality(&plan, &catalog), 1000);
    }

    #[test]
    fn filter_applies_range_selectivity() {
        let catalog = catalog_with("customers", 5000, Some(70));
        let plan = LogicalPlan::filter(
            Predicate::new(Expression::binary(
                BinOp::Gt,
                Expression::column("age"),
                Expression::literal(LiteralValue::Int(30)),
            )),
            LogicalPlan::scan("customers", None),
        );
        assert_eq!(cardinality(&plan, &catalog), 1650);
    }

    #[test]
    fn inner_join_uses_tenth_of_product() {
        let catalog = Catalog::new();
        let plan = LogicalPlan::join(
            JoinType::Inner,
            Expression::binary(
                BinOp::Eq,
                Expression::qualified_column("a", "id"),
                Expression::qualified_column("b", "id"),
            ),
            LogicalPlan::scan("a", None),
            LogicalPlan::scan("b", None),
        );
        // both unknown -> 1000 rows each
        assert_eq!(cardinality(&plan, &catalog), 100_000);
    }

    #[test]
    fn limit_caps_at_k() {
        let catalog = catalog_with("t", 500, None);
        let plan = LogicalPlan::limit(Some(50), None, LogicalPlan::scan("t", None));
        assert_eq!(cardinality(&plan, &catalog), 50);
    }

    #[test]
    fn limit_larger_than_input_is_identity() {
        let catalog = catalog_with("t", 10, None);
        let plan = LogicalPlan::limit(Some(50), None, LogicalPlan::scan("t", None));
        assert_eq!(cardinality(&plan, &catalog), 10);
    }

    #[test]
    fn aggregate_with_empty_group_by_is_one_row() {
        let catalog = catalog_with("t", 1000, None);
        let plan = LogicalPlan::aggregate(vec![], vec![], LogicalPlan::scan("t", None));
        assert_eq!(cardinality(&plan, &catalog), 1);
    }

    #[test]
    fn cost_increases_monotonically_with_more_rows() {
        let small = catalog_with("t", 100, None);
        let big = catalog_with("t", 100_000, None);
        let c_small = cost(&LogicalPlan::scan("t", None), &small);
        let c_big = cost(&LogicalPlan::scan("t", None), &big);
        assert!(c_big.total > c_small.total);
    }
}
