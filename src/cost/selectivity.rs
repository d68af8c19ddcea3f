//! Predicate selectivity resolution used by the cardinality function.
//!
//! A predicate's selectivity is resolved through the catalog oracle when
//! it can be pinned to a single table/column; otherwise it falls back to
//! the same constants the oracle uses when a column's NDV is unknown.

use crate::catalog::Catalog;
use crate::plan::{BinOp, Expression, Predicate};

fn default_selectivity(op: BinOp) -> f64 {
    match op {
        BinOp::Eq => 0.1,
        BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => 0.33,
        BinOp::Like => 0.1,
        _ => 0.5,
    }
}

/// If one side of a binary expression is a column and the other a literal,
/// returns `(qualifier, column_name, literal_text)`.
fn column_and_literal<'a>(
    left: &'a Expression,
    right: &'a Expression,
) -> Option<(Option<&'a str>, &'a str, String)> {
    match (left, right) {
        (Expression::Column { qualifier, name }, Expression::Literal { value, .. }) => {
            Some((qualifier.as_deref(), name.as_str(), value.to_string()))
        }
        (Expression::Literal { value, .. }, Expression::Column { qualifier, name }) => {
            Some((qualifier.as_deref(), name.as_str(), value.to_string()))
        }
        _ => None,
    }
}

/// Resolves `sel(p)` for a `Filter` whose child scans `available_tables`.
pub fn predicate_selectivity(
    predicate: &Predicate,
    available_tables: &[String],
    catalog: &Catalog,
) -> f64 {
    let Expression::BinaryOp { op, left, right } = &predicate.expr else {
        return 0.5;
    };
    if matches!(op, BinOp::And | BinOp::Or) {
        return 0.5;
    }

    if let Some((qualifier, column, literal)) = column_and_literal(left, right) {
        let table = qualifier
            .map(|q| q.to_string())
            .or_else(|| (available_tables.len() == 1).then(|| available_tables[0].clone()));
        if let Some(table) = table {
            if let Ok(sel) = catalog.selectivity(&table, column, *op, &literal) {
                return sel;
            }
        }
    }
    default_selectivity(*op)
}
