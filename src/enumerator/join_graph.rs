//! Extracts a join graph (tables plus the two-table comparisons connecting
//! them) from a plan tree, as the starting point for join-order search.

use crate::catalog::Catalog;
use crate::plan::{BinOp, Expression, JoinType, LogicalPlan};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TableInfo {
    pub name: String,
    pub alias: Option<String>,
    pub cardinality: i64,
}

#[derive(Debug, Clone)]
pub struct JoinEdge {
    pub left: usize,
    pub right: usize,
    pub join_type: JoinType,
    pub condition: Expression,
    pub selectivity: f64,
}

#[derive(Debug, Clone, Default)]
pub struct JoinGraph {
    pub tables: Vec<TableInfo>,
    pub edges: Vec<JoinEdge>,
}

impl JoinGraph {
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Every edge with one endpoint in `left_mask` and the other in
    /// `right_mask` (masks are sets of table indices, not single tables).
    pub fn edges_between(&self, left_mask: u32, right_mask: u32) -> Vec<&JoinEdge> {
        self.edges
            .iter()
            .filter(|e| {
                let (lb, rb) = (1u32 << e.left, 1u32 << e.right);
                (left_mask & lb != 0 && right_mask & rb != 0) || (left_mask & rb != 0 && right_mask & lb != 0)
            })
            .collect()
    }

    pub fn is_connected(&self, left_mask: u32, right_mask: u32) -> bool {
        self.edges.iter().any(|e| {
            let (lb, rb) = (1u32 << e.left, 1u32 << e.right);
            (left_mask & lb != 0 && right_mask & rb != 0) || (left_mask & rb != 0 && right_mask & lb != 0)
        })
    }
}

/// Default ranking selectivity for a join edge, independent of catalog
/// statistics: equality is assumed selective, range comparisons middling,
/// anything else unselective.
fn edge_selectivity(op: BinOp) -> f64 {
    match op {
        BinOp::Eq => 0.1,
        BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => 0.33,
        _ => 0.5,
    }
}

pub fn extract(plan: &LogicalPlan, catalog: &Catalog) -> JoinGraph {
    let mut tables = Vec::new();
    let mut qualifiers: HashMap<String, usize> = HashMap::new();
    collect_tables(plan, catalog, &mut tables, &mut qualifiers);

    let mut edges = Vec::new();
    collect_edges(plan, &qualifiers, &mut edges);

    JoinGraph { tables, edges }
}

fn collect_tables(
    plan: &LogicalPlan,
    catalog: &Catalog,
    tables: &mut Vec<TableInfo>,
    qualifiers: &mut HashMap<String, usize>,
) {
    if let LogicalPlan::Scan { table_name, alias, .. } = plan {
        let key = alias.clone().unwrap_or_else(|| table_name.clone());
        if !qualifiers.contains_key(&key) {
            let idx = tables.len();
            let cardinality = catalog
                .get_table(table_name)
                .map(|t| t.row_count)
                .unwrap_or(1000);
            tables.push(TableInfo {
                name: table_name.clone(),
                alias: alias.clone(),
                cardinality,
            });
            qualifiers.insert(table_name.clone(), idx);
            if let Some(a) = alias {
                qualifiers.insert(a.clone(), idx);
            }
        }
    }
    for child in plan.children() {
        collect_tables(child, catalog, tables, qualifiers);
    }
}

fn collect_edges(plan: &LogicalPlan, qualifiers: &HashMap<String, usize>, edges: &mut Vec<JoinEdge>) {
    if let LogicalPlan::Join {
        join_type,
        condition,
        ..
    } = plan
    {
        if let Some((op, (lq, _), (rq, _))) = condition.as_two_table_comparison() {
            if let (Some(&left), Some(&right)) = (qualifiers.get(lq), qualifiers.get(rq)) {
                if left != right {
                    edges.push(JoinEdge {
                        left,
                        right,
                        join_type: *join_type,
                        condition: condition.clone(),
                        selectivity: edge_selectivity(op),
                    });
                }
            }
        }
    }
    for child in plan.children() {
        collect_edges(child, qualifiers, edges);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Column, TableSchema};
    use crate::plan::DataType;

    fn catalog_with(tables: &[(&str, i64)]) -> Catalog {
        let catalog = Catalog::new();
        for (name, rows) in tables {
            catalog
                .add_table(TableSchema::new(*name, vec![Column::new("id", DataType::Int, false)], *rows))
                .unwrap();
        }
        catalog
    }

    #[test]
    fn extracts_two_tables_and_one_edge() {
        let catalog = catalog_with(&[("a", 100), ("b", 200)]);
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
        let graph = extract(&plan, &catalog);
        assert_eq!(graph.table_count(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert!(graph.is_connected(0b01, 0b10));
    }

    #[test]
    fn unrelated_tables_have_no_edge() {
        let catalog = catalog_with(&[("a", 100), ("b", 200), ("c", 300)]);
        let join = LogicalPlan::join(
            JoinType::Cross,
            Expression::literal(crate::plan::LiteralValue::Bool(true)),
            LogicalPlan::scan("a", None),
            LogicalPlan::scan("b", None),
        );
        let plan = LogicalPlan::join(
            JoinType::Cross,
            Expression::literal(crate::plan::LiteralValue::Bool(true)),
            join,
            LogicalPlan::scan("c", None),
        );
        let graph = extract(&plan, &catalog);
        assert_eq!(graph.table_count(), 3);
        assert!(graph.edges.is_empty());
    }
}
