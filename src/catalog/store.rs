//! Catalog: table/column metadata, statistics, and the selectivity oracle,
//! with many concurrent readers and mutually exclusive writers.

use super::schema::{Column, Histogram, TableSchema};
use crate::error::{OptError, Result};
use crate::plan::BinOp;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-column statistics overwrite: only the fields present are
/// overwritten, matching columns by name.
#[derive(Debug, Clone, Default)]
pub struct ColumnStatsUpdate {
    pub ndv: Option<u64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub histogram: Option<Histogram>,
    pub null_count: Option<u64>,
}

/// A reader/writer map from table name to schema. Readers take a read
/// lock and clone out an independent snapshot rather than holding a guard
/// across their work, so writers are never starved by long-lived readers.
#[derive(Clone, Default)]
pub struct Catalog {
    tables: Arc<RwLock<HashMap<String, TableSchema>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog {
            tables: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn add_table(&self, schema: TableSchema) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.contains_key(&schema.name) {
            return Err(OptError::already_exists(format!(
                "table '{}' already exists",
                schema.name
            )));
        }
        tracing::debug!(table = %schema.name, rows = schema.row_count, "registering table");
        tables.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Returns an independent snapshot; mutating it has no effect on the
    /// catalog's stored state.
    pub fn get_table(&self, name: &str) -> Result<TableSchema> {
        self.tables
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| OptError::not_found(format!("table '{name}' not found")))
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    pub fn update_stats(
        &self,
        name: &str,
        row_count: i64,
        per_column_stats: HashMap<String, ColumnStatsUpdate>,
    ) -> Result<()> {
        let mut tables = self.tables.write();
        let schema = tables
            .get_mut(name)
            .ok_or_else(|| OptError::not_found(format!("table '{name}' not found")))?;
        schema.row_count = row_count;
        for column in schema.columns.iter_mut() {
            if let Some(update) = per_column_stats.get(&column.name) {
                apply_column_update(column, update);
            }
        }
        tracing::debug!(table = %name, rows = row_count, "updated table statistics");
        Ok(())
    }

    pub fn get_column_stats(&self, table: &str, column: &str) -> Result<Column> {
        let tables = self.tables.read();
        let schema = tables
            .get(table)
            .ok_or_else(|| OptError::not_found(format!("table '{table}' not found")))?;
        schema
            .column(column)
            .cloned()
            .ok_or_else(|| OptError::not_found(format!("column '{table}.{column}' not found")))
    }

    /// The selectivity oracle: a pluggable capability so histograms or
    /// richer estimators can replace the defaults here without touching
    /// the cost model.
    pub fn selectivity(&self, table: &str, column: &str, op: BinOp, _value: &str) -> Result<f64> {
        let stats = self.get_column_stats(table, column)?;
        Ok(match op {
            BinOp::Eq => match stats.ndv {
                Some(ndv) if ndv > 0 => 1.0 / ndv as f64,
                _ => 0.1,
            },
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => 0.33,
            BinOp::Like => 0.1,
            _ => 0.5,
        })
    }
}

fn apply_column_update(column: &mut Column, update: &ColumnStatsUpdate) {
    if let Some(ndv) = update.ndv {
        column.ndv = Some(ndv);
    }
    if let Some(min) = update.min {
        column.min = Some(min);
    }
    if let Some(max) = update.max {
        column.max = Some(max);
    }
    if update.histogram.is_some() {
        column.histogram = update.histogram.clone();
    }
    if let Some(null_count) = update.null_count {
        column.null_count = Some(null_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema::Column as CatalogColumn;
    use crate::plan::DataType;

    fn customers() -> TableSchema {
        TableSchema::new(
            "customers",
            vec![CatalogColumn::new("age", DataType::Int, true).with_ndv(70)],
            5000,
        )
    }

    #[test]
    fn add_then_get_round_trips() {
        let catalog = Catalog::new();
        catalog.add_table(customers()).unwrap();
        let fetched = catalog.get_table("customers").unwrap();
        assert_eq!(fetched.row_count, 5000);
    }

    #[test]
    fn add_duplicate_fails() {
        let catalog = Catalog::new();
        catalog.add_table(customers()).unwrap();
        let err = catalog.add_table(customers()).unwrap_err();
        assert_eq!(err, OptError::already_exists("table 'customers' already exists"));
    }

    #[test]
    fn get_missing_table_fails() {
        let catalog = Catalog::new();
        assert!(catalog.get_table("missing").is_err());
    }

    #[test]
    fn selectivity_matches_oracle_rules() {
        let catalog = Catalog::new();
        catalog.add_table(customers()).unwrap();
        assert!((catalog.selectivity("customers", "age", BinOp::Eq, "30").unwrap() - 1.0 / 70.0).abs() < 1e-9);
        assert_eq!(catalog.selectivity("customers", "age", BinOp::Gt, "30").unwrap(), 0.33);
        assert_eq!(catalog.selectivity("customers", "age", BinOp::Like, "x").unwrap(), 0.1);
        assert_eq!(catalog.selectivity("customers", "age", BinOp::NotEq, "30").unwrap(), 0.5);
    }

    #[test]
    fn update_stats_overwrites_matching_columns_only() {
        let catalog = Catalog::new();
        catalog.add_table(customers()).unwrap();
        let mut updates = HashMap::new();
        updates.insert(
            "age".to_string(),
            ColumnStatsUpdate {
                ndv: Some(100),
                ..Default::default()
            },
        );
        catalog.update_stats("customers", 9999, updates).unwrap();
        let schema = catalog.get_table("customers").unwrap();
        assert_eq!(schema.row_count, 9999);
        assert_eq!(schema.column("age").unwrap().ndv, Some(100));
    }

    #[test]
    fn update_missing_table_fails() {
        let catalog = Catalog::new();
        assert!(catalog.update_stats("missing", 1, HashMap::new()).is_err());
    }
}
