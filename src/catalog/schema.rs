//! Table, column, index and histogram metadata tracked by the catalog.

use crate::plan::DataType;
use serde::{Deserialize, Serialize};

/// One non-overlapping histogram bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
    pub frequency: f64,
}

/// An ordered list of non-overlapping buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub buckets: Vec<HistogramBucket>,
}

/// Per-column statistics used by the selectivity oracle and cost model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub ndv: Option<u64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub histogram: Option<Histogram>,
    pub null_count: Option<u64>,
}

impl Default for DataType {
    fn default() -> Self {
        DataType::String
    }
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Column {
            name: name.into(),
            data_type,
            nullable,
            ndv: None,
            min: None,
            max: None,
            histogram: None,
            null_count: None,
        }
    }

    pub fn with_ndv(mut self, ndv: u64) -> Self {
        self.ndv = Some(ndv);
        self
    }
}

/// Index kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexType {
    BTree,
    Hash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub index_type: IndexType,
}

/// A table's schema, row count, indexes and free-form metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
    pub row_count: i64,
    pub indexes: Vec<Index>,
    pub metadata: std::collections::HashMap<String, String>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>, row_count: i64) -> Self {
        TableSchema {
            name: name.into(),
            columns,
            row_count,
            indexes: Vec::new(),
            metadata: std::collections::HashMap::new(),
        }
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// An index is usable for an equality/range lookup when its leading
    /// column matches.
    pub fn index_on(&self, column: &str) -> Option<&Index> {
        self.indexes
            .iter()
            .find(|idx| idx.columns.first().map(|c| c.as_str()) == Some(column))
    }
}
