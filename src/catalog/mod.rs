//! Table/column catalog and the statistics it exposes to the cost model.

mod schema;
mod store;

pub use schema::{Column, Histogram, HistogramBucket, Index, IndexType, TableSchema};
pub use store::{Catalog, ColumnStatsUpdate};
