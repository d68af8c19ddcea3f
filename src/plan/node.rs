//! The logical plan tree: node ids, operator metadata, and the `LogicalPlan`
//! operator enum itself.

use super::expression::{Expression, Predicate};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Globally unique, opaque node id, used for UI correlation and explain
/// traces rather than structural equality. Backed by a process-wide
/// monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

impl NodeId {
    pub fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The four join kinds plus cross product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    /// Left/right outer joins are asymmetric: swapping children requires
    /// also inverting the join type. Inner, full and cross are symmetric in
    /// row semantics (not necessarily in column order, but the cost model
    /// and enumerator only care about row semantics here).
    pub fn is_symmetric(&self) -> bool {
        matches!(self, JoinType::Inner | JoinType::Full | JoinType::Cross)
    }

    /// The type that preserves semantics when the two join children are
    /// swapped. Rewrites must never swap children of a left/right join
    /// without also inverting the join type.
    pub fn swapped(&self) -> JoinType {
        match self {
            JoinType::Left => JoinType::Right,
            JoinType::Right => JoinType::Left,
            other => *other,
        }
    }
}

/// Aggregate function kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateType {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

/// One aggregate expression: `type(column) [as alias]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateExpr {
    pub agg_type: AggregateType,
    pub column: Option<Expression>,
    pub alias: Option<String>,
}

/// One `ORDER BY` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    pub expression: Expression,
    pub ascending: bool,
}

/// Concrete scan strategy, stamped by physical-operator selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScanType {
    Sequential,
    Index { index_name: String },
}

/// Concrete join algorithm, stamped by physical-operator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinOperator {
    NestedLoop,
    Hash { build_left: bool },
    SortMerge,
}

/// Concrete aggregate algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateOperator {
    Hash,
    Sort,
}

/// Concrete sort algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOperator {
    Quicksort,
    ExternalSort,
}

/// Typed physical-operator annotation, used instead of a stringly-typed
/// lookup table. `None` until the cost-based optimizer's physical-selection
/// phase runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysicalHint {
    None,
    Scan {
        scan_type: ScanType,
    },
    Join {
        operator: JoinOperator,
    },
    Aggregate {
        operator: AggregateOperator,
    },
    Sort {
        operator: SortOperator,
    },
}

impl Default for PhysicalHint {
    fn default() -> Self {
        PhysicalHint::None
    }
}

/// Estimated cost tuple: total plus its components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub total: f64,
    pub cpu: f64,
    pub io: f64,
    pub network: f64,
    pub memory: f64,
}

impl Cost {
    pub const ZERO: Cost = Cost {
        total: 0.0,
        cpu: 0.0,
        io: 0.0,
        network: 0.0,
        memory: 0.0,
    };

    pub fn new(cpu: f64, io: f64, network: f64, memory: f64) -> Self {
        Cost {
            total: cpu + io + network,
            cpu,
            io,
            network,
            memory,
        }
    }

    pub fn add(self, other: Cost) -> Cost {
        Cost {
            total: self.total + other.total,
            cpu: self.cpu + other.cpu,
            io: self.io + other.io,
            network: self.network + other.network,
            memory: self.memory + other.memory,
        }
    }

    pub fn scale(self, factor: f64) -> Cost {
        Cost {
            total: self.total * factor,
            cpu: self.cpu * factor,
            io: self.io * factor,
            network: self.network * factor,
            memory: self.memory * factor,
        }
    }
}

/// Fields common to every node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMeta {
    pub id: NodeId,
    pub estimated_rows: Option<i64>,
    pub estimated_cost: Option<Cost>,
    pub physical: PhysicalHint,
}

impl NodeMeta {
    pub fn fresh() -> Self {
        NodeMeta {
            id: NodeId::fresh(),
            estimated_rows: None,
            estimated_cost: None,
            physical: PhysicalHint::None,
        }
    }
}

/// The operator tree. Arity is fixed per variant: Scan=0,
/// Filter/Project/Aggregate/Sort/Limit=1, Join=2. `Union` and `Subquery`
/// are reserved for visitor completeness; neither has cardinality/cost or
/// rewrite rules of its own yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogicalPlan {
    Scan {
        meta: NodeMeta,
        table_name: String,
        alias: Option<String>,
    },
    Filter {
        meta: NodeMeta,
        predicate: Predicate,
        input: Box<LogicalPlan>,
    },
    Project {
        meta: NodeMeta,
        columns: Vec<Expression>,
        input: Box<LogicalPlan>,
    },
    Join {
        meta: NodeMeta,
        join_type: JoinType,
        condition: Expression,
        left: Box<LogicalPlan>,
        right: Box<LogicalPlan>,
    },
    Aggregate {
        meta: NodeMeta,
        group_by: Vec<Expression>,
        aggregates: Vec<AggregateExpr>,
        input: Box<LogicalPlan>,
    },
    Sort {
        meta: NodeMeta,
        order_by: Vec<SortKey>,
        input: Box<LogicalPlan>,
    },
    Limit {
        meta: NodeMeta,
        limit: Option<i64>,
        offset: Option<i64>,
        input: Box<LogicalPlan>,
    },
    Union {
        meta: NodeMeta,
        inputs: Vec<LogicalPlan>,
    },
    Subquery {
        meta: NodeMeta,
        alias: Option<String>,
        input: Box<LogicalPlan>,
    },
}

impl LogicalPlan {
    pub fn scan(table_name: impl Into<String>, alias: Option<String>) -> Self {
        LogicalPlan::Scan {
            meta: NodeMeta::fresh(),
            table_name: table_name.into(),
            alias,
        }
    }

    pub fn filter(predicate: Predicate, input: LogicalPlan) -> Self {
        LogicalPlan::Filter {
            meta: NodeMeta::fresh(),
            predicate,
            input: Box::new(input),
        }
    }

    pub fn project(columns: Vec<Expression>, input: LogicalPlan) -> Self {
        LogicalPlan::Project {
            meta: NodeMeta::fresh(),
            columns,
            input: Box::new(input),
        }
    }

    pub fn join(
        join_type: JoinType,
        condition: Expression,
        left: LogicalPlan,
        right: LogicalPlan,
    ) -> Self {
        LogicalPlan::Join {
            meta: NodeMeta::fresh(),
            join_type,
            condition,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn aggregate(
        group_by: Vec<Expression>,
        aggregates: Vec<AggregateExpr>,
        input: LogicalPlan,
    ) -> Self {
        LogicalPlan::Aggregate {
            meta: NodeMeta::fresh(),
            group_by,
            aggregates,
            input: Box::new(input),
        }
    }

    pub fn sort(order_by: Vec<SortKey>, input: LogicalPlan) -> Self {
        LogicalPlan::Sort {
            meta: NodeMeta::fresh(),
            order_by,
            input: Box::new(input),
        }
    }

    pub fn limit(limit: Option<i64>, offset: Option<i64>, input: LogicalPlan) -> Self {
        LogicalPlan::Limit {
            meta: NodeMeta::fresh(),
            limit,
            offset,
            input: Box::new(input),
        }
    }

    pub fn meta(&self) -> &NodeMeta {
        match self {
            LogicalPlan::Scan { meta, .. }
            | LogicalPlan::Filter { meta, .. }
            | LogicalPlan::Project { meta, .. }
            | LogicalPlan::Join { meta, .. }
            | LogicalPlan::Aggregate { meta, .. }
            | LogicalPlan::Sort { meta, .. }
            | LogicalPlan::Limit { meta, .. }
            | LogicalPlan::Union { meta, .. }
            | LogicalPlan::Subquery { meta, .. } => meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut NodeMeta {
        match self {
            LogicalPlan::Scan { meta, .. }
            | LogicalPlan::Filter { meta, .. }
            | LogicalPlan::Project { meta, .. }
            | LogicalPlan::Join { meta, .. }
            | LogicalPlan::Aggregate { meta, .. }
            | LogicalPlan::Sort { meta, .. }
            | LogicalPlan::Limit { meta, .. }
            | LogicalPlan::Union { meta, .. }
            | LogicalPlan::Subquery { meta, .. } => meta,
        }
    }

    pub fn id(&self) -> NodeId {
        self.meta().id
    }

    pub fn estimated_rows(&self) -> Option<i64> {
        self.meta().estimated_rows
    }

    pub fn estimated_cost(&self) -> Option<Cost> {
        self.meta().estimated_cost
    }

    pub fn set_estimates(&mut self, rows: i64, cost: Cost) {
        let meta = self.meta_mut();
        meta.estimated_rows = Some(rows);
        meta.estimated_cost = Some(cost);
    }

    /// Direct children, in order (left then right for `Join`). Empty for `Scan`.
    pub fn children(&self) -> Vec<&LogicalPlan> {
        match self {
            LogicalPlan::Scan { .. } => vec![],
            LogicalPlan::Filter { input, .. }
            | LogicalPlan::Project { input, .. }
            | LogicalPlan::Aggregate { input, .. }
            | LogicalPlan::Sort { input, .. }
            | LogicalPlan::Limit { input, .. }
            | LogicalPlan::Subquery { input, .. } => vec![input.as_ref()],
            LogicalPlan::Join { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            LogicalPlan::Union { inputs, .. } => inputs.iter().collect(),
        }
    }

    /// Direct children, mutably, in the same order as `children()`.
    pub fn children_mut(&mut self) -> Vec<&mut LogicalPlan> {
        match self {
            LogicalPlan::Scan { .. } => vec![],
            LogicalPlan::Filter { input, .. }
            | LogicalPlan::Project { input, .. }
            | LogicalPlan::Aggregate { input, .. }
            | LogicalPlan::Sort { input, .. }
            | LogicalPlan::Limit { input, .. }
            | LogicalPlan::Subquery { input, .. } => vec![input.as_mut()],
            LogicalPlan::Join { left, right, .. } => vec![left.as_mut(), right.as_mut()],
            LogicalPlan::Union { inputs, .. } => inputs.iter_mut().collect(),
        }
    }

    /// Checks that this node's child count matches its variant's arity.
    pub fn arity_is_valid(&self) -> bool {
        let n = self.children().len();
        match self {
            LogicalPlan::Scan { .. } => n == 0,
            LogicalPlan::Filter { .. }
            | LogicalPlan::Project { .. }
            | LogicalPlan::Aggregate { .. }
            | LogicalPlan::Sort { .. }
            | LogicalPlan::Limit { .. }
            | LogicalPlan::Subquery { .. } => n == 1,
            LogicalPlan::Join { .. } => n == 2,
            LogicalPlan::Union { .. } => true,
        }
    }

    /// Recursively checks arity over the whole tree.
    pub fn is_valid_tree(&self) -> bool {
        self.arity_is_valid() && self.children().iter().all(|c| c.is_valid_tree())
    }

    /// Deep clone with fresh node ids everywhere: a structurally identical
    /// tree with independently owned substructures, never sharing a node id
    /// with its source.
    pub fn deep_clone(&self) -> LogicalPlan {
        let fresh_meta = |m: &NodeMeta| NodeMeta {
            id: NodeId::fresh(),
            estimated_rows: m.estimated_rows,
            estimated_cost: m.estimated_cost,
            physical: m.physical.clone(),
        };
        match self {
            LogicalPlan::Scan {
                meta,
                table_name,
                alias,
            } => LogicalPlan::Scan {
                meta: fresh_meta(meta),
                table_name: table_name.clone(),
                alias: alias.clone(),
            },
            LogicalPlan::Filter {
                meta,
                predicate,
                input,
            } => LogicalPlan::Filter {
                meta: fresh_meta(meta),
                predicate: predicate.clone(),
                input: Box::new(input.deep_clone()),
            },
            LogicalPlan::Project {
                meta,
                columns,
                input,
            } => LogicalPlan::Project {
                meta: fresh_meta(meta),
                columns: columns.clone(),
                input: Box::new(input.deep_clone()),
            },
            LogicalPlan::Join {
                meta,
                join_type,
                condition,
                left,
                right,
            } => LogicalPlan::Join {
                meta: fresh_meta(meta),
                join_type: *join_type,
                condition: condition.clone(),
                left: Box::new(left.deep_clone()),
                right: Box::new(right.deep_clone()),
            },
            LogicalPlan::Aggregate {
                meta,
                group_by,
                aggregates,
                input,
            } => LogicalPlan::Aggregate {
                meta: fresh_meta(meta),
                group_by: group_by.clone(),
                aggregates: aggregates.clone(),
                input: Box::new(input.deep_clone()),
            },
            LogicalPlan::Sort {
                meta,
                order_by,
                input,
            } => LogicalPlan::Sort {
                meta: fresh_meta(meta),
                order_by: order_by.clone(),
                input: Box::new(input.deep_clone()),
            },
            LogicalPlan::Limit {
                meta,
                limit,
                offset,
                input,
            } => LogicalPlan::Limit {
                meta: fresh_meta(meta),
                limit: *limit,
                offset: *offset,
                input: Box::new(input.deep_clone()),
            },
            LogicalPlan::Union { meta, inputs } => LogicalPlan::Union {
                meta: fresh_meta(meta),
                inputs: inputs.iter().map(|i| i.deep_clone()).collect(),
            },
            LogicalPlan::Subquery {
                meta,
                alias,
                input,
            } => LogicalPlan::Subquery {
                meta: fresh_meta(meta),
                alias: alias.clone(),
                input: Box::new(input.deep_clone()),
            },
        }
    }

    /// Every table name reachable from a `Scan` leaf, in traversal order
    /// with duplicates preserved (a self-join counts each side).
    pub fn scan_table_names(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_scan_table_names(&mut out);
        out
    }

    fn collect_scan_table_names(&self, out: &mut Vec<String>) {
        if let LogicalPlan::Scan { table_name, .. } = self {
            out.push(table_name.clone());
        }
        for c in self.children() {
            c.collect_scan_table_names(out);
        }
    }
}
