//! Execution simulator: estimates runtime metrics for a plan against a
//! target connector without actually executing anything. A post-order
//! traversal accumulates per-operator contributions; connector-specific
//! multipliers are applied once at the end.

use crate::plan::{AggregateOperator, JoinOperator, LogicalPlan, PhysicalHint, SortOperator};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connector {
    Postgres,
    Mongo,
    Generic,
}

/// Reserved for connector-specific tuning; empty today but kept as an
/// explicit parameter rather than threading new arguments through later.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationOptions {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    pub execution_time: f64,
    pub rows_processed: i64,
    pub rows_returned: i64,
    pub cpu_time: f64,
    pub io_operations: i64,
    pub memory_used: i64,
    pub network_traffic: i64,
    pub operator_metrics: HashMap<u64, Value>,
    pub connector: Connector,
    pub simulation_only: bool,
}

#[derive(Default)]
struct Accumulator {
    scan_io: i64,
    scan_cpu: f64,
    scan_rows_total: i64,
    filter_cpu: f64,
    project_cpu: f64,
    join_cpu_nested: f64,
    join_cpu_hash: f64,
    join_cpu_sortmerge: f64,
    join_rows_total: i64,
    aggregate_cpu: f64,
    sort_cpu: f64,
    sort_io: i64,
    memory_used: i64,
    rows_processed: i64,
    rows_returned: i64,
    operator_metrics: HashMap<u64, Value>,
}

impl Accumulator {
    fn record(&mut self, node_id: u64, fields: Map<String, Value>) {
        self.operator_metrics.insert(node_id, Value::Object(fields));
    }
}

const UNKNOWN_ROWS: i64 = 1000;

fn log2(n: i64) -> f64 {
    if n <= 1 {
        0.0
    } else {
        (n as f64).log2()
    }
}

fn visit(plan: &LogicalPlan, acc: &mut Accumulator) -> i64 {
    match plan {
        LogicalPlan::Scan {
            meta,
            table_name,
            alias,
        } => {
            let rows = meta.estimated_rows.unwrap_or(UNKNOWN_ROWS);
            let pages = (rows as f64 / 100.0).max(1.0) as i64;
            let scan_type = match &meta.physical {
                PhysicalHint::Scan { scan_type } => format!("{scan_type:?}"),
                _ => "Sequential".to_string(),
            };
            acc.scan_io += pages;
            acc.scan_cpu += rows as f64 * 10.0;
            acc.scan_rows_total += rows;
            acc.memory_used += rows * 100;
            acc.rows_processed += rows;
            acc.rows_returned = rows;
            acc.record(
                meta.id.0,
                json_map([
                    ("table", json!(table_name)),
                    ("alias", json!(alias)),
                    ("rows_scanned", json!(rows)),
                    ("pages_read", json!(pages)),
                    ("scan_type", json!(scan_type)),
                ]),
            );
            rows
        }
        LogicalPlan::Filter { meta, input, .. } => {
            let input_rows = visit(input, acc);
            let output = (input_rows as f64 * 0.3) as i64;
            acc.filter_cpu += input_rows as f64 * 5.0;
            acc.rows_processed += input_rows;
            acc.rows_returned = output;
            acc.record(
                meta.id.0,
                json_map([("input_rows", json!(input_rows)), ("output_rows", json!(output))]),
            );
            output
        }
        LogicalPlan::Project { meta, input, .. } => {
            let input_rows = visit(input, acc);
            acc.project_cpu += input_rows as f64 * 2.0;
            acc.rows_processed += input_rows;
            acc.rows_returned = input_rows;
            acc.record(meta.id.0, json_map([("rows", json!(input_rows))]));
            input_rows
        }
        LogicalPlan::Join { meta, left, right, .. } => {
            let l = visit(left, acc);
            let r = visit(right, acc);
            let operator = match &meta.physical {
                PhysicalHint::Join { operator } => *operator,
                _ => JoinOperator::NestedLoop,
            };
            match operator {
                JoinOperator::NestedLoop => {
                    acc.join_cpu_nested += 2.0 * l as f64 * r as f64;
                    acc.memory_used += 100 * l;
                }
                JoinOperator::Hash { .. } => {
                    acc.join_cpu_hash += 10.0 * (l + r) as f64;
                    acc.memory_used += 150 * l;
                }
                JoinOperator::SortMerge => {
                    acc.join_cpu_sortmerge += 5.0 * (l as f64 * log2(l) + r as f64 * log2(r)) + 5.0 * (l + r) as f64;
                    acc.memory_used += 100 * (l + r);
                }
            }
            let output = (0.1 * l as f64 * r as f64) as i64;
            acc.join_rows_total += output;
            acc.rows_processed += l + r;
            acc.rows_returned = output;
            acc.record(
                meta.id.0,
                json_map([
                    ("operator", json!(format!("{operator:?}"))),
                    ("left_rows", json!(l)),
                    ("right_rows", json!(r)),
                    ("output_rows", json!(output)),
                ]),
            );
            output
        }
        LogicalPlan::Aggregate { meta, group_by, input, .. } => {
            let input_rows = visit(input, acc);
            let output = if group_by.is_empty() {
                1
            } else {
                (input_rows as f64 * 0.7f64.powi(group_by.len() as i32)).clamp(1.0, input_rows.max(1) as f64) as i64
            };
            let operator = match &meta.physical {
                PhysicalHint::Aggregate { operator } => *operator,
                _ => AggregateOperator::Hash,
            };
            match operator {
                AggregateOperator::Hash => {
                    acc.aggregate_cpu += 15.0 * input_rows as f64;
                    acc.memory_used += 200 * output;
                }
                AggregateOperator::Sort => {
                    acc.aggregate_cpu += 10.0 * input_rows as f64 * log2(input_rows) + 5.0 * input_rows as f64;
                    acc.memory_used += 100 * input_rows;
                }
            }
            acc.rows_processed += input_rows;
            acc.rows_returned = output;
            acc.record(
                meta.id.0,
                json_map([
                    ("operator", json!(format!("{operator:?}"))),
                    ("input_rows", json!(input_rows)),
                    ("output_rows", json!(output)),
                ]),
            );
            output
        }
        LogicalPlan::Sort { meta, input, .. } => {
            let n = visit(input, acc);
            let operator = match &meta.physical {
                PhysicalHint::Sort { operator } => *operator,
                _ => {
                    if n > 100_000 {
                        SortOperator::ExternalSort
                    } else {
                        SortOperator::Quicksort
                    }
                }
            };
            match operator {
                SortOperator::Quicksort => {
                    acc.sort_cpu += 20.0 * n as f64 * log2(n);
                    acc.memory_used += 150 * n;
                }
                SortOperator::ExternalSort => {
                    const RUN_SIZE: i64 = 10_000;
                    let runs = (n as f64 / RUN_SIZE as f64).ceil().max(1.0);
                    acc.sort_cpu += 20.0 * RUN_SIZE as f64 * log2(RUN_SIZE) * runs;
                    acc.sort_cpu += 5.0 * n as f64 * runs.log2().max(0.0);
                    acc.sort_io += 3 * n / 100;
                    acc.memory_used += 150 * RUN_SIZE;
                }
            }
            acc.rows_processed += n;
            acc.rows_returned = n;
            acc.record(
                meta.id.0,
                json_map([("operator", json!(format!("{operator:?}"))), ("rows", json!(n))]),
            );
            n
        }
        LogicalPlan::Limit {
            meta,
            limit,
            offset,
            input,
        } => {
            let input_rows = visit(input, acc);
            let offset_v = offset.unwrap_or(0).max(0);
            let limit_v = limit.unwrap_or(i64::MAX);
            let processed = input_rows.min(offset_v.saturating_add(limit_v.max(0)));
            let returned = (input_rows - offset_v).max(0).min(limit_v.max(0));
            acc.rows_processed += processed;
            acc.rows_returned = returned;
            acc.record(
                meta.id.0,
                json_map([("rows_processed", json!(processed)), ("rows_returned", json!(returned))]),
            );
            returned
        }
        LogicalPlan::Union { meta, inputs } => {
            let total: i64 = inputs.iter().map(|i| visit(i, acc)).sum();
            acc.rows_processed += total;
            acc.rows_returned = total;
            acc.record(meta.id.0, json_map([("rows", json!(total))]));
            total
        }
        LogicalPlan::Subquery { meta, input, .. } => {
            let rows = visit(input, acc);
            acc.rows_returned = rows;
            acc.record(meta.id.0, json_map([("rows", json!(rows))]));
            rows
        }
    }
}

fn json_map<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

pub fn simulate(plan: &LogicalPlan, connector: Connector, _options: &SimulationOptions) -> ExecutionMetrics {
    let start = Instant::now();
    let mut acc = Accumulator::default();
    visit(plan, &mut acc);

    let (scan_io, join_cpu_total, aggregate_cpu, network) = match connector {
        Connector::Postgres => (
            (acc.scan_io as f64 * 0.8) as i64,
            acc.join_cpu_hash * 0.85 + acc.join_cpu_nested + acc.join_cpu_sortmerge,
            acc.aggregate_cpu * 0.9,
            0,
        ),
        Connector::Mongo => (
            acc.scan_io,
            (acc.join_cpu_hash + acc.join_cpu_nested + acc.join_cpu_sortmerge) * 1.3,
            acc.aggregate_cpu * 0.7,
            acc.scan_rows_total * 300 + acc.join_rows_total * 200,
        ),
        Connector::Generic => (
            acc.scan_io,
            acc.join_cpu_hash + acc.join_cpu_nested + acc.join_cpu_sortmerge,
            acc.aggregate_cpu,
            0,
        ),
    };

    let cpu_time = acc.scan_cpu + acc.filter_cpu + acc.project_cpu + join_cpu_total + aggregate_cpu + acc.sort_cpu;
    let io_operations = scan_io + acc.sort_io;

    ExecutionMetrics {
        execution_time: start.elapsed().as_secs_f64(),
        rows_processed: acc.rows_processed,
        rows_returned: acc.rows_returned,
        cpu_time,
        io_operations,
        memory_used: acc.memory_used,
        network_traffic: network,
        operator_metrics: acc.operator_metrics,
        connector,
        simulation_only: true,
    }
}
