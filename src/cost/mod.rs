//! Bottom-up cardinality and cost estimation for logical plan trees.

mod estimate;
mod selectivity;

pub use estimate::{cardinality, cost, estimate, CRAND, CSEQ, CTUP, FHASH, FJOIN, FSORT};
pub use selectivity::predicate_selectivity;
