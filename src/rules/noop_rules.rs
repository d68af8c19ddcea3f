//! `ConstantFolding` and `JoinReordering`: declared members of the default
//! rule set, but no-ops at this layer. Join ordering is decided cost-based
//! during enumeration rather than by rewrite rule, and constant folding has
//! no expression forms yet that would fold. Kept as explicit, documented
//! no-ops rather than silently omitted.

use super::engine::Rule;
use crate::error::Result;
use crate::plan::LogicalPlan;

pub struct ConstantFolding;

impl Rule for ConstantFolding {
    fn name(&self) -> &'static str {
        "ConstantFolding"
    }

    fn apply(&self, plan: LogicalPlan) -> Result<(LogicalPlan, bool)> {
        Ok((plan, false))
    }
}

pub struct JoinReordering;

impl Rule for JoinReordering {
    fn name(&self) -> &'static str {
        "JoinReordering"
    }

    fn apply(&self, plan: LogicalPlan) -> Result<(LogicalPlan, bool)> {
        Ok((plan, false))
    }
}
