//! The logical operator tree, its expression language, a visitor protocol,
//! deep clone, pretty-printing, and canonical signatures.

mod expression;
mod node;
mod pretty;
mod signature;
mod visitor;

pub use expression::{BinOp, DataType, Expression, LiteralValue, Predicate};
pub use node::{
    AggregateExpr, AggregateOperator, AggregateType, Cost, JoinOperator, JoinType, LogicalPlan,
    NodeId, NodeMeta, PhysicalHint, ScanType, SortKey, SortOperator,
};
pub use pretty::pretty_print;
pub use signature::plan_signature;
pub use visitor::{collect_tables, walk, PlanVisitor};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_respect_arity() {
        let scan = LogicalPlan::scan("orders", None);
        assert!(scan.arity_is_valid());

        let filter = LogicalPlan::filter(
            Predicate::new(Expression::binary(
                BinOp::Gt,
                Expression::column("age"),
                Expression::literal(LiteralValue::Int(30)),
            )),
            scan,
        );
        assert!(filter.is_valid_tree());

        let join = LogicalPlan::join(
            JoinType::Inner,
            Expression::binary(
                BinOp::Eq,
                Expression::qualified_column("a", "id"),
                Expression::qualified_column("b", "a_id"),
            ),
            LogicalPlan::scan("a", None),
            LogicalPlan::scan("b", None),
        );
        assert!(join.is_valid_tree());
        assert_eq!(join.children().len(), 2);
    }

    #[test]
    fn deep_clone_is_independent_and_fresh() {
        let plan = LogicalPlan::filter(
            Predicate::new(Expression::binary(
                BinOp::Gt,
                Expression::column("age"),
                Expression::literal(LiteralValue::Int(30)),
            )),
            LogicalPlan::scan("customers", None),
        );
        let clone = plan.deep_clone();
        assert_ne!(plan.id(), clone.id());
        assert_ne!(plan.children()[0].id(), clone.children()[0].id());
        assert_eq!(plan_signature(&plan), plan_signature(&clone));
    }

    #[test]
    fn scan_table_names_preserve_multiset() {
        let join = LogicalPlan::join(
            JoinType::Inner,
            Expression::binary(
                BinOp::Eq,
                Expression::qualified_column("a", "id"),
                Expression::qualified_column("a", "id"),
            ),
            LogicalPlan::scan("a", None),
            LogicalPlan::scan("a", None),
        );
        assert_eq!(join.scan_table_names(), vec!["a".to_string(), "a".to_string()]);
    }
}
