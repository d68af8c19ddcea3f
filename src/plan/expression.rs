//! Expression and predicate algebra.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Scalar data type tags used by column references and literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Int,
    Float,
    String,
    Boolean,
    Date,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
        };
        write!(f, "{s}")
    }
}

/// A literal scalar value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(v) => write!(f, "{v}"),
            LiteralValue::Float(v) => write!(f, "{v}"),
            LiteralValue::Str(v) => write!(f, "'{v}'"),
            LiteralValue::Bool(v) => write!(f, "{v}"),
            LiteralValue::Null => write!(f, "NULL"),
        }
    }
}

/// Binary operators appearing in `BinaryOp` expressions, covering both
/// predicate comparisons (`=`, `<`, `LIKE`, ...) and boolean composition
/// (`AND`/`OR`) so a `Filter`'s predicate can be built from a single
/// expression tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    Like,
    And,
    Or,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Eq => "=",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Like => "LIKE",
            BinOp::And => "AND",
            BinOp::Or => "OR",
        };
        write!(f, "{s}")
    }
}

/// A pure, structurally-identical expression tree.
///
/// Expressions carry no node id: identity is structural, so two
/// expressions built the same way compare equal and hash the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Column {
        qualifier: Option<String>,
        name: String,
    },
    Literal {
        value: LiteralValue,
        data_type: Option<DataType>,
    },
    BinaryOp {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Function {
        name: String,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn column(name: impl Into<String>) -> Self {
        Expression::Column {
            qualifier: None,
            name: name.into(),
        }
    }

    pub fn qualified_column(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Expression::Column {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }

    pub fn literal(value: LiteralValue) -> Self {
        Expression::Literal {
            value,
            data_type: None,
        }
    }

    pub fn binary(op: BinOp, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Function {
            name: name.into(),
            args,
        }
    }

    /// The top-level binary operator, if any — the selectivity oracle
    /// dispatches on this.
    pub fn top_op(&self) -> Option<BinOp> {
        match self {
            Expression::BinaryOp { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Every column this expression references, qualified where known.
    /// Used by predicate pushdown to test whether a predicate's inputs are
    /// all produced by a given subtree.
    pub fn referenced_columns(&self, out: &mut HashSet<(Option<String>, String)>) {
        match self {
            Expression::Column { qualifier, name } => {
                out.insert((qualifier.clone(), name.clone()));
            }
            Expression::Literal { .. } => {}
            Expression::BinaryOp { left, right, .. } => {
                left.referenced_columns(out);
                right.referenced_columns(out);
            }
            Expression::Function { args, .. } => {
                for a in args {
                    a.referenced_columns(out);
                }
            }
        }
    }

    /// If this is an equality/comparison between two qualified columns from
    /// distinct tables, return `(left_table, left_col, right_table, right_col)`.
    /// Used to build join-graph edges during join-order enumeration.
    pub fn as_two_table_comparison(&self) -> Option<(BinOp, (&str, &str), (&str, &str))> {
        if let Expression::BinaryOp { op, left, right } = self {
            if let (
                Expression::Column {
                    qualifier: Some(lq),
                    name: ln,
                },
                Expression::Column {
                    qualifier: Some(rq),
                    name: rn,
                },
            ) = (left.as_ref(), right.as_ref())
            {
                if lq != rq {
                    return Some((*op, (lq.as_str(), ln.as_str()), (rq.as_str(), rn.as_str())));
                }
            }
        }
        None
    }

    fn fmt_signature(&self, out: &mut String) {
        match self {
            Expression::Column { qualifier, name } => {
                if let Some(q) = qualifier {
                    out.push_str(q);
                    out.push('.');
                }
                out.push_str(name);
            }
            Expression::Literal { value, .. } => out.push_str(&value.to_string()),
            Expression::BinaryOp { op, left, right } => {
                out.push('(');
                left.fmt_signature(out);
                out.push(' ');
                out.push_str(&op.to_string());
                out.push(' ');
                right.fmt_signature(out);
                out.push(')');
            }
            Expression::Function { name, args } => {
                out.push_str(name);
                out.push('(');
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    a.fmt_signature(out);
                }
                out.push(')');
            }
        }
    }

    /// Canonical textual form, used both for display and as part of a plan
    /// signature.
    pub fn signature(&self) -> String {
        let mut s = String::new();
        self.fmt_signature(&mut s);
        s
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature())
    }
}

/// A boolean-valued expression used as a `Filter`'s test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub expr: Expression,
}

impl Predicate {
    pub fn new(expr: Expression) -> Self {
        Self { expr }
    }

    /// True if every column this predicate references is present in
    /// `available` — the "pushable below" test used by rewrite rules.
    pub fn is_pushable_given(&self, available: &HashSet<(Option<String>, String)>) -> bool {
        let mut refs = HashSet::new();
        self.expr.referenced_columns(&mut refs);
        refs.iter().all(|(qualifier, name)| {
            available.contains(&(qualifier.clone(), name.clone()))
                || available.contains(&(None, name.clone()))
        })
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}
