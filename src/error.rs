//! Error taxonomy for the optimizer core.

use crate::rules::ExplainResult;
use thiserror::Error;

/// The single error type returned by every public operation. Each variant
/// carries enough context to explain the failure without leaking internal
/// representations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("internal error: {0}")]
    Internal(String),

    /// A rule aborted the fixed-point loop; carries the explain trace built
    /// up to and including the failing rule, so callers don't lose the
    /// rewrites that did succeed.
    #[error("rule '{rule}' failed: {message}")]
    RuleFailed {
        rule: String,
        message: String,
        partial_trace: Box<ExplainResult>,
    },
}

impl OptError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn rule_failed(rule: impl Into<String>, message: impl Into<String>, partial_trace: ExplainResult) -> Self {
        Self::RuleFailed {
            rule: rule.into(),
            message: message.into(),
            partial_trace: Box::new(partial_trace),
        }
    }
}

pub type Result<T> = std::result::Result<T, OptError>;
