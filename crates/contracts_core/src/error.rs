//! Error types for data contracts.
//!
//! Everything in here describes a contract that is itself malformed. A dataset that
//! violates a well-formed contract never produces one of these errors; it produces
//! failing [`CheckResult`](crate::CheckResult)s instead.

use thiserror::Error;

/// Result type for data contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;

/// Definition error raised while building or loading a contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    /// Lower bound above upper bound
    #[error("Invalid bounds for column '{column}': min {min} is greater than max {max}")]
    InvalidBounds {
        /// Column declaring the bounds
        column: String,
        /// Declared minimum
        min: f64,
        /// Declared maximum
        max: f64,
    },

    /// Bound that is not a number
    #[error("Invalid {bound} bound for column '{column}': NaN is not comparable")]
    NanBound {
        /// Column declaring the bound
        column: String,
        /// Which bound, `min` or `max`
        bound: &'static str,
    },

    /// Type name outside the supported vocabulary
    #[error("Unknown type '{type_name}' for column '{column}' (expected one of: string, int, float, bool)")]
    UnknownType {
        /// Column declaring the type
        column: String,
        /// Offending type name
        type_name: String,
    },

    /// Rule expression that does not match `<identifier> <op> <number>`
    #[error("Invalid rule '{rule}': {message}")]
    InvalidRule {
        /// Raw rule text
        rule: String,
        /// What went wrong
        message: String,
    },

    /// Rule expression referencing an aggregate that does not exist
    #[error("Unknown aggregate '{identifier}' in rule '{rule}' (supported: {supported})")]
    UnknownAggregate {
        /// Raw rule text
        rule: String,
        /// Offending identifier
        identifier: String,
        /// Comma-separated list of known aggregates
        supported: String,
    },

    /// Same column declared twice
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    /// Null listed among the allowed values
    #[error("Allowed values for column '{0}' cannot contain null")]
    NullAllowedValue(String),

    /// In-memory dataset column whose length differs from the others
    #[error("Column '{column}' has {actual} value(s), expected {expected}")]
    ColumnLength {
        /// Column being added
        column: String,
        /// Row count of the dataset
        expected: usize,
        /// Length of the new column
        actual: usize,
    },
}

impl ContractError {
    /// Creates a new invalid rule error.
    pub fn invalid_rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Creates a new unknown type error.
    pub fn unknown_type(column: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            column: column.into(),
            type_name: type_name.into(),
        }
    }
}
