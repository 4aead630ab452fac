//! Per-column constraint sets.
//!
//! A [`Column`] declares what one field of a dataset must look like. Given that field's
//! values, [`Column::check`] runs every configured constraint and reports one
//! [`CheckResult`] per constraint, in a fixed kind order.

use crate::{CheckResult, ContractError, DataValue, Result};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Logical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// Text
    #[default]
    String,
    /// 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// Boolean
    Bool,
}

impl DataType {
    /// Canonical name used in contract declarations.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Bool => "bool",
        }
    }

    /// Resolves a declared type name, accepting a few common aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "string" | "str" => Some(DataType::String),
            "int" | "integer" | "int64" => Some(DataType::Int),
            "float" | "double" | "float64" => Some(DataType::Float),
            "bool" | "boolean" => Some(DataType::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure signalled by a custom predicate instead of a plain `false`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PredicateError(pub String);

/// A user-supplied predicate over a single non-null value.
///
/// Returning `Ok(false)` or `Err(_)` both reject the value. Implementations must not
/// rely on side effects: the same contract may be validated from several threads.
///
/// A panic also rejects the value, but the process panic hook still runs for each one,
/// so a predicate that panics on every row prints one message per value to stderr.
/// Signal expected failures with `Err` (or [`ColumnBuilder::try_custom`]) instead.
pub trait CustomCheck: Send + Sync {
    /// Evaluates the predicate for one value.
    fn evaluate(&self, value: &DataValue) -> std::result::Result<bool, PredicateError>;
}

struct FnCheck<F>(F);

impl<F> CustomCheck for FnCheck<F>
where
    F: Fn(&DataValue) -> bool + Send + Sync,
{
    fn evaluate(&self, value: &DataValue) -> std::result::Result<bool, PredicateError> {
        Ok((self.0)(value))
    }
}

struct TryFnCheck<F>(F);

impl<F> CustomCheck for TryFnCheck<F>
where
    F: Fn(&DataValue) -> std::result::Result<bool, PredicateError> + Send + Sync,
{
    fn evaluate(&self, value: &DataValue) -> std::result::Result<bool, PredicateError> {
        (self.0)(value)
    }
}

/// The kinds of check a column can emit, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Column must be present in the dataset
    Exists,
    /// No null values
    NotNull,
    /// Lower bound
    Min,
    /// Upper bound
    Max,
    /// Allowed-value set
    Allowed,
    /// Custom predicate
    Custom,
}

impl CheckKind {
    /// Prefix used in check names.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Exists => "exists",
            CheckKind::NotNull => "not_null",
            CheckKind::Min => "min",
            CheckKind::Max => "max",
            CheckKind::Allowed => "allowed",
            CheckKind::Custom => "custom",
        }
    }

    /// Stable check name for this kind on `column`, e.g. `not_null:order_id`.
    pub fn check_name(&self, column: &str) -> String {
        format!("{}:{}", self.as_str(), column)
    }
}

/// Constraints declared for one column.
///
/// # Example
///
/// ```rust
/// use contracts_core::{Column, DataType, DataValue};
///
/// let age = Column::builder(DataType::Int)
///     .not_null(true)
///     .min(0.0)
///     .custom(|v| v.as_int().is_some_and(|a| (18..=100).contains(&a)))
///     .build();
///
/// let values = [DataValue::Int(25), DataValue::Int(150)];
/// let checks = age.check("age", Some(&values));
/// assert_eq!(checks.len(), 3);
/// assert!(!checks[2].passed);
/// ```
#[derive(Clone, Default)]
pub struct Column {
    pub(crate) dtype: DataType,
    pub(crate) not_null: bool,
    pub(crate) min: Option<f64>,
    pub(crate) max: Option<f64>,
    pub(crate) allowed: Option<Vec<DataValue>>,
    pub(crate) custom: Option<Arc<dyn CustomCheck>>,
}

impl Column {
    /// Creates a column of the given type with no constraints.
    pub fn new(dtype: DataType) -> Self {
        Self {
            dtype,
            ..Default::default()
        }
    }

    /// Starts building a column of the given type.
    pub fn builder(dtype: DataType) -> ColumnBuilder {
        ColumnBuilder::new(dtype)
    }

    /// Declared logical type.
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// Whether nulls are rejected.
    pub fn not_null(&self) -> bool {
        self.not_null
    }

    /// Inclusive lower bound.
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Inclusive upper bound.
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Allowed values, in declaration order.
    pub fn allowed(&self) -> Option<&[DataValue]> {
        self.allowed.as_deref()
    }

    /// Whether a custom predicate is attached. Predicates never survive serialization.
    pub fn has_custom(&self) -> bool {
        self.custom.is_some()
    }

    /// Verifies the column declaration itself.
    pub fn check_definition(&self, column_name: &str) -> Result<()> {
        for (bound, value) in [("min", self.min), ("max", self.max)] {
            if value.is_some_and(f64::is_nan) {
                return Err(ContractError::NanBound {
                    column: column_name.to_string(),
                    bound,
                });
            }
        }

        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ContractError::InvalidBounds {
                    column: column_name.to_string(),
                    min,
                    max,
                });
            }
        }

        let allows_null = self
            .allowed
            .as_ref()
            .is_some_and(|allowed| allowed.iter().any(DataValue::is_null));
        if allows_null {
            return Err(ContractError::NullAllowedValue(column_name.to_string()));
        }

        Ok(())
    }

    /// Runs every configured constraint against a column's values.
    ///
    /// `values` is `None` when the dataset has no such column; that yields a single
    /// failing `exists:<column>` check and nothing else.
    pub fn check(&self, column_name: &str, values: Option<&[DataValue]>) -> Vec<CheckResult> {
        let Some(values) = values else {
            warn!("Column '{}' not found in dataset", column_name);
            return vec![CheckResult::fail(
                CheckKind::Exists.check_name(column_name),
                format!("column '{}' not found in dataset", column_name),
            )];
        };

        let mut results = Vec::new();

        if self.not_null {
            results.push(self.check_not_null(column_name, values));
        }

        if let Some(min) = self.min {
            results.push(self.check_bound(column_name, values, CheckKind::Min, min));
        }

        if let Some(max) = self.max {
            results.push(self.check_bound(column_name, values, CheckKind::Max, max));
        }

        if let Some(allowed) = &self.allowed {
            results.push(self.check_allowed(column_name, values, allowed));
        }

        if let Some(custom) = &self.custom {
            results.push(self.check_custom(column_name, values, custom.as_ref()));
        }

        debug!(
            "Column '{}': {} check(s) over {} value(s)",
            column_name,
            results.len(),
            values.len()
        );

        results
    }

    fn check_not_null(&self, column_name: &str, values: &[DataValue]) -> CheckResult {
        let nulls = values.iter().filter(|v| v.is_null()).count();
        let message = if nulls == 0 {
            "no null values".to_string()
        } else {
            format!("{} null value(s)", nulls)
        };

        CheckResult::new(CheckKind::NotNull.check_name(column_name), nulls == 0, message)
    }

    fn check_bound(
        &self,
        column_name: &str,
        values: &[DataValue],
        kind: CheckKind,
        bound: f64,
    ) -> CheckResult {
        let mut out_of_bounds = 0;
        let mut non_numeric = 0;

        for value in values.iter().filter(|v| !v.is_null()) {
            match value.as_float() {
                Some(n) => {
                    let violates = match kind {
                        CheckKind::Min => n < bound,
                        _ => n > bound,
                    };
                    if violates {
                        out_of_bounds += 1;
                    }
                }
                None => non_numeric += 1,
            }
        }

        let violations = out_of_bounds + non_numeric;
        let (relation, comparison) = match kind {
            CheckKind::Min => ("below min", ">="),
            _ => ("above max", "<="),
        };

        let message = if violations == 0 {
            format!("all values {} {}", comparison, bound)
        } else if non_numeric > 0 {
            format!(
                "{} value(s) {} {} ({} not numeric)",
                violations, relation, bound, non_numeric
            )
        } else {
            format!("{} value(s) {} {}", violations, relation, bound)
        };

        CheckResult::new(kind.check_name(column_name), violations == 0, message)
    }

    fn check_allowed(
        &self,
        column_name: &str,
        values: &[DataValue],
        allowed: &[DataValue],
    ) -> CheckResult {
        let rejected = values
            .iter()
            .filter(|v| !v.is_null())
            .filter(|v| !allowed.iter().any(|a| a.matches(v)))
            .count();

        let message = if rejected == 0 {
            "all values in allowed set".to_string()
        } else {
            format!(
                "{} value(s) not in allowed set [{}]",
                rejected,
                allowed
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };

        CheckResult::new(CheckKind::Allowed.check_name(column_name), rejected == 0, message)
    }

    fn check_custom(
        &self,
        column_name: &str,
        values: &[DataValue],
        custom: &dyn CustomCheck,
    ) -> CheckResult {
        let mut evaluated = 0;
        let mut failed = 0;

        for value in values.iter().filter(|v| !v.is_null()) {
            evaluated += 1;
            if !evaluate_custom(column_name, custom, value) {
                failed += 1;
            }
        }

        let message = if failed == 0 {
            format!("all {} value(s) passed", evaluated)
        } else {
            format!("{} value(s) failed", failed)
        };

        CheckResult::new(CheckKind::Custom.check_name(column_name), failed == 0, message)
    }
}

/// Runs a predicate on one value. Errors and panics reject the value.
fn evaluate_custom(column_name: &str, custom: &dyn CustomCheck, value: &DataValue) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| custom.evaluate(value))) {
        Ok(Ok(passed)) => passed,
        Ok(Err(err)) => {
            debug!(
                "Custom check on '{}' rejected {}: {}",
                column_name, value, err
            );
            false
        }
        Err(_) => {
            warn!("Custom check on '{}' panicked on value {}", column_name, value);
            false
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("dtype", &self.dtype)
            .field("not_null", &self.not_null)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("allowed", &self.allowed)
            .field("custom", &self.custom.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

/// Builder for creating a [`Column`].
///
/// # Example
///
/// ```rust
/// use contracts_core::{Column, DataType};
///
/// let currency = Column::builder(DataType::String)
///     .not_null(true)
///     .allowed(["USD", "EUR"])
///     .build();
///
/// assert_eq!(currency.allowed().unwrap().len(), 2);
/// ```
#[derive(Default)]
pub struct ColumnBuilder {
    column: Column,
}

impl ColumnBuilder {
    /// Creates a new column builder.
    pub fn new(dtype: DataType) -> Self {
        Self {
            column: Column::new(dtype),
        }
    }

    /// Sets whether nulls are rejected.
    pub fn not_null(mut self, not_null: bool) -> Self {
        self.column.not_null = not_null;
        self
    }

    /// Sets the inclusive lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.column.min = Some(min);
        self
    }

    /// Sets the inclusive upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.column.max = Some(max);
        self
    }

    /// Sets the allowed values. Duplicates are dropped, first occurrence wins.
    pub fn allowed<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        let mut set: Vec<DataValue> = Vec::new();
        for value in values.into_iter().map(Into::into) {
            if !set.iter().any(|v| v.matches(&value)) {
                set.push(value);
            }
        }
        self.column.allowed = Some(set);
        self
    }

    /// Attaches a boolean predicate.
    ///
    /// Prefer [`try_custom`](Self::try_custom) for predicates that can fail; panics are
    /// caught but still reported by the panic hook.
    pub fn custom<F>(self, predicate: F) -> Self
    where
        F: Fn(&DataValue) -> bool + Send + Sync + 'static,
    {
        self.custom_check(FnCheck(predicate))
    }

    /// Attaches a predicate that may reject a value with an error.
    pub fn try_custom<F>(self, predicate: F) -> Self
    where
        F: Fn(&DataValue) -> std::result::Result<bool, PredicateError> + Send + Sync + 'static,
    {
        self.custom_check(TryFnCheck(predicate))
    }

    /// Attaches any [`CustomCheck`] implementation.
    pub fn custom_check(mut self, check: impl CustomCheck + 'static) -> Self {
        self.column.custom = Some(Arc::new(check));
        self
    }

    /// Builds the column.
    pub fn build(self) -> Column {
        self.column
    }
}
