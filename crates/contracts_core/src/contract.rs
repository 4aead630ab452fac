//! Data contract types.
//!
//! A [`Contract`] names a dataset, declares its columns in order, and lists the
//! dataset-level rules it must satisfy.

use crate::{Column, ContractBuilder, Dataset, Rule, ValidationResult};
use indexmap::IndexMap;
use tracing::{debug, info};

/// A data contract for one tabular dataset.
///
/// Contracts are immutable once built; [`validate`](Contract::validate) takes `&self`
/// and may be called concurrently from several threads.
///
/// # Example
///
/// ```rust
/// use contracts_core::{Column, Contract, DataSet, DataType};
///
/// let contract = Contract::builder("orders")
///     .column("order_id", Column::builder(DataType::String).not_null(true).build())
///     .column("amount", Column::builder(DataType::Float).min(0.0).build())
///     .rule("row_count > 0")
///     .build()
///     .unwrap();
///
/// let dataset = DataSet::new()
///     .with_column("order_id", vec!["A1", "A2"])
///     .unwrap()
///     .with_column("amount", vec![10.0, 25.5])
///     .unwrap();
///
/// let result = contract.validate(&dataset);
/// assert!(result.is_ok());
/// assert_eq!(result.checks().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Contract {
    pub(crate) name: String,
    pub(crate) columns: IndexMap<String, Column>,
    pub(crate) rules: Vec<Rule>,
}

impl Contract {
    /// Creates an empty contract. It has no checks and accepts any dataset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Starts building a contract.
    pub fn builder(name: impl Into<String>) -> ContractBuilder {
        ContractBuilder::new(name)
    }

    /// Contract name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared columns, in declaration order.
    pub fn columns(&self) -> &IndexMap<String, Column> {
        &self.columns
    }

    /// Looks up a declared column.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Declared rules, in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Raw text of every rule, in declaration order.
    pub fn rule_texts(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::text).collect()
    }

    /// Validates a dataset against this contract.
    ///
    /// # Arguments
    ///
    /// * `dataset` - Data to check; only the declared columns are read
    ///
    /// Column checks run in declaration order, followed by rules in declaration order.
    /// Every check runs regardless of earlier failures. Data problems never produce an
    /// error; they show up as failing checks in the returned report.
    pub fn validate(&self, dataset: &dyn Dataset) -> ValidationResult {
        debug!(
            "Validating contract '{}' ({} column(s), {} rule(s)) against {} row(s)",
            self.name,
            self.columns.len(),
            self.rules.len(),
            dataset.row_count()
        );

        let mut checks = Vec::new();

        for (name, column) in &self.columns {
            checks.extend(column.check(name, dataset.column(name)));
        }

        for rule in &self.rules {
            checks.push(rule.evaluate(dataset));
        }

        let result = ValidationResult::new(self.name.clone(), checks);

        info!(
            "Contract '{}' {}: {} passed, {} failed",
            result.contract_name(),
            if result.is_ok() { "passed" } else { "failed" },
            result.passed_count(),
            result.failed_count()
        );

        result
    }
}
