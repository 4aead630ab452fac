//! Builder pattern for creating data contracts.
//!
//! Unlike a plain struct literal, [`ContractBuilder::build`] verifies the declaration:
//! column bounds, duplicate columns and rule syntax are all checked here, so a contract
//! that exists is a contract that can be evaluated.

use crate::{Column, Contract, ContractError, Result, Rule};
use indexmap::IndexMap;

/// Builder for creating a [`Contract`].
///
/// # Example
///
/// ```rust
/// use contracts_core::{Column, ContractBuilder, DataType};
///
/// let contract = ContractBuilder::new("orders")
///     .column("currency", Column::builder(DataType::String).allowed(["USD", "EUR"]).build())
///     .rule("row_count > 0")
///     .build()
///     .unwrap();
///
/// assert_eq!(contract.name(), "orders");
/// assert_eq!(contract.rule_texts(), vec!["row_count > 0"]);
/// ```
#[derive(Debug, Default)]
pub struct ContractBuilder {
    name: String,
    columns: Vec<(String, Column)>,
    rules: Vec<String>,
}

impl ContractBuilder {
    /// Creates a new contract builder.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the contract, reported in every validation result
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a column.
    ///
    /// # Arguments
    ///
    /// * `name` - Dataset column the constraints apply to
    /// * `column` - Constraints for that column
    pub fn column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.columns.push((name.into(), column));
        self
    }

    /// Adds multiple columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        self.columns
            .extend(columns.into_iter().map(|(name, column)| (name.into(), column)));
        self
    }

    /// Adds a rule expression.
    pub fn rule(mut self, rule: impl Into<String>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Adds multiple rule expressions.
    pub fn rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.extend(rules.into_iter().map(Into::into));
        self
    }

    /// Builds the contract.
    ///
    /// # Errors
    ///
    /// Returns the first definition error found: invalid or NaN column bounds, null in an
    /// allowed set, a duplicate column, or a rule that does not parse.
    pub fn build(self) -> Result<Contract> {
        let mut columns = IndexMap::with_capacity(self.columns.len());

        for (name, column) in self.columns {
            column.check_definition(&name)?;
            if columns.contains_key(&name) {
                return Err(ContractError::DuplicateColumn(name));
            }
            columns.insert(name, column);
        }

        let rules = self
            .rules
            .into_iter()
            .map(Rule::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Contract {
            name: self.name,
            columns,
            rules,
        })
    }
}
