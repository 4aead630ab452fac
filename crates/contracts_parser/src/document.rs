//! Serialized shape of a contract declaration.
//!
//! ```yaml
//! name: orders
//! columns:
//!   order_id:
//!     type: string
//!     not_null: true
//!   amount:
//!     type: float
//!     min: 0
//! rules:
//!   - row_count > 0
//! ```
//!
//! These types mirror the file layout one-to-one. Conversion into a
//! [`Contract`](contracts_core::Contract) goes through `ContractBuilder`, so every
//! definition check applies to loaded contracts as well.

use contracts_core::{Column, Contract, ContractError, DataType, DataValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level contract declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ContractDocument {
    pub name: String,

    /// A column written with no attributes (`id:`) deserializes as `None`.
    #[serde(default)]
    pub columns: IndexMap<String, Option<ColumnDocument>>,

    #[serde(default)]
    pub rules: Vec<String>,
}

/// Declarative attributes of one column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ColumnDocument {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub not_null: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<DataValue>>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ColumnDocument {
    fn into_column(self, name: &str) -> Result<Column, ContractError> {
        let dtype = match &self.type_name {
            Some(type_name) => DataType::from_name(type_name)
                .ok_or_else(|| ContractError::unknown_type(name, type_name))?,
            None => DataType::default(),
        };

        let mut builder = Column::builder(dtype).not_null(self.not_null);
        if let Some(min) = self.min {
            builder = builder.min(min);
        }
        if let Some(max) = self.max {
            builder = builder.max(max);
        }
        if let Some(allowed) = self.allowed {
            builder = builder.allowed(allowed);
        }

        Ok(builder.build())
    }

    fn from_column(name: &str, column: &Column) -> Self {
        if column.has_custom() {
            debug!(
                "Column '{}' has a custom predicate; it is not serialized",
                name
            );
        }

        Self {
            type_name: Some(column.dtype().as_str().to_string()),
            not_null: column.not_null(),
            min: column.min(),
            max: column.max(),
            allowed: column.allowed().map(<[DataValue]>::to_vec),
        }
    }
}

impl ContractDocument {
    /// Builds a validated contract from the declaration.
    pub fn into_contract(self) -> Result<Contract, ContractError> {
        let mut builder = Contract::builder(self.name);

        for (name, column) in self.columns {
            let column = column.unwrap_or_default().into_column(&name)?;
            builder = builder.column(name, column);
        }

        builder.rules(self.rules).build()
    }

    /// Captures the declarative part of a contract.
    pub fn from_contract(contract: &Contract) -> Self {
        Self {
            name: contract.name().to_string(),
            columns: contract
                .columns()
                .iter()
                .map(|(name, column)| {
                    (name.clone(), Some(ColumnDocument::from_column(name, column)))
                })
                .collect(),
            rules: contract
                .rule_texts()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}
