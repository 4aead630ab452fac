//! # Data Contracts Core
//!
//! Contract model and validation engine for tabular data contracts.
//!
//! A data contract declares what a dataset must look like: per-column type, nullability,
//! numeric bounds, allowed values and custom predicates, plus dataset-wide rules such as
//! `row_count > 0`. Validating a dataset produces an ordered, inspectable report.
//!
//! ## Key Concepts
//!
//! - **Contract**: a named set of columns and rules
//! - **Column**: constraints for one field
//! - **Rule**: a comparison over a dataset aggregate
//! - **CheckResult**: the outcome of one constraint or rule
//! - **ValidationResult**: every check of one validation run
//!
//! Malformed contracts are rejected with a [`ContractError`] when they are built. Data
//! that violates a contract never produces an error, only failing checks.
//!
//! ## Example
//!
//! ```rust
//! use contracts_core::{Column, Contract, DataSet, DataType};
//!
//! let contract = Contract::builder("orders")
//!     .column("order_id", Column::builder(DataType::String).not_null(true).build())
//!     .column("amount", Column::builder(DataType::Float).min(0.0).build())
//!     .column("currency", Column::builder(DataType::String).allowed(["USD", "EUR"]).build())
//!     .build()
//!     .unwrap();
//!
//! let dataset = DataSet::new()
//!     .with_column("order_id", vec![None, Some("A1")])
//!     .unwrap()
//!     .with_column("amount", vec![-5.0, 10.0])
//!     .unwrap()
//!     .with_column("currency", vec!["GBP", "USD"])
//!     .unwrap();
//!
//! let result = contract.validate(&dataset);
//! assert!(!result.is_ok());
//! println!("{}", result.summary());
//! ```

pub mod builder;
pub mod column;
pub mod contract;
pub mod dataset;
pub mod error;
pub mod report;
pub mod rule;

pub use builder::*;
pub use column::*;
pub use contract::*;
pub use dataset::*;
pub use error::*;
pub use report::*;
pub use rule::*;
