//! Parser for data contract declarations (YAML/TOML formats).
//!
//! This crate turns declaration files into validated [`Contract`]s and writes contracts
//! back out as YAML. Custom predicates are code, not data, so they are never written;
//! every declarative attribute round-trips exactly.
//!
//! # Example
//!
//! ```rust
//! use contracts_parser::{parse_yaml, to_yaml};
//!
//! let yaml = r#"
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
//! "#;
//!
//! let contract = parse_yaml(yaml).expect("Failed to parse contract");
//! assert_eq!(contract.name(), "orders");
//!
//! let reparsed = parse_yaml(&to_yaml(&contract).unwrap()).unwrap();
//! assert_eq!(reparsed.rule_texts(), vec!["row_count > 0"]);
//! ```

mod document;

use contracts_core::{Contract, ContractError};
use document::ContractDocument;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during contract parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing, deserialization or serialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The declaration parsed but describes an invalid contract
    #[error("Invalid contract definition: {0}")]
    Definition(#[from] ContractError),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported contract file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a contract from a YAML string.
///
/// # Arguments
///
/// * `content` - The YAML declaration to parse
///
/// # Errors
///
/// `ParserError::YamlError` if the text is not a valid declaration, and
/// `ParserError::Definition` if it is well-formed but declares an invalid contract
/// (unknown type, bad rule, inverted or NaN bounds).
pub fn parse_yaml(content: &str) -> Result<Contract> {
    let document: ContractDocument = serde_yaml_ng::from_str(content)?;
    Ok(document.into_contract()?)
}

/// Parse a contract from a TOML string.
///
/// # Example
///
/// ```rust
/// use contracts_parser::parse_toml;
///
/// let toml = r#"
/// name = "orders"
/// rules = ["row_count > 0"]
///
/// [columns.amount]
/// type = "float"
/// min = 0
/// "#;
///
/// let contract = parse_toml(toml).unwrap();
/// assert_eq!(contract.column("amount").unwrap().min(), Some(0.0));
/// ```
pub fn parse_toml(content: &str) -> Result<Contract> {
    let document: ContractDocument =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(document.into_contract()?)
}

/// Serialize a contract to YAML.
///
/// Custom predicates are omitted.
pub fn to_yaml(contract: &Contract) -> Result<String> {
    let document = ContractDocument::from_contract(contract);
    Ok(serde_yaml_ng::to_string(&document)?)
}

/// Detect the contract format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `ContractFormat::Yaml`
/// * `.toml` → `ContractFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ContractFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ContractFormat::Yaml),
        "toml" => Ok(ContractFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a contract from a file with automatic format detection.
///
/// # Arguments
///
/// * `path` - Path to the contract file (`.yaml`, `.yml` or `.toml`)
///
/// ```no_run
/// use contracts_parser::parse_file;
/// use std::path::Path;
///
/// let contract = parse_file(Path::new("contracts/orders.yml")).unwrap();
/// println!("Loaded contract: {}", contract.name());
/// ```
pub fn parse_file(path: &Path) -> Result<Contract> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!("Loading {:?} contract from {}", format, path.display());

    match format {
        ContractFormat::Yaml => parse_yaml(&content),
        ContractFormat::Toml => parse_toml(&content),
    }
}

/// Write a contract to a file as YAML.
///
/// The extension is advisory; anything other than `.toml` is written as YAML.
///
/// # Errors
///
/// Returns `ParserError::UnsupportedFormat` for a `.toml` path, since contracts are only
/// written as YAML, and `ParserError::IoError` if the file cannot be written.
pub fn write_file(contract: &Contract, path: &Path) -> Result<()> {
    if let Ok(ContractFormat::Toml) = detect_format(path) {
        return Err(ParserError::UnsupportedFormat(
            "toml (contracts are written as YAML)".to_string(),
        ));
    }

    let yaml = to_yaml(contract)?;
    std::fs::write(path, yaml)?;
    debug!("Wrote contract '{}' to {}", contract.name(), path.display());
    Ok(())
}

/// Text and file conversions as methods on [`Contract`].
///
/// ```rust
/// use contracts_core::Contract;
/// use contracts_parser::ContractText;
///
/// let contract = Contract::from_text("name: events\nrules: [row_count >= 1]").unwrap();
/// assert!(contract.to_text().unwrap().contains("row_count >= 1"));
/// ```
pub trait ContractText: Sized {
    /// Parses a YAML declaration.
    fn from_text(source: &str) -> Result<Self>;

    /// Renders the declarative part of the contract as YAML.
    fn to_text(&self) -> Result<String>;

    /// Reads a declaration file (YAML or TOML, by extension).
    fn from_path(path: impl AsRef<Path>) -> Result<Self>;

    /// Writes the contract to a YAML file.
    fn to_path(&self, path: impl AsRef<Path>) -> Result<()>;
}

impl ContractText for Contract {
    fn from_text(source: &str) -> Result<Self> {
        parse_yaml(source)
    }

    fn to_text(&self) -> Result<String> {
        to_yaml(self)
    }

    fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        parse_file(path.as_ref())
    }

    fn to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        write_file(self, path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts_core::{Column, DataType, DataValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_valid_yaml_minimal() {
        let contract = parse_yaml("name: test_contract\n").expect("Failed to parse valid YAML");

        assert_eq!(contract.name(), "test_contract");
        assert!(contract.columns().is_empty());
        assert!(contract.rules().is_empty());
    }

    #[test]
    fn test_parse_valid_yaml_with_columns() {
        let yaml = r#"
name: orders
columns:
  order_id:
    type: string
    not_null: true
  amount:
    type: float
    min: 0
    max: 10000.5
  currency:
    type: string
    allowed: [USD, EUR]
  note:
rules:
  - row_count > 0
"#;

        let contract = parse_yaml(yaml).expect("Failed to parse YAML with columns");

        let names: Vec<&str> = contract.columns().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["order_id", "amount", "currency", "note"]);

        let order_id = contract.column("order_id").unwrap();
        assert!(order_id.not_null());
        assert_eq!(order_id.dtype(), DataType::String);

        let amount = contract.column("amount").unwrap();
        assert_eq!(amount.dtype(), DataType::Float);
        assert_eq!(amount.min(), Some(0.0));
        assert_eq!(amount.max(), Some(10000.5));

        let currency = contract.column("currency").unwrap();
        assert_eq!(
            currency.allowed().unwrap(),
            &[DataValue::from("USD"), DataValue::from("EUR")]
        );

        let note = contract.column("note").unwrap();
        assert_eq!(note.dtype(), DataType::String);
        assert!(!note.not_null());

        assert_eq!(contract.rule_texts(), vec!["row_count > 0"]);
    }

    #[test]
    fn test_parse_yaml_type_aliases() {
        let yaml = r#"
name: t
columns:
  a: { type: integer }
  b: { type: double }
  c: { type: boolean }
  d: { type: str }
"#;
        let contract = parse_yaml(yaml).unwrap();
        let types: Vec<DataType> = contract.columns().values().map(|c| c.dtype()).collect();
        assert_eq!(
            types,
            vec![DataType::Int, DataType::Float, DataType::Bool, DataType::String]
        );
    }

    #[test]
    fn test_parse_yaml_unknown_type() {
        let yaml = r#"
name: t
columns:
  price:
    type: decimal
"#;
        let err = parse_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            ParserError::Definition(ContractError::UnknownType { ref column, .. }) if column == "price"
        ));
    }

    #[test]
    fn test_parse_yaml_invalid_rule() {
        let err = parse_yaml("name: t\nrules:\n  - rows > 0\n").unwrap_err();
        assert!(matches!(
            err,
            ParserError::Definition(ContractError::UnknownAggregate { .. })
        ));

        let err = parse_yaml("name: t\nrules:\n  - row_count is big\n").unwrap_err();
        assert!(matches!(
            err,
            ParserError::Definition(ContractError::InvalidRule { .. })
        ));
    }

    #[test]
    fn test_parse_yaml_inverted_bounds() {
        let yaml = "name: t\ncolumns:\n  amount:\n    min: 10\n    max: 1\n";
        let err = parse_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            ParserError::Definition(ContractError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_parse_yaml_nan_bound() {
        let yaml = "name: t\ncolumns:\n  a:\n    type: float\n    min: .nan\n    max: .nan\n";
        let err = parse_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            ParserError::Definition(ContractError::NanBound { bound: "min", .. })
        ));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let invalid_yaml = r#"
name: test
columns:
  - this is a list
  missing: [
"#;

        let result = parse_yaml(invalid_yaml);
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_yaml_rejects_unknown_keys() {
        let yaml = "name: t\ncolumns:\n  id:\n    nullable: false\n";
        assert!(matches!(
            parse_yaml(yaml).unwrap_err(),
            ParserError::YamlError(_)
        ));
    }

    #[test]
    fn test_parse_yaml_missing_name() {
        let result = parse_yaml("rules: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_valid_toml() {
        let toml = r#"
name = "orders"
rules = ["row_count > 0"]

[columns.order_id]
type = "string"
not_null = true

[columns.currency]
allowed = ["USD", "EUR"]
"#;

        let contract = parse_toml(toml).expect("Failed to parse valid TOML");

        assert_eq!(contract.name(), "orders");
        assert!(contract.column("order_id").unwrap().not_null());
        assert_eq!(contract.column("currency").unwrap().allowed().unwrap().len(), 2);
        assert_eq!(contract.rule_texts(), vec!["row_count > 0"]);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let invalid_toml = r#"
name = "test"
[[[invalid syntax
"#;

        let result = parse_toml(invalid_toml);
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_detect_format_yaml() {
        let path = Path::new("contract.yaml");
        assert_eq!(detect_format(path).unwrap(), ContractFormat::Yaml);

        let path = Path::new("contract.YML");
        assert_eq!(detect_format(path).unwrap(), ContractFormat::Yaml);
    }

    #[test]
    fn test_detect_format_toml() {
        let path = Path::new("contract.toml");
        assert_eq!(detect_format(path).unwrap(), ContractFormat::Toml);
    }

    #[test]
    fn test_detect_format_unsupported() {
        let result = detect_format(Path::new("contract.json"));
        assert!(matches!(
            result.unwrap_err(),
            ParserError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_detect_format_no_extension() {
        let result = detect_format(Path::new("contract"));
        assert!(matches!(result.unwrap_err(), ParserError::InvalidExtension));
    }

    #[test]
    fn test_to_yaml_omits_unset_attributes_and_predicates() {
        let contract = Contract::builder("orders")
            .column(
                "age",
                Column::builder(DataType::Int)
                    .min(18.0)
                    .custom(|v| v.as_int().is_some_and(|a| a < 100))
                    .build(),
            )
            .build()
            .unwrap();

        let yaml = to_yaml(&contract).unwrap();

        assert!(yaml.contains("type: int"));
        assert!(yaml.contains("min: 18"));
        assert!(!yaml.contains("not_null"));
        assert!(!yaml.contains("max"));
        assert!(!yaml.contains("custom"));
    }

    #[test]
    fn test_round_trip_yaml() {
        let original = Contract::builder("orders")
            .column(
                "order_id",
                Column::builder(DataType::String).not_null(true).build(),
            )
            .column(
                "amount",
                Column::builder(DataType::Float).min(0.0).max(99.5).build(),
            )
            .column(
                "currency",
                Column::builder(DataType::String).allowed(["USD", "EUR"]).build(),
            )
            .column(
                "flag",
                Column::builder(DataType::Bool).custom(|_| true).build(),
            )
            .rule("row_count > 0")
            .rule("row_count <= 100")
            .build()
            .unwrap();

        let parsed = Contract::from_text(&original.to_text().unwrap()).unwrap();

        assert_eq!(parsed.name(), original.name());
        assert_eq!(parsed.rules(), original.rules());
        assert_eq!(parsed.columns().len(), original.columns().len());
        for (name, column) in original.columns() {
            let loaded = parsed.column(name).expect("column survives round trip");
            assert_eq!(loaded.dtype(), column.dtype());
            assert_eq!(loaded.not_null(), column.not_null());
            assert_eq!(loaded.min(), column.min());
            assert_eq!(loaded.max(), column.max());
            assert_eq!(loaded.allowed(), column.allowed());
        }
        assert!(!parsed.column("flag").unwrap().has_custom());
    }

    #[test]
    fn test_round_trip_empty_contract() {
        let original = Contract::new("empty");
        let parsed = Contract::from_text(&original.to_text().unwrap()).unwrap();

        assert_eq!(parsed.name(), "empty");
        assert!(parsed.columns().is_empty());
        assert!(parsed.rules().is_empty());
    }
}
