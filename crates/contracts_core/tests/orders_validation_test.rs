//! Integration tests for the validation engine.
//!
//! End-to-end scenarios using complete contracts and small, realistic datasets.

use contracts_core::{Column, Contract, DataRow, DataSet, DataType, DataValue, Dataset};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

/// Orders contract used throughout these tests.
fn create_orders_contract() -> Contract {
    Contract::builder("orders")
        .column(
            "order_id",
            Column::builder(DataType::String).not_null(true).build(),
        )
        .column("amount", Column::builder(DataType::Float).min(0.0).build())
        .column(
            "currency",
            Column::builder(DataType::String)
                .allowed(["USD", "EUR"])
                .build(),
        )
        .build()
        .expect("orders contract is well-formed")
}

fn sample_dataset() -> DataSet {
    DataSet::new()
        .with_column("order_id", vec!["A001", "A002", "A003"])
        .unwrap()
        .with_column("amount", vec![10.0, 25.5, 0.0])
        .unwrap()
        .with_column("currency", vec!["USD", "EUR", "USD"])
        .unwrap()
}

fn dataset_with_violations() -> DataSet {
    DataSet::new()
        .with_column("order_id", vec![None, Some("A1")])
        .unwrap()
        .with_column("amount", vec![-5, 10])
        .unwrap()
        .with_column("currency", vec!["GBP", "USD"])
        .unwrap()
}

fn failed_names(contract: &Contract, dataset: &dyn Dataset) -> Vec<String> {
    contract
        .validate(dataset)
        .failed_checks()
        .iter()
        .map(|c| c.name.clone())
        .collect()
}

#[test]
fn test_validate_passing() {
    let result = create_orders_contract().validate(&sample_dataset());

    assert!(result.is_ok(), "unexpected failures: {:?}", result.failed_checks());
    assert_eq!(result.contract_name(), "orders");
    assert_eq!(result.checks().len(), 3);
}

#[test]
fn test_orders_violations_are_reported_exactly() {
    let contract = create_orders_contract();
    let result = contract.validate(&dataset_with_violations());

    assert!(!result.is_ok());
    assert_eq!(
        failed_names(&contract, &dataset_with_violations()),
        vec!["not_null:order_id", "min:amount", "allowed:currency"]
    );
    assert_eq!(result.failed_count(), 3);
}

#[test]
fn test_validate_missing_column() {
    let contract = create_orders_contract();
    let dataset = DataSet::new()
        .with_column("order_id", vec!["A001"])
        .unwrap();

    let result = contract.validate(&dataset);

    assert!(!result.is_ok());
    assert!(
        result
            .checks()
            .iter()
            .any(|c| c.name.contains("amount") && !c.passed)
    );
    assert_eq!(
        failed_names(&contract, &dataset),
        vec!["exists:amount", "exists:currency"]
    );
}

#[test]
fn test_rows_based_dataset() {
    let rows: Vec<DataRow> = vec![
        HashMap::from([
            ("order_id".to_string(), DataValue::from("A1")),
            ("amount".to_string(), DataValue::Float(12.0)),
            ("currency".to_string(), DataValue::from("EUR")),
        ]),
        HashMap::from([
            ("order_id".to_string(), DataValue::from("A2")),
            ("amount".to_string(), DataValue::Int(3)),
        ]),
    ];

    let dataset: DataSet = rows.into_iter().collect();
    let result = create_orders_contract().validate(&dataset);

    // The missing currency in the second row is a null, which `allowed` ignores.
    assert!(result.is_ok(), "unexpected failures: {:?}", result.failed_checks());
}

#[test]
fn test_custom_check_passing() {
    let contract = Contract::builder("test")
        .column(
            "value",
            Column::builder(DataType::Float)
                .custom(|v| v.as_float().is_some_and(|x| x > 0.0))
                .build(),
        )
        .build()
        .unwrap();

    let dataset = DataSet::new()
        .with_column("value", vec![1.0, 2.5, 10.0])
        .unwrap();
    let result = contract.validate(&dataset);

    assert!(result.is_ok());
    let custom: Vec<_> = result
        .checks()
        .iter()
        .filter(|c| c.name == "custom:value")
        .collect();
    assert_eq!(custom.len(), 1);
    assert!(custom[0].passed);
}

#[test]
fn test_custom_check_failing() {
    let is_email = |v: &DataValue| {
        v.as_str()
            .is_some_and(|s| s.contains('@') && s.contains('.'))
    };
    let contract = Contract::builder("test")
        .column(
            "email",
            Column::builder(DataType::String).custom(is_email).build(),
        )
        .build()
        .unwrap();

    let dataset = DataSet::new()
        .with_column(
            "email",
            vec!["user@example.com", "invalid-email", "test@domain.org"],
        )
        .unwrap();
    let result = contract.validate(&dataset);

    assert!(!result.is_ok());
    let check = &result.checks()[0];
    assert_eq!(check.name, "custom:email");
    assert!(!check.passed);
    assert!(check.message.contains('1'));
}

#[test]
fn test_custom_age_range() {
    let contract = Contract::builder("people")
        .column(
            "age",
            Column::builder(DataType::Int)
                .custom(|v| v.as_int().is_some_and(|age| (18..=100).contains(&age)))
                .build(),
        )
        .build()
        .unwrap();

    let dataset = DataSet::new()
        .with_column("age", vec![25, 30, 150, 45])
        .unwrap();
    let result = contract.validate(&dataset);

    assert!(!result.is_ok());
    assert_eq!(result.failed_count(), 1);
    assert_eq!(result.failed_checks()[0].name, "custom:age");
    assert_eq!(result.failed_checks()[0].message, "1 value(s) failed");
}

#[test]
fn test_custom_check_with_other_constraints() {
    let contract = Contract::builder("test")
        .column(
            "count",
            Column::builder(DataType::Int)
                .not_null(true)
                .min(0.0)
                .max(100.0)
                .custom(|v| v.as_int().is_some_and(|n| n % 2 == 0))
                .build(),
        )
        .build()
        .unwrap();

    let dataset = DataSet::new()
        .with_column("count", vec![2, 4, 6, 8])
        .unwrap();
    let result = contract.validate(&dataset);

    assert!(result.is_ok());
    let names: Vec<&str> = result.checks().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["not_null:count", "min:count", "max:count", "custom:count"]
    );
}

#[test]
fn test_row_count_rule_on_empty_dataset() {
    let contract = Contract::builder("orders")
        .rule("row_count > 0")
        .build()
        .unwrap();

    let result = contract.validate(&DataSet::empty());

    assert!(!result.is_ok());
    assert_eq!(result.checks().len(), 1);
    assert_eq!(result.checks()[0].name, "row_count > 0");
    assert!(!result.checks()[0].passed);
}

#[test]
fn test_rules_follow_columns() {
    let contract = Contract::builder("orders")
        .column(
            "order_id",
            Column::builder(DataType::String).not_null(true).build(),
        )
        .rule("row_count > 0")
        .rule("row_count <= 3")
        .build()
        .unwrap();

    let result = contract.validate(&sample_dataset());
    let names: Vec<&str> = result.checks().iter().map(|c| c.name.as_str()).collect();

    assert_eq!(
        names,
        vec!["not_null:order_id", "row_count > 0", "row_count <= 3"]
    );
    assert!(result.is_ok());
}

#[test]
fn test_summary_and_dict() {
    let result = create_orders_contract().validate(&sample_dataset());

    let summary = result.summary();
    assert!(summary.contains("orders"));
    assert!(summary.contains("passed"));

    let dict = result.to_dict();
    assert_eq!(dict["contract_name"], "orders");
    assert_eq!(dict["ok"], true);
    assert!(dict["checks"].is_array());
}

#[test]
fn test_concurrent_validation() {
    let contract = create_orders_contract();
    let good = sample_dataset();
    let bad = dataset_with_violations();

    std::thread::scope(|scope| {
        let a = scope.spawn(|| contract.validate(&good));
        let b = scope.spawn(|| contract.validate(&bad));
        assert!(a.join().unwrap().is_ok());
        assert!(!b.join().unwrap().is_ok());
    });
}
