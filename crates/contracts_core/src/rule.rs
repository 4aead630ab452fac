//! Dataset-level rules.
//!
//! A rule is a comparison between a dataset aggregate and a numeric literal, written as
//! `<aggregate> <op> <number>`, e.g. `row_count > 0`. Aggregates are resolved through
//! [`AGGREGATES`]; adding a new one means adding an entry there.

use crate::{CheckResult, ContractError, Dataset, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static RULE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*(>=|<=|==|!=|>|<)\s*([+-]?\d+(?:\.\d+)?)\s*$")
        .expect("rule pattern is valid")
});

/// A named dataset aggregate.
pub struct Aggregate {
    /// Identifier used in rule expressions
    pub name: &'static str,
    /// Computes the aggregate over a dataset
    pub compute: fn(&dyn Dataset) -> f64,
}

impl fmt::Debug for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregate").field("name", &self.name).finish()
    }
}

fn row_count(dataset: &dyn Dataset) -> f64 {
    dataset.row_count() as f64
}

/// Aggregates that rule expressions may reference.
pub static AGGREGATES: &[Aggregate] = &[Aggregate {
    name: "row_count",
    compute: row_count,
}];

fn find_aggregate(name: &str) -> Option<&'static Aggregate> {
    AGGREGATES.iter().find(|a| a.name == name)
}

/// Comparison operator of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl ComparisonOp {
    fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(ComparisonOp::Gt),
            ">=" => Some(ComparisonOp::Ge),
            "<" => Some(ComparisonOp::Lt),
            "<=" => Some(ComparisonOp::Le),
            "==" => Some(ComparisonOp::Eq),
            "!=" => Some(ComparisonOp::Ne),
            _ => None,
        }
    }

    /// Operator symbol.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
        }
    }

    /// Applies the operator to `lhs <op> rhs`.
    pub fn apply(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            ComparisonOp::Gt => lhs > rhs,
            ComparisonOp::Ge => lhs >= rhs,
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Le => lhs <= rhs,
            ComparisonOp::Eq => lhs == rhs,
            ComparisonOp::Ne => lhs != rhs,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed rule expression. Keeps the raw text, which is also the check name.
#[derive(Debug, Clone)]
pub struct Rule {
    text: String,
    aggregate: &'static Aggregate,
    op: ComparisonOp,
    literal: f64,
}

impl Rule {
    /// Parses a rule expression.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownAggregate` if the left-hand side is not a known
    /// aggregate, and `ContractError::InvalidRule` for anything else that does not parse.
    ///
    /// # Example
    ///
    /// ```rust
    /// use contracts_core::{DataSet, Rule};
    ///
    /// let rule = Rule::parse("row_count > 0").unwrap();
    /// let check = rule.evaluate(&DataSet::empty());
    /// assert_eq!(check.name, "row_count > 0");
    /// assert!(!check.passed);
    /// ```
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        let text = text.into();

        let captures = RULE_PATTERN.captures(&text).ok_or_else(|| {
            ContractError::invalid_rule(
                &text,
                "expected '<aggregate> <op> <number>' with op one of >, >=, <, <=, ==, !=",
            )
        })?;

        let identifier = &captures[1];
        let aggregate =
            find_aggregate(identifier).ok_or_else(|| ContractError::UnknownAggregate {
                rule: text.clone(),
                identifier: identifier.to_string(),
                supported: AGGREGATES
                    .iter()
                    .map(|a| a.name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        let op = ComparisonOp::parse(&captures[2])
            .ok_or_else(|| ContractError::invalid_rule(&text, "unknown operator"))?;

        let literal: f64 = captures[3]
            .parse()
            .map_err(|_| ContractError::invalid_rule(&text, "literal is not a number"))?;

        Ok(Self {
            text,
            aggregate,
            op,
            literal,
        })
    }

    /// Raw expression text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Name of the referenced aggregate.
    pub fn aggregate(&self) -> &'static str {
        self.aggregate.name
    }

    /// Comparison operator.
    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    /// Right-hand literal.
    pub fn literal(&self) -> f64 {
        self.literal
    }

    /// Evaluates the rule against a dataset.
    pub fn evaluate(&self, dataset: &dyn Dataset) -> CheckResult {
        let observed = (self.aggregate.compute)(dataset);
        let passed = self.op.apply(observed, self.literal);

        debug!("Rule '{}': {} = {} -> {}", self.text, self.aggregate.name, observed, passed);

        let message = if passed {
            format!("{} = {}", self.aggregate.name, observed)
        } else {
            format!(
                "{} = {}, expected {} {}",
                self.aggregate.name, observed, self.op, self.literal
            )
        };

        CheckResult::new(self.text.clone(), passed, message)
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
