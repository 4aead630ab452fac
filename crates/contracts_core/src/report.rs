//! Validation outcomes.
//!
//! A [`CheckResult`] is the outcome of one constraint or rule; a [`ValidationResult`] is
//! the full, ordered report of one [`Contract::validate`](crate::Contract::validate) call.

use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// Stable identifier: `<kind>:<column>` for column checks, the raw text for rules
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable detail, e.g. the number of offending values
    pub message: String,
}

impl CheckResult {
    /// Creates a new check result.
    pub fn new(name: impl Into<String>, passed: bool, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            message: message.into(),
        }
    }

    /// Creates a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, true, message)
    }

    /// Creates a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, false, message)
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.passed { "✓" } else { "✗" };
        write!(f, "{} {}: {}", mark, self.name, self.message)
    }
}

/// Report of one validation run.
///
/// `ok` is true iff every check passed, so a report with no checks is ok. The report is
/// read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    contract_name: String,
    ok: bool,
    checks: Vec<CheckResult>,
}

impl ValidationResult {
    /// Creates a report from a contract name and its checks.
    pub fn new(contract_name: impl Into<String>, checks: Vec<CheckResult>) -> Self {
        Self {
            contract_name: contract_name.into(),
            ok: checks.iter().all(|c| c.passed),
            checks,
        }
    }

    /// Name of the validated contract.
    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    /// Whether every check passed.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// All checks, in evaluation order.
    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    /// Checks that failed, in evaluation order.
    pub fn failed_checks(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }

    /// Number of passing checks.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Number of failing checks.
    pub fn failed_count(&self) -> usize {
        self.checks.len() - self.passed_count()
    }

    /// Human-readable summary.
    ///
    /// The first line carries the contract name, overall status and counts; each failing
    /// check follows on its own line.
    pub fn summary(&self) -> String {
        let status = if self.ok { "passed" } else { "failed" };
        let mut lines = vec![format!(
            "Contract '{}' {}: {} checks, {} passed, {} failed",
            self.contract_name,
            status,
            self.checks.len(),
            self.passed_count(),
            self.failed_count()
        )];

        lines.extend(self.failed_checks().iter().map(|c| format!("  {}", c)));
        lines.join("\n")
    }

    /// Plain structured form with `contract_name`, `ok` and `checks`.
    pub fn to_dict(&self) -> Value {
        json!({
            "contract_name": self.contract_name,
            "ok": self.ok,
            "checks": self
                .checks
                .iter()
                .map(|c| json!({
                    "name": c.name,
                    "passed": c.passed,
                    "message": c.message,
                }))
                .collect::<Vec<_>>(),
        })
    }
}
