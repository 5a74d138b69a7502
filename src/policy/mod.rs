pub mod combinators;
pub mod max_violations;
pub mod no_empty_dirs;

use serde::{Deserialize, Serialize};

use crate::model::ScanResult;

pub use combinators::{AllOfPolicy, AnyOfPolicy, NOfPolicy, NotPolicy};
pub use max_violations::MaxViolationsPolicy;
pub use no_empty_dirs::{EmptyDirMode, NoEmptyDirsPolicy};

/// Severity of a policy finding. `Fail` is the sole signal that the
/// producing policy failed; `Warn` and `Info` never count against pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Fail,
    Warn,
    Info,
}

impl Severity {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fail" => Some(Self::Fail),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// Severity-tagged outcome of evaluating one policy.
///
/// The payload is policy-specific structured data, erased to JSON at this
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub policy_id: String,
    pub message: String,
    pub severity: Severity,
    pub payload: Option<serde_json::Value>,
}

/// A pass/fail check over one completed scan result.
///
/// Heterogeneous, ordered policy lists are built as `Vec<Box<dyn Policy>>`;
/// combinators own their children the same way.
pub trait Policy: Send + Sync {
    /// Constant identifier stamped on every finding this policy produces.
    fn id(&self) -> &str;

    /// Produce zero or more findings; must not mutate the result.
    fn evaluate(&self, result: &ScanResult) -> Vec<Finding>;
}

/// A finding list passes when it contains no fail-severity entry.
pub(crate) fn passes(findings: &[Finding]) -> bool {
    !findings.iter().any(|f| f.severity == Severity::Fail)
}

/// Applies each policy in list order and flattens the findings.
///
/// Pure and stateless; there is no error path.
pub fn evaluate(result: &ScanResult, policies: &[Box<dyn Policy>]) -> Vec<Finding> {
    policies.iter().flat_map(|p| p.evaluate(result)).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;

    use crate::model::{Metrics, ScanResult, Violation};

    pub fn violation(rule_id: &str, path: &str) -> Violation {
        Violation {
            path: path.into(),
            reason: "stubbed".into(),
            rule_id: rule_id.into(),
        }
    }

    pub fn result_with(violations: Vec<Violation>, empty_dirs: Vec<String>) -> ScanResult {
        let now = Utc::now();
        ScanResult::new(
            violations,
            empty_dirs,
            Metrics {
                files_visited: 0,
                directories_visited: 0,
                duration_secs: 0.0,
                start: now,
                end: now,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{result_with, violation};
    use super::*;

    #[test]
    fn evaluator_flattens_in_list_order() {
        let result = result_with(
            vec![
                violation("kebab-case", "BadName.swift"),
                violation("empty-dir", "empty/"),
            ],
            vec![],
        );
        let policies: Vec<Box<dyn Policy>> = vec![
            Box::new(MaxViolationsPolicy::for_rules(["empty-dir"], 0)),
            Box::new(MaxViolationsPolicy::for_rules(["kebab-case"], 0)),
        ];

        let findings = evaluate(&result, &policies);
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.policy_id == "max-violations"));
    }

    #[test]
    fn warn_findings_do_not_fail_a_policy() {
        let findings = vec![Finding {
            policy_id: "x".into(),
            message: "advisory".into(),
            severity: Severity::Warn,
            payload: None,
        }];
        assert!(passes(&findings));
    }

    #[test]
    fn severity_round_trips_through_serde() {
        for sev in [Severity::Fail, Severity::Warn, Severity::Info] {
            let json = serde_json::to_string(&sev).unwrap();
            let back: Severity = serde_json::from_str(&json).unwrap();
            assert_eq!(sev, back);
        }
        assert_eq!(serde_json::to_string(&Severity::Fail).unwrap(), "\"fail\"");
    }
}
