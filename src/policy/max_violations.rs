use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::ScanResult;
use crate::policy::{Finding, Policy, Severity};

pub const POLICY_ID: &str = "max-violations";

/// Fails when the number of matching violations exceeds the limit.
///
/// With a rule-id filter, only violations from those rules are counted;
/// without one, every violation counts.
pub struct MaxViolationsPolicy {
    rule_ids: Option<BTreeSet<String>>,
    limit: usize,
    severity: Severity,
}

#[derive(Serialize)]
struct Payload {
    rule_ids: Option<Vec<String>>,
    limit: usize,
    actual: usize,
}

impl MaxViolationsPolicy {
    /// Count every violation against `limit`.
    pub fn new(limit: usize) -> Self {
        Self {
            rule_ids: None,
            limit,
            severity: Severity::Fail,
        }
    }

    /// Count only violations produced by the given rules.
    pub fn for_rules<I, S>(rule_ids: I, limit: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rule_ids: Some(rule_ids.into_iter().map(Into::into).collect()),
            limit,
            severity: Severity::Fail,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Policy for MaxViolationsPolicy {
    fn id(&self) -> &str {
        POLICY_ID
    }

    fn evaluate(&self, result: &ScanResult) -> Vec<Finding> {
        let actual = result
            .violations
            .iter()
            .filter(|v| {
                self.rule_ids
                    .as_ref()
                    .map_or(true, |ids| ids.contains(&v.rule_id))
            })
            .count();
        if actual <= self.limit {
            return Vec::new();
        }
        let payload = Payload {
            rule_ids: self
                .rule_ids
                .as_ref()
                .map(|ids| ids.iter().cloned().collect()),
            limit: self.limit,
            actual,
        };
        vec![Finding {
            policy_id: POLICY_ID.into(),
            message: format!("violations exceeded limit ({actual} > {})", self.limit),
            severity: self.severity,
            payload: serde_json::to_value(payload).ok(),
        }]
    }
}
