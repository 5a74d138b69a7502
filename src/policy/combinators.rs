//! Boolean-like aggregation over child policies.
//!
//! A child passes when its finding list carries no fail-severity entry;
//! warn/info findings are kept in the aggregate payload but never count
//! against pass/fail. Which child failed is irrelevant to the outcome,
//! only how many did.

use serde::Serialize;

use crate::model::ScanResult;
use crate::policy::{passes, Finding, Policy, Severity};

#[derive(Serialize)]
struct CompositePayload {
    passing_count: usize,
    failing_count: usize,
    child_findings: Vec<Finding>,
}

#[derive(Serialize)]
struct ThresholdPayload {
    required: isize,
    passing_count: usize,
    failing_count: usize,
    child_findings: Vec<Finding>,
}

#[derive(Serialize)]
struct NotPayload {
    child_findings: Vec<Finding>,
}

fn aggregate(
    policy_id: &str,
    message: String,
    severity: Severity,
    payload: impl Serialize,
) -> Vec<Finding> {
    vec![Finding {
        policy_id: policy_id.into(),
        message,
        severity,
        payload: serde_json::to_value(payload).ok(),
    }]
}

fn passing_count(per_child: &[Vec<Finding>]) -> usize {
    per_child.iter().filter(|f| passes(f)).count()
}

fn flatten(per_child: Vec<Vec<Finding>>) -> Vec<Finding> {
    per_child.into_iter().flatten().collect()
}

/// Passes iff every child passes; zero children pass vacuously.
pub struct AllOfPolicy {
    children: Vec<Box<dyn Policy>>,
    severity: Severity,
}

impl AllOfPolicy {
    pub fn new(children: Vec<Box<dyn Policy>>) -> Self {
        Self {
            children,
            severity: Severity::Fail,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Policy for AllOfPolicy {
    fn id(&self) -> &str {
        "all-of"
    }

    fn evaluate(&self, result: &ScanResult) -> Vec<Finding> {
        if self.children.is_empty() {
            return Vec::new();
        }
        let per_child: Vec<Vec<Finding>> =
            self.children.iter().map(|c| c.evaluate(result)).collect();
        let passing = passing_count(&per_child);
        if passing == self.children.len() {
            return Vec::new();
        }
        aggregate(
            self.id(),
            format!(
                "all-of requirement failed (passing={passing} < total={})",
                self.children.len()
            ),
            self.severity,
            CompositePayload {
                passing_count: passing,
                failing_count: self.children.len() - passing,
                child_findings: flatten(per_child),
            },
        )
    }
}

/// Passes iff at least one child passes; zero children is a failure, not
/// a vacuous pass.
pub struct AnyOfPolicy {
    children: Vec<Box<dyn Policy>>,
    severity: Severity,
}

impl AnyOfPolicy {
    pub fn new(children: Vec<Box<dyn Policy>>) -> Self {
        Self {
            children,
            severity: Severity::Fail,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Policy for AnyOfPolicy {
    fn id(&self) -> &str {
        "any-of"
    }

    fn evaluate(&self, result: &ScanResult) -> Vec<Finding> {
        let per_child: Vec<Vec<Finding>> =
            self.children.iter().map(|c| c.evaluate(result)).collect();
        let passing = passing_count(&per_child);
        if passing > 0 {
            return Vec::new();
        }
        aggregate(
            self.id(),
            "any-of requirement failed (no passing children)".into(),
            self.severity,
            CompositePayload {
                passing_count: 0,
                failing_count: self.children.len(),
                child_findings: flatten(per_child),
            },
        )
    }
}

/// Passes iff at least `required` children pass.
///
/// `required <= 0` is always satisfied regardless of children; zero
/// children with `required > 0` always fails.
pub struct NOfPolicy {
    children: Vec<Box<dyn Policy>>,
    required: isize,
    severity: Severity,
}

impl NOfPolicy {
    pub fn new(children: Vec<Box<dyn Policy>>, required: isize) -> Self {
        Self {
            children,
            required,
            severity: Severity::Fail,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Policy for NOfPolicy {
    fn id(&self) -> &str {
        "n-of"
    }

    fn evaluate(&self, result: &ScanResult) -> Vec<Finding> {
        if self.required <= 0 {
            return Vec::new();
        }
        if self.children.is_empty() {
            return aggregate(
                self.id(),
                format!("n-of requirement failed (required={}, total=0)", self.required),
                self.severity,
                ThresholdPayload {
                    required: self.required,
                    passing_count: 0,
                    failing_count: 0,
                    child_findings: Vec::new(),
                },
            );
        }
        let per_child: Vec<Vec<Finding>> =
            self.children.iter().map(|c| c.evaluate(result)).collect();
        let passing = passing_count(&per_child);
        if passing as isize >= self.required {
            return Vec::new();
        }
        aggregate(
            self.id(),
            format!(
                "n-of requirement failed (passing={passing} < required={})",
                self.required
            ),
            self.severity,
            ThresholdPayload {
                required: self.required,
                passing_count: passing,
                failing_count: self.children.len() - passing,
                child_findings: flatten(per_child),
            },
        )
    }
}

/// Passes iff its single child produced zero fail-severity findings; the
/// child's warn/info findings alone never trip it.
pub struct NotPolicy {
    child: Box<dyn Policy>,
    severity: Severity,
}

impl NotPolicy {
    pub fn new(child: Box<dyn Policy>) -> Self {
        Self {
            child,
            severity: Severity::Fail,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Policy for NotPolicy {
    fn id(&self) -> &str {
        "not"
    }

    fn evaluate(&self, result: &ScanResult) -> Vec<Finding> {
        let child_findings = self.child.evaluate(result);
        if passes(&child_findings) {
            return Vec::new();
        }
        aggregate(
            self.id(),
            "not requirement failed (child produced failures)".into(),
            self.severity,
            NotPayload { child_findings },
        )
    }
}
