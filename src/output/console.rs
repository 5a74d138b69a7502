use crate::model::ScanResult;
use crate::policy::{Finding, Severity};

/// Render a scan result and findings as plain console text.
pub fn render(result: &ScanResult, findings: &[Finding]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n  Scanned {} file(s), {} directories in {:.2}s\n",
        result.metrics.files_visited,
        result.metrics.directories_visited,
        result.metrics.duration_secs,
    ));

    if result.violations.is_empty() {
        output.push_str("\n  No violations.\n");
    } else {
        output.push_str(&format!("\n  {} violation(s):\n\n", result.violations.len()));
        for violation in &result.violations {
            output.push_str(&format!(
                "  [{}] {}\n           {}\n",
                violation.rule_id, violation.path, violation.reason
            ));
        }
    }

    if !result.empty_directories.is_empty() {
        output.push_str(&format!(
            "\n  {} empty directories:\n\n",
            result.empty_directories.len()
        ));
        for dir in &result.empty_directories {
            output.push_str(&format!("  {}\n", dir));
        }
    }

    if !findings.is_empty() {
        output.push_str(&format!("\n  {} policy finding(s):\n\n", findings.len()));
        for finding in findings {
            let severity_tag = match finding.severity {
                Severity::Fail => "[FAIL]",
                Severity::Warn => "[WARN]",
                Severity::Info => "[INFO]",
            };
            output.push_str(&format!(
                "  {} {} {}\n",
                severity_tag, finding.policy_id, finding.message
            ));
        }
    }

    let failed = !result.violations.is_empty()
        || !result.empty_directories.is_empty()
        || findings.iter().any(|f| f.severity == Severity::Fail);
    output.push_str(&format!(
        "\n  Result: {}\n\n",
        if failed { "FAIL" } else { "PASS" }
    ));

    output
}
