use serde::Serialize;

use crate::error::Result;
use crate::model::ScanResult;
use crate::policy::Finding;

#[derive(Serialize)]
struct JsonReport<'a> {
    result: &'a ScanResult,
    findings: &'a [Finding],
}

/// Render a scan result and findings as a JSON report.
pub fn render(result: &ScanResult, findings: &[Finding]) -> Result<String> {
    let report = JsonReport { result, findings };
    let json = serde_json::to_string_pretty(&report)?;
    Ok(json)
}
