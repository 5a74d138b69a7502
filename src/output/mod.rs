pub mod console;
pub mod json;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::ScanResult;
use crate::policy::Finding;

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
}

impl OutputFormat {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Some(Self::Console),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Render a scan result and any policy findings in the specified format.
pub fn render(result: &ScanResult, findings: &[Finding], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(console::render(result, findings)),
        OutputFormat::Json => json::render(result, findings),
    }
}
