use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::model::{ScanResult, DEFAULT_IGNORE_PREFIXES};
use crate::policy::{Finding, Policy, Severity};

pub const POLICY_ID: &str = "no-empty-dirs";

/// How directory children are classified when deciding emptiness.
#[derive(Debug, Clone)]
pub enum EmptyDirMode {
    /// Count everything; truly zero children only.
    StrictZero,
    /// Treat common noise (.DS_Store, .git, etc.) as ignorable.
    IgnoreNoise,
    /// Caller-provided ignore prefixes and keep names.
    Custom {
        ignore: Vec<String>,
        keep: Vec<String>,
    },
}

impl EmptyDirMode {
    fn label(&self) -> &'static str {
        match self {
            Self::StrictZero => "strict-zero",
            Self::IgnoreNoise => "ignore-noise",
            Self::Custom { .. } => "custom",
        }
    }
}

/// Fails when any directory under the roots (the roots included) is empty.
///
/// Unlike every other concrete policy, this one lists the live filesystem
/// itself; the supplied scan result is not consulted.
pub struct NoEmptyDirsPolicy {
    mode: EmptyDirMode,
    roots: Vec<PathBuf>,
    severity: Severity,
}

#[derive(Serialize)]
struct Payload {
    mode: &'static str,
    count: usize,
    directories: Vec<String>,
}

impl NoEmptyDirsPolicy {
    pub fn new(mode: EmptyDirMode, roots: Vec<PathBuf>) -> Self {
        Self {
            mode,
            roots,
            severity: Severity::Fail,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn is_empty(&self, dir: &Path, ignores: &[String], keepers: &BTreeSet<String>) -> bool {
        let Ok(entries) = fs::read_dir(dir) else {
            return false;
        };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            // read_dir never yields "." or "..".
            if ignores.iter().any(|p| name.starts_with(p.as_str())) {
                continue;
            }
            if keepers.contains(&name) {
                continue;
            }
            return false;
        }
        true
    }
}

impl Policy for NoEmptyDirsPolicy {
    fn id(&self) -> &str {
        POLICY_ID
    }

    fn evaluate(&self, _result: &ScanResult) -> Vec<Finding> {
        let (ignores, keepers): (Vec<String>, BTreeSet<String>) = match &self.mode {
            EmptyDirMode::StrictZero => (Vec::new(), BTreeSet::new()),
            EmptyDirMode::IgnoreNoise => (
                DEFAULT_IGNORE_PREFIXES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                BTreeSet::new(),
            ),
            EmptyDirMode::Custom { ignore, keep } => {
                (ignore.clone(), keep.iter().cloned().collect())
            }
        };

        let mut empties: Vec<String> = Vec::new();
        for root in &self.roots {
            // The root itself is evaluated along with every directory below it.
            for entry in WalkDir::new(root).into_iter().flatten() {
                if !entry.file_type().is_dir() {
                    continue;
                }
                if self.is_empty(entry.path(), &ignores, &keepers) {
                    empties.push(entry.path().display().to_string());
                }
            }
        }
        empties.sort();

        if empties.is_empty() {
            return Vec::new();
        }
        let payload = Payload {
            mode: self.mode.label(),
            count: empties.len(),
            directories: empties,
        };
        vec![Finding {
            policy_id: POLICY_ID.into(),
            message: format!("empty directories found (count={})", payload.count),
            severity: self.severity,
            payload: serde_json::to_value(payload).ok(),
        }]
    }
}
