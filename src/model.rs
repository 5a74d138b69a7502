use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema version stamped into every [`ScanResult`].
pub const SCHEMA_VERSION: u32 = 1;

/// Default path-component ignore strings.
///
/// Matched against every path component as both a prefix and a suffix.
/// Covers build artifacts, version control, package-manager caches, OS
/// metadata files, and project configuration files.
pub const DEFAULT_IGNORE_PREFIXES: &[&str] = &[
    ".build",
    ".DS_Store",
    ".flf", // Figlet font files
    ".flf2a",
    ".git",
    ".github",
    ".gitignore",
    ".json",
    ".spi",
    ".swiftpm",
    ".tulsiconf",
    ".tulsiproj",
    "BUILD",
    "LICENSE",
    "Package.resolved",
];

/// Traversal filter restricting which regions of the tree are considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Only entries inside a `.docc` documentation catalog.
    Docc,
    /// Everything under the roots.
    All,
}

impl Scope {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "docc" => Some(Self::Docc),
            "all" | "everything" => Some(Self::All),
            _ => None,
        }
    }
}

/// Options for a scan invocation.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub scope: Scope,
    /// Root directories to traverse.
    pub roots: Vec<PathBuf>,
    /// Ordered path-component ignore strings, matched as prefix or suffix.
    pub ignore_prefixes: Vec<String>,
    /// Advisory only; the in-process adapter is single-threaded.
    pub concurrency: Option<usize>,
    pub follow_symlinks: bool,
}

impl ScanOptions {
    /// Options for the given roots with the default scope, ignore list,
    /// and symlink handling.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            scope: Scope::Docc,
            roots,
            ignore_prefixes: DEFAULT_IGNORE_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            concurrency: None,
            follow_symlinks: false,
        }
    }
}

/// A single rule failure recorded against one file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub path: String,
    pub reason: String,
    pub rule_id: String,
}

/// Traversal counters and timing for one completed scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub files_visited: u64,
    pub directories_visited: u64,
    /// Wall-clock duration in seconds.
    pub duration_secs: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Immutable aggregate produced once per scan.
///
/// The single artifact the policy layer consumes; never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub violations: Vec<Violation>,
    pub empty_directories: Vec<String>,
    pub metrics: Metrics,
    pub version: u32,
}

impl ScanResult {
    pub fn new(violations: Vec<Violation>, empty_directories: Vec<String>, metrics: Metrics) -> Self {
        Self {
            violations,
            empty_directories,
            metrics,
            version: SCHEMA_VERSION,
        }
    }
}

/// Events emitted by an adapter while a scan is in flight.
///
/// Delivered synchronously on the scanning thread in traversal order; the
/// terminal `Finished` event always comes last and carries the completed
/// result.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    Started { root: PathBuf },
    Progress { files: u64, directories: u64 },
    Violation(Violation),
    EmptyDir { path: String },
    Finished(ScanResult),
}
