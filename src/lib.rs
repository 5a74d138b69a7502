//! dirlint: directory tree linter.
//!
//! Walks one or more roots with an ordered rule set, collecting naming
//! violations and empty directories into an immutable [`model::ScanResult`],
//! then evaluates composable pass/fail policies over it.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use dirlint::model::{ScanOptions, Scope};
//!
//! let mut options = ScanOptions::new(vec![PathBuf::from("./my-project")]);
//! options.scope = Scope::All;
//! let result = dirlint::scan(options).unwrap();
//! println!(
//!     "Violations: {}, empty dirs: {}",
//!     result.violations.len(),
//!     result.empty_directories.len()
//! );
//! ```

pub mod adapter;
pub mod concat;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod policy;
pub mod rules;

use adapter::{Adapter, InProcessAdapter};
use error::Result;
use rules::RuleSet;

pub use model::{Metrics, ScanEvent, ScanOptions, ScanResult, Scope, Violation};
pub use policy::{Finding, Policy, Severity};

/// Front door for running scans: owns an adapter, a rule set, and options.
pub struct ScanService {
    adapter: Box<dyn Adapter>,
    rules: RuleSet,
    options: ScanOptions,
}

impl ScanService {
    /// Service over the in-process adapter and the stock rules.
    pub fn new(options: ScanOptions) -> Self {
        Self {
            adapter: Box::new(InProcessAdapter),
            rules: RuleSet::default(),
            options,
        }
    }

    /// Service with a caller-supplied adapter and rule set.
    pub fn with_parts(adapter: Box<dyn Adapter>, rules: RuleSet, options: ScanOptions) -> Self {
        Self {
            adapter,
            rules,
            options,
        }
    }

    pub fn run(&self) -> Result<ScanResult> {
        self.run_inner(None)
    }

    /// Run with a synchronous event sink invoked on the scanning thread.
    pub fn run_with_sink(&self, sink: &mut dyn FnMut(ScanEvent)) -> Result<ScanResult> {
        self.run_inner(Some(sink))
    }

    fn run_inner(&self, sink: Option<&mut dyn FnMut(ScanEvent)>) -> Result<ScanResult> {
        tracing::info!(
            roots = ?self.options.roots,
            scope = ?self.options.scope,
            "scan.begin"
        );
        let result = self.adapter.run(&self.rules, &self.options, sink)?;
        tracing::info!(
            files = result.metrics.files_visited,
            dirs = result.metrics.directories_visited,
            violations = result.violations.len(),
            empty = result.empty_directories.len(),
            "scan.end"
        );
        Ok(result)
    }
}

/// Run a scan with the stock rules over `options`.
pub fn scan(options: ScanOptions) -> Result<ScanResult> {
    ScanService::new(options).run()
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::policy::{AllOfPolicy, EmptyDirMode, MaxViolationsPolicy, NoEmptyDirsPolicy};
    use std::fs::{self, File};
    use std::io::Write as _;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_file(path: &Path, contents: &str) {
        let mut f = File::create(path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("src-dir")).unwrap();
        fs::create_dir(tmp.path().join("empty-dir")).unwrap();
        write_file(&tmp.path().join("src-dir/BadName.swift"), "x");
        write_file(&tmp.path().join("src-dir/good-name.swift"), "y");
        tmp
    }

    fn all_scope(root: &Path) -> ScanOptions {
        let mut options = ScanOptions::new(vec![root.to_path_buf()]);
        options.scope = Scope::All;
        options
    }

    #[test]
    fn scan_then_evaluate_end_to_end() {
        let tmp = fixture();
        let result = scan(all_scope(tmp.path())).unwrap();

        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].rule_id, "kebab-case");
        assert_eq!(result.empty_directories.len(), 1);

        let policies: Vec<Box<dyn Policy>> = vec![
            Box::new(MaxViolationsPolicy::new(0)),
            Box::new(NoEmptyDirsPolicy::new(
                EmptyDirMode::IgnoreNoise,
                vec![tmp.path().to_path_buf()],
            )),
        ];
        let findings = policy::evaluate(&result, &policies);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].policy_id, "max-violations");
        assert_eq!(findings[1].policy_id, "no-empty-dirs");
    }

    #[test]
    fn clean_tree_produces_no_findings() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("all-good.txt"), "x");
        let result = scan(all_scope(tmp.path())).unwrap();
        assert!(result.violations.is_empty());
        assert!(result.empty_directories.is_empty());

        let policies: Vec<Box<dyn Policy>> = vec![Box::new(AllOfPolicy::new(vec![
            Box::new(MaxViolationsPolicy::new(0)),
            Box::new(NoEmptyDirsPolicy::new(
                EmptyDirMode::IgnoreNoise,
                vec![tmp.path().to_path_buf()],
            )),
        ]))];
        assert!(policy::evaluate(&result, &policies).is_empty());
    }

    #[test]
    fn shared_result_supports_repeated_evaluation() {
        let tmp = fixture();
        let result = scan(all_scope(tmp.path())).unwrap();
        let policy = MaxViolationsPolicy::new(0);

        let first = policy.evaluate(&result);
        let second = policy.evaluate(&result);
        assert_eq!(first, second);
    }

    #[test]
    fn service_sink_receives_terminal_event_with_result() {
        let tmp = fixture();
        let service = ScanService::new(all_scope(tmp.path()));
        let mut finished: Option<ScanResult> = None;
        let mut sink = |event: ScanEvent| {
            if let ScanEvent::Finished(result) = event {
                finished = Some(result);
            }
        };
        let returned = service.run_with_sink(&mut sink).unwrap();
        assert_eq!(finished.unwrap(), returned);
    }
}
