use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use walkdir::WalkDir;

use crate::error::{DirlintError, Result};
use crate::model::{Metrics, ScanEvent, ScanOptions, ScanResult, Scope, Violation};
use crate::rules::RuleSet;

use super::{Adapter, EventSink};

/// Files visited between progress events.
const PROGRESS_INTERVAL: u64 = 500;

/// Single-threaded, synchronous walker.
///
/// The concurrency hint in the options is advisory and ignored here.
pub struct InProcessAdapter;

impl Adapter for InProcessAdapter {
    fn run(
        &self,
        rules: &RuleSet,
        options: &ScanOptions,
        mut sink: Option<&mut EventSink>,
    ) -> Result<ScanResult> {
        let start = Utc::now();
        let clock = Instant::now();
        let mut files_visited: u64 = 0;
        let mut dirs_visited: u64 = 0;
        let mut violations: Vec<Violation> = Vec::new();
        let mut empty_dirs: Vec<String> = Vec::new();

        for root in &options.roots {
            // The one fatal error: a root that cannot be listed at all.
            fs::read_dir(root).map_err(|source| DirlintError::Enumerate {
                root: root.clone(),
                source,
            })?;

            emit(&mut sink, ScanEvent::Started { root: root.clone() });

            // Child counts keyed by normalized parent path; zero-count
            // directories are finalized after traversal.
            let mut child_counts: BTreeMap<PathBuf, u64> = BTreeMap::new();

            let mut it = WalkDir::new(root)
                .follow_links(options.follow_symlinks)
                .into_iter();
            loop {
                let entry = match it.next() {
                    None => break,
                    Some(Ok(entry)) => entry,
                    Some(Err(err)) => {
                        // Skipped, never retried; the scan continues.
                        tracing::debug!(error = %err, "skipping unreadable entry");
                        continue;
                    }
                };
                // Depth 0 is the root itself, not an entry under scan.
                if entry.depth() == 0 {
                    continue;
                }

                let name = entry.file_name().to_string_lossy();
                if matches_ignore(&name, &options.ignore_prefixes) {
                    if entry.file_type().is_dir() {
                        it.skip_current_dir();
                    }
                    continue;
                }

                let path = entry.path();
                if options.scope == Scope::Docc && !in_docc_catalog(path) {
                    // Out of scope: no ignore/empty bookkeeping, no pruning.
                    continue;
                }

                let file_type = entry.file_type();
                if file_type.is_symlink() && !options.follow_symlinks {
                    continue;
                }

                if file_type.is_dir() {
                    dirs_visited += 1;
                    child_counts.entry(path.to_path_buf()).or_insert(0);
                    if let Some(parent) = path.parent() {
                        *child_counts.entry(parent.to_path_buf()).or_insert(0) += 1;
                    }
                    if !rules.accept(path) {
                        it.skip_current_dir();
                    }
                    continue;
                }

                if file_type.is_file() {
                    files_visited += 1;
                    if let Some(parent) = path.parent() {
                        *child_counts.entry(parent.to_path_buf()).or_insert(0) += 1;
                    }
                    if let Some(violation) = rules.apply(path) {
                        emit(&mut sink, ScanEvent::Violation(violation.clone()));
                        violations.push(violation);
                    }
                    if files_visited % PROGRESS_INTERVAL == 0 {
                        emit(
                            &mut sink,
                            ScanEvent::Progress {
                                files: files_visited,
                                directories: dirs_visited,
                            },
                        );
                    }
                }
            }

            for (dir, count) in &child_counts {
                if *count != 0 {
                    continue;
                }
                if let Some(recorded) = rules.finalize(dir, *count) {
                    emit(&mut sink, ScanEvent::EmptyDir {
                        path: recorded.clone(),
                    });
                    empty_dirs.push(recorded);
                }
            }
        }

        let end = Utc::now();
        let metrics = Metrics {
            files_visited,
            directories_visited: dirs_visited,
            duration_secs: clock.elapsed().as_secs_f64(),
            start,
            end,
        };
        let result = ScanResult::new(violations, empty_dirs, metrics);
        emit(&mut sink, ScanEvent::Finished(result.clone()));
        Ok(result)
    }
}

fn emit(sink: &mut Option<&mut EventSink>, event: ScanEvent) {
    if let Some(sink) = sink {
        sink(event);
    }
}

/// Component-level ignore test: any ignore string matching the component
/// as a prefix or as a suffix excludes the entry.
fn matches_ignore(component: &str, ignore_prefixes: &[String]) -> bool {
    ignore_prefixes
        .iter()
        .any(|p| component.starts_with(p.as_str()) || component.ends_with(p.as_str()))
}

/// True when some ancestor component of `path` is a `.docc` catalog.
fn in_docc_catalog(path: &Path) -> bool {
    path.parent().is_some_and(|parent| {
        parent
            .components()
            .any(|c| c.as_os_str().to_string_lossy().ends_with(".docc"))
    })
}
