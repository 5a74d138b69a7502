pub mod in_process;

use crate::error::Result;
use crate::model::{ScanEvent, ScanOptions, ScanResult};
use crate::rules::RuleSet;

pub use in_process::InProcessAdapter;

/// Callback receiving scan events synchronously on the scanning thread.
///
/// Consumers needing asynchronous fan-out must hand off explicitly (e.g.
/// through a channel) to keep the single-writer ordering guarantee.
pub type EventSink<'a> = dyn FnMut(ScanEvent) + 'a;

/// Traverses the configured roots, drives a rule set over every entry,
/// and produces an immutable result.
pub trait Adapter: Send + Sync {
    /// Fails only when a root cannot be enumerated at all; any single
    /// entry's failure is skipped and the scan continues.
    fn run(
        &self,
        rules: &RuleSet,
        options: &ScanOptions,
        sink: Option<&mut EventSink>,
    ) -> Result<ScanResult>;
}
