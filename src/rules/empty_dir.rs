use std::path::Path;

use crate::model::Violation;
use crate::rules::Rule;

/// Records directories whose final child count is exactly zero.
///
/// Never flags files; does all its work in `finalize`.
pub struct EmptyDirectoryRule;

impl Rule for EmptyDirectoryRule {
    fn id(&self) -> &str {
        "empty-dir"
    }

    fn description(&self) -> &str {
        "Detect empty directories and recommend deletion."
    }

    fn apply(&self, _file: &Path) -> Option<Violation> {
        None
    }

    fn finalize(&self, directory: &Path, child_count: u64) -> Option<String> {
        (child_count == 0).then(|| directory.display().to_string())
    }
}
