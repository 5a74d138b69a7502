use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Violation;
use crate::rules::Rule;

static KEBAB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());

/// Exact filenames allowed to break the naming scheme.
const EXEMPT_NAMES: &[&str] = &["Info.plist"];

/// Flags files whose basename (extension stripped) is not kebab-case.
///
/// Dotfiles and exempt names are never flagged.
pub struct KebabCaseRule;

impl Rule for KebabCaseRule {
    fn id(&self) -> &str {
        "kebab-case"
    }

    fn description(&self) -> &str {
        "Filenames must be lowercase/digits/hyphens (kebab-case)."
    }

    fn apply(&self, file: &Path) -> Option<Violation> {
        let name = file.file_name()?.to_string_lossy();
        if name.starts_with('.') || EXEMPT_NAMES.contains(&name.as_ref()) {
            return None;
        }
        let base = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone().into_owned());
        if KEBAB_RE.is_match(&base) {
            return None;
        }
        Some(Violation {
            path: file.display().to_string(),
            reason: "not kebab-case".into(),
            rule_id: self.id().into(),
        })
    }
}
