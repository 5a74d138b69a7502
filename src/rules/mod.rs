pub mod empty_dir;
pub mod kebab_case;

use std::path::Path;

use crate::model::Violation;

pub use empty_dir::EmptyDirectoryRule;
pub use kebab_case::KebabCaseRule;

/// A path-local predicate producing at most one violation per file; may
/// also gate or finalize directories.
pub trait Rule: Send + Sync {
    /// Stable identifier recorded on every violation this rule produces.
    fn id(&self) -> &str;

    /// Human-readable description, used for `list-rules` output.
    fn description(&self) -> &str;

    /// Check one file; `Some` flags it.
    fn apply(&self, file: &Path) -> Option<Violation>;

    /// Vetoing a directory prunes its subtree from traversal.
    fn accept(&self, _directory: &Path) -> bool {
        true
    }

    /// Called once a directory's child count is known; `Some` records the
    /// returned path as an empty directory.
    fn finalize(&self, _directory: &Path, _child_count: u64) -> Option<String> {
        None
    }
}

/// Ordered composite of rules with short-circuit dispatch.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// First rule to flag the file wins; list order is part of the contract.
    pub fn apply(&self, file: &Path) -> Option<Violation> {
        self.rules.iter().find_map(|r| r.apply(file))
    }

    /// A directory is accepted only when every rule accepts it.
    pub fn accept(&self, directory: &Path) -> bool {
        self.rules.iter().all(|r| r.accept(directory))
    }

    /// First non-`None` finalize result wins.
    pub fn finalize(&self, directory: &Path, child_count: u64) -> Option<String> {
        self.rules
            .iter()
            .find_map(|r| r.finalize(directory, child_count))
    }
}

impl Default for RuleSet {
    /// The stock rule list: naming first, emptiness second.
    fn default() -> Self {
        Self::new(vec![Box::new(KebabCaseRule), Box::new(EmptyDirectoryRule)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubRule {
        id: &'static str,
        flag: bool,
        accept: bool,
        finalize_as: Option<&'static str>,
    }

    impl Rule for StubRule {
        fn id(&self) -> &str {
            self.id
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn apply(&self, file: &Path) -> Option<Violation> {
            self.flag.then(|| Violation {
                path: file.display().to_string(),
                reason: "stubbed".into(),
                rule_id: self.id.into(),
            })
        }

        fn accept(&self, _directory: &Path) -> bool {
            self.accept
        }

        fn finalize(&self, _directory: &Path, _child_count: u64) -> Option<String> {
            self.finalize_as.map(String::from)
        }
    }

    fn stub(id: &'static str, flag: bool) -> Box<dyn Rule> {
        Box::new(StubRule {
            id,
            flag,
            accept: true,
            finalize_as: None,
        })
    }

    #[test]
    fn apply_short_circuits_in_list_order() {
        let set = RuleSet::new(vec![stub("first", true), stub("second", true)]);
        let v = set.apply(Path::new("x")).unwrap();
        assert_eq!(v.rule_id, "first");

        let set = RuleSet::new(vec![stub("first", false), stub("second", true)]);
        let v = set.apply(Path::new("x")).unwrap();
        assert_eq!(v.rule_id, "second");
    }

    #[test]
    fn accept_is_a_conjunction() {
        let veto = Box::new(StubRule {
            id: "veto",
            flag: false,
            accept: false,
            finalize_as: None,
        });
        let set = RuleSet::new(vec![stub("ok", false), veto]);
        assert!(!set.accept(Path::new("dir")));

        let set = RuleSet::new(vec![stub("ok", false)]);
        assert!(set.accept(Path::new("dir")));
    }

    #[test]
    fn finalize_first_some_wins() {
        let a = Box::new(StubRule {
            id: "a",
            flag: false,
            accept: true,
            finalize_as: Some("from-a"),
        });
        let b = Box::new(StubRule {
            id: "b",
            flag: false,
            accept: true,
            finalize_as: Some("from-b"),
        });
        let set = RuleSet::new(vec![a, b]);
        assert_eq!(set.finalize(Path::new("dir"), 0).as_deref(), Some("from-a"));
    }
}
