//! Flatten many source files into a single blob with per-file path headers.
//!
//! A boundary collaborator of the scanner: it reuses the same
//! path-component ignore matching but produces a merged text or byte
//! artifact instead of a result.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{DirlintError, Result};
use crate::model::DEFAULT_IGNORE_PREFIXES;

/// Enumerate the files under `root` worth concatenating.
///
/// Ignored components (defaults plus `ignoring_suffixes`) are matched as
/// prefix or suffix and prune whole subtrees. When `allowed_suffixes` is
/// non-empty, only filenames ending with one of them survive. Results are
/// sorted by file name for a stable merge order.
pub fn relevant_source_files(
    root: &Path,
    ignoring_suffixes: &[String],
    allowed_suffixes: &[String],
) -> Result<Vec<PathBuf>> {
    fs::read_dir(root).map_err(|source| DirlintError::Enumerate {
        root: root.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    let mut it = WalkDir::new(root).sort_by_file_name().into_iter();
    loop {
        let entry = match it.next() {
            None => break,
            Some(Ok(entry)) => entry,
            Some(Err(err)) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let ignored = DEFAULT_IGNORE_PREFIXES
            .iter()
            .copied()
            .chain(ignoring_suffixes.iter().map(String::as_str))
            .any(|p| name.starts_with(p) || name.ends_with(p));
        if ignored {
            if entry.file_type().is_dir() {
                it.skip_current_dir();
            }
            continue;
        }

        if !entry.file_type().is_file() {
            continue;
        }
        if !allowed_suffixes.is_empty() && !allowed_suffixes.iter().any(|s| name.ends_with(s.as_str()))
        {
            continue;
        }
        files.push(entry.path().to_path_buf());
    }
    Ok(files)
}

/// Concatenate files into one string, each prefixed with a `// <path>`
/// header. Unreadable files are logged and skipped.
pub fn concatenate_to_string(sources: &[PathBuf]) -> String {
    let mut contents = String::new();
    for source in sources {
        let Ok(text) = fs::read_to_string(source) else {
            tracing::warn!(path = %source.display(), "unable to read file, skipping");
            continue;
        };
        contents.push_str(&format!("// {}\n", source.display()));
        contents.push_str(&text);
        contents.push('\n');
    }
    contents
}

/// Byte-level variant of [`concatenate_to_string`], preserving contents
/// that are not valid UTF-8.
pub fn concatenate_to_bytes(sources: &[PathBuf]) -> Vec<u8> {
    let mut estimated = 0usize;
    for source in sources {
        if let Ok(meta) = fs::metadata(source) {
            estimated += meta.len() as usize;
        }
        estimated += source.display().to_string().len() + 4;
    }

    let mut contents: Vec<u8> = Vec::with_capacity(estimated);
    for source in sources {
        let Ok(bytes) = fs::read(source) else {
            tracing::warn!(path = %source.display(), "unable to read file, skipping");
            continue;
        };
        contents.extend_from_slice(format!("// {}\n", source.display()).as_bytes());
        contents.extend_from_slice(&bytes);
        contents.push(b'\n');
    }
    contents
}

/// Write the concatenation of `sources` to `destination`.
pub fn write_single_file(sources: &[PathBuf], destination: &Path) -> Result<()> {
    fs::write(destination, concatenate_to_string(sources))?;
    Ok(())
}

/// Render the files as a git patch creating each from scratch
/// (`/dev/null` to its path), applicable with `git apply`.
pub fn git_patch(sources: &[PathBuf]) -> String {
    let mut patch = String::new();
    for source in sources {
        let Ok(contents) = fs::read_to_string(source) else {
            tracing::warn!(path = %source.display(), "unable to read file, skipping");
            continue;
        };
        let lines: Vec<&str> = contents.split('\n').collect();
        let line_count = match lines.last() {
            Some(&"") => lines.len() - 1,
            _ => lines.len(),
        };
        let path = source.display();
        patch.push_str(&format!("diff --git a/{path} b/{path}\n"));
        patch.push_str("new file mode 100644\n");
        patch.push_str("--- /dev/null\n");
        patch.push_str(&format!("+++ b/{path}\n"));
        patch.push_str(&format!("@@ -0,0 +1,{line_count} @@\n"));
        for line in &lines[..line_count] {
            patch.push_str(&format!("+{line}\n"));
        }
    }
    patch
}

/// Write a git patch for `sources` to `destination`.
pub fn write_git_patch(sources: &[PathBuf], destination: &Path) -> Result<()> {
    fs::write(destination, git_patch(sources))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write as _;
    use tempfile::TempDir;

    fn write_file(path: &Path, contents: &str) {
        let mut f = File::create(path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn enumeration_honors_ignores_and_allowed_suffixes() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        write_file(&tmp.path().join(".git/buried.rs"), "hidden");
        write_file(&tmp.path().join("alpha.rs"), "a");
        write_file(&tmp.path().join("beta.txt"), "b");
        write_file(&tmp.path().join("notes.md"), "n");

        let all = relevant_source_files(tmp.path(), &[], &[]).unwrap();
        assert_eq!(all.len(), 3);

        let rust_only =
            relevant_source_files(tmp.path(), &[], &[".rs".to_string()]).unwrap();
        assert_eq!(rust_only.len(), 1);
        assert!(rust_only[0].ends_with("alpha.rs"));

        let no_md =
            relevant_source_files(tmp.path(), &[".md".to_string()], &[]).unwrap();
        assert_eq!(no_md.len(), 2);
    }

    #[test]
    fn missing_root_is_fatal() {
        let err = relevant_source_files(Path::new("/nonexistent/concat-root"), &[], &[])
            .unwrap_err();
        assert!(matches!(err, DirlintError::Enumerate { .. }));
    }

    #[test]
    fn concatenation_prefixes_each_file_with_its_path() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("alpha.txt"), "first\n");
        write_file(&tmp.path().join("beta.txt"), "second\n");

        let files = relevant_source_files(tmp.path(), &[], &[]).unwrap();
        let merged = concatenate_to_string(&files);
        let alpha_header = format!("// {}\n", tmp.path().join("alpha.txt").display());
        let beta_header = format!("// {}\n", tmp.path().join("beta.txt").display());
        assert!(merged.contains(&alpha_header));
        assert!(merged.contains(&beta_header));
        assert!(merged.find("first").unwrap() < merged.find("second").unwrap());

        let bytes = concatenate_to_bytes(&files);
        assert_eq!(String::from_utf8(bytes).unwrap(), merged);
    }

    #[test]
    fn missing_sources_are_skipped_not_fatal() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("kept.txt"), "kept\n");
        let files = vec![tmp.path().join("gone.txt"), tmp.path().join("kept.txt")];
        let merged = concatenate_to_string(&files);
        assert!(merged.contains("kept"));
        assert!(!merged.contains("gone.txt"));
    }

    #[test]
    fn git_patch_header_counts_content_lines() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("two-lines.txt"), "one\ntwo\n");

        let patch = git_patch(&[tmp.path().join("two-lines.txt")]);
        assert!(patch.contains("@@ -0,0 +1,2 @@"));
        assert!(patch.contains("+one\n+two\n"));
        assert!(patch.contains("--- /dev/null\n"));
    }

    #[test]
    fn write_single_file_persists_the_merge() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("solo.txt"), "solo\n");
        let out = tmp.path().join("merged.out");

        write_single_file(&[tmp.path().join("solo.txt")], &out).unwrap();
        let persisted = fs::read_to_string(&out).unwrap();
        assert!(persisted.contains("solo"));
    }
}
