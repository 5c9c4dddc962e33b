//! Small filesystem helpers shared by the writers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, `mkdir -p` style.
///
/// A bare filename has no parent to create, and an already-existing
/// directory is not an error.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// The file name without its extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Nearest common parent directory of a set of paths.
///
/// Comparison is component-wise, not textual. Empty input has no answer; a
/// single path yields its parent.
pub fn common_parent(paths: &[PathBuf]) -> Option<PathBuf> {
    let mut parents = paths.iter().filter_map(|path| path.parent());
    let first = parents.next()?;
    let mut common = first.to_path_buf();
    for parent in parents {
        while !parent.starts_with(&common) {
            match common.parent() {
                Some(up) => common = up.to_path_buf(),
                None => return Some(PathBuf::new()),
            }
        }
    }
    Some(common)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(values: &[&str]) -> Vec<PathBuf> {
        values.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn common_parent_of_siblings_is_their_directory() {
        assert_eq!(
            common_parent(&paths(&["out/a.ttg", "out/b.ttg"])),
            Some(PathBuf::from("out"))
        );
    }

    #[test]
    fn common_parent_walks_up_across_branches() {
        assert_eq!(
            common_parent(&paths(&["/x/a/1.ttg", "/x/b/2.ttg"])),
            Some(PathBuf::from("/x"))
        );
        assert_eq!(
            common_parent(&paths(&["/x/a/1.ttg", "/y/b/2.ttg"])),
            Some(PathBuf::from("/"))
        );
    }

    #[test]
    fn common_parent_of_one_path_is_its_parent() {
        assert_eq!(
            common_parent(&paths(&["out/deep/a.ttg"])),
            Some(PathBuf::from("out/deep"))
        );
    }

    #[test]
    fn common_parent_of_bare_filenames_is_empty() {
        assert_eq!(common_parent(&paths(&["a.ttg", "b.ttg"])), Some(PathBuf::new()));
    }

    #[test]
    fn common_parent_of_nothing_is_none() {
        assert_eq!(common_parent(&[]), None);
    }

    #[test]
    fn component_wise_means_no_textual_prefix_confusion() {
        // "out" and "out2" share a textual prefix but no path component
        assert_eq!(
            common_parent(&paths(&["out/a.ttg", "out2/b.ttg"])),
            Some(PathBuf::new())
        );
    }

    #[test]
    fn file_stem_drops_the_extension() {
        assert_eq!(file_stem(Path::new("out/Spot_A_30.ttg")), "Spot_A_30");
        assert_eq!(file_stem(Path::new("noext")), "noext");
    }

    #[test]
    fn ensure_parent_dir_creates_and_tolerates_existing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c.ttg");
        ensure_parent_dir(&target).unwrap();
        assert!(dir.path().join("a/b").is_dir());
        // second call is a no-op
        ensure_parent_dir(&target).unwrap();
    }

    #[test]
    fn ensure_parent_dir_ignores_bare_filenames() {
        ensure_parent_dir(Path::new("just_a_name.ttg")).unwrap();
    }
}
