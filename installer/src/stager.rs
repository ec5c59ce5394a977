//! Staging tree layout and directory helpers.
//!
//! The staging root is wiped at the start of every install attempt. The
//! package itself is unpacked one level below it, in `pkg/`, and that
//! directory is what gets handed to the promoter.

use camino::{Utf8Path, Utf8PathBuf};
use log::{trace, warn};
use std::fs;
use std::io::ErrorKind;

/// Name of the package directory below the staging root.
pub const PACKAGE_DIRNAME: &str = "pkg";

/// Location of the metadata blob relative to the package directory.
pub const PARAM_SFO: &str = "sce_sys/param.sfo";

/// Location of the synthesized header relative to the package directory.
pub const HEAD_BIN: &str = "sce_sys/package/head.bin";

/// Layout of the on-disk staging tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stager {
    staging_root: Utf8PathBuf,
}

impl Stager {
    /// Create a stager rooted at `staging_root`.
    #[must_use]
    pub fn new(staging_root: Utf8PathBuf) -> Self {
        Self { staging_root }
    }

    /// Return the staging root.
    #[must_use]
    pub fn staging_root(&self) -> &Utf8Path {
        &self.staging_root
    }

    /// Return the directory the archive is unpacked into.
    #[must_use]
    pub fn package_dir(&self) -> Utf8PathBuf {
        self.staging_root.join(PACKAGE_DIRNAME)
    }

    /// Remove everything below the staging root.
    ///
    /// A missing root is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing tree cannot be removed.
    pub fn reset(&self) -> std::io::Result<()> {
        remove_tree(&self.staging_root)
    }
}

/// Path of `param.sfo` inside `package_dir`.
#[must_use]
pub fn param_sfo_path(package_dir: &Utf8Path) -> Utf8PathBuf {
    package_dir.join(PARAM_SFO)
}

/// Path of `head.bin` inside `package_dir`.
#[must_use]
pub fn head_bin_path(package_dir: &Utf8Path) -> Utf8PathBuf {
    package_dir.join(HEAD_BIN)
}

/// Create `dir` and each of its missing ancestors.
///
/// Best-effort: failures are only traced, because a directory that really
/// could not be created surfaces as a write error on the file that needed
/// it.
pub fn ensure_dirs(dir: &Utf8Path) {
    let mut prefixes: Vec<&Utf8Path> = dir.ancestors().collect();
    prefixes.reverse();

    for prefix in prefixes {
        if prefix.as_str().is_empty() || prefix.is_dir() {
            continue;
        }
        if let Err(e) = fs::create_dir(prefix) {
            trace!("mkdir {prefix}: {e}");
        }
    }
}

/// Recursively delete `root` and everything below it.
///
/// # Errors
///
/// Returns an error if an existing tree cannot be removed. A root that
/// does not exist is treated as already removed.
pub fn remove_tree(root: &Utf8Path) -> std::io::Result<()> {
    match fs::remove_dir_all(root) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => {
            warn!("failed to remove {root}: {e}");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_temp() -> (TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("temp dir not UTF-8");
        (dir, path)
    }

    #[test]
    fn package_layout_paths() {
        let stager = Stager::new(Utf8PathBuf::from("/data/ptmp"));
        let pkg = stager.package_dir();

        assert_eq!(pkg, Utf8PathBuf::from("/data/ptmp/pkg"));
        assert!(param_sfo_path(&pkg).ends_with("sce_sys/param.sfo"));
        assert!(head_bin_path(&pkg).ends_with("sce_sys/package/head.bin"));
    }

    #[test]
    fn ensure_dirs_creates_nested_path() {
        let (_guard, root) = utf8_temp();
        let nested = root.join("a/b/c");

        ensure_dirs(&nested);

        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_dirs_tolerates_existing_path() {
        let (_guard, root) = utf8_temp();
        let nested = root.join("a/b");
        fs::create_dir_all(&nested).expect("pre-create");

        ensure_dirs(&nested);

        assert!(nested.is_dir());
    }

    #[test]
    fn reset_removes_previous_attempt() {
        let (_guard, root) = utf8_temp();
        let stager = Stager::new(root.join("ptmp"));
        let leftover = head_bin_path(&stager.package_dir());
        ensure_dirs(leftover.parent().expect("parent"));
        fs::write(&leftover, b"stale").expect("write leftover");

        stager.reset().expect("reset");

        assert!(!stager.staging_root().exists());
    }

    #[test]
    fn remove_tree_tolerates_missing_root() {
        let (_guard, root) = utf8_temp();
        assert!(remove_tree(&root.join("never-created")).is_ok());
    }
}
