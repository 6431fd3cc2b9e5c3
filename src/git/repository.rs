use git2::Repository;
use std::path::Path;

use crate::error::Result;

/// Resolves the git directory for `path`, searching parent directories.
///
/// `path` may point at a work tree, a sub-directory of one, or a bare
/// repository. The returned path is suitable for `--git-dir=`.
pub fn discover_git_dir<P: AsRef<Path>>(path: P) -> Result<String> {
    let repo = Repository::discover(path)?;
    let git_dir = repo.path().to_string_lossy();

    // git2 reports directories with a trailing separator
    Ok(git_dir
        .trim_end_matches(std::path::MAIN_SEPARATOR)
        .to_string())
}

/// Fallback used when discovery fails: `<folder>/.git`.
pub fn conventional_git_dir(folder: &str) -> String {
    format!("{}/.git", folder.trim_end_matches('/'))
}
