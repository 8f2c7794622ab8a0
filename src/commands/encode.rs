use crate::core::{
    backend::VcsBackend,
    error::{Result, RevlocError},
    git::{GitBackend, GitRepo},
    paths,
    revision_uri::to_revision_uri,
};
use std::env;
use std::path::{Path, PathBuf};

/// Absolute, symlink-free path of a command-line file argument. The file
/// itself may be gone (deleted or renamed away); its directory must exist.
pub(crate) fn absolute_file_path(file: &str) -> Result<String> {
    let joined = env::current_dir()?.join(file);
    let resolved = match std::fs::canonicalize(&joined) {
        Ok(path) => path,
        Err(_) => {
            let parent = joined.parent().unwrap_or(Path::new("/"));
            let name = joined.file_name().ok_or(RevlocError::InvalidUtf8Path)?;
            std::fs::canonicalize(parent)?.join(name)
        }
    };
    path_to_string(resolved)
}

fn path_to_string(path: PathBuf) -> Result<String> {
    path.into_os_string()
        .into_string()
        .map(|s| paths::normalize(&s))
        .map_err(|_| RevlocError::InvalidUtf8Path)
}

pub fn execute_encode(file: &str, revision: Option<&str>) -> Result<()> {
    let path = absolute_file_path(file)?;
    let backend = GitBackend::new();
    let repo_path = backend
        .resolve_repository_root(&path)
        .map_err(|_| RevlocError::NotInGitRepo)?;

    let sha = match revision {
        Some(rev) => GitRepo::open(&repo_path)?.resolve_revision(rev)?,
        None => String::new(),
    };
    log::debug!("Encoding {path} at '{sha}' in {repo_path}");

    println!("{}", to_revision_uri(&sha, &path, &repo_path));
    Ok(())
}
