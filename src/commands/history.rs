use crate::commands::encode::absolute_file_path;
use crate::core::{
    commit::CommitRecord,
    config::RevlocConfig,
    error::{Result, RevlocError},
    format_history_line,
    git::{GitBackend, GitRepo},
    paths, print_info, print_section_header,
    revision::shorten_sha,
};
use colored::*;
use tokio::runtime::Builder;

pub fn execute_history(file: &str, limit: Option<usize>, resolve_previous: bool) -> Result<()> {
    let config = RevlocConfig::load_or_default()?;
    let path = absolute_file_path(file)?;
    let git_repo = GitRepo::open(paths::dirname(&path)).map_err(|_| RevlocError::NotInGitRepo)?;

    let file_name = paths::relative(git_repo.root(), &path);
    let commits = git_repo.file_history(&file_name, limit.unwrap_or(config.history_limit))?;
    if commits.is_empty() {
        print_info(&format!("No commits found for {file_name}"));
        return Ok(());
    }

    let header = commits[0].formatted_path(Some(&config.path_separator), None);
    print_section_header(&header);

    if resolve_previous {
        resolve_all(&commits)?;
    }

    for commit in &commits {
        println!(
            "{}",
            format_history_line(
                commit.short_sha(),
                &config.format_commit_date(commit),
                commit.author(),
                commit.summary(),
            )
        );
        if let Some(previous_name) = commit.previous_file_name() {
            println!("  {} {}", "renamed from".bright_black(), previous_name);
        }
        if let Some(previous) = commit.resolved_previous_file_sha() {
            println!("  {} {}", "previous".bright_black(), shorten_sha(&previous));
        }
    }
    println!();
    Ok(())
}

/// Resolve every record's previous revision. The oldest commit has no
/// previous one; that failure is logged and skipped.
fn resolve_all(commits: &[CommitRecord]) -> Result<()> {
    let runtime = Builder::new_current_thread().build()?;
    let backend = GitBackend::new();

    runtime.block_on(async {
        for commit in commits {
            if let Err(e) = commit.resolve_previous_file_sha(&backend).await {
                log::debug!("No previous revision for {}: {e}", commit.short_sha());
            }
        }
    });
    Ok(())
}
