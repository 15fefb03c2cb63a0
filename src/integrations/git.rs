#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::{Command, Output};

/// Git operations needed by the branch workflow and the comment fetcher
pub trait GitClient {
    /// Whether the current directory is inside a git working tree
    fn is_inside_work_tree(&self) -> bool;

    /// Top-level directory of the working tree
    fn repo_root(&self) -> Result<PathBuf>;

    /// Whether tracked files differ from HEAD (untracked files are ignored)
    fn has_uncommitted_changes(&self) -> Result<bool>;

    /// Whether `refs/heads/{branch}` exists
    fn local_branch_exists(&self, branch: &str) -> Result<bool>;

    /// Whether `remote` advertises a branch named `branch`
    fn remote_branch_exists(&self, remote: &str, branch: &str) -> Result<bool>;

    /// Branch that `refs/remotes/{remote}/HEAD` points at, without the remote prefix
    fn remote_default_branch(&self, remote: &str) -> Option<String>;

    /// Local branch names in git's listing order
    fn list_branches(&self) -> Result<Vec<String>>;

    /// Check out an existing branch
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Pull `branch` from `remote` into the current branch
    fn pull(&self, remote: &str, branch: &str) -> Result<()>;

    /// Create `branch` from HEAD and check it out
    fn create_branch(&self, branch: &str) -> Result<()>;

    /// Name of the checked-out branch (`HEAD` when detached)
    fn current_branch(&self) -> Result<String>;
}

/// Real git implementation running in the current directory
#[derive(Debug, Default)]
pub struct RealGitClient;

fn run_git(args: &[&str]) -> Result<Output> {
    Command::new("git")
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute git {}", args.join(" ")))
}

/// Run git and return trimmed stdout, failing on a non-zero exit
fn git_stdout(args: &[&str]) -> Result<String> {
    let output = run_git(args)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Map exit status 0 to `true`, `false_code` to `false`, anything else to an error
fn git_predicate(args: &[&str], false_code: i32) -> Result<bool> {
    let output = run_git(args)?;

    if output.status.success() {
        return Ok(true);
    }
    if output.status.code() == Some(false_code) {
        return Ok(false);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim())
}

impl GitClient for RealGitClient {
    fn is_inside_work_tree(&self) -> bool {
        git_stdout(&["rev-parse", "--is-inside-work-tree"]).is_ok_and(|out| out == "true")
    }

    fn repo_root(&self) -> Result<PathBuf> {
        git_stdout(&["rev-parse", "--show-toplevel"]).map(PathBuf::from)
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        // Stale stat info would otherwise show up as changes
        let _ = run_git(&["update-index", "-q", "--refresh"]);
        // diff-index exits 1 when there are differences
        git_predicate(&["diff-index", "--quiet", "HEAD", "--"], 1).map(|clean| !clean)
    }

    fn local_branch_exists(&self, branch: &str) -> Result<bool> {
        let reference = format!("refs/heads/{branch}");
        git_predicate(&["show-ref", "--verify", "--quiet", &reference], 1)
    }

    fn remote_branch_exists(&self, remote: &str, branch: &str) -> Result<bool> {
        let reference = format!("refs/heads/{branch}");
        let stdout = git_stdout(&["ls-remote", "--heads", remote, &reference])?;
        Ok(!stdout.is_empty())
    }

    fn remote_default_branch(&self, remote: &str) -> Option<String> {
        let reference = format!("refs/remotes/{remote}/HEAD");
        let target = git_stdout(&["symbolic-ref", "--quiet", "--short", &reference]).ok()?;
        let branch = target
            .strip_prefix(&format!("{remote}/"))
            .unwrap_or(&target)
            .to_string();
        (!branch.is_empty()).then_some(branch)
    }

    fn list_branches(&self) -> Result<Vec<String>> {
        let stdout = git_stdout(&["branch", "--format=%(refname:short)"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        git_stdout(&["checkout", branch]).map(drop)
    }

    fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        git_stdout(&["pull", remote, branch]).map(drop)
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        git_stdout(&["checkout", "-b", branch]).map(drop)
    }

    fn current_branch(&self) -> Result<String> {
        git_stdout(&["rev-parse", "--abbrev-ref", "HEAD"])
    }
}
