#![allow(clippy::missing_errors_doc)]
//! The two pipelines, generic over the git and gh clients
//!
//! Each stage returns `Ok` or the error kind that stops the run; nothing is
//! retried.

use crate::color::Reporter;
use crate::config::GitConfig;
use crate::domain::branch_name::{format_component, generate_branch_name, validate_branch_name};
use crate::domain::comments::{CommentReport, IssueComment, PrMetadata, ReviewComment};
use crate::error::{BranchError, FetchError};
use crate::identity::{resolve_identity, KeyValueStore};
use crate::integrations::gh::{GhClient, RepoInfo};
use crate::integrations::git::GitClient;

/// Creates `{user}-{ticket}-{summary}` branches off a freshly pulled primary branch
pub struct BranchService<G, H, S>
where
    G: GitClient,
    H: GhClient,
    S: KeyValueStore,
{
    git: G,
    gh: H,
    store: S,
    config: GitConfig,
    reporter: Reporter,
}

impl<G, H, S> BranchService<G, H, S>
where
    G: GitClient,
    H: GhClient,
    S: KeyValueStore,
{
    pub const fn new(git: G, gh: H, store: S, config: GitConfig, reporter: Reporter) -> Self {
        Self {
            git,
            gh,
            store,
            config,
            reporter,
        }
    }

    /// Run every check, then switch, pull, create and verify
    ///
    /// All checks happen before the first command that changes the repository.
    /// Returns the name of the branch that is now checked out.
    pub fn create_branch(&self, ticket: &str, summary: &str) -> Result<String, BranchError> {
        if ticket.trim().is_empty() {
            return Err(BranchError::InvalidArguments(
                "ticket must not be empty".to_string(),
            ));
        }
        if summary.trim().is_empty() {
            return Err(BranchError::InvalidArguments(
                "summary must not be empty".to_string(),
            ));
        }

        self.check_repository()?;
        self.check_clean()?;
        let name = self.resolve_name(ticket, summary)?;
        self.check_duplicate(&name)?;
        let primary = self.detect_primary_branch()?;

        self.reporter.info(format!("Switching to {primary}…"));
        self.git
            .checkout(&primary)
            .map_err(|source| BranchError::CheckoutFailed {
                branch: primary.clone(),
                source,
            })?;

        let remote = &self.config.remote;
        self.reporter
            .info(format!("Pulling latest changes from {remote}/{primary}…"));
        self.git
            .pull(remote, &primary)
            .map_err(|source| BranchError::PullFailed {
                remote: remote.clone(),
                branch: primary.clone(),
                source,
            })?;

        self.reporter.debug(format!("Creating branch {name}"));
        self.git
            .create_branch(&name)
            .map_err(|source| BranchError::CreateFailed {
                branch: name.clone(),
                source,
            })?;

        self.verify(&name)?;
        self.reporter.success(format!(
            "Created and switched to {}",
            self.reporter.mode().colorize_branch(&name)
        ));
        Ok(name)
    }

    fn check_repository(&self) -> Result<(), BranchError> {
        if self.git.is_inside_work_tree() {
            self.reporter.debug("Inside a git working tree");
            Ok(())
        } else {
            Err(BranchError::NotARepository)
        }
    }

    fn check_clean(&self) -> Result<(), BranchError> {
        match self.git.has_uncommitted_changes() {
            Ok(false) => {
                self.reporter.debug("Working tree is clean");
                Ok(())
            }
            Ok(true) => Err(BranchError::UncommittedChanges),
            Err(err) => Err(BranchError::StatusFailed(err)),
        }
    }

    /// Resolve the username and derive a validated branch name
    fn resolve_name(&self, ticket: &str, summary: &str) -> Result<String, BranchError> {
        let username = resolve_identity(&self.store, &self.gh, &self.reporter)?;
        let prefix = format_component(&username);
        if prefix.is_empty() {
            return Err(BranchError::IdentityUnavailable(format!(
                "username '{username}' does not produce a usable branch prefix"
            )));
        }

        let name = generate_branch_name(ticket, summary, &prefix);
        validate_branch_name(&name, &prefix)?;
        self.reporter.debug(format!("Branch name: {name}"));
        Ok(name)
    }

    fn check_duplicate(&self, name: &str) -> Result<(), BranchError> {
        match self.git.local_branch_exists(name) {
            Ok(true) => return Err(BranchError::BranchExists(name.to_string())),
            Ok(false) => {}
            Err(err) => return Err(BranchError::StatusFailed(err)),
        }

        // A remote branch with the same name only earns a warning
        match self.git.remote_branch_exists(&self.config.remote, name) {
            Ok(true) => self.reporter.warn(format!(
                "Branch '{name}' already exists on {}; creating it locally anyway",
                self.config.remote
            )),
            Ok(false) => {}
            Err(err) => self
                .reporter
                .debug(format!("Skipping remote branch check: {err:#}")),
        }
        Ok(())
    }

    /// Remote default ref, then the configured candidates, then the first listed branch
    fn detect_primary_branch(&self) -> Result<String, BranchError> {
        if let Some(branch) = self.git.remote_default_branch(&self.config.remote) {
            self.reporter
                .debug(format!("Primary branch from {}/HEAD: {branch}", self.config.remote));
            return Ok(branch);
        }

        for candidate in &self.config.primary_candidates {
            if self.git.local_branch_exists(candidate).unwrap_or(false) {
                self.reporter
                    .debug(format!("Primary branch from candidates: {candidate}"));
                return Ok(candidate.clone());
            }
        }

        let branches = self
            .git
            .list_branches()
            .map_err(|_| BranchError::PrimaryBranchUnresolvable)?;
        let first = branches
            .into_iter()
            .next()
            .ok_or(BranchError::PrimaryBranchUnresolvable)?;
        self.reporter
            .debug(format!("Primary branch from branch listing: {first}"));
        Ok(first)
    }

    fn verify(&self, name: &str) -> Result<(), BranchError> {
        let actual = self
            .git
            .current_branch()
            .map_err(|err| BranchError::VerificationFailed {
                expected: name.to_string(),
                actual: format!("unknown ({err:#})"),
            })?;

        if actual == name {
            Ok(())
        } else {
            Err(BranchError::VerificationFailed {
                expected: name.to_string(),
                actual,
            })
        }
    }
}

/// Collects review and discussion comments of the current branch's open PR
pub struct CommentService<G, H>
where
    G: GitClient,
    H: GhClient,
{
    git: G,
    gh: H,
    reporter: Reporter,
}

impl<G, H> CommentService<G, H>
where
    G: GitClient,
    H: GhClient,
{
    pub const fn new(git: G, gh: H, reporter: Reporter) -> Self {
        Self { git, gh, reporter }
    }

    /// Check the environment, find the PR and gather both comment kinds
    ///
    /// A comment kind that cannot be fetched is reported as a warning and left empty.
    pub fn fetch(&self) -> Result<CommentReport, FetchError> {
        self.check_environment()?;

        let branch = self.git.current_branch().map_err(FetchError::FetchFailed)?;
        self.reporter.debug(format!("Current branch: {branch}"));

        let pr = self
            .gh
            .open_pr_for_branch(&branch)
            .map_err(FetchError::FetchFailed)?
            .ok_or_else(|| FetchError::NoPrFound(branch.clone()))?;
        let repo = self.gh.repo_info().map_err(FetchError::FetchFailed)?;
        self.reporter.info(format!(
            "Found PR #{} in {}/{}: {}",
            pr.number, repo.owner, repo.name, pr.title
        ));

        let spinner = self
            .reporter
            .spinner(format!("Fetching comments for PR #{}…", pr.number));
        let review_result = self.gh.review_comments(&repo, pr.number);
        let issue_result = self.gh.issue_comments(&repo, pr.number);
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let review_comments: Vec<ReviewComment> = match review_result {
            Ok(raw) => raw.into_iter().map(ReviewComment::from).collect(),
            Err(err) => {
                self.reporter
                    .warn(format!("Could not fetch review comments: {err:#}"));
                Vec::new()
            }
        };
        let issue_comments: Vec<IssueComment> = match issue_result {
            Ok(raw) => raw.into_iter().map(IssueComment::from).collect(),
            Err(err) => {
                self.reporter
                    .warn(format!("Could not fetch issue comments: {err:#}"));
                Vec::new()
            }
        };

        let report = CommentReport {
            pr: PrMetadata::from(pr),
            review_comments,
            issue_comments,
        };
        self.summarize(&report, &repo);
        Ok(report)
    }

    /// Repository, gh installation and gh login, in that order
    pub fn check_environment(&self) -> Result<(), FetchError> {
        if !self.git.is_inside_work_tree() {
            return Err(FetchError::NotARepository);
        }
        if !self.gh.is_available() {
            return Err(FetchError::GhMissing);
        }
        if !self.gh.is_authenticated() {
            return Err(FetchError::GhUnauthenticated);
        }
        self.reporter.debug("git repository and gh login found");
        Ok(())
    }

    fn summarize(&self, report: &CommentReport, repo: &RepoInfo) {
        self.reporter.debug(format!(
            "Queried repos/{}/{}/pulls/{}/comments and issues/{}/comments",
            repo.owner, repo.name, report.pr.number, report.pr.number
        ));
        self.reporter.success(format!(
            "Fetched {} review comments ({} outdated) and {} issue comments for PR #{}",
            report.review_comments.len(),
            report.outdated_count(),
            report.issue_comments.len(),
            report.pr.number
        ));
    }
}
