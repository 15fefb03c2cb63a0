//! Error kinds for both pipelines
//!
//! Each pipeline stage returns one of these kinds. Numeric exit codes are only
//! produced at the process boundary through `exit_code()`.

use thiserror::Error;

/// Failures of the branch creation workflow
#[derive(Debug, Error)]
pub enum BranchError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("failed to load configuration: {0:#}")]
    Config(#[source] anyhow::Error),
    #[error("Not in a git repository. Please run create-branch from within a git working tree.")]
    NotARepository,
    #[error("Uncommitted changes detected. Commit or stash them before creating a branch.")]
    UncommittedChanges,
    #[error("failed to read working tree status: {0:#}")]
    StatusFailed(#[source] anyhow::Error),
    #[error("could not resolve GitHub username: {0}")]
    IdentityUnavailable(String),
    #[error("invalid branch name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
    #[error("Branch '{0}' already exists locally")]
    BranchExists(String),
    #[error("could not determine the primary branch of this repository")]
    PrimaryBranchUnresolvable,
    #[error("failed to check out '{branch}': {source:#}")]
    CheckoutFailed {
        branch: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to pull '{branch}' from '{remote}': {source:#}")]
    PullFailed {
        remote: String,
        branch: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to create branch '{branch}': {source:#}")]
    CreateFailed {
        branch: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("expected to be on '{expected}' but the current branch is '{actual}'")]
    VerificationFailed { expected: String, actual: String },
}

impl BranchError {
    /// Process exit code for this failure
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::UncommittedChanges => 1,
            Self::BranchExists(_) => 2,
            Self::PullFailed { .. } => 3,
            Self::InvalidName { .. } => 4,
            Self::NotARepository => 5,
            Self::InvalidArguments(_) | Self::Config(_) => 6,
            Self::IdentityUnavailable(_) => 7,
            Self::PrimaryBranchUnresolvable
            | Self::CheckoutFailed { .. }
            | Self::CreateFailed { .. }
            | Self::StatusFailed(_) => 8,
            Self::VerificationFailed { .. } => 9,
        }
    }
}

/// Failures of the PR comment fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Not in a git repository. Please run fetch-pr-comments from within a git working tree.")]
    NotARepository,
    #[error("GitHub CLI (gh) is not installed. Install it from https://cli.github.com/")]
    GhMissing,
    #[error("GitHub CLI (gh) is not authenticated. Run `gh auth login` first.")]
    GhUnauthenticated,
    #[error("No open pull request found for branch '{0}'")]
    NoPrFound(String),
    #[error("failed to fetch pull request data: {0:#}")]
    FetchFailed(#[source] anyhow::Error),
}

impl FetchError {
    /// Process exit code for this failure
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::NotARepository => 1,
            Self::GhMissing => 2,
            Self::GhUnauthenticated => 3,
            Self::NoPrFound(_) => 4,
            Self::FetchFailed(_) => 5,
        }
    }
}

/// Exit code used by both binaries when argument parsing fails
pub const INVALID_ARGUMENTS_EXIT_CODE: u8 = 6;
