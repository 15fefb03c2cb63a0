#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::process::Command;

/// Information about a GitHub pull request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrInfo {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub head_ref_name: String,
}

/// Owner and name of the repository the current directory belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub owner: String,
    pub name: String,
}

/// Account as returned by the REST API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub login: String,
}

/// Pull request review comment as returned by `pulls/{n}/comments`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiReviewComment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub user: Option<ApiUser>,
    #[serde(default)]
    pub path: String,
    pub line: Option<u64>,
    pub original_line: Option<u64>,
    pub position: Option<u64>,
    pub in_reply_to_id: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Issue comment as returned by `issues/{n}/comments`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiIssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub user: Option<ApiUser>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
struct RepoView {
    name: String,
    owner: ApiUser,
}

/// Trait for interacting with GitHub CLI
pub trait GhClient {
    /// Check if gh CLI is available
    fn is_available(&self) -> bool;

    /// Check if gh CLI has a logged-in account
    fn is_authenticated(&self) -> bool;

    /// Login of the authenticated account
    fn current_user(&self) -> Result<String>;

    /// Repository of the current directory
    fn repo_info(&self) -> Result<RepoInfo>;

    /// Open pull request whose head is `branch`, if any
    fn open_pr_for_branch(&self, branch: &str) -> Result<Option<PrInfo>>;

    /// All inline review comments of a pull request
    fn review_comments(&self, repo: &RepoInfo, number: u64) -> Result<Vec<ApiReviewComment>>;

    /// All general discussion comments of a pull request
    fn issue_comments(&self, repo: &RepoInfo, number: u64) -> Result<Vec<ApiIssueComment>>;
}

/// Real implementation of `GhClient` using `gh` CLI
pub struct RealGhClient;

fn gh_stdout(args: &[&str]) -> Result<String> {
    let output = Command::new("gh")
        .args(args)
        .output()
        .context("Failed to execute gh command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("gh {} failed: {}", args.join(" "), stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `gh api --paginate` output, which is one JSON array per page
pub fn parse_pages<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for page in serde_json::Deserializer::from_str(json).into_iter::<Vec<T>>() {
        items.extend(page.context("Failed to parse paginated API response")?);
    }
    Ok(items)
}

impl GhClient for RealGhClient {
    fn is_available(&self) -> bool {
        Command::new("gh")
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn is_authenticated(&self) -> bool {
        Command::new("gh")
            .args(["auth", "status"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn current_user(&self) -> Result<String> {
        let login = gh_stdout(&["api", "user", "--jq", ".login"])?;
        let login = login.trim();
        if login.is_empty() {
            anyhow::bail!("gh api user returned an empty login");
        }
        Ok(login.to_string())
    }

    fn repo_info(&self) -> Result<RepoInfo> {
        let json = gh_stdout(&["repo", "view", "--json", "owner,name"])?;
        let view: RepoView = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse repository JSON: {json}"))?;
        Ok(RepoInfo {
            owner: view.owner.login,
            name: view.name,
        })
    }

    fn open_pr_for_branch(&self, branch: &str) -> Result<Option<PrInfo>> {
        let json = gh_stdout(&[
            "pr",
            "list",
            "--head",
            branch,
            "--state",
            "open",
            "--json",
            "number,title,url,headRefName",
            "--limit",
            "1",
        ])?;
        let prs: Vec<PrInfo> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse PR list JSON: {json}"))?;
        Ok(prs.into_iter().next())
    }

    fn review_comments(&self, repo: &RepoInfo, number: u64) -> Result<Vec<ApiReviewComment>> {
        let endpoint = format!("repos/{}/{}/pulls/{number}/comments", repo.owner, repo.name);
        parse_pages(&gh_stdout(&["api", "--paginate", &endpoint])?)
    }

    fn issue_comments(&self, repo: &RepoInfo, number: u64) -> Result<Vec<ApiIssueComment>> {
        let endpoint = format!("repos/{}/{}/issues/{number}/comments", repo.owner, repo.name);
        parse_pages(&gh_stdout(&["api", "--paginate", &endpoint])?)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Clone)]
    enum MockResult<T> {
        Ok(T),
        Err(String),
    }

    impl<T: Clone> MockResult<T> {
        fn get(&self) -> Result<T> {
            match self {
                Self::Ok(value) => Ok(value.clone()),
                Self::Err(msg) => Err(anyhow::anyhow!("{msg}")),
            }
        }
    }

    /// Mock implementation for testing
    pub struct MockGhClient {
        available: bool,
        authenticated: bool,
        user: MockResult<String>,
        repo: MockResult<RepoInfo>,
        pr: MockResult<Option<PrInfo>>,
        review_comments: MockResult<Vec<ApiReviewComment>>,
        issue_comments: MockResult<Vec<ApiIssueComment>>,
        user_calls: Cell<usize>,
        comment_calls: Cell<usize>,
    }

    impl MockGhClient {
        pub fn new() -> Self {
            Self {
                available: true,
                authenticated: true,
                user: MockResult::Err("No user configured".to_string()),
                repo: MockResult::Ok(RepoInfo {
                    owner: "acme".to_string(),
                    name: "app".to_string(),
                }),
                pr: MockResult::Ok(None),
                review_comments: MockResult::Ok(Vec::new()),
                issue_comments: MockResult::Ok(Vec::new()),
                user_calls: Cell::new(0),
                comment_calls: Cell::new(0),
            }
        }

        pub fn unavailable(mut self) -> Self {
            self.available = false;
            self
        }

        pub fn unauthenticated(mut self) -> Self {
            self.authenticated = false;
            self
        }

        pub fn with_user(mut self, login: &str) -> Self {
            self.user = MockResult::Ok(login.to_string());
            self
        }

        pub fn with_user_error(mut self, error: &str) -> Self {
            self.user = MockResult::Err(error.to_string());
            self
        }

        pub fn with_repo_error(mut self, error: &str) -> Self {
            self.repo = MockResult::Err(error.to_string());
            self
        }

        pub fn with_pr(mut self, pr: PrInfo) -> Self {
            self.pr = MockResult::Ok(Some(pr));
            self
        }

        pub fn with_pr_error(mut self, error: &str) -> Self {
            self.pr = MockResult::Err(error.to_string());
            self
        }

        pub fn with_review_comments(mut self, comments: Vec<ApiReviewComment>) -> Self {
            self.review_comments = MockResult::Ok(comments);
            self
        }

        pub fn with_review_comments_error(mut self, error: &str) -> Self {
            self.review_comments = MockResult::Err(error.to_string());
            self
        }

        pub fn with_issue_comments(mut self, comments: Vec<ApiIssueComment>) -> Self {
            self.issue_comments = MockResult::Ok(comments);
            self
        }

        pub fn with_issue_comments_error(mut self, error: &str) -> Self {
            self.issue_comments = MockResult::Err(error.to_string());
            self
        }

        /// Number of `current_user` lookups made so far
        pub fn user_calls(&self) -> usize {
            self.user_calls.get()
        }

        /// Number of comment queries made so far
        pub fn comment_calls(&self) -> usize {
            self.comment_calls.get()
        }
    }

    impl GhClient for MockGhClient {
        fn is_available(&self) -> bool {
            self.available
        }

        fn is_authenticated(&self) -> bool {
            self.authenticated
        }

        fn current_user(&self) -> Result<String> {
            self.user_calls.set(self.user_calls.get() + 1);
            self.user.get()
        }

        fn repo_info(&self) -> Result<RepoInfo> {
            self.repo.get()
        }

        fn open_pr_for_branch(&self, _branch: &str) -> Result<Option<PrInfo>> {
            self.pr.get()
        }

        fn review_comments(&self, _repo: &RepoInfo, _number: u64) -> Result<Vec<ApiReviewComment>> {
            self.comment_calls.set(self.comment_calls.get() + 1);
            self.review_comments.get()
        }

        fn issue_comments(&self, _repo: &RepoInfo, _number: u64) -> Result<Vec<ApiIssueComment>> {
            self.comment_calls.set(self.comment_calls.get() + 1);
            self.issue_comments.get()
        }
    }

    #[test]
    fn test_parse_pages_single_page() {
        let json = r#"[{"id": 1, "body": "hi", "user": {"login": "a"},
            "created_at": "t", "updated_at": "t"}]"#;
        let comments: Vec<ApiIssueComment> = parse_pages(json).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].user.as_ref().unwrap().login, "a");
    }

    #[test]
    fn test_parse_pages_concatenated_pages() {
        let json = concat!(
            r#"[{"id": 1, "user": null, "created_at": "t", "updated_at": "t"}]"#,
            "\n",
            r#"[{"id": 2, "body": "b", "user": {"login": "x"}, "created_at": "t", "updated_at": "t"},"#,
            r#" {"id": 3, "body": "c", "user": {"login": "y"}, "created_at": "t", "updated_at": "t"}]"#,
        );
        let comments: Vec<ApiIssueComment> = parse_pages(json).unwrap();
        let ids: Vec<u64> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(comments[0].body, "");
    }

    #[test]
    fn test_parse_pages_empty_output() {
        let comments: Vec<ApiIssueComment> = parse_pages("").unwrap();
        assert!(comments.is_empty());
        let comments: Vec<ApiIssueComment> = parse_pages("[]").unwrap();
        assert!(comments.is_empty());
    }

    #[test]
    fn test_parse_pages_rejects_garbage() {
        let result: Result<Vec<ApiIssueComment>> = parse_pages("not json");
        assert!(result.is_err());
    }

    #[test]
    fn test_pr_info_from_gh_json() {
        let json = r#"[{"number": 7, "title": "Add thing", "url": "https://github.com/acme/app/pull/7",
            "headRefName": "alice-1-add-thing"}]"#;
        let prs: Vec<PrInfo> = serde_json::from_str(json).unwrap();
        assert_eq!(prs[0].number, 7);
        assert_eq!(prs[0].head_ref_name, "alice-1-add-thing");
    }

    #[test]
    fn test_review_comment_optional_fields_default_to_none() {
        let json = r#"{"id": 5, "body": "x", "user": {"login": "r"}, "path": "a.rs",
            "created_at": "t", "updated_at": "t"}"#;
        let comment: ApiReviewComment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.position, None);
        assert_eq!(comment.line, None);
        assert_eq!(comment.in_reply_to_id, None);
    }

    #[test]
    fn test_mock_client_counts_user_lookups() {
        let client = MockGhClient::new().with_user("alice");
        assert_eq!(client.current_user().unwrap(), "alice");
        assert_eq!(client.current_user().unwrap(), "alice");
        assert_eq!(client.user_calls(), 2);
    }

    #[test]
    fn test_mock_client_unavailable() {
        let client = MockGhClient::new().unavailable().unauthenticated();
        assert!(!client.is_available());
        assert!(!client.is_authenticated());
    }
}
