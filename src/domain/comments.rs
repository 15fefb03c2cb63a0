//! Normalized pull request feedback
//!
//! These types define the JSON document written by `fetch-pr-comments`.

use serde::Serialize;

use crate::integrations::gh::{ApiIssueComment, ApiReviewComment, ApiUser, PrInfo};

/// Login reported when the comment author's account no longer exists
const GHOST_AUTHOR: &str = "ghost";

/// Pull request the comments belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrMetadata {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub branch: String,
}

impl From<PrInfo> for PrMetadata {
    fn from(pr: PrInfo) -> Self {
        Self {
            number: pr.number,
            title: pr.title,
            url: pr.url,
            branch: pr.head_ref_name,
        }
    }
}

/// Inline comment attached to a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewComment {
    pub id: u64,
    pub body: String,
    pub author: String,
    pub path: String,
    pub line: Option<u64>,
    /// `None` once the commented diff line no longer exists
    pub position: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
    pub in_reply_to_id: Option<u64>,
    pub outdated: bool,
}

impl From<ApiReviewComment> for ReviewComment {
    fn from(raw: ApiReviewComment) -> Self {
        Self {
            id: raw.id,
            body: raw.body,
            author: author_login(raw.user),
            path: raw.path,
            line: raw.line.or(raw.original_line),
            position: raw.position,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            in_reply_to_id: raw.in_reply_to_id,
            outdated: raw.position.is_none(),
        }
    }
}

/// General discussion comment on the pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueComment {
    pub id: u64,
    pub body: String,
    pub author: String,
    /// Always `None`; kept so both comment kinds share one shape
    pub path: Option<String>,
    /// Always `None`
    pub line: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ApiIssueComment> for IssueComment {
    fn from(raw: ApiIssueComment) -> Self {
        Self {
            id: raw.id,
            body: raw.body,
            author: author_login(raw.user),
            path: None,
            line: None,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

/// Document written to stdout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentReport {
    pub pr: PrMetadata,
    pub review_comments: Vec<ReviewComment>,
    pub issue_comments: Vec<IssueComment>,
}

impl CommentReport {
    #[must_use]
    pub fn outdated_count(&self) -> usize {
        self.review_comments.iter().filter(|c| c.outdated).count()
    }
}

fn author_login(user: Option<ApiUser>) -> String {
    user.map_or_else(|| GHOST_AUTHOR.to_string(), |u| u.login)
}
