#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
mod client;

pub use client::{
    parse_pages, ApiIssueComment, ApiReviewComment, ApiUser, GhClient, PrInfo, RealGhClient,
    RepoInfo,
};

#[cfg(test)]
pub use client::tests::MockGhClient;
