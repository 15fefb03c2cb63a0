//! fetch-pr-comments command - PR feedback as JSON on stdout

use crate::color::Reporter;
use crate::error::FetchError;
use crate::integrations::gh::RealGhClient;
use crate::integrations::git::RealGitClient;
use crate::service::CommentService;

/// Fetch the comments and print the JSON document
///
/// Nothing is written to stdout unless the whole document is ready.
///
/// # Errors
/// Returns the `FetchError` of the first check or lookup that failed.
pub fn cmd_fetch_comments(reporter: &Reporter) -> Result<(), FetchError> {
    let service = CommentService::new(RealGitClient, RealGhClient, *reporter);
    let report = service.fetch()?;

    let json = serde_json::to_string_pretty(&report)
        .map_err(|err| FetchError::FetchFailed(err.into()))?;
    println!("{json}");
    Ok(())
}
