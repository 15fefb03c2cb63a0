//! create-branch command - Validated branch creation off the primary branch

use crate::color::Reporter;
use crate::config::Config;
use crate::error::BranchError;
use crate::identity::JsonFileStore;
use crate::integrations::gh::RealGhClient;
use crate::integrations::git::{GitClient, RealGitClient};
use crate::service::BranchService;

/// Create the branch and print its name on stdout
///
/// # Errors
/// Returns the `BranchError` of the first stage that failed.
pub fn cmd_create_branch(
    ticket: &str,
    summary: &str,
    reporter: &Reporter,
) -> Result<(), BranchError> {
    let git = RealGitClient;

    // Local config lives at the top of the working tree
    let repo_root = if git.is_inside_work_tree() {
        git.repo_root().ok()
    } else {
        None
    };
    let config = Config::load(repo_root.as_deref()).map_err(BranchError::Config)?;

    let cache_path = config.identity_cache_path().unwrap_or_else(|| {
        std::env::temp_dir()
            .join("agent-dev-helpers")
            .join("identity.json")
    });
    reporter.debug(format!("Identity cache: {}", cache_path.display()));

    let service = BranchService::new(
        git,
        RealGhClient,
        JsonFileStore::new(cache_path),
        config.git,
        *reporter,
    );
    let name = service.create_branch(ticket, summary)?;

    println!("{name}");
    Ok(())
}
