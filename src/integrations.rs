// External integrations module
// Wrappers around the git and gh command-line tools

pub mod git;

// GitHub integration
pub mod gh;
