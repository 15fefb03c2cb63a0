// Command handlers module
// One handler per binary, wiring the real clients into the services

pub mod create_branch;
pub mod fetch_comments;
