//! Configuration module
//!
//! Optional TOML settings for the branch workflow and the identity cache.

pub mod loader;
pub mod schema;

pub use schema::{Config, GitConfig, IdentityConfig};
