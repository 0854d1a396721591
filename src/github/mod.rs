//! GitHub REST API access.
//!
//! The aggregator talks to GitHub only through [`ProfileSource`], so the
//! lookup logic can run against an in-memory source in tests.

pub mod api;
pub mod client;
pub mod error;

pub use api::{RepoPayload, UserPayload};
pub use client::{ClientOptions, GitHubClient};
pub use error::LookupError;

use async_trait::async_trait;

/// Where profile data comes from.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Resolve the identity record for a handle.
    async fn fetch_identity(&self, handle: &str) -> Result<UserPayload, LookupError>;

    /// Fetch the repository listing at a URL taken from the identity record.
    async fn fetch_repositories(&self, repos_url: &str) -> Result<Vec<RepoPayload>, LookupError>;
}
