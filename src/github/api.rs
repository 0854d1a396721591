//! Payloads returned by the GitHub REST API.
//!
//! Only the fields the cards need are deserialized; everything else in
//! the response is ignored.

use crate::models::{Identity, RepositorySummary};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Response of `GET /users/{username}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub blog: Option<String>,
    pub created_at: DateTime<Utc>,
    pub followers: u64,
    pub repos_url: String,
}

impl UserPayload {
    /// Convert into the domain identity. GitHub sends `""` for an unset blog.
    pub fn into_identity(self) -> Identity {
        Identity {
            display_name: self.name,
            handle: self.login,
            avatar_url: self.avatar_url,
            bio: self.bio.filter(|bio| !bio.trim().is_empty()),
            blog_url: self.blog.filter(|blog| !blog.trim().is_empty()),
            joined: self.created_at,
            followers: self.followers,
        }
    }
}

/// One entry of the `repos_url` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoPayload {
    pub name: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub stargazers_count: u64,
}

impl From<RepoPayload> for RepositorySummary {
    fn from(repo: RepoPayload) -> Self {
        Self {
            name: repo.name,
            url: repo.html_url,
            created_at: repo.created_at,
            star_count: repo.stargazers_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OCTOCAT: &str = r#"{
        "login": "octocat",
        "id": 583231,
        "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
        "name": "The Octocat",
        "company": "@github",
        "blog": "",
        "bio": null,
        "public_repos": 8,
        "followers": 21000,
        "created_at": "2011-01-25T18:44:36Z",
        "repos_url": "https://api.github.com/users/octocat/repos"
    }"#;

    #[test]
    fn test_parse_user_payload() {
        let user: UserPayload = serde_json::from_str(OCTOCAT).unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.repos_url, "https://api.github.com/users/octocat/repos");

        let identity = user.into_identity();
        assert_eq!(identity.display_name.as_deref(), Some("The Octocat"));
        assert_eq!(identity.followers, 21000);
        assert!(identity.bio.is_none());
        assert!(identity.blog_url.is_none(), "empty blog must count as absent");
    }

    #[test]
    fn test_parse_repo_payload() {
        let json = r#"[{
            "name": "Hello-World",
            "html_url": "https://github.com/octocat/Hello-World",
            "created_at": "2011-01-26T19:01:12Z",
            "stargazers_count": 80,
            "fork": false
        }]"#;

        let repos: Vec<RepoPayload> = serde_json::from_str(json).unwrap();
        let summary = RepositorySummary::from(repos[0].clone());
        assert_eq!(summary.name, "Hello-World");
        assert_eq!(summary.url, "https://github.com/octocat/Hello-World");
        assert_eq!(summary.star_count, 80);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let json = r#"{"login": "octocat"}"#;
        assert!(serde_json::from_str::<UserPayload>(json).is_err());
    }
}
