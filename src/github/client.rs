//! HTTP client for the GitHub REST API.

use crate::github::{LookupError, ProfileSource, RepoPayload, UserPayload};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API root, e.g. `https://api.github.com`.
    pub base_url: String,
    /// Value of the `User-Agent` header (GitHub rejects requests without one).
    pub user_agent: String,
    /// Request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            user_agent: format!("ghbattle/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
        }
    }
}

/// Unauthenticated GitHub client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: Url,
}

impl GitHubClient {
    /// Build a client with the required GitHub headers.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let base_url = Url::parse(&options.base_url)
            .with_context(|| format!("Invalid API base URL: {}", options.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("API base URL cannot be a base: {}", options.base_url);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&options.user_agent).context("Invalid User-Agent value")?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let mut builder = Client::builder().default_headers(headers);
        if matches!(base_url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]")) {
            // A local API (mirror, test double) is never reached through a proxy.
            builder = builder.no_proxy();
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { http, base_url })
    }

    /// URL of the identity record for a handle. The handle is percent-encoded
    /// as a single path segment.
    pub fn user_url(&self, handle: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users").push(handle);
        }
        url
    }

    /// GET a URL and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, LookupError> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| LookupError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| LookupError::Network {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|source| LookupError::Parse {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ProfileSource for GitHubClient {
    async fn fetch_identity(&self, handle: &str) -> Result<UserPayload, LookupError> {
        let url = self.user_url(handle);

        match self.get_json(url.as_str()).await {
            Err(LookupError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(LookupError::NotFound {
                    handle: handle.to_string(),
                })
            }
            other => other,
        }
    }

    async fn fetch_repositories(&self, repos_url: &str) -> Result<Vec<RepoPayload>, LookupError> {
        self.get_json(repos_url).await
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! Minimal loopback HTTP server answering canned JSON per path.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// A canned response: request path, HTTP status, body.
    pub type Route = (String, u16, String);

    /// Bind a listener and return it with its base URL.
    pub async fn bind() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, format!("http://{addr}"))
    }

    /// Serve the routes until the test runtime shuts down.
    pub fn serve(listener: TcpListener, routes: Vec<Route>) {
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let mut read = 0;
                    loop {
                        let n = stream.read(&mut buf[read..]).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        read += n;
                        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len()
                        {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&buf[..read]);
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let (status, body) = routes
                        .iter()
                        .find(|(route, _, _)| *route == path)
                        .map(|(_, status, body)| (*status, body.clone()))
                        .unwrap_or((404, r#"{"message":"Not Found"}"#.to_string()));

                    let response = format!(
                        "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::test_server::{bind, serve};
    use super::*;

    fn client_for(base_url: &str) -> GitHubClient {
        GitHubClient::new(ClientOptions {
            base_url: base_url.to_string(),
            ..ClientOptions::default()
        })
        .unwrap()
    }

    #[test]
    fn test_user_url() {
        let client = client_for("https://api.github.com");
        assert_eq!(
            client.user_url("octocat").as_str(),
            "https://api.github.com/users/octocat"
        );

        let client = client_for("https://ghe.example.com/api/v3/");
        assert_eq!(
            client.user_url("octocat").as_str(),
            "https://ghe.example.com/api/v3/users/octocat"
        );
    }

    #[test]
    fn test_user_url_encodes_handle() {
        let client = client_for("https://api.github.com");
        let url = client.user_url("a/b?c");
        assert_eq!(url.path(), "/users/a%2Fb%3Fc");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = GitHubClient::new(ClientOptions {
            base_url: "not a url".to_string(),
            ..ClientOptions::default()
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_identity_and_repositories() {
        let (listener, base) = bind().await;
        let user = format!(
            r#"{{"login":"octocat","name":null,"avatar_url":"a","bio":null,"blog":"","created_at":"2011-01-25T18:44:36Z","followers":3,"repos_url":"{base}/users/octocat/repos"}}"#
        );
        let repos = r#"[{"name":"one","html_url":"h","created_at":"2012-01-01T00:00:00Z","stargazers_count":4}]"#;
        serve(
            listener,
            vec![
                ("/users/octocat".to_string(), 200, user),
                ("/users/octocat/repos".to_string(), 200, repos.to_string()),
            ],
        );

        let client = client_for(&base);
        let identity = client.fetch_identity("octocat").await.unwrap();
        assert_eq!(identity.login, "octocat");

        let listing = client.fetch_repositories(&identity.repos_url).await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].stargazers_count, 4);
    }

    #[tokio::test]
    async fn test_unknown_handle_is_not_found() {
        let (listener, base) = bind().await;
        serve(listener, vec![]);

        let error = client_for(&base).fetch_identity("ghost").await.unwrap_err();
        assert!(matches!(error, LookupError::NotFound { ref handle } if handle == "ghost"));
    }

    #[tokio::test]
    async fn test_server_error_and_malformed_body() {
        let (listener, base) = bind().await;
        serve(
            listener,
            vec![
                ("/users/broken".to_string(), 500, "{}".to_string()),
                ("/users/garbled".to_string(), 200, "<html>".to_string()),
            ],
        );

        let client = client_for(&base);
        let error = client.fetch_identity("broken").await.unwrap_err();
        assert!(matches!(error, LookupError::Status { status: 500, .. }));

        let error = client.fetch_identity("garbled").await.unwrap_err();
        assert!(matches!(error, LookupError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let (listener, base) = bind().await;
        drop(listener);

        let error = client_for(&base).fetch_identity("anyone").await.unwrap_err();
        assert!(matches!(error, LookupError::Network { .. }));
    }
}
