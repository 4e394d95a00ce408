//! Release lookup against the hosted releases API
//!
//! A failed lookup never aborts a run: [`ReleaseSource::latest_release`] logs
//! the problem and reports "no release", so the stored version is kept.

use anyhow::{Context, Result, bail};
use serde::Deserialize;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Anything that can tell us the latest released version of a repository
#[allow(async_fn_in_trait)]
pub trait ReleaseSource {
    /// Latest version with its leading `v` removed, or `None` if it could not be determined
    async fn latest_release(&self, repo_url: &str) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// Client for `GET {base}/repos/{owner}/{repo}/releases/latest`
#[derive(Clone)]
pub struct GithubReleases {
    http_client: reqwest::Client,
    api_base_url: String,
    token: Option<String>,
}

impl GithubReleases {
    pub fn new(api_base_url: &str, token: Option<String>) -> Result<Self> {
        Self::with_builder(reqwest::Client::builder(), api_base_url, token)
    }

    fn with_builder(
        builder: reqwest::ClientBuilder,
        api_base_url: &str,
        token: Option<String>,
    ) -> Result<Self> {
        let http_client = builder
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn endpoint(&self, repo_url: &str) -> Result<String> {
        let (owner, repo) = owner_and_repo(repo_url)?;
        Ok(format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base_url, owner, repo
        ))
    }

    async fn fetch_latest_tag(&self, repo_url: &str) -> Result<String> {
        let url = self.endpoint(repo_url)?;
        tracing::debug!("GET {}", url);

        let mut request = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let release: LatestRelease = request
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("Unexpected response body from {url}"))?;

        Ok(release.tag_name)
    }
}

impl ReleaseSource for GithubReleases {
    async fn latest_release(&self, repo_url: &str) -> Option<String> {
        match self.fetch_latest_tag(repo_url).await {
            Ok(tag) => {
                let version = strip_version_prefix(&tag).to_string();
                tracing::info!("Latest release for {}: {}", repo_url, version);
                Some(version)
            }
            Err(e) => {
                tracing::error!("Failed to fetch latest release for {}: {:#}", repo_url, e);
                None
            }
        }
    }
}

/// Split `.../<owner>/<repo>[.git]` into its owner and repository parts
pub fn owner_and_repo(repo_url: &str) -> Result<(String, String)> {
    let mut segments = repo_url.trim_end_matches('/').rsplit('/');
    let (Some(repo), Some(owner)) = (segments.next(), segments.next()) else {
        bail!("Repository URL '{}' has no owner/repo segments", repo_url);
    };
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if owner.is_empty() || repo.is_empty() {
        bail!("Repository URL '{}' has no owner/repo segments", repo_url);
    }

    Ok((owner.to_string(), repo.to_string()))
}

/// Remove one leading `v` from a release tag
pub fn strip_version_prefix(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const TOKIO_URL: &str = "https://github.com/tokio-rs/tokio.git";

    /// Answer a single HTTP request with `status` and `body`, returning the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (SocketAddr, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8(request).unwrap()
        });

        (addr, handle)
    }

    /// Client for the local server; proxies from the environment would intercept it
    fn local_client(addr: SocketAddr, token: Option<&str>) -> GithubReleases {
        GithubReleases::with_builder(
            reqwest::Client::builder().no_proxy(),
            &format!("http://{addr}"),
            token.map(str::to_string),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_latest_release_strips_tag_prefix() {
        let (addr, server) = serve_once("200 OK", r#"{"tag_name":"v1.2.3","draft":false}"#).await;

        let version = local_client(addr, None).latest_release(TOKIO_URL).await;
        assert_eq!(version.as_deref(), Some("1.2.3"));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /repos/tokio-rs/tokio/releases/latest HTTP/1.1\r\n"));
        assert!(!request.to_ascii_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn test_error_status_yields_none() {
        let (addr, server) = serve_once("404 Not Found", r#"{"message":"Not Found"}"#).await;

        assert_eq!(local_client(addr, None).latest_release(TOKIO_URL).await, None);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_json_body_yields_none() {
        let (addr, server) = serve_once("200 OK", "<html>rate limited</html>").await;

        assert_eq!(local_client(addr, None).latest_release(TOKIO_URL).await, None);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_token_is_sent_as_bearer_auth() {
        let (addr, server) = serve_once("200 OK", r#"{"tag_name":"0.9.0"}"#).await;

        let version = local_client(addr, Some("s3cret"))
            .latest_release(TOKIO_URL)
            .await;
        assert_eq!(version.as_deref(), Some("0.9.0"));

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.contains("\r\nauthorization: bearer s3cret\r\n"));
        assert!(request.contains("\r\nuser-agent: docs-updater/"));
    }

    #[test]
    fn test_owner_and_repo() {
        assert_eq!(
            owner_and_repo("https://github.com/tokio-rs/tokio.git").unwrap(),
            ("tokio-rs".to_string(), "tokio".to_string())
        );
        assert_eq!(
            owner_and_repo("https://github.com/serde-rs/serde/").unwrap(),
            ("serde-rs".to_string(), "serde".to_string())
        );
        assert!(owner_and_repo("tokio").is_err());
        assert!(owner_and_repo("/tokio").is_err());
    }

    #[test]
    fn test_strip_version_prefix() {
        assert_eq!(strip_version_prefix("v1.2.3"), "1.2.3");
        assert_eq!(strip_version_prefix("1.2.3"), "1.2.3");
        assert_eq!(strip_version_prefix("vv2"), "v2");
        assert_eq!(strip_version_prefix(""), "");
    }

    #[test]
    fn test_endpoint() {
        let client = GithubReleases::new("https://api.github.com/", None).unwrap();
        assert_eq!(
            client
                .endpoint("https://github.com/rust-lang/rust-clippy.git")
                .unwrap(),
            "https://api.github.com/repos/rust-lang/rust-clippy/releases/latest"
        );
    }

    #[test]
    fn test_release_body_decoding() {
        let body = r#"{"tag_name": "v0.20.2", "name": "0.20.2", "draft": false}"#;
        let release: LatestRelease = serde_json::from_str(body).unwrap();
        assert_eq!(strip_version_prefix(&release.tag_name), "0.20.2");

        assert!(serde_json::from_str::<LatestRelease>(r#"{"name": "x"}"#).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_none() {
        // Nothing listens on the discard port locally
        let client = GithubReleases::new("http://127.0.0.1:9", None).unwrap();
        assert_eq!(
            client
                .latest_release("https://github.com/tokio-rs/tokio.git")
                .await,
            None
        );
    }

    #[tokio::test]
    async fn test_malformed_url_yields_none() {
        let client = GithubReleases::new("http://127.0.0.1:9", None).unwrap();
        assert_eq!(client.latest_release("tokio").await, None);
    }
}
