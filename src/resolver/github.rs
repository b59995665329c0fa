use crate::config::GithubConfig;
use crate::resolver::{ApiAuth, ApiFetch, HttpFetch, UrlHandler};
use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

/// Resolves pull request and issue links on one GitHub instance
/// (github.com or a GitHub Enterprise host).
pub struct GithubHandler {
    base: Url,
    api_base: Url,
    token_env: String,
    fetch: Box<dyn ApiFetch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefKind {
    Pull,
    Issue,
}

#[derive(Debug, PartialEq, Eq)]
struct RepoRef {
    org: String,
    name: String,
    kind: RefKind,
    number: u64,
}

#[derive(Debug, Deserialize)]
struct TitleResponse {
    title: String,
}

impl GithubHandler {
    pub fn from_config(config: &GithubConfig) -> Result<Self> {
        Self::with_fetch(config, Box::new(HttpFetch::new()?))
    }

    fn with_fetch(config: &GithubConfig, fetch: Box<dyn ApiFetch>) -> Result<Self> {
        let base = Url::parse(&config.url)
            .with_context(|| format!("Invalid GitHub URL '{}'", config.url))?;
        let mut api_base = Url::parse(&config.api_url)
            .with_context(|| format!("Invalid GitHub API URL '{}'", config.api_url))?;
        // Url::join treats a path without a trailing slash as a file
        if !api_base.path().ends_with('/') {
            api_base.set_path(&format!("{}/", api_base.path()));
        }
        Ok(Self {
            base,
            api_base,
            token_env: config.token_env.clone(),
            fetch,
        })
    }

    /// Matches `<base>/<org>/<repo>/pull/<n>` and `.../issues/<n>`,
    /// ignoring anything after the number (e.g. `/files`, fragments).
    fn parse_reference(&self, query: &str) -> Option<RepoRef> {
        let url = Url::parse(query).ok()?;
        if url.host_str() != self.base.host_str() {
            return None;
        }
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        if segments.len() < 4 {
            return None;
        }
        let kind = match segments[2] {
            "pull" => RefKind::Pull,
            "issues" => RefKind::Issue,
            _ => return None,
        };
        let number: u64 = segments[3].parse().ok()?;
        Some(RepoRef {
            org: segments[0].to_string(),
            name: segments[1].to_string(),
            kind,
            number,
        })
    }

    fn fetch_title(&self, repo_ref: &RepoRef) -> Result<String> {
        let path = match repo_ref.kind {
            RefKind::Pull => format!(
                "repos/{}/{}/pulls/{}",
                repo_ref.org, repo_ref.name, repo_ref.number
            ),
            RefKind::Issue => format!(
                "repos/{}/{}/issues/{}",
                repo_ref.org, repo_ref.name, repo_ref.number
            ),
        };
        let endpoint = self.api_base.join(&path)?;
        // Unauthenticated requests still work for public repositories
        let auth = ApiAuth::OptionalBearerEnv(self.token_env.clone());

        let body = self
            .fetch
            .get(&endpoint, &auth, Some("application/vnd.github+json"))?;
        let parsed: TitleResponse =
            serde_json::from_str(&body).context("Failed to parse GitHub API response")?;
        Ok(parsed.title)
    }

    fn format_review(&self, repo_ref: &RepoRef, title: &str) -> String {
        let base = self.base.as_str().trim_end_matches('/');
        let path_kind = match repo_ref.kind {
            RefKind::Pull => "pull",
            RefKind::Issue => "issues",
        };
        format!(
            "[[{base}/{org}/{name}/{path_kind}/{number}|{name} #{number} >> {title}]]",
            org = repo_ref.org,
            name = repo_ref.name,
            number = repo_ref.number,
        )
    }
}

impl UrlHandler for GithubHandler {
    fn name(&self) -> &str {
        "github"
    }

    fn review(&self, query: &str) -> Option<Result<String>> {
        let repo_ref = self.parse_reference(query)?;
        Some(
            self.fetch_title(&repo_ref)
                .map(|title| self.format_review(&repo_ref, &title)),
        )
    }
}
