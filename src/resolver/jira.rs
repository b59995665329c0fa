use crate::config::AtlassianConfig;
use crate::resolver::{ApiAuth, ApiFetch, HttpFetch, UrlHandler};
use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

/// Resolves Jira issues, from `<base>/browse/KEY-123` links or from a
/// bare issue key pasted instead of a URL.
pub struct JiraHandler {
    base: Url,
    user_env: String,
    token_env: String,
    fetch: Box<dyn ApiFetch>,
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    summary: String,
}

impl JiraHandler {
    pub fn from_config(config: &AtlassianConfig) -> Result<Self> {
        Self::with_fetch(config, Box::new(HttpFetch::new()?))
    }

    fn with_fetch(config: &AtlassianConfig, fetch: Box<dyn ApiFetch>) -> Result<Self> {
        let base = Url::parse(&config.url)
            .with_context(|| format!("Invalid Atlassian URL '{}'", config.url))?;
        Ok(Self {
            base,
            user_env: config.user_env.clone(),
            token_env: config.token_env.clone(),
            fetch,
        })
    }

    fn parse_issue_key(&self, query: &str) -> Option<String> {
        if let Ok(url) = Url::parse(query) {
            if url.host_str() != self.base.host_str() {
                return None;
            }
            let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
            let key = match segments.as_slice() {
                ["browse", key, ..] => key,
                [key] => key,
                _ => return None,
            };
            return is_issue_key(key).then(|| key.to_uppercase());
        }

        let trimmed = query.trim();
        is_issue_key(trimmed).then(|| trimmed.to_uppercase())
    }

    fn fetch_summary(&self, key: &str) -> Result<String> {
        let endpoint = self
            .base
            .join(&format!("/rest/api/2/issue/{key}?fields=summary"))?;
        let auth = ApiAuth::BasicEnv {
            user_env: self.user_env.clone(),
            token_env: self.token_env.clone(),
        };

        let body = self.fetch.get(&endpoint, &auth, None)?;
        let parsed: IssueResponse =
            serde_json::from_str(&body).context("Failed to parse Jira API response")?;
        Ok(parsed.fields.summary)
    }

    fn format_review(&self, key: &str, summary: &str) -> String {
        let base = self.base.as_str().trim_end_matches('/');
        format!("[[{base}/browse/{key}|{key} >> {summary}]]")
    }
}

/// `PROJ-123` shape: a letter-led alphanumeric project code, a dash,
/// and a number.
fn is_issue_key(s: &str) -> bool {
    let Some((project, number)) = s.rsplit_once('-') else {
        return false;
    };
    !project.is_empty()
        && project
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
        && project.chars().all(|c| c.is_ascii_alphanumeric())
        && !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit())
}

impl UrlHandler for JiraHandler {
    fn name(&self) -> &str {
        "jira"
    }

    fn review(&self, query: &str) -> Option<Result<String>> {
        let key = self.parse_issue_key(query)?;
        Some(
            self.fetch_summary(&key)
                .map(|summary| self.format_review(&key, &summary)),
        )
    }
}
