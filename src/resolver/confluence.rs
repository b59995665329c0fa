use crate::config::AtlassianConfig;
use crate::resolver::{ApiAuth, ApiFetch, HttpFetch, UrlHandler};
use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

/// Resolves Confluence pages by numeric page id, from
/// `<base>/wiki/spaces/<space>/pages/<id>/...` links.
pub struct ConfluenceHandler {
    base: Url,
    user_env: String,
    token_env: String,
    fetch: Box<dyn ApiFetch>,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    title: String,
    #[serde(rename = "_links")]
    links: PageLinks,
}

#[derive(Debug, Deserialize)]
struct PageLinks {
    base: String,
    webui: String,
}

impl ConfluenceHandler {
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

    fn parse_page_id(&self, query: &str) -> Option<String> {
        let url = Url::parse(query).ok()?;
        if url.host_str() != self.base.host_str() {
            return None;
        }
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        let id = match segments.as_slice() {
            ["wiki", "spaces", _, "pages", id, ..] => id,
            [id] => id,
            _ => return None,
        };
        (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then(|| id.to_string())
    }

    fn fetch_page(&self, page_id: &str) -> Result<PageResponse> {
        let endpoint = self.base.join(&format!("/wiki/rest/api/content/{page_id}"))?;
        let auth = ApiAuth::BasicEnv {
            user_env: self.user_env.clone(),
            token_env: self.token_env.clone(),
        };

        let body = self.fetch.get(&endpoint, &auth, None)?;
        serde_json::from_str(&body).context("Failed to parse Confluence API response")
    }

    fn format_review(page: &PageResponse) -> String {
        let link = format!("{}{}", page.links.base, page.links.webui);
        format!("[[{link}|Confluence >> {}]]", page.title)
    }
}

impl UrlHandler for ConfluenceHandler {
    fn name(&self) -> &str {
        "confluence"
    }

    fn review(&self, query: &str) -> Option<Result<String>> {
        let page_id = self.parse_page_id(query)?;
        Some(self.fetch_page(&page_id).map(|page| Self::format_review(&page)))
    }
}
