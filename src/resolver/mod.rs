pub mod confluence;
pub mod github;
pub mod jira;

use crate::config::ServicesConfig;
use anyhow::{Context, Result, anyhow, bail};
use reqwest::header::ACCEPT;
use std::env;
use tracing::debug;
use url::Url;

/// A service that can turn certain URLs into review strings.
pub trait UrlHandler {
    fn name(&self) -> &str;

    /// `None` when this handler does not recognize the query. `Some`
    /// once it claims the query, whether or not the lookup succeeds —
    /// a claimed query is never offered to later handlers.
    fn review(&self, query: &str) -> Option<Result<String>>;
}

/// Tries each configured handler in order; first match wins.
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn UrlHandler>>,
}

impl HandlerRegistry {
    pub fn from_config(services: &ServicesConfig) -> Result<Self> {
        let mut handlers: Vec<Box<dyn UrlHandler>> = Vec::new();

        for github in &services.github {
            handlers.push(Box::new(github::GithubHandler::from_config(github)?));
        }

        if let Some(atlassian) = &services.atlassian {
            handlers.push(Box::new(confluence::ConfluenceHandler::from_config(
                atlassian,
            )?));
            handlers.push(Box::new(jira::JiraHandler::from_config(atlassian)?));
        }

        Ok(Self { handlers })
    }

    pub fn review(&self, query: &str) -> Result<String> {
        for handler in &self.handlers {
            if let Some(result) = handler.review(query) {
                debug!(handler = handler.name(), query, "handler matched query");
                return result;
            }
        }
        Err(anyhow!("no handler for '{query}'"))
    }
}

/// How an API request authenticates. Credentials live in environment
/// variables and are only read by the real fetcher, at request time.
pub(crate) enum ApiAuth {
    /// Bearer token if the variable is set; anonymous otherwise.
    OptionalBearerEnv(String),
    /// Basic auth; both variables must be set.
    BasicEnv { user_env: String, token_env: String },
}

/// The HTTP seam of every handler: one authenticated GET returning the
/// raw response body. Tests substitute a fake to drive `review()`
/// without the network.
pub(crate) trait ApiFetch {
    fn get(&self, url: &Url, auth: &ApiAuth, accept: Option<&str>) -> Result<String>;
}

pub(crate) struct HttpFetch {
    client: reqwest::blocking::Client,
}

impl HttpFetch {
    pub(crate) fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("revlink/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl ApiFetch for HttpFetch {
    fn get(&self, url: &Url, auth: &ApiAuth, accept: Option<&str>) -> Result<String> {
        let mut request = self.client.get(url.clone());
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        request = match auth {
            ApiAuth::OptionalBearerEnv(token_env) => match env::var(token_env) {
                Ok(token) => request.bearer_auth(token),
                Err(_) => request,
            },
            ApiAuth::BasicEnv {
                user_env,
                token_env,
            } => {
                let user =
                    env::var(user_env).with_context(|| format!("{user_env} is not set"))?;
                let token =
                    env::var(token_env).with_context(|| format!("{token_env} is not set"))?;
                request.basic_auth(user, Some(token))
            }
        };

        let response = request
            .send()
            .with_context(|| format!("Request to {url} failed"))?;
        if !response.status().is_success() {
            bail!("{url} returned {}", response.status());
        }
        response.text().context("Failed to read response body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticHandler {
        prefix: &'static str,
        output: &'static str,
    }

    impl UrlHandler for StaticHandler {
        fn name(&self) -> &str {
            "static"
        }

        fn review(&self, query: &str) -> Option<Result<String>> {
            query
                .starts_with(self.prefix)
                .then(|| Ok(self.output.to_string()))
        }
    }

    #[test]
    fn test_first_matching_handler_wins() {
        let registry = HandlerRegistry {
            handlers: vec![
                Box::new(StaticHandler {
                    prefix: "https://a.example",
                    output: "from-a",
                }),
                Box::new(StaticHandler {
                    prefix: "https://",
                    output: "from-b",
                }),
            ],
        };

        assert_eq!(registry.review("https://a.example/x").unwrap(), "from-a");
        assert_eq!(registry.review("https://b.example/x").unwrap(), "from-b");
    }

    #[test]
    fn test_no_handler_is_an_error() {
        let registry = HandlerRegistry { handlers: vec![] };
        let err = registry.review("gopher://nowhere").unwrap_err();
        assert!(err.to_string().contains("no handler"));
    }
}
