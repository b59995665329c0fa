use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::keybindings::KeybindingsConfig;
use crate::utils::paths::get_config_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Command invoked as `<helper_command> review <url>`. Defaults to
    /// this binary, which carries its own resolver.
    #[serde(default = "default_helper_command")]
    pub helper_command: String,

    #[serde(default = "default_theme")]
    pub theme: String,

    /// How long a status message stays visible, in milliseconds.
    #[serde(default = "default_message_timeout")]
    pub message_timeout: u64,

    #[serde(default)]
    pub services: ServicesConfig,

    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

fn default_helper_command() -> String {
    "revlink".to_string()
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_message_timeout() -> u64 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            helper_command: default_helper_command(),
            theme: default_theme(),
            message_timeout: default_message_timeout(),
            services: ServicesConfig::default(),
            keybindings: KeybindingsConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.keybindings = config.keybindings.merge_with_defaults();

        Ok(config)
    }
}

/// Service instances the `review` resolver knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default = "default_github_instances")]
    pub github: Vec<GithubConfig>,

    /// Jira and Confluence share one Atlassian site and credentials.
    #[serde(default)]
    pub atlassian: Option<AtlassianConfig>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            github: default_github_instances(),
            atlassian: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_github_url")]
    pub url: String,

    #[serde(default = "default_github_api_url")]
    pub api_url: String,

    /// Environment variable holding the API token.
    #[serde(default = "default_github_token_env")]
    pub token_env: String,
}

fn default_github_url() -> String {
    "https://github.com".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_github_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_github_instances() -> Vec<GithubConfig> {
    vec![GithubConfig {
        url: default_github_url(),
        api_url: default_github_api_url(),
        token_env: default_github_token_env(),
    }]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlassianConfig {
    /// Site base URL, e.g. "https://example.atlassian.net".
    pub url: String,

    #[serde(default = "default_atlassian_user_env")]
    pub user_env: String,

    #[serde(default = "default_atlassian_token_env")]
    pub token_env: String,
}

fn default_atlassian_user_env() -> String {
    "ATLASSIAN_ID".to_string()
}

fn default_atlassian_token_env() -> String {
    "ATLASSIAN_TOKEN".to_string()
}
