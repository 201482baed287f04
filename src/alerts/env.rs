use std::env;

use anyhow::{Context, Result};
use log::debug;

pub const GITHUB_API: &str = "https://api.github.com";
pub const ASANA_API: &str = "https://app.asana.com/api/1.0";

#[derive(Debug, Clone, PartialEq)]
pub struct GitHubSettings {
    pub api: String,
    /// `owner/name`
    pub repo: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AsanaSettings {
    pub api: String,
    pub token: String,
    pub project: String,
    pub workspace: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncSettings {
    pub github: GitHubSettings,
    pub asana: AsanaSettings,
}

impl SyncSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|x| !x.trim().is_empty())
                .with_context(|| format!("Missing {key} environment variable"))
        };
        let optional = |key: &str| lookup(key).filter(|x| !x.trim().is_empty());

        let settings = Self {
            github: GitHubSettings {
                api: optional("GITHUB_API_URL").unwrap_or_else(|| GITHUB_API.to_string()),
                repo: required("REPO_NAME")?,
                token: required("DEPENDABOT")?,
            },
            asana: AsanaSettings {
                api: optional("ASANA_API_URL").unwrap_or_else(|| ASANA_API.to_string()),
                token: required("ASANA_PAT")?,
                project: required("ASANA_PROJECT_ID")?,
                workspace: optional("ASANA_WORKSPACE_ID"),
            },
        };
        debug!(
            "Syncing {} via {} into project {} via {}",
            settings.github.repo, settings.github.api, settings.asana.project, settings.asana.api
        );
        Ok(settings)
    }
}
