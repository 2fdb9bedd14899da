// trigger context for a single check run

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BOT_USERNAME: &str = "astropy-bot";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
const PULL_REQUEST_EVENT_PREFIX: &str = "pull_request";

/// every process input, gathered once at startup
#[derive(Debug, Clone)]
pub struct TriggerInput {
    pub event_name: String,
    pub event_path: Option<PathBuf>,
    pub bot_username: String,
    pub token: Option<String>,
    pub api_url: String,
    /// read the policy document from disk instead of the base repository
    pub config_file: Option<PathBuf>,
}

impl TriggerInput {
    pub fn new(event_name: impl Into<String>) -> Self {
        Self {
            event_name: event_name.into(),
            event_path: None,
            bot_username: DEFAULT_BOT_USERNAME.to_string(),
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            config_file: None,
        }
    }

    pub fn event_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.event_path = Some(path.into());
        self
    }

    pub fn bot_username(mut self, name: impl Into<String>) -> Self {
        self.bot_username = name.into();
        self
    }

    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    /// `pull_request`, `pull_request_target`, ...
    pub fn is_pull_request_event(&self) -> bool {
        self.event_name.starts_with(PULL_REQUEST_EVENT_PREFIX)
    }

    /// load the pull request described by the event payload file
    pub fn load_event(&self) -> Result<TriggerEvent> {
        let path = self.event_path.as_ref().ok_or_else(|| Error::MissingInput {
            name: "GITHUB_EVENT_PATH".to_string(),
        })?;
        TriggerEvent::from_payload_file(&self.event_name, path)
    }
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    number: u64,
    pull_request: PullRequestPayload,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    user: UserPayload,
    base: BasePayload,
    #[serde(default)]
    labels: Vec<LabelPayload>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    login: String,
}

#[derive(Debug, Deserialize)]
struct BasePayload {
    repo: RepoPayload,
}

#[derive(Debug, Deserialize)]
struct RepoPayload {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct LabelPayload {
    name: String,
}

/// the pull request this run was triggered for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    pub event_name: String,
    pub pr_number: u64,
    pub base_repo: String,
    pub author: String,
    pub labels: Vec<String>,
}

impl TriggerEvent {
    pub fn from_payload_file<P: AsRef<Path>>(event_name: &str, path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let payload: EventPayload =
            serde_json::from_str(&content).map_err(|e| Error::PayloadParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Self {
            event_name: event_name.to_string(),
            pr_number: payload.number,
            base_repo: payload.pull_request.base.repo.full_name,
            author: payload.pull_request.user.login,
            labels: payload
                .pull_request
                .labels
                .into_iter()
                .map(|l| l.name)
                .collect(),
        })
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}
