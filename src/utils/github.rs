// code-hosting API access

use crate::error::{Error, Result};
use serde::Deserialize;

const FILES_PER_PAGE: usize = 100;
const USER_AGENT: &str = concat!("fragcheck/", env!("CARGO_PKG_VERSION"));

/// remote operations a check run needs from the code host
pub trait RepositoryHost {
    /// contents of `path` on the default branch of `repo` (`owner/name`)
    fn fetch_file(&self, repo: &str, path: &str) -> Result<String>;

    /// filenames changed by pull request `number`, in the order reported
    fn list_pull_request_files(&self, repo: &str, number: u64) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct PullRequestFile {
    filename: String,
}

/// blocking GitHub REST client
pub struct GitHubClient {
    agent: ureq::Agent,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    fn get(&self, url: &str, accept: &str) -> Result<ureq::http::Response<ureq::Body>> {
        tracing::debug!(url, "GET");

        let mut request = self
            .agent
            .get(url)
            .header("Accept", accept)
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request.call().map_err(|e| Error::from_api_error(url, e))
    }
}

impl RepositoryHost for GitHubClient {
    fn fetch_file(&self, repo: &str, path: &str) -> Result<String> {
        let url = format!("{}/repos/{}/contents/{}", self.api_url, repo, path);
        let mut response = self.get(&url, "application/vnd.github.raw")?;

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| Error::from_api_error(url, e))
    }

    fn list_pull_request_files(&self, repo: &str, number: u64) -> Result<Vec<String>> {
        let mut filenames = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/repos/{}/pulls/{}/files?per_page={}&page={}",
                self.api_url, repo, number, FILES_PER_PAGE, page
            );
            let mut response = self.get(&url, "application/vnd.github+json")?;
            let files: Vec<PullRequestFile> = response
                .body_mut()
                .read_json()
                .map_err(|e| Error::from_api_error(&url, e))?;

            let count = files.len();
            filenames.extend(files.into_iter().map(|f| f.filename));

            if count < FILES_PER_PAGE {
                break;
            }
            page += 1;
        }

        tracing::debug!(repo, number, files = filenames.len(), "listed pull request files");
        Ok(filenames)
    }
}
