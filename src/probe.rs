use anyhow::{Context as _, Result as AnyhowResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

pub const RAW_CONTENT_HOST: &str = "https://raw.githubusercontent.com";

/// `HEAD` resolves to the repository's default branch.
pub const DEFAULT_REF: &str = "HEAD";

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug)]
pub enum ProbeOutcome {
    Found(String),
    /// The file does not exist on the default branch (404).
    Absent,
    Failed(ProbeError),
}

/// Fetches one file from one repository.
#[async_trait]
pub trait ContentProbe: Send + Sync {
    async fn probe(&self, org: &str, repo: &str) -> ProbeOutcome;
}

pub fn raw_url(host: &str, org: &str, repo: &str, path: &str) -> String {
    format!("{host}/{org}/{repo}/{DEFAULT_REF}/{path}")
}

/// Unauthenticated GET against the raw-content CDN.
pub struct RawContentProbe {
    client: reqwest::Client,
    host: String,
    path: String,
}

impl RawContentProbe {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> AnyhowResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .with_context(|| "Failed to create HTTP client")?;
        Ok(Self {
            client,
            host: host.into(),
            path: path.into(),
        })
    }
}

#[async_trait]
impl ContentProbe for RawContentProbe {
    async fn probe(&self, org: &str, repo: &str) -> ProbeOutcome {
        let url = raw_url(&self.host, org, repo, &self.path);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(source) => return ProbeOutcome::Failed(ProbeError::Transport { url, source }),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return ProbeOutcome::Absent;
        }
        if !status.is_success() {
            return ProbeOutcome::Failed(ProbeError::Status { url, status });
        }

        match response.text().await {
            Ok(body) => ProbeOutcome::Found(body),
            Err(source) => ProbeOutcome::Failed(ProbeError::Body { url, source }),
        }
    }
}
