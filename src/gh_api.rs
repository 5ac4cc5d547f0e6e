use anyhow::{Context as _, Result as AnyhowResult};
use async_trait::async_trait;
use futures::{Stream, stream};
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::Credentials;

pub const GITHUB_API: &str = "https://api.github.com";

/// GitHub pages are 1-based.
pub const FIRST_PAGE: u32 = 1;

/// The two fields of a repository listing entry this tool looks at.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RepoRecord {
    pub name: String,
    pub archived: bool,
}

/// One page of an organization's repository listing.
#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn list_page(&self, org: &str, page: u32) -> AnyhowResult<Vec<RepoRecord>>;
}

#[derive(Serialize)]
struct PageParams {
    page: u32,
}

/// Lists repositories through the REST API. Basic auth gets the higher
/// authenticated rate limit. Failed requests are not retried.
pub struct GitHubSource {
    crab: Octocrab,
}

impl GitHubSource {
    pub fn new(credentials: &Credentials, base_uri: &str) -> AnyhowResult<Self> {
        let crab = Octocrab::builder()
            .basic_auth(credentials.user_id.clone(), credentials.password.clone())
            .add_retry_config(RetryConfig::None)
            .base_uri(base_uri)
            .with_context(|| format!("Invalid GitHub API base URI: {base_uri}"))?
            .build()
            .with_context(|| "Failed to create Octocrab instance")?;
        Ok(Self { crab })
    }
}

#[async_trait]
impl RepoSource for GitHubSource {
    async fn list_page(&self, org: &str, page: u32) -> AnyhowResult<Vec<RepoRecord>> {
        let route = format!("/orgs/{org}/repos");
        let repos: Vec<RepoRecord> = self
            .crab
            .get(&route, Some(&PageParams { page }))
            .await
            .with_context(|| format!("Failed to list repositories of {org} (page {page})"))?;
        Ok(repos)
    }
}

/// Streams the pages of `org` starting at page 1 and stops at the first
/// empty page. An error ends the stream.
pub fn org_pages<'a, S>(
    source: &'a S,
    org: &'a str,
) -> impl Stream<Item = AnyhowResult<Vec<RepoRecord>>> + 'a
where
    S: RepoSource + ?Sized,
{
    stream::try_unfold(FIRST_PAGE, move |page| async move {
        let repos = source.list_page(org, page).await?;
        debug!(org, page, count = repos.len(), "fetched repository page");
        let next = (!repos.is_empty()).then(|| (repos, page + 1));
        Ok::<_, anyhow::Error>(next)
    })
}
