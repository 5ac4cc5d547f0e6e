use std::io::Write;
use std::pin::pin;

use anyhow::{Context as _, Result as AnyhowResult};
use futures::TryStreamExt;
use tracing::{debug, info, warn};

use crate::gh_api::{RepoSource, org_pages};
use crate::probe::{ContentProbe, ProbeOutcome};

pub const DELIMITER: &str =
    "====================================================================";

/// Counters for one run over an organization.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub pages: u32,
    pub repos: usize,
    pub archived: usize,
    pub found: usize,
    pub probe_failures: usize,
}

impl Summary {
    /// A probe failed for a reason other than the file being absent.
    pub fn failed(&self) -> bool {
        self.probe_failures > 0
    }
}

/// Walks every page of `org`, probes each active repository and writes one
/// block to `out` per file found.
pub async fn check_repos<S, P, W>(
    source: &S,
    probe: &P,
    org: &str,
    out: &mut W,
) -> AnyhowResult<Summary>
where
    S: RepoSource + ?Sized,
    P: ContentProbe + ?Sized,
    W: Write,
{
    let mut summary = Summary::default();
    let mut pages = pin!(org_pages(source, org));

    while let Some(page) = pages.try_next().await? {
        summary.pages += 1;
        for repo in page {
            summary.repos += 1;
            if repo.archived {
                debug!(repo = %repo.name, "skipping archived repository");
                summary.archived += 1;
                continue;
            }

            match probe.probe(org, &repo.name).await {
                ProbeOutcome::Found(body) => {
                    write_block(out, &repo.name, &body)
                        .with_context(|| format!("Failed to write report for {}", repo.name))?;
                    summary.found += 1;
                }
                ProbeOutcome::Absent => debug!(repo = %repo.name, "file not present"),
                ProbeOutcome::Failed(e) => {
                    warn!(repo = %repo.name, error = %e, "probe failed");
                    summary.probe_failures += 1;
                }
            }
        }
    }

    info!(
        org,
        pages = summary.pages,
        repos = summary.repos,
        archived = summary.archived,
        found = summary.found,
        failures = summary.probe_failures,
        "finished"
    );
    Ok(summary)
}

pub fn write_block<W: Write>(out: &mut W, repo: &str, body: &str) -> std::io::Result<()> {
    writeln!(out, "{DELIMITER}")?;
    writeln!(out, "REPO:{repo}")?;
    writeln!(out, "--")?;
    writeln!(out, "{body}")?;
    writeln!(out, "{DELIMITER}")
}
