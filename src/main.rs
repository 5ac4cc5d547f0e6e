use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result as AnyhowResult;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod check;
mod cli;
mod gh_api;
mod probe;
#[cfg(test)]
mod test_server;

use crate::{
    check::Summary,
    cli::{Cli, Credentials},
    gh_api::{GITHUB_API, GitHubSource, RepoSource},
    probe::{ContentProbe, RAW_CONTENT_HOST, RawContentProbe},
};

const ORG: &str = "nodejs";
const PROBED_FILE: &str = ".travis.yml";

const MISSING_CREDENTIALS: &str = "You must set USER_ID and USER_PASSWORD in the environment";

/// -1 as seen by the shell.
const EXIT_PROBE_FAILED: u8 = 255;
/// -2 as seen by the shell.
const EXIT_ERROR: u8 = 254;

#[derive(Debug)]
enum Outcome {
    MissingCredentials,
    Finished(Summary),
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("org_file_probe=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();

    match run(&cli, connect, &mut stdout).await {
        Ok(Outcome::Finished(summary)) if summary.failed() => {
            eprintln!(
                "{} of the probes failed for reasons other than a missing file",
                summary.probe_failures.to_string().red()
            );
            ExitCode::from(EXIT_PROBE_FAILED)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:?}", "error:".red(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn connect(credentials: &Credentials) -> AnyhowResult<(GitHubSource, RawContentProbe)> {
    let source = GitHubSource::new(credentials, GITHUB_API)?;
    let probe = RawContentProbe::new(RAW_CONTENT_HOST, PROBED_FILE)?;
    Ok((source, probe))
}

/// Clients are only built once both credentials are known, so a missing
/// variable never reaches the network.
async fn run<S, P, F, W>(cli: &Cli, connect: F, out: &mut W) -> AnyhowResult<Outcome>
where
    S: RepoSource,
    P: ContentProbe,
    F: FnOnce(&Credentials) -> AnyhowResult<(S, P)>,
    W: Write,
{
    let Some(credentials) = cli.credentials() else {
        writeln!(out, "{MISSING_CREDENTIALS}")?;
        return Ok(Outcome::MissingCredentials);
    };

    let (source, probe) = connect(&credentials)?;
    let summary = check::check_repos(&source, &probe, ORG, out).await?;
    Ok(Outcome::Finished(summary))
}
