use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "org-file-probe",
    about = "Print a file from every active repository of a GitHub organization",
    version
)]
pub struct Cli {
    /// GitHub user used for the organization listing
    #[arg(long, env = "USER_ID", hide_env_values = true)]
    pub user_id: Option<String>,

    /// Password or token for the GitHub user
    #[arg(long, env = "USER_PASSWORD", hide_env_values = true)]
    pub user_password: Option<String>,
}

/// Basic auth pair for the GitHub API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub password: String,
}

impl Cli {
    /// Both values must be present and non-empty.
    pub fn credentials(&self) -> Option<Credentials> {
        let user_id = self.user_id.as_deref().filter(|v| !v.is_empty())?;
        let password = self.user_password.as_deref().filter(|v| !v.is_empty())?;
        Some(Credentials {
            user_id: user_id.to_owned(),
            password: password.to_owned(),
        })
    }
}
