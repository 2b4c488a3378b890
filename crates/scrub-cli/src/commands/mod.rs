//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod config;
pub mod run;
pub mod whoami;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use scrub_core::config::Config;
use std::path::PathBuf;

/// comment-scrub - overwrite and delete your old Reddit comments
#[derive(Debug, Parser)]
#[command(name = "comment-scrub")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Credential overrides, usually supplied through the environment
#[derive(Debug, Default, Clone, Args)]
pub struct CredentialArgs {
    /// Reddit script app client id
    #[arg(long, global = true, env = "REDDIT_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Reddit script app client secret
    #[arg(long, global = true, env = "REDDIT_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Reddit username
    #[arg(long, global = true, env = "REDDIT_USERNAME")]
    pub username: Option<String>,

    /// Reddit password
    #[arg(long, global = true, env = "REDDIT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// User agent sent to Reddit
    #[arg(long, global = true, env = "REDDIT_USER_AGENT")]
    pub user_agent: Option<String>,
}

impl CredentialArgs {
    /// Overlay any provided values onto the loaded config
    pub fn apply(&self, config: &mut Config) {
        let reddit = &mut config.reddit;
        if let Some(v) = &self.client_id {
            reddit.client_id = v.clone();
        }
        if let Some(v) = &self.client_secret {
            reddit.client_secret = v.clone();
        }
        if let Some(v) = &self.username {
            reddit.username = v.clone();
        }
        if let Some(v) = &self.password {
            reddit.password = v.clone();
        }
        if let Some(v) = &self.user_agent {
            reddit.user_agent = Some(v.clone());
        }
    }
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scrub old comments (default)
    Run(run::RunArgs),

    /// Check credentials and print the account name
    Whoami,

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOpts {
    pub config_path: PathBuf,
    pub credentials: CredentialArgs,
}

impl GlobalOpts {
    /// Load the config file (defaults when absent) with credential overrides applied
    pub fn load_config(&self) -> Result<Config> {
        tracing::debug!("Loading config from {:?}", self.config_path);
        let mut config = Config::load_or_default(&self.config_path)
            .with_context(|| format!("Invalid configuration at {}", self.config_path.display()))?;
        self.credentials.apply(&mut config);
        Ok(config)
    }
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let opts = GlobalOpts {
        config_path: cli.config.clone().unwrap_or_else(default_config_path),
        credentials: cli.credentials.clone(),
    };

    // Dispatch to command handler
    match cli.command {
        Some(Commands::Run(args)) => run::execute(args, &opts),
        Some(Commands::Whoami) => whoami::execute(&opts),
        Some(Commands::Config(cmd)) => config::execute(cmd, &opts),
        None => run::execute(run::RunArgs::default(), &opts),
    }
}

/// Platform config location (e.g. ~/.config/comment-scrub/config.toml)
pub fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("com", "comment-scrub", "comment-scrub")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".comment-scrub")
        })
        .join("config.toml")
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["comment-scrub"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_credential_overrides_apply() {
        let mut config = Config::default();
        config.reddit.username = "from-file".to_string();
        let args = CredentialArgs {
            username: Some("from-env".to_string()),
            password: Some("pw".to_string()),
            ..CredentialArgs::default()
        };

        args.apply(&mut config);
        assert_eq!(config.reddit.username, "from-env");
        assert_eq!(config.reddit.password, "pw");
        assert!(config.reddit.client_id.is_empty());
    }

    #[test]
    fn test_default_config_path_file_name() {
        assert!(default_config_path().ends_with("config.toml"));
    }
}
