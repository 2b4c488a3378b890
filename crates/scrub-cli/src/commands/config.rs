//! Config command
//!
//! Manage comment-scrub configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use scrub_core::config::CONFIG_TEMPLATE;
use std::fs;
use std::path::Path;

use super::GlobalOpts;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets masked)
    Show,

    /// Write a configuration template
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, opts: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show_config(opts),
        ConfigCommand::Init { force } => init_config(&opts.config_path, force),
        ConfigCommand::Path => {
            println!("{}", opts.config_path.display());
            Ok(())
        }
    }
}

fn show_config(opts: &GlobalOpts) -> Result<()> {
    let mut config = opts.load_config()?;
    config.reddit = config.reddit.redacted();

    println!("{}", "Configuration:".bold().underline());
    if opts.config_path.exists() {
        println!("{}", opts.config_path.display().to_string().dimmed());
    } else {
        println!(
            "{} {} (not found, showing defaults; run '{}' to create)",
            "⚠".yellow(),
            opts.config_path.display(),
            "comment-scrub config init".cyan()
        );
    }
    println!();
    println!("{}", config.to_toml()?);

    match config.reddit.validate_credentials() {
        Ok(()) => println!("{} Credentials present", "✓".green()),
        Err(e) => println!("{} {}", "⚠".yellow(), e),
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", path.display()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Init cancelled.");
            return Ok(());
        }
    }

    write_template(path)?;

    println!(
        "{} Wrote configuration template to {}",
        "✓".green(),
        path.display()
    );
    println!(
        "Fill in your Reddit app credentials, then run '{}'.",
        "comment-scrub whoami".cyan()
    );

    Ok(())
}

/// Write the template, backing up any existing file first
fn write_template(path: &Path) -> Result<()> {
    if path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
