//! Whoami command
//!
//! Verify credentials without touching any comment.

use anyhow::Result;
use colored::Colorize;
use scrub_core::platform::CommentPlatform;

use super::run::connect;
use super::GlobalOpts;

/// Execute the whoami command
pub fn execute(opts: &GlobalOpts) -> Result<()> {
    let config = opts.load_config()?;

    println!("Connecting to Reddit...");
    let client = connect(&config)?;

    println!(
        "{} Successfully authenticated as: {}",
        "✓".green(),
        client.identity().to_string().cyan()
    );
    Ok(())
}
