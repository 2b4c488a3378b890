//! comment-scrub - Reddit comment history scrubber
//!
//! Overwrites your comments older than a threshold with placeholder text,
//! optionally deletes them, and cleans up leftovers from earlier runs.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a config template and fill in your script app credentials
//! comment-scrub config init
//!
//! # Check the credentials
//! comment-scrub whoami
//!
//! # Preview, then scrub
//! comment-scrub run --dry-run
//! comment-scrub run --live
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
