//! Run command
//!
//! Collect the run settings, connect to Reddit and scrub old comments.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use scrub_core::comment::Comment;
use scrub_core::config::{Config, ScrubDefaults};
use scrub_core::error::ScrubError;
use scrub_core::platform::CommentPlatform;
use scrub_core::scrub::{
    CommentProcessor, InterruptFlag, Outcome, RunConfig, RunSummary, ScrubObserver, Throttle,
};
use scrub_reddit::RedditClient;

use super::GlobalOpts;

/// Typed confirmation required before a live run
const CONFIRMATION_WORD: &str = "YES";

/// Progress note cadence, in processed comments
const PROGRESS_EVERY: usize = 10;

const RULE_WIDTH: usize = 50;

/// Arguments for the run command
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Replacement text (skips the prompt)
    #[arg(long)]
    pub text: Option<String>,

    /// Only process comments older than this many days (skips the prompt)
    #[arg(long)]
    pub days: Option<u32>,

    /// Delete comments after editing them (skips the prompt)
    #[arg(long, conflicts_with = "keep")]
    pub delete: bool,

    /// Keep comments after editing them (skips the prompt)
    #[arg(long)]
    pub keep: bool,

    /// Preview only (skips the prompt)
    #[arg(long, conflicts_with = "live")]
    pub dry_run: bool,

    /// Make changes (skips the prompt)
    #[arg(long)]
    pub live: bool,

    /// Skip the typed confirmation before a live run
    #[arg(long, short)]
    pub yes: bool,
}

impl RunArgs {
    fn delete_after_edit(&self) -> Option<bool> {
        flag_pair(self.delete, self.keep)
    }

    fn dry_run(&self) -> Option<bool> {
        flag_pair(self.dry_run, self.live)
    }
}

fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Execute the run command
pub fn execute(args: RunArgs, opts: &GlobalOpts) -> Result<()> {
    let config = opts.load_config()?;

    print_banner(config.scrub.age_threshold_days);

    let run_config = collect_settings(&args, &config.scrub)?;

    if !run_config.is_dry_run() && !args.yes && !confirm_live(&run_config)? {
        println!("Operation cancelled.");
        return Ok(());
    }

    println!("\nConnecting to Reddit...");
    let client = connect(&config)?;
    println!(
        "{} Successfully authenticated as: {}",
        "✓".green(),
        client.identity().to_string().cyan()
    );

    let interrupt = InterruptFlag::new();
    register_interrupt(&interrupt)?;

    println!(
        "\n{}...",
        if run_config.is_dry_run() {
            "Starting DRY RUN"
        } else {
            "Starting processing"
        }
    );
    println!("Fetching all comments...");

    let processor = CommentProcessor::new(&client, run_config.clone())
        .with_throttle(Throttle::from_config(&config.throttle))
        .with_interrupt(interrupt);

    let mut observer = ConsoleObserver::new(&run_config);
    let summary = processor
        .run(&mut observer)
        .context("Could not fetch your comment history")?;
    observer.finish();

    print_summary(&summary);

    if summary.dry_run {
        println!(
            "Dry run complete. Run again with {} to actually make changes.",
            "--live".cyan()
        );
    }

    Ok(())
}

fn print_banner(threshold: u32) {
    println!("{}", "Reddit Comment Privacy Scrubber".bold());
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("\nThis tool will:");
    println!("1. Process comments from oldest to newest");
    println!("2. Delete any comments already edited to the replacement text");
    println!(
        "3. Leave recent comments ({} days or newer) completely untouched",
        threshold
    );
    println!("4. Edit older comments to remove content");
    println!("5. Optionally delete the edited older comments");
    println!("\n{}", "This action cannot be undone!".red().bold());
}

/// Prompt for anything not given on the command line
fn collect_settings(args: &RunArgs, defaults: &ScrubDefaults) -> Result<RunConfig> {
    use dialoguer::{Confirm, Input};

    let answer = match &args.text {
        Some(text) => text.clone(),
        None => Input::<String>::new()
            .with_prompt("Enter replacement text")
            .default(defaults.replacement_text.clone())
            .interact_text()?,
    };
    let replacement_text = resolve_text(&answer, &defaults.replacement_text);

    let age_threshold_days = match args.days {
        Some(days) => days,
        None => {
            let input = Input::<String>::new()
                .with_prompt("Only process comments older than X days")
                .default(defaults.age_threshold_days.to_string())
                .interact_text()?;
            parse_days(&input, defaults.age_threshold_days)
        }
    };

    let delete_after_edit = match args.delete_after_edit() {
        Some(delete) => delete,
        None => Confirm::new()
            .with_prompt("Delete comments after editing?")
            .default(defaults.delete_after_edit)
            .interact()?,
    };

    let dry_run = match args.dry_run() {
        Some(dry_run) => dry_run,
        None => Confirm::new()
            .with_prompt("Do a dry run first?")
            .default(defaults.dry_run)
            .interact()?,
    };

    let run_config = RunConfig::new(replacement_text, age_threshold_days)?
        .delete_after_edit(delete_after_edit)
        .dry_run(dry_run);
    Ok(run_config)
}

/// Trimmed answer, or the default when the answer is blank
fn resolve_text(answer: &str, default: &str) -> String {
    match answer.trim() {
        "" => default.trim().to_string(),
        text => text.to_string(),
    }
}

/// Non-numeric input falls back to the default
fn parse_days(input: &str, default: u32) -> u32 {
    input.trim().parse().unwrap_or(default)
}

fn confirm_live(run_config: &RunConfig) -> Result<bool> {
    use dialoguer::Input;

    println!("\n{}", "Settings:".bold());
    println!("- Replacement text: '{}'", run_config.replacement_text());
    println!(
        "- Process comments older than: {} days",
        run_config.age_threshold_days()
    );
    println!("- Delete after edit: {}", run_config.deletes_after_edit());

    let answer = Input::<String>::new()
        .with_prompt(format!(
            "Are you SURE you want to proceed? Type '{}' to confirm",
            CONFIRMATION_WORD
        ))
        .allow_empty(true)
        .interact_text()?;

    Ok(is_confirmed(&answer))
}

fn is_confirmed(answer: &str) -> bool {
    answer.trim() == CONFIRMATION_WORD
}

/// Authenticate, printing setup guidance on failure
pub(crate) fn connect(config: &Config) -> Result<RedditClient> {
    RedditClient::authenticate(&config.reddit).map_err(|err| {
        print_setup_help(&err);
        anyhow::Error::new(err).context("Could not connect to Reddit")
    })
}

fn print_setup_help(err: &ScrubError) {
    eprintln!("\n{} Fatal error: {}", "✗".red(), err);
    eprintln!("\nMake sure you have:");
    eprintln!("1. Created a \"script\" app at https://www.reddit.com/prefs/apps");
    eprintln!(
        "2. Put its client id and secret plus your username and password in the config file ({})",
        "comment-scrub config init".cyan()
    );
    eprintln!("   or in REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET, REDDIT_USERNAME, REDDIT_PASSWORD");
    eprintln!("3. Entered your credentials correctly");
}

/// First Ctrl-C stops after the current comment; a second one exits immediately
fn register_interrupt(interrupt: &InterruptFlag) -> Result<()> {
    use signal_hook::consts::SIGINT;
    use signal_hook::flag;

    flag::register_conditional_shutdown(SIGINT, 1, interrupt.handle())
        .context("Failed to install Ctrl-C handler")?;
    flag::register(SIGINT, interrupt.handle()).context("Failed to install Ctrl-C handler")?;
    Ok(())
}

/// Renders per-comment progress to the terminal
struct ConsoleObserver {
    threshold: u32,
    progress: Option<ProgressBar>,
    processed: usize,
    changed: usize,
}

impl ConsoleObserver {
    fn new(run_config: &RunConfig) -> Self {
        Self {
            threshold: run_config.age_threshold_days(),
            progress: None,
            processed: 0,
            changed: 0,
        }
    }

    /// Count a handled comment; returns the progress note when one is due
    fn tally(&mut self, outcome: &Outcome) -> Option<String> {
        if outcome.mutated() {
            self.changed += 1;
        }
        if outcome.is_skipped() {
            return None;
        }

        self.processed += 1;
        (self.processed % PROGRESS_EVERY == 0)
            .then(|| format!("\n--- Processed {} comments so far ---\n", self.processed))
    }

    /// Print above the progress bar, or plainly when there is none
    fn line(&self, text: String) {
        match &self.progress {
            Some(bar) => bar.suspend(|| println!("{}", text)),
            None => println!("{}", text),
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.progress.take() {
            bar.finish_and_clear();
        }
    }
}

impl ScrubObserver for ConsoleObserver {
    fn on_fetched(&mut self, total: usize) {
        println!("Found {} total comments", total.to_string().cyan());

        if !console::Term::stderr().features().is_attended() {
            return;
        }

        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
            bar.set_style(style);
        }
        self.progress = Some(bar);
    }

    fn on_comment(&mut self, comment: &Comment, outcome: &Outcome) {
        self.line(describe(comment, outcome, self.threshold));

        let note = self.tally(outcome);
        if let Some(bar) = &self.progress {
            bar.inc(1);
            bar.set_message(format!("{} changed", self.changed));
        }
        if let Some(note) = note {
            self.line(note);
        }
    }

    fn on_failure(&mut self, comment: &Comment, error: &ScrubError) {
        self.line(format!(
            "{} Error processing comment {}: {}",
            "✗".red(),
            comment.id,
            error
        ));
        if let Some(bar) = &self.progress {
            bar.inc(1);
        }
    }

    fn on_interrupted(&mut self, visited: usize) {
        self.line(format!(
            "\n\n{} after {} comments",
            "Interrupted by user".yellow(),
            visited
        ));
    }
}

/// One console line per comment
fn describe(comment: &Comment, outcome: &Outcome, threshold: u32) -> String {
    let forum = format!("r/{}", comment.forum);
    match outcome {
        Outcome::CleanedUp => format!(
            "{} Deleted previously edited comment {}",
            "✓".green(),
            comment.id
        ),
        Outcome::WouldCleanUp => format!(
            "{} Would delete previously edited comment {}",
            "[DRY RUN]".yellow(),
            comment.id
        ),
        Outcome::Skipped { age_days } => format!(
            "{} Skipping {} (only {} days old, threshold is {})",
            "•".dimmed(),
            comment.id,
            age_days,
            threshold
        ),
        Outcome::Edited { .. } | Outcome::EditedAndDeleted { .. } => format!(
            "{} {} {} {}: {}",
            "✓".green(),
            comment.id,
            forum.dimmed(),
            outcome,
            comment.preview().dimmed()
        ),
        Outcome::WouldEdit { .. } => format!(
            "{} {} {} {}: {}",
            "[DRY RUN]".yellow(),
            comment.id,
            forum.dimmed(),
            outcome,
            comment.preview().dimmed()
        ),
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    for line in summary_lines(summary) {
        println!("{}", line);
    }
    println!();
}

/// Final report, one entry per console line
fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let stats = &summary.stats;
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![rule.clone()];

    if summary.interrupted {
        lines.push("Processing interrupted!".yellow().bold().to_string());
    } else {
        lines.push("Processing complete!".green().bold().to_string());
    }
    lines.push(format!("Total comments found: {}", summary.total_fetched));
    if summary.interrupted {
        lines.push(format!(
            "Comments considered: {} ({} not reached)",
            summary.considered(),
            summary.remaining()
        ));
    }
    lines.push(format!("Comments processed: {}", stats.processed));
    lines.push(format!("Comments skipped (too recent): {}", stats.skipped));
    if summary.dry_run {
        lines.push(format!("Comments that would be processed: {}", stats.processed));
    } else {
        lines.push(format!("Comments edited: {}", stats.edited));
        lines.push(format!("Comments deleted: {}", stats.deleted));
        if stats.cleaned_up > 0 {
            lines.push(format!("  - Previously edited: {}", stats.cleaned_up));
            lines.push(format!("  - Newly processed: {}", stats.newly_deleted()));
        }
    }
    let failed = stats.failed.to_string();
    let failed = if stats.failed > 0 {
        failed.red()
    } else {
        failed.normal()
    };
    lines.push(format!("Failed: {}", failed));
    lines.push(rule);
    lines
}
