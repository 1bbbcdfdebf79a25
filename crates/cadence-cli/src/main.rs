//! Cadence CLI
//!
//! Command-line interface for the vocabulary scheduling engine.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use cadence_core::{
    EngineConfig, NewItem, NewLearner, OrderingStrategy, Outcome, PolicyKind, Storage,
    StudyCandidate, Transition, ONE_DAY,
};

/// Cadence - vocabulary spaced repetition
#[derive(Parser)]
#[command(name = "cadence")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CLI for the Cadence vocabulary scheduling engine")]
#[command(long_about = "Cadence schedules vocabulary review with cooling intervals.\n\nCorrect answers push a word further out, mistakes bring it closer, and mastered words leave the queue.")]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for CADENCE_POLICY / CADENCE_DATA_DIR
#[derive(Args)]
struct EngineArgs {
    /// Scheduling policy: baseline or leveled
    #[arg(long, global = true)]
    policy: Option<PolicyKind>,

    /// Directory holding cadence.db
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage learners
    #[command(subcommand)]
    Learner(LearnerCommands),

    /// Manage vocabulary items
    #[command(subcommand)]
    Item(ItemCommands),

    /// Record a practice outcome for an item
    Submit {
        learner_id: String,
        item_id: String,
        /// correct, incorrect or feedback (never show again)
        outcome: Outcome,
    },

    /// Show the study queue
    Queue {
        learner_id: String,
        /// Maximum number of items
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Ordering: rank-first or interval-first
        #[arg(long, default_value = "rank-first")]
        strategy: OrderingStrategy,
    },

    /// Show every scheduled item of a learner
    Snapshot {
        learner_id: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show pipeline statistics
    Stats { learner_id: String },

    /// Assign levels to scheduled items created before leveled scheduling
    MigrateLevels { learner_id: String },

    /// Remove an item's schedule so it is practised from scratch
    Clear { item_id: String },
}

#[derive(Subcommand)]
enum LearnerCommands {
    /// Register a learner
    Add {
        name: String,
        /// Language being learned (e.g. "da")
        language: String,
        /// Start with productive exercises turned off
        #[arg(long)]
        receptive_only: bool,
    },

    /// Turn productive exercises on or off
    Productive {
        learner_id: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Save a word for a learner
    Add {
        learner_id: String,
        word: String,
        /// Language of the word
        language: String,
        #[arg(long)]
        translation: Option<String>,
        /// Frequency rank (1 = most common)
        #[arg(long)]
        rank: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let storage = open_storage(&cli.engine)?;

    match cli.command {
        Commands::Learner(LearnerCommands::Add {
            name,
            language,
            receptive_only,
        }) => run_learner_add(&storage, name, language, !receptive_only),
        Commands::Learner(LearnerCommands::Productive {
            learner_id,
            enabled,
        }) => run_learner_productive(&storage, &learner_id, enabled),
        Commands::Item(ItemCommands::Add {
            learner_id,
            word,
            language,
            translation,
            rank,
        }) => run_item_add(&storage, learner_id, word, language, translation, rank),
        Commands::Submit {
            learner_id,
            item_id,
            outcome,
        } => run_submit(&storage, &learner_id, &item_id, outcome),
        Commands::Queue {
            learner_id,
            limit,
            strategy,
        } => run_queue(&storage, &learner_id, limit, strategy),
        Commands::Snapshot { learner_id, json } => run_snapshot(&storage, &learner_id, json),
        Commands::Stats { learner_id } => run_stats(&storage, &learner_id),
        Commands::MigrateLevels { learner_id } => run_migrate_levels(&storage, &learner_id),
        Commands::Clear { item_id } => run_clear(&storage, &item_id),
    }
}

/// Environment first, then command-line overrides
fn open_storage(args: &EngineArgs) -> anyhow::Result<Storage> {
    let mut config = EngineConfig::from_env();
    if let Some(policy) = args.policy {
        config = config.with_policy(policy);
    }
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }
    Storage::open(&config).context("Failed to open storage")
}

fn run_learner_add(
    storage: &Storage,
    name: String,
    language: String,
    productive: bool,
) -> anyhow::Result<()> {
    let learner =
        storage.add_learner(NewLearner::new(name, language).with_productive_exercises(productive))?;

    println!("{}", "Learner registered".green().bold());
    println!("{}: {}", "ID".white().bold(), learner.id);
    println!("{}: {}", "Name".white().bold(), learner.name);
    println!("{}: {}", "Language".white().bold(), learner.learned_language);
    println!(
        "{}: {}",
        "Productive".white().bold(),
        on_off(learner.productive_exercises_enabled)
    );
    Ok(())
}

fn run_learner_productive(storage: &Storage, learner_id: &str, enabled: bool) -> anyhow::Result<()> {
    let learner = storage.set_productive_exercises(learner_id, enabled)?;
    println!(
        "Productive exercises for {} are now {}",
        learner.name.white().bold(),
        on_off(learner.productive_exercises_enabled)
    );
    Ok(())
}

fn run_item_add(
    storage: &Storage,
    learner_id: String,
    word: String,
    language: String,
    translation: Option<String>,
    rank: Option<u32>,
) -> anyhow::Result<()> {
    let mut input = NewItem::new(learner_id, word, language);
    if let Some(translation) = translation {
        input = input.with_translation(translation);
    }
    if let Some(rank) = rank {
        input = input.with_rank(rank);
    }
    let item = storage.add_item(input)?;

    println!("{}", "Item saved".green().bold());
    println!("{}: {}", "ID".white().bold(), item.id);
    println!("{}: {}", "Word".white().bold(), item.word);
    Ok(())
}

fn run_submit(storage: &Storage, learner_id: &str, item_id: &str, outcome: Outcome) -> anyhow::Result<()> {
    let transition = storage.submit_outcome(learner_id, item_id, outcome)?;

    let summary = match &transition {
        Transition::Ignored => "not due yet, nothing changed".dimmed().to_string(),
        Transition::Dropped => "removed from exercises".yellow().to_string(),
        Transition::Advanced {
            cooling_interval,
            next_practice_time,
        } => format!(
            "{} (next {} after {})",
            "advanced".green(),
            next_practice_time.format("%Y-%m-%d %H:%M"),
            format_interval(*cooling_interval)
        ),
        Transition::Regressed {
            cooling_interval,
            next_practice_time,
        } => format!(
            "{} (next {} after {})",
            "stepped back".red(),
            next_practice_time.format("%Y-%m-%d %H:%M"),
            format_interval(*cooling_interval)
        ),
        Transition::Promoted { progress } => {
            format!("{} to {}", "promoted".cyan().bold(), progress)
        }
        Transition::Learned => "learned!".green().bold().to_string(),
    };

    println!("{}: {}", outcome.to_string().white().bold(), summary);
    Ok(())
}

fn run_queue(
    storage: &Storage,
    learner_id: &str,
    limit: usize,
    strategy: OrderingStrategy,
) -> anyhow::Result<()> {
    let queue = storage.study_queue(learner_id, Some(limit), strategy, Utc::now())?;

    println!(
        "{}",
        format!("=== Study Queue ({}) ===", strategy).cyan().bold()
    );
    println!();

    if queue.is_empty() {
        println!("{}", "Nothing to study right now.".dimmed());
        return Ok(());
    }

    for (i, candidate) in queue.iter().enumerate() {
        println!(
            "{:>3}. {:<24} {:>8} {}",
            i + 1,
            candidate.item.word.white().bold(),
            format_rank(candidate),
            format_state(candidate)
        );
    }
    Ok(())
}

fn run_snapshot(storage: &Storage, learner_id: &str, json: bool) -> anyhow::Result<()> {
    let entries = storage.schedule_snapshot(learner_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "=== Schedule ===".cyan().bold());
    println!();

    if entries.is_empty() {
        println!("{}", "No scheduled items.".dimmed());
        return Ok(());
    }

    let policy = storage.policy().kind();
    for entry in &entries {
        let progress = match policy {
            PolicyKind::Baseline => entry.learning_cycle.to_string(),
            PolicyKind::Leveled => format!("level {}", entry.level),
        };
        println!(
            "{:<24} {}  {:>6}  {:>2} in a row  {}",
            entry.word.white().bold(),
            entry.next_practice_time.format("%Y-%m-%d %H:%M"),
            format_interval(entry.cooling_interval),
            entry.consecutive_correct,
            progress.dimmed()
        );
    }
    Ok(())
}

fn run_stats(storage: &Storage, learner_id: &str) -> anyhow::Result<()> {
    let learner = storage
        .get_learner(learner_id)?
        .with_context(|| format!("Unknown learner {}", learner_id))?;
    let stats = storage.pipeline_stats(learner_id, Utc::now())?;
    let table = storage.policy().intervals();

    println!(
        "{}",
        format!("=== {} ({}) ===", learner.name, learner.learned_language)
            .cyan()
            .bold()
    );
    println!();
    println!("{}: {}", "Policy".white().bold(), storage.policy().kind());
    println!("{}: {}", "In Pipeline".white().bold(), stats.in_pipeline);
    println!("{}: {}", "Due Today".white().bold(), stats.due_today);
    println!("{}: {}", "Never Practised".white().bold(), stats.unscheduled);
    println!("{}: {}", "Learned".white().bold(), stats.learned);
    println!(
        "{}: {} days over {} steps",
        "Ladder".white().bold(),
        table.max_interval_days(),
        table.cycle_length()
    );
    Ok(())
}

fn run_migrate_levels(storage: &Storage, learner_id: &str) -> anyhow::Result<()> {
    if storage.policy().kind() != PolicyKind::Leveled {
        println!(
            "{}",
            "Note: levels are only read by the leveled policy.".yellow()
        );
    }
    let migrated = storage.migrate_legacy_levels(learner_id)?;
    println!("{} {} item(s)", "Migrated".green().bold(), migrated);
    Ok(())
}

fn run_clear(storage: &Storage, item_id: &str) -> anyhow::Result<()> {
    if storage.clear_schedule(item_id)? {
        println!("{}", "Schedule cleared".green().bold());
    } else {
        println!("{}", "Item had no schedule.".dimmed());
    }
    Ok(())
}

// ============================================================================
// FORMATTING
// ============================================================================

fn on_off(enabled: bool) -> colored::ColoredString {
    if enabled { "on".green() } else { "off".red() }
}

/// Minutes as a short human duration
fn format_interval(minutes: u32) -> String {
    match minutes {
        0 => "now".to_string(),
        m if m % ONE_DAY == 0 => format!("{}d", m / ONE_DAY),
        m if m % 60 == 0 => format!("{}h", m / 60),
        m => format!("{}m", m),
    }
}

fn format_rank(candidate: &StudyCandidate) -> String {
    match candidate.item.frequency_rank {
        Some(rank) => format!("#{}", rank),
        None => "-".to_string(),
    }
}

fn format_state(candidate: &StudyCandidate) -> colored::ColoredString {
    match candidate.cooling_interval {
        Some(interval) => format!("review, {}", format_interval(interval)).normal(),
        None => "new".yellow(),
    }
}
